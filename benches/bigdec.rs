// Copyright Materialize, Inc. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository, or online at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use criterion::{criterion_group, criterion_main, Criterion};
use rand::{thread_rng, Rng};

use bigdec::{Context, Decimal, Integer, Rounding};

pub fn bench_parse_format(c: &mut Criterion) {
    let mut rng = thread_rng();
    let small = format!("{}.{:04}", rng.gen::<i32>(), rng.gen::<u16>() % 10_000);
    c.bench_function("parse_small", |b| {
        b.iter(|| small.parse::<Decimal>().unwrap())
    });

    let big: Decimal = "98765432109876543210987654321.0987654321".parse().unwrap();
    c.bench_function("format_big", |b| b.iter(|| big.to_string()));
}

pub fn bench_arith(c: &mut Criterion) {
    let x: Decimal = "12345.6789".parse().unwrap();
    let y: Decimal = "0.000271828182845904523536".parse().unwrap();
    c.bench_function("add_aligned", |b| b.iter(|| &x + &y));

    let cx = Context::new(34, Rounding::HalfEven);
    c.bench_function("div_decimal128", |b| b.iter(|| cx.div(&x, &y).unwrap()));
}

pub fn bench_bitops(c: &mut Criterion) {
    let mut rng = thread_rng();
    let a = Integer::random(2048, &mut rng);
    let b = -Integer::random(2048, &mut rng);
    c.bench_function("and_mixed_signs", |bench| bench.iter(|| &a & &b));
    c.bench_function("to_str_radix_36", |bench| bench.iter(|| a.to_str_radix(36)));
}

criterion_group!(benches, bench_parse_format, bench_arith, bench_bitops);
criterion_main!(benches);
