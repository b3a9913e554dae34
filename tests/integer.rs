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

use std::error::Error;

use rand::rngs::StdRng;
use rand::SeedableRng;

use bigdec::{int, ArithmeticError, Integer};

/// Operand pool spanning word boundaries, borrow regions and signs.
fn samples() -> Vec<Integer> {
    let mut values = Vec::new();
    for s in &[
        "0",
        "1",
        "-1",
        "2",
        "-2",
        "255",
        "-255",
        "4294967295",
        "4294967296",
        "-4294967296",
        "81985529216486895",
        "-81985529216486895",
        "340282366920938463463374607431768211456",
        "-340282366920938463463374607431768211455",
        "680564733841876926926749214863536422912",
    ] {
        values.push(s.parse().unwrap());
    }
    values
}

#[test]
fn test_logical_ops_match_twos_complement_definition() -> Result<(), Box<dyn Error>> {
    // Every operator must match the bit-by-bit two's-complement
    // definition through the virtual sign-extension bits.
    let values = samples();
    for a in &values {
        for b in &values {
            let bits = a.bit_length().max(b.bit_length()) + 2;
            let and = a & b;
            let or = a | b;
            let xor = a ^ b;
            let and_not = a.and_not(b);
            for i in 0..=bits {
                let (x, y) = (a.test_bit(i), b.test_bit(i));
                assert_eq!(and.test_bit(i), x & y, "({} & {}) bit {}", a, b, i);
                assert_eq!(or.test_bit(i), x | y, "({} | {}) bit {}", a, b, i);
                assert_eq!(xor.test_bit(i), x ^ y, "({} ^ {}) bit {}", a, b, i);
                assert_eq!(and_not.test_bit(i), x & !y, "({} &! {}) bit {}", a, b, i);
            }
        }
    }
    Ok(())
}

#[test]
fn test_not_identities() -> Result<(), Box<dyn Error>> {
    let minus_one = Integer::from(-1);
    for x in &samples() {
        assert_eq!(!&!x, x.clone(), "!!{}", x);
        assert_eq!(!x, -x - Integer::from(1), "!{}", x);
        assert_eq!(x ^ &minus_one, !x, "{} ^ -1", x);
    }
    Ok(())
}

#[test]
fn test_bit_length_and_count() -> Result<(), Box<dyn Error>> {
    for (value, length, count) in &[
        ("0", 0u64, 0u64),
        ("1", 1, 1),
        ("-1", 0, 0),
        ("255", 8, 8),
        ("256", 9, 1),
        ("-256", 8, 8),
        ("-255", 8, 7),
        ("4294967296", 33, 1),
        ("-4294967296", 32, 32),
        ("18446744073709551615", 64, 64),
    ] {
        let n: Integer = value.parse()?;
        assert_eq!(n.bit_length(), *length, "bit_length({})", value);
        assert_eq!(n.bit_count(), *count, "bit_count({})", value);
    }
    Ok(())
}

#[test]
fn test_shifts() -> Result<(), Box<dyn Error>> {
    assert_eq!(Integer::from(13) >> 2, Integer::from(3));
    // Arithmetic right shift rounds toward negative infinity.
    assert_eq!(Integer::from(-13) >> 2, Integer::from(-4));
    assert_eq!(Integer::from(-12) >> 2, Integer::from(-3));
    assert_eq!(Integer::from(-1) >> 100, Integer::from(-1));
    assert_eq!(Integer::from(7) >> 100, Integer::from(0));
    let one = Integer::from(1);
    assert_eq!((&one << 100) >> 100, one);
    assert_eq!(
        (&one << 128).to_string(),
        "340282366920938463463374607431768211456"
    );
    // Carries must propagate across word boundaries in both directions.
    let pattern: Integer = "81985529216486895".parse()?;
    assert_eq!(&(&pattern << 31) >> 31, pattern);
    Ok(())
}

#[test]
fn test_bit_access() -> Result<(), Box<dyn Error>> {
    for x in &[0x5ai64, -0x5a, 1, -1, 0, i64::MAX, i64::MIN] {
        let x128 = i128::from(*x);
        let n = Integer::from(*x);
        for i in 0..66u64 {
            let expect = (x128 >> i) & 1 == 1;
            assert_eq!(n.test_bit(i), expect, "test_bit({}, {})", x, i);
            assert_eq!(
                n.set_bit(i),
                Integer::from(x128 | (1i128 << i)),
                "set_bit({}, {})",
                x,
                i
            );
            assert_eq!(
                n.clear_bit(i),
                Integer::from(x128 & !(1i128 << i)),
                "clear_bit({}, {})",
                x,
                i
            );
        }
    }
    Ok(())
}

#[test]
fn test_flip_bit_edges() -> Result<(), Box<dyn Error>> {
    // Bit above all digits of a negative value.
    assert_eq!(int!(-1).flip_bit(40), "-1099511627777".parse()?);
    // Bit in the borrowed low region.
    assert_eq!(int!(-4294967296).flip_bit(0), int!(-4294967295));
    // Bit exactly at the first nonzero digit, forcing a fresh carry.
    assert_eq!(int!(-2147483648).flip_bit(31), int!(-4294967296));
    // Positive flips are plain XOR.
    assert_eq!(int!(5).flip_bit(1), int!(7));
    assert_eq!(int!(1).flip_bit(0), int!(0));
    assert_eq!(int!(0).flip_bit(3).clear_bit(3), int!(0));
    Ok(())
}

#[test]
fn test_lowest_set_bit() -> Result<(), Box<dyn Error>> {
    assert_eq!(int!(0).lowest_set_bit(), None);
    assert_eq!(int!(1).lowest_set_bit(), Some(0));
    assert_eq!(int!(-96).lowest_set_bit(), Some(5));
    assert_eq!((int!(1) << 70).lowest_set_bit(), Some(70));
    Ok(())
}

#[test]
fn test_radix_strings() -> Result<(), Box<dyn Error>> {
    let n: Integer = "81985529216486895".parse()?;
    assert_eq!(n.to_str_radix(16), "123456789abcdef");
    assert_eq!(format!("{:x}", n), "123456789abcdef");
    assert_eq!(format!("{:X}", -&n), "-123456789ABCDEF");
    assert_eq!(int!(-255).to_str_radix(2), "-11111111");
    assert_eq!(int!(35).to_str_radix(36), "z");
    for radix in &[2u32, 7, 16, 36] {
        let back = Integer::from_str_radix(&n.to_str_radix(*radix), *radix)?;
        assert_eq!(back, n, "radix {}", radix);
    }
    assert!(Integer::from_str_radix("12g", 16).is_err());
    assert!("12 3".parse::<Integer>().is_err());
    Ok(())
}

#[test]
fn test_engine_arithmetic() -> Result<(), Box<dyn Error>> {
    let a: Integer = "123456789012345678901234567890".parse()?;
    let b: Integer = "987654321098765432109876543210".parse()?;
    assert_eq!(
        (&a * &b).to_string(),
        "121932631137021795226185032733622923332237463801111263526900"
    );
    let (q, r) = b.div_rem(&a)?;
    assert_eq!(q, Integer::from(8));
    assert_eq!(r.to_string(), "9000000000900000000090");
    assert_eq!(a.gcd(&b).to_string(), "9000000000900000000090");
    assert_eq!(
        a.checked_div(&Integer::from(0)).unwrap_err(),
        ArithmeticError::DivisionByZero
    );
    assert_eq!(Integer::from(3).pow(40).to_string(), "12157665459056928801");
    Ok(())
}

#[test]
fn test_modular_arithmetic() -> Result<(), Box<dyn Error>> {
    let m = Integer::from(497);
    assert_eq!(
        Integer::from(4).mod_pow(&Integer::from(13), &m)?,
        Integer::from(445)
    );
    // Negative bases reduce into [0, m).
    assert_eq!(
        Integer::from(-5).modulo(&Integer::from(3))?,
        Integer::from(1)
    );
    assert_eq!(
        Integer::from(3).mod_inverse(&Integer::from(7))?,
        Integer::from(5)
    );
    assert_eq!(
        Integer::from(4).mod_inverse(&Integer::from(8)).unwrap_err(),
        ArithmeticError::NotInvertible
    );
    assert_eq!(
        Integer::from(4).modulo(&Integer::from(0)).unwrap_err(),
        ArithmeticError::NonPositiveModulus
    );
    // A negative exponent routes through the inverse.
    assert_eq!(
        Integer::from(3).mod_pow(&Integer::from(-1), &Integer::from(7))?,
        Integer::from(5)
    );
    Ok(())
}

#[test]
fn test_mod_pow_zero_exponent() -> Result<(), Box<dyn Error>> {
    // The zero exponent is answered without consulting the engine:
    // x^0 mod m is 1 mod m, which is 0 when m is 1.
    let zero = Integer::from(0);
    for base in &["0", "1", "-7", "123456789012345678901234567890"] {
        let base: Integer = base.parse()?;
        assert_eq!(base.mod_pow(&zero, &Integer::from(7))?, Integer::from(1));
        assert_eq!(base.mod_pow(&zero, &Integer::from(1))?, Integer::from(0));
    }
    Ok(())
}

#[test]
fn test_primality() -> Result<(), Box<dyn Error>> {
    assert!(int!(2).is_probable_prime(50));
    assert!(int!(17).is_probable_prime(50));
    assert!(!int!(18).is_probable_prime(50));
    assert!(int!(2305843009213693951).is_probable_prime(50)); // 2^61 - 1
    assert!(!int!(2305843009213693953).is_probable_prime(50));
    assert_eq!(int!(14).next_probable_prime(), int!(17));
    assert_eq!(int!(0).next_probable_prime(), int!(2));
    assert_eq!(int!(7919).next_probable_prime(), int!(7927));
    Ok(())
}

#[test]
fn test_random_construction() -> Result<(), Box<dyn Error>> {
    let mut rng = StdRng::seed_from_u64(17);
    let n = Integer::random(200, &mut rng);
    assert!(n.signum() >= 0);
    assert!(n.bit_length() <= 200);
    let p = Integer::probable_prime(96, &mut rng);
    assert_eq!(p.bit_length(), 96);
    assert!(p.is_probable_prime(50));
    Ok(())
}

#[test]
fn test_byte_round_trips() -> Result<(), Box<dyn Error>> {
    for s in &["0", "1", "-1", "255", "-256", "81985529216486895", "-81985529216486895"] {
        let n: Integer = s.parse()?;
        assert_eq!(Integer::from_signed_bytes_be(&n.to_signed_bytes_be()), n);
        assert_eq!(Integer::from_signed_bytes_le(&n.to_signed_bytes_le()), n);
    }
    let n = Integer::from_magnitude_bytes_be(-1, &[1, 0]);
    assert_eq!(n, int!(-256));
    assert_eq!(n.to_magnitude_bytes_be(), vec![1, 0]);
    Ok(())
}

#[test]
fn test_double_conversion_boundaries() -> Result<(), Box<dyn Error>> {
    // Below 2^53 every integer is exact.
    let exact = Integer::from((1i64 << 53) - 1);
    assert_eq!(exact.to_f64(), 9007199254740991.0);
    // 2^53 + 1 ties to the even neighbor, not truncation.
    let above = Integer::from((1i64 << 53) + 1);
    assert_eq!(above.to_f64(), 9007199254740992.0);
    // The largest finite double converts exactly; one half-ulp past it
    // overflows to infinity.
    let max = Integer::from((1i64 << 53) - 1) << 971;
    assert_eq!(max.to_f64(), f64::MAX);
    assert_eq!((-&max).to_f64(), f64::MIN);
    let over = Integer::from((1i64 << 54) - 1) << 970;
    assert_eq!(over.to_f64(), f64::INFINITY);
    assert_eq!((Integer::from(1) << 1100).to_f64(), f64::INFINITY);
    // Round-half-even on the 54-bit window.
    let tie = (Integer::from(1) << 64) + (Integer::from(1) << 11);
    assert_eq!(tie.to_f64(), (1u128 << 64) as f64);
    Ok(())
}

#[test]
fn test_primitive_conversions() -> Result<(), Box<dyn Error>> {
    use std::convert::TryFrom;
    let n = Integer::from(i64::MIN);
    assert_eq!(i64::try_from(&n)?, i64::MIN);
    assert!(u64::try_from(&n).is_err());
    assert_eq!(u64::try_from(&int!(18446744073709551615))?, u64::MAX);
    assert_eq!(int!(18446744073709551616).to_i64_wrapping(), 0);
    assert_eq!(int!(-2).to_i32_wrapping(), -2);
    Ok(())
}
