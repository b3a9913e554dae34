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

//! Division of a digit array by a single machine word.
//!
//! This is the one-word-divisor step of Knuth's algorithm D: each digit
//! of the dividend, from most significant to least, is combined with the
//! running remainder into a 64-bit intermediate and divided by the
//! zero-extended divisor.

/// Divides the first `len` digits of `src` by `divisor`, writing the
/// quotient into `dest` and returning the remainder.
///
/// `dest` and `src` may be the same slice; the quotient of a digit is
/// written only after that digit has been read. The divisor must be
/// nonzero; callers guarantee this.
pub(crate) fn divide_array_by_word(dest: &mut [u32], src_len: usize, divisor: u32) -> u32 {
    let divisor = u64::from(divisor);
    let mut rem: u64 = 0;
    for i in (0..src_len).rev() {
        let chunk = (rem << 32) | u64::from(dest[i]);
        dest[i] = (chunk / divisor) as u32;
        rem = chunk % divisor;
    }
    rem as u32
}
