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

//! Two's-complement logical operations over sign-magnitude integers.
//!
//! Values are stored as a sign plus a positive magnitude, so NOT, AND,
//! OR, XOR and AND-NOT cannot be applied digit-wise directly: the two's
//! complement of a negative value differs from its magnitude. The
//! complement is synthesized on the fly from the position of the first
//! nonzero magnitude digit `f`:
//!
//! ```text
//! twos[i] = 0        for i < f
//! twos[f] = -mag[f]
//! twos[i] = !mag[i]  for f < i < len
//! twos[i] = !0       for i >= len (virtual sign extension)
//! ```
//!
//! Each operator dispatches on the `(sign, sign)` pair to a dedicated
//! routine; the four cases bound their result lengths differently and a
//! single unified formula would have to pay for the worst case
//! everywhere. Negative results are produced as a bounded
//! two's-complement buffer and converted back to a magnitude, growing by
//! one guard digit when the buffer collapses to zero and the borrow
//! ripples past it.

use crate::bit_level::first_nonzero_digit;
use crate::integer::Integer;

/// Magnitude digit of a non-negative operand, zero-extended.
fn pos_digit(digits: &[u32], i: usize) -> u32 {
    if i < digits.len() {
        digits[i]
    } else {
        0
    }
}

/// Two's-complement digit of a negative operand with magnitude `digits`
/// and first nonzero digit `fnz`, sign-extended.
fn neg_digit(digits: &[u32], fnz: usize, i: usize) -> u32 {
    if i < fnz {
        0
    } else if i == fnz {
        digits[i].wrapping_neg()
    } else if i < digits.len() {
        !digits[i]
    } else {
        u32::MAX
    }
}

/// Converts a bounded two's-complement buffer of a negative result back
/// into its magnitude.
///
/// If every buffered digit is zero the true magnitude is one power of
/// 2^32 larger than the buffer, so a guard digit is appended.
fn twos_to_magnitude(mut t: Vec<u32>) -> Vec<u32> {
    match t.iter().position(|&d| d != 0) {
        Some(f) => {
            t[f] = t[f].wrapping_neg();
            for d in &mut t[f + 1..] {
                *d = !*d;
            }
            t
        }
        None => {
            t.push(1);
            t
        }
    }
}

/// Computes `!val`, i.e. `-val - 1`.
///
/// Implemented as a single carry (positive input) or borrow (negative
/// input) propagated from the first nonzero digit, rather than negating
/// and then subtracting.
pub(crate) fn not(val: &Integer) -> Integer {
    if val.is_zero() {
        return Integer::from_raw(-1, vec![1]);
    }
    let digits = val.digits();
    if val.sign() > 0 {
        // !val = -(val + 1)
        let mut res = digits.to_vec();
        crate::bit_level::increment_in_place(&mut res);
        Integer::from_raw(-1, res)
    } else {
        // !(-mag) = mag - 1
        let mut res = digits.to_vec();
        let fnz = first_nonzero_digit(digits);
        for d in &mut res[..fnz] {
            *d = u32::MAX;
        }
        res[fnz] -= 1;
        Integer::from_raw(1, res)
    }
}

/// Computes `a & b`.
pub(crate) fn and(a: &Integer, b: &Integer) -> Integer {
    if a.is_zero() || b.is_zero() {
        return Integer::from_raw(0, vec![0]);
    }
    if a.is_minus_one() {
        return b.clone();
    }
    if b.is_minus_one() || a == b {
        return a.clone();
    }
    match (a.sign() > 0, b.sign() > 0) {
        (true, true) => and_positive(a.digits(), b.digits()),
        (true, false) => and_diff_signs(a.digits(), b.digits()),
        (false, true) => and_diff_signs(b.digits(), a.digits()),
        (false, false) => and_negative(a.digits(), b.digits()),
    }
}

/// AND of two positive operands: never longer than the shorter one.
fn and_positive(a: &[u32], b: &[u32]) -> Integer {
    let len = a.len().min(b.len());
    let start = first_nonzero_digit(a).max(first_nonzero_digit(b));
    if start >= len {
        return Integer::from_raw(0, vec![0]);
    }
    let mut res = vec![0u32; len];
    for i in start..len {
        res[i] = a[i] & b[i];
    }
    Integer::from_raw(1, res)
}

/// AND of a positive and a negative operand: positive, bounded by the
/// positive operand's length.
fn and_diff_signs(pos: &[u32], neg: &[u32]) -> Integer {
    let fnz_neg = first_nonzero_digit(neg);
    if fnz_neg >= pos.len() {
        // The borrowed zeros of the negative blank every positive digit.
        return Integer::from_raw(0, vec![0]);
    }
    let mut res = vec![0u32; pos.len()];
    for (i, digit) in res.iter_mut().enumerate().skip(fnz_neg) {
        *digit = pos[i] & neg_digit(neg, fnz_neg, i);
    }
    Integer::from_raw(1, res)
}

/// AND of two negative operands: negative, can carry one guard digit
/// past the longer operand.
fn and_negative(a: &[u32], b: &[u32]) -> Integer {
    let fnz_a = first_nonzero_digit(a);
    let fnz_b = first_nonzero_digit(b);
    let len = a.len().max(b.len());
    let mut t = vec![0u32; len];
    for (i, digit) in t.iter_mut().enumerate().take(len).skip(fnz_a.min(fnz_b)) {
        *digit = neg_digit(a, fnz_a, i) & neg_digit(b, fnz_b, i);
    }
    Integer::from_raw(-1, twos_to_magnitude(t))
}

/// Computes `a | b`.
pub(crate) fn or(a: &Integer, b: &Integer) -> Integer {
    if a.is_minus_one() || b.is_minus_one() {
        return Integer::from_raw(-1, vec![1]);
    }
    if a.is_zero() {
        return b.clone();
    }
    if b.is_zero() || a == b {
        return a.clone();
    }
    match (a.sign() > 0, b.sign() > 0) {
        (true, true) => or_positive(a.digits(), b.digits()),
        (true, false) => or_diff_signs(a.digits(), b.digits()),
        (false, true) => or_diff_signs(b.digits(), a.digits()),
        (false, false) => or_negative(a.digits(), b.digits()),
    }
}

/// OR of two positive operands: as long as the longer one.
fn or_positive(a: &[u32], b: &[u32]) -> Integer {
    let len = a.len().max(b.len());
    let mut res = vec![0u32; len];
    for (i, digit) in res.iter_mut().enumerate() {
        *digit = pos_digit(a, i) | pos_digit(b, i);
    }
    Integer::from_raw(1, res)
}

/// OR of a positive and a negative operand: negative, bounded by the
/// negative operand's length.
fn or_diff_signs(pos: &[u32], neg: &[u32]) -> Integer {
    let fnz_neg = first_nonzero_digit(neg);
    let mut t = vec![0u32; neg.len()];
    for (i, digit) in t.iter_mut().enumerate() {
        *digit = pos_digit(pos, i) | neg_digit(neg, fnz_neg, i);
    }
    Integer::from_raw(-1, twos_to_magnitude(t))
}

/// OR of two negative operands: negative, bounded by the shorter one.
fn or_negative(a: &[u32], b: &[u32]) -> Integer {
    let fnz_a = first_nonzero_digit(a);
    let fnz_b = first_nonzero_digit(b);
    let len = a.len().min(b.len());
    let mut t = vec![0u32; len];
    for (i, digit) in t.iter_mut().enumerate() {
        *digit = neg_digit(a, fnz_a, i) | neg_digit(b, fnz_b, i);
    }
    Integer::from_raw(-1, twos_to_magnitude(t))
}

/// Computes `a ^ b`.
pub(crate) fn xor(a: &Integer, b: &Integer) -> Integer {
    if a.is_zero() {
        return b.clone();
    }
    if b.is_zero() {
        return a.clone();
    }
    if a.is_minus_one() {
        return not(b);
    }
    if b.is_minus_one() {
        return not(a);
    }
    if a == b {
        return Integer::from_raw(0, vec![0]);
    }
    match (a.sign() > 0, b.sign() > 0) {
        (true, true) => xor_positive(a.digits(), b.digits()),
        (true, false) => xor_diff_signs(a.digits(), b.digits()),
        (false, true) => xor_diff_signs(b.digits(), a.digits()),
        (false, false) => xor_negative(a.digits(), b.digits()),
    }
}

/// XOR of two positive operands.
fn xor_positive(a: &[u32], b: &[u32]) -> Integer {
    let len = a.len().max(b.len());
    let mut res = vec![0u32; len];
    for (i, digit) in res.iter_mut().enumerate() {
        *digit = pos_digit(a, i) ^ pos_digit(b, i);
    }
    Integer::from_raw(1, res)
}

/// XOR of a positive and a negative operand: negative, can carry one
/// guard digit when every stored digit cancels.
fn xor_diff_signs(pos: &[u32], neg: &[u32]) -> Integer {
    let fnz_neg = first_nonzero_digit(neg);
    let len = pos.len().max(neg.len());
    let mut t = vec![0u32; len];
    for (i, digit) in t.iter_mut().enumerate() {
        *digit = pos_digit(pos, i) ^ neg_digit(neg, fnz_neg, i);
    }
    Integer::from_raw(-1, twos_to_magnitude(t))
}

/// XOR of two negative operands: positive, since the virtual sign bits
/// cancel.
fn xor_negative(a: &[u32], b: &[u32]) -> Integer {
    let fnz_a = first_nonzero_digit(a);
    let fnz_b = first_nonzero_digit(b);
    let len = a.len().max(b.len());
    let mut res = vec![0u32; len];
    for (i, digit) in res.iter_mut().enumerate() {
        *digit = neg_digit(a, fnz_a, i) ^ neg_digit(b, fnz_b, i);
    }
    Integer::from_raw(1, res)
}

/// Computes `a & !b`.
pub(crate) fn and_not(a: &Integer, b: &Integer) -> Integer {
    if a.is_zero() || b.is_minus_one() || a == b {
        return Integer::from_raw(0, vec![0]);
    }
    if b.is_zero() {
        return a.clone();
    }
    if a.is_minus_one() {
        return not(b);
    }
    match (a.sign() > 0, b.sign() > 0) {
        (true, true) => and_not_positive(a.digits(), b.digits()),
        (true, false) => and_not_positive_negative(a.digits(), b.digits()),
        (false, true) => and_not_negative_positive(a.digits(), b.digits()),
        (false, false) => and_not_negative(a.digits(), b.digits()),
    }
}

/// AND-NOT of two positive operands: bounded by the first.
fn and_not_positive(a: &[u32], b: &[u32]) -> Integer {
    let mut res = vec![0u32; a.len()];
    for (i, digit) in res.iter_mut().enumerate() {
        *digit = a[i] & !pos_digit(b, i);
    }
    Integer::from_raw(1, res)
}

/// AND-NOT of a positive first and negative second operand: positive,
/// bounded by the shorter operand.
fn and_not_positive_negative(a: &[u32], b: &[u32]) -> Integer {
    let fnz_b = first_nonzero_digit(b);
    let len = a.len().min(b.len());
    let mut res = vec![0u32; len];
    for (i, digit) in res.iter_mut().enumerate() {
        *digit = a[i] & !neg_digit(b, fnz_b, i);
    }
    Integer::from_raw(1, res)
}

/// AND-NOT of a negative first and positive second operand: negative,
/// can carry one guard digit.
fn and_not_negative_positive(a: &[u32], b: &[u32]) -> Integer {
    let fnz_a = first_nonzero_digit(a);
    let len = a.len().max(b.len());
    let mut t = vec![0u32; len];
    for (i, digit) in t.iter_mut().enumerate() {
        *digit = neg_digit(a, fnz_a, i) & !pos_digit(b, i);
    }
    Integer::from_raw(-1, twos_to_magnitude(t))
}

/// AND-NOT of two negative operands: positive, bounded by the second.
fn and_not_negative(a: &[u32], b: &[u32]) -> Integer {
    let fnz_a = first_nonzero_digit(a);
    let fnz_b = first_nonzero_digit(b);
    let mut res = vec![0u32; b.len()];
    for (i, digit) in res.iter_mut().enumerate() {
        *digit = neg_digit(a, fnz_a, i) & !neg_digit(b, fnz_b, i);
    }
    Integer::from_raw(1, res)
}
