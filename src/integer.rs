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

use std::cmp::Ordering;
use std::convert::TryFrom;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::{Product, Sum};
use std::ops::{
    Add, BitAnd, BitOr, BitXor, Div, Mul, Neg, Not, Rem, Shl, Shr, Sub,
};
use std::str::FromStr;
use std::sync::OnceLock;

use num_bigint_dig::{prime, BigInt, BigUint, ModInverse, RandBigInt, RandPrime, Sign};
use num_integer::Integer as _;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::bit_level;
use crate::conversion;
use crate::error::{ArithmeticError, ParseIntegerError, TryFromIntegerError};
use crate::logical;

/// An arbitrary-precision signed integer.
///
/// The value is a sign in `{-1, 0, +1}` plus a positive magnitude. The
/// magnitude exists in up to two lazily synchronized representations: an
/// opaque handle owned by the magnitude engine, which performs all heavy
/// arithmetic, and an explicit little-endian array of 32-bit digits,
/// which the bit-level and logical operators work on directly. Either
/// representation regenerates the other on demand; regeneration is
/// idempotent and safe under concurrent reads (compute once, publish
/// once).
///
/// `Integer` is immutable: every operation returns a new value. Equality
/// and ordering are numeric.
///
/// # Examples
///
/// ```
/// use bigdec::Integer;
///
/// let a: Integer = "340282366920938463463374607431768211456".parse()?;
/// assert_eq!(a, Integer::from(1u8) << 128);
/// assert_eq!((&a - &Integer::from(1u8)).bit_count(), 128);
/// # Ok::<_, bigdec::ParseIntegerError>(())
/// ```
pub struct Integer {
    sign: i8,
    digits: OnceLock<Box<[u32]>>,
    handle: OnceLock<BigInt>,
}

fn pack_bytes(bytes: &[u8]) -> Vec<u32> {
    if bytes.is_empty() {
        return vec![0];
    }
    let mut digits = Vec::with_capacity((bytes.len() + 3) / 4);
    for chunk in bytes.chunks(4) {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        digits.push(u32::from_le_bytes(word));
    }
    digits
}

fn strip_trailing_zero_digits(digits: &mut Vec<u32>) {
    while digits.len() > 1 && *digits.last().unwrap() == 0 {
        digits.pop();
    }
}

fn compare_magnitudes(a: &[u32], b: &[u32]) -> Ordering {
    match a.len().cmp(&b.len()) {
        Ordering::Equal => {}
        ord => return ord,
    }
    for (x, y) in a.iter().rev().zip(b.iter().rev()) {
        match x.cmp(y) {
            Ordering::Equal => {}
            ord => return ord,
        }
    }
    Ordering::Equal
}

impl Integer {
    /// Constructs an integer from a sign and an explicit digit array.
    /// Trailing zero words are stripped and a zero magnitude forces the
    /// sign to zero.
    pub(crate) fn from_raw(sign: i8, mut digits: Vec<u32>) -> Integer {
        strip_trailing_zero_digits(&mut digits);
        let sign = if digits == [0] { 0 } else { sign };
        debug_assert!(sign != 0 || digits == [0]);
        let cell = OnceLock::new();
        let _ = cell.set(digits.into_boxed_slice());
        Integer {
            sign,
            digits: cell,
            handle: OnceLock::new(),
        }
    }

    /// Constructs an integer around an engine handle.
    pub(crate) fn from_handle(handle: BigInt) -> Integer {
        let sign = if handle.is_zero() {
            0
        } else if handle.is_negative() {
            -1
        } else {
            1
        };
        let cell = OnceLock::new();
        let _ = cell.set(handle);
        Integer {
            sign,
            digits: OnceLock::new(),
            handle: cell,
        }
    }

    pub(crate) fn from_biguint(sign: i8, magnitude: BigUint) -> Integer {
        let engine_sign = match sign {
            _ if magnitude.is_zero() => Sign::NoSign,
            s if s < 0 => Sign::Minus,
            _ => Sign::Plus,
        };
        Integer::from_handle(BigInt::from_biguint(engine_sign, magnitude))
    }

    pub(crate) fn from_u128_magnitude(sign: i8, magnitude: u128) -> Integer {
        let digits = vec![
            magnitude as u32,
            (magnitude >> 32) as u32,
            (magnitude >> 64) as u32,
            (magnitude >> 96) as u32,
        ];
        Integer::from_raw(sign, digits)
    }

    pub(crate) fn sign(&self) -> i8 {
        self.sign
    }

    /// The explicit little-endian digit array, regenerated from the
    /// engine handle on first use.
    pub(crate) fn digits(&self) -> &[u32] {
        self.digits.get_or_init(|| {
            let handle = self
                .handle
                .get()
                .expect("integer must hold at least one representation");
            let (_, bytes) = handle.to_bytes_le();
            let mut digits = pack_bytes(&bytes);
            strip_trailing_zero_digits(&mut digits);
            digits.into_boxed_slice()
        })
    }

    /// The engine handle, regenerated from the explicit digit array on
    /// first use.
    pub(crate) fn handle(&self) -> &BigInt {
        self.handle.get_or_init(|| {
            let digits = self
                .digits
                .get()
                .expect("integer must hold at least one representation");
            let bytes: Vec<u8> = digits.iter().flat_map(|d| d.to_le_bytes()).collect();
            let engine_sign = match self.sign {
                0 => Sign::NoSign,
                s if s < 0 => Sign::Minus,
                _ => Sign::Plus,
            };
            BigInt::from_biguint(engine_sign, BigUint::from_bytes_le(&bytes))
        })
    }

    pub(crate) fn magnitude(&self) -> BigUint {
        self.handle()
            .to_biguint()
            .unwrap_or_else(|| (-self.handle()).to_biguint().expect("magnitude is positive"))
    }

    pub(crate) fn is_minus_one(&self) -> bool {
        self.sign < 0 && self.digits() == [1]
    }

    /// Parses an integer from a string in the given radix.
    ///
    /// An optional leading `+` or `-` is accepted. Panics if the radix
    /// is outside `2..=36`.
    pub fn from_str_radix(s: &str, radix: u32) -> Result<Integer, ParseIntegerError> {
        assert!((2..=36).contains(&radix), "radix out of range: {}", radix);
        match <BigInt as num_traits::Num>::from_str_radix(s, radix) {
            Ok(handle) => Ok(Integer::from_handle(handle)),
            Err(_) => Err(ParseIntegerError::new(s, radix)),
        }
    }

    /// Constructs a uniformly random non-negative integer with the given
    /// number of bits.
    pub fn random<R: rand::Rng + ?Sized>(bits: usize, rng: &mut R) -> Integer {
        Integer::from_biguint(1, rng.gen_biguint(bits))
    }

    /// Constructs a random probable prime with the given number of bits.
    pub fn probable_prime<R: rand::Rng + ?Sized>(bits: usize, rng: &mut R) -> Integer {
        Integer::from_biguint(1, rng.gen_prime(bits))
    }

    /// Constructs an integer from its two's-complement big-endian byte
    /// representation.
    pub fn from_signed_bytes_be(bytes: &[u8]) -> Integer {
        Integer::from_handle(BigInt::from_signed_bytes_be(bytes))
    }

    /// Constructs an integer from its two's-complement little-endian
    /// byte representation.
    pub fn from_signed_bytes_le(bytes: &[u8]) -> Integer {
        Integer::from_handle(BigInt::from_signed_bytes_le(bytes))
    }

    /// Constructs an integer from a sign and a big-endian magnitude.
    pub fn from_magnitude_bytes_be(sign: i8, bytes: &[u8]) -> Integer {
        Integer::from_biguint(sign, BigUint::from_bytes_be(bytes))
    }

    /// Returns the two's-complement big-endian byte representation.
    pub fn to_signed_bytes_be(&self) -> Vec<u8> {
        self.handle().to_signed_bytes_be()
    }

    /// Returns the two's-complement little-endian byte representation.
    pub fn to_signed_bytes_le(&self) -> Vec<u8> {
        self.handle().to_signed_bytes_le()
    }

    /// Returns the big-endian bytes of the magnitude.
    pub fn to_magnitude_bytes_be(&self) -> Vec<u8> {
        self.magnitude().to_bytes_be()
    }

    /// Returns the sign of the value as `-1`, `0` or `+1`.
    pub fn signum(&self) -> i32 {
        i32::from(self.sign)
    }

    /// Reports whether the value is zero.
    pub fn is_zero(&self) -> bool {
        self.sign == 0
    }

    /// Returns the absolute value.
    pub fn abs(&self) -> Integer {
        if self.sign >= 0 {
            self.clone()
        } else {
            -self
        }
    }

    /// Returns the smaller of `self` and `other`.
    pub fn min(&self, other: &Integer) -> Integer {
        if self <= other {
            self.clone()
        } else {
            other.clone()
        }
    }

    /// Returns the larger of `self` and `other`.
    pub fn max(&self, other: &Integer) -> Integer {
        if self >= other {
            self.clone()
        } else {
            other.clone()
        }
    }

    /// Divides `self` by `rhs`, reporting an error on a zero divisor.
    /// The quotient truncates toward zero.
    pub fn checked_div(&self, rhs: &Integer) -> Result<Integer, ArithmeticError> {
        if rhs.is_zero() {
            return Err(ArithmeticError::DivisionByZero);
        }
        Ok(Integer::from_handle(self.handle() / rhs.handle()))
    }

    /// Computes quotient and remainder in one step, reporting an error
    /// on a zero divisor. The quotient truncates toward zero and the
    /// remainder takes the sign of `self`.
    pub fn div_rem(&self, rhs: &Integer) -> Result<(Integer, Integer), ArithmeticError> {
        if rhs.is_zero() {
            return Err(ArithmeticError::DivisionByZero);
        }
        let (q, r) = self.handle().div_rem(rhs.handle());
        Ok((Integer::from_handle(q), Integer::from_handle(r)))
    }

    /// Computes the greatest common divisor of `self` and `rhs`. The
    /// result is non-negative.
    pub fn gcd(&self, rhs: &Integer) -> Integer {
        Integer::from_handle(self.handle().gcd(rhs.handle()))
    }

    /// Raises `self` to the `exp`th power.
    pub fn pow(&self, exp: u32) -> Integer {
        Integer::from_handle(num_traits::pow(self.handle().clone(), exp as usize))
    }

    /// Power with an exponent beyond the `u32` range; internal callers
    /// only reach this for powers of ten and five.
    pub(crate) fn pow_unbounded(&self, exp: u64) -> Integer {
        Integer::from_handle(num_traits::pow(self.handle().clone(), exp as usize))
    }

    /// Number of bits in the magnitude, ignoring the sign.
    pub(crate) fn magnitude_bit_length(&self) -> u64 {
        bit_level::bit_length(false, self.digits())
    }

    /// Computes `self mod modulus`, always in `[0, modulus)`. The
    /// modulus must be positive.
    pub fn modulo(&self, modulus: &Integer) -> Result<Integer, ArithmeticError> {
        if modulus.sign <= 0 {
            return Err(ArithmeticError::NonPositiveModulus);
        }
        Ok(Integer::from_handle(self.handle().mod_floor(modulus.handle())))
    }

    /// Computes `self^exponent mod modulus`. The modulus must be
    /// positive; a negative exponent requires `self` to be invertible
    /// modulo the modulus.
    ///
    /// A zero exponent is answered as `1 mod modulus` here rather than
    /// delegated: the engine's own zero-exponent handling is not relied
    /// upon.
    pub fn mod_pow(
        &self,
        exponent: &Integer,
        modulus: &Integer,
    ) -> Result<Integer, ArithmeticError> {
        if modulus.sign <= 0 {
            return Err(ArithmeticError::NonPositiveModulus);
        }
        if exponent.is_zero() {
            return Integer::one().modulo(modulus);
        }
        let base = if exponent.sign < 0 {
            self.mod_inverse(modulus)?
        } else {
            self.modulo(modulus)?
        };
        let base = base
            .handle()
            .to_biguint()
            .expect("residue is non-negative");
        let exp = exponent.magnitude();
        let m = modulus
            .handle()
            .to_biguint()
            .expect("modulus is positive");
        Ok(Integer::from_biguint(1, base.modpow(&exp, &m)))
    }

    /// Computes the multiplicative inverse of `self` modulo `modulus`,
    /// if it exists. The modulus must be positive.
    pub fn mod_inverse(&self, modulus: &Integer) -> Result<Integer, ArithmeticError> {
        if modulus.sign <= 0 {
            return Err(ArithmeticError::NonPositiveModulus);
        }
        match self.handle().clone().mod_inverse(modulus.handle()) {
            Some(inverse) => Integer::from_handle(inverse).modulo(modulus),
            None => Err(ArithmeticError::NotInvertible),
        }
    }

    /// Reports whether `|self|` is prime with error probability at most
    /// `2^-certainty`. A certainty of zero reports `true` without
    /// examining the value.
    pub fn is_probable_prime(&self, certainty: u32) -> bool {
        if certainty == 0 {
            return true;
        }
        // Each Miller-Rabin round buys roughly two bits of certainty.
        let reps = ((certainty as usize) + 1) / 2;
        prime::probably_prime(&self.magnitude(), reps.max(1))
    }

    /// Returns the first integer greater than `self` that is probably
    /// prime. Panics if `self` is negative.
    pub fn next_probable_prime(&self) -> Integer {
        assert!(self.sign >= 0, "next_probable_prime of a negative value");
        let two = Integer::from(2u8);
        if self < &two {
            return two;
        }
        let one = Integer::one();
        let mut candidate = self + &one;
        if !candidate.test_bit(0) {
            candidate = &candidate + &one;
        }
        loop {
            if prime::probably_prime(&candidate.magnitude(), 20) {
                return candidate;
            }
            candidate = &candidate + &two;
        }
    }

    /// Computes the number of bits in the minimal two's-complement
    /// representation, excluding the sign bit.
    pub fn bit_length(&self) -> u64 {
        bit_level::bit_length(self.sign < 0, self.digits())
    }

    /// Computes the number of bits that differ from the sign bit in the
    /// two's-complement representation.
    pub fn bit_count(&self) -> u64 {
        bit_level::bit_count(self.sign < 0, self.digits())
    }

    /// Tests bit `n` of the two's-complement representation.
    pub fn test_bit(&self, n: u64) -> bool {
        bit_level::test_bit(self.sign < 0, self.digits(), n)
    }

    /// Returns a value with bit `n` set.
    pub fn set_bit(&self, n: u64) -> Integer {
        if self.test_bit(n) {
            self.clone()
        } else {
            self.flip_bit(n)
        }
    }

    /// Returns a value with bit `n` cleared.
    pub fn clear_bit(&self, n: u64) -> Integer {
        if self.test_bit(n) {
            self.flip_bit(n)
        } else {
            self.clone()
        }
    }

    /// Returns a value with bit `n` of the two's-complement
    /// representation toggled.
    pub fn flip_bit(&self, n: u64) -> Integer {
        let sign = if self.sign == 0 { 1 } else { self.sign };
        Integer::from_raw(sign, bit_level::flip_bit(self.sign < 0, self.digits(), n))
    }

    /// Returns the index of the lowest set bit, or `None` for zero.
    pub fn lowest_set_bit(&self) -> Option<u64> {
        if self.sign == 0 {
            None
        } else {
            Some(bit_level::lowest_set_bit(self.digits()))
        }
    }

    /// Computes `self & !rhs`.
    pub fn and_not(&self, rhs: &Integer) -> Integer {
        logical::and_not(self, rhs)
    }

    /// Doubles the magnitude; the single-bit shift division uses to
    /// compare a remainder against half the divisor.
    pub(crate) fn shift_left_one_bit(&self) -> Integer {
        if self.sign == 0 {
            return Integer::zero();
        }
        Integer::from_raw(self.sign, bit_level::shift_left_one_bit(self.digits()))
    }

    /// Formats the value as a string in the given radix. Panics if the
    /// radix is outside `2..=36`.
    pub fn to_str_radix(&self, radix: u32) -> String {
        conversion::integer_to_string(self.sign, self.digits(), radix)
    }

    /// Converts the value to the nearest `f64`, or infinity if it is
    /// out of range.
    pub fn to_f64(&self) -> f64 {
        conversion::magnitude_to_f64(self.sign, self.digits())
    }

    /// Converts the value to the nearest `f32`, or infinity if it is
    /// out of range.
    pub fn to_f32(&self) -> f32 {
        self.to_f64() as f32
    }

    /// Returns the low 64 bits of the two's-complement representation.
    pub fn to_i64_wrapping(&self) -> i64 {
        let digits = self.digits();
        let mut low = u64::from(digits[0]);
        if digits.len() > 1 {
            low |= u64::from(digits[1]) << 32;
        }
        if self.sign < 0 {
            (low as i64).wrapping_neg()
        } else {
            low as i64
        }
    }

    /// Returns the low 32 bits of the two's-complement representation.
    pub fn to_i32_wrapping(&self) -> i32 {
        self.to_i64_wrapping() as i32
    }

    fn to_u128_magnitude(&self) -> Option<u128> {
        let digits = self.digits();
        if digits.len() > 4 {
            return None;
        }
        let mut mag = 0u128;
        for (i, &d) in digits.iter().enumerate() {
            mag |= u128::from(d) << (32 * i);
        }
        Some(mag)
    }
}

impl Clone for Integer {
    fn clone(&self) -> Integer {
        Integer {
            sign: self.sign,
            digits: self.digits.clone(),
            handle: self.handle.clone(),
        }
    }
}

impl fmt::Debug for Integer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let digits = conversion::magnitude_to_decimal_digits(self.digits());
        f.pad_integral(self.sign >= 0, "", &digits)
    }
}

impl fmt::LowerHex for Integer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = conversion::integer_to_string(self.sign.abs(), self.digits(), 16);
        f.pad_integral(self.sign >= 0, "0x", &s)
    }
}

impl fmt::UpperHex for Integer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = conversion::integer_to_string(self.sign.abs(), self.digits(), 16);
        f.pad_integral(self.sign >= 0, "0x", &s.to_ascii_uppercase())
    }
}

impl FromStr for Integer {
    type Err = ParseIntegerError;

    fn from_str(s: &str) -> Result<Integer, ParseIntegerError> {
        Integer::from_str_radix(s, 10)
    }
}

impl PartialEq for Integer {
    fn eq(&self, other: &Integer) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Integer {}

impl PartialOrd for Integer {
    fn partial_cmp(&self, other: &Integer) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Integer {
    fn cmp(&self, other: &Integer) -> Ordering {
        match self.sign.cmp(&other.sign) {
            Ordering::Equal => {}
            ord => return ord,
        }
        match self.sign {
            0 => Ordering::Equal,
            s if s < 0 => compare_magnitudes(other.digits(), self.digits()),
            _ => compare_magnitudes(self.digits(), other.digits()),
        }
    }
}

impl Hash for Integer {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sign.hash(state);
        self.digits().hash(state);
    }
}

impl Neg for &Integer {
    type Output = Integer;

    fn neg(self) -> Integer {
        Integer::from_raw(-self.sign, self.digits().to_vec())
    }
}

impl Neg for Integer {
    type Output = Integer;

    fn neg(self) -> Integer {
        -&self
    }
}

macro_rules! integer_binop {
    ($trait:ident, $method:ident, $op:tt) => {
        impl $trait<&Integer> for &Integer {
            type Output = Integer;

            fn $method(self, rhs: &Integer) -> Integer {
                Integer::from_handle(self.handle() $op rhs.handle())
            }
        }

        impl $trait<Integer> for Integer {
            type Output = Integer;

            fn $method(self, rhs: Integer) -> Integer {
                &self $op &rhs
            }
        }
    };
}

integer_binop!(Add, add, +);
integer_binop!(Sub, sub, -);
integer_binop!(Mul, mul, *);

impl Div<&Integer> for &Integer {
    type Output = Integer;

    /// Truncating division.
    ///
    /// Panics on a zero divisor; use [`Integer::checked_div`] to handle
    /// that case as an error.
    fn div(self, rhs: &Integer) -> Integer {
        match self.checked_div(rhs) {
            Ok(q) => q,
            Err(err) => panic!("{}", err),
        }
    }
}

impl Div<Integer> for Integer {
    type Output = Integer;

    fn div(self, rhs: Integer) -> Integer {
        &self / &rhs
    }
}

impl Rem<&Integer> for &Integer {
    type Output = Integer;

    /// Remainder of truncating division; takes the sign of the
    /// dividend.
    ///
    /// Panics on a zero divisor; use [`Integer::div_rem`] to handle
    /// that case as an error.
    fn rem(self, rhs: &Integer) -> Integer {
        match self.div_rem(rhs) {
            Ok((_, r)) => r,
            Err(err) => panic!("{}", err),
        }
    }
}

impl Rem<Integer> for Integer {
    type Output = Integer;

    fn rem(self, rhs: Integer) -> Integer {
        &self % &rhs
    }
}

impl Shl<usize> for &Integer {
    type Output = Integer;

    fn shl(self, count: usize) -> Integer {
        if self.sign == 0 {
            return Integer::zero();
        }
        Integer::from_raw(self.sign, bit_level::shift_left(self.digits(), count))
    }
}

impl Shl<usize> for Integer {
    type Output = Integer;

    fn shl(self, count: usize) -> Integer {
        &self << count
    }
}

impl Shr<usize> for &Integer {
    type Output = Integer;

    /// Arithmetic right shift: rounds toward negative infinity.
    fn shr(self, count: usize) -> Integer {
        if self.sign == 0 {
            return Integer::zero();
        }
        Integer::from_raw(
            self.sign,
            bit_level::shift_right(self.sign < 0, self.digits(), count),
        )
    }
}

impl Shr<usize> for Integer {
    type Output = Integer;

    fn shr(self, count: usize) -> Integer {
        &self >> count
    }
}

macro_rules! integer_bitop {
    ($trait:ident, $method:ident, $func:path) => {
        impl $trait<&Integer> for &Integer {
            type Output = Integer;

            fn $method(self, rhs: &Integer) -> Integer {
                $func(self, rhs)
            }
        }

        impl $trait<Integer> for Integer {
            type Output = Integer;

            fn $method(self, rhs: Integer) -> Integer {
                $func(&self, &rhs)
            }
        }
    };
}

integer_bitop!(BitAnd, bitand, logical::and);
integer_bitop!(BitOr, bitor, logical::or);
integer_bitop!(BitXor, bitxor, logical::xor);

impl Not for &Integer {
    type Output = Integer;

    fn not(self) -> Integer {
        logical::not(self)
    }
}

impl Not for Integer {
    type Output = Integer;

    fn not(self) -> Integer {
        logical::not(&self)
    }
}

impl Sum for Integer {
    fn sum<I>(iter: I) -> Integer
    where
        I: Iterator<Item = Integer>,
    {
        iter.fold(Integer::zero(), |acc, n| acc + n)
    }
}

impl Product for Integer {
    fn product<I>(iter: I) -> Integer
    where
        I: Iterator<Item = Integer>,
    {
        iter.fold(Integer::one(), |acc, n| acc * n)
    }
}

impl Zero for Integer {
    fn zero() -> Integer {
        Integer::from_raw(0, vec![0])
    }

    fn is_zero(&self) -> bool {
        self.sign == 0
    }
}

impl One for Integer {
    fn one() -> Integer {
        Integer::from_raw(1, vec![1])
    }
}

impl ToPrimitive for Integer {
    fn to_i64(&self) -> Option<i64> {
        if self.bit_length() > 63 {
            return None;
        }
        Some(self.to_i64_wrapping())
    }

    fn to_u64(&self) -> Option<u64> {
        if self.sign < 0 || bit_level::bit_length(false, self.digits()) > 64 {
            return None;
        }
        let digits = self.digits();
        let mut low = u64::from(digits[0]);
        if digits.len() > 1 {
            low |= u64::from(digits[1]) << 32;
        }
        Some(low)
    }

    fn to_i128(&self) -> Option<i128> {
        if self.bit_length() > 127 {
            return None;
        }
        let mag = self.to_u128_magnitude()? as i128;
        Some(if self.sign < 0 { mag.wrapping_neg() } else { mag })
    }

    fn to_u128(&self) -> Option<u128> {
        if self.sign < 0 {
            return None;
        }
        self.to_u128_magnitude()
    }

    fn to_f64(&self) -> Option<f64> {
        Some(Integer::to_f64(self))
    }

    fn to_f32(&self) -> Option<f32> {
        Some(Integer::to_f32(self))
    }
}

macro_rules! integer_try_from {
    ($($t:ty),* $(,)?) => {
        $(
            paste::paste! {
                impl TryFrom<&Integer> for $t {
                    type Error = TryFromIntegerError;

                    fn try_from(n: &Integer) -> Result<$t, TryFromIntegerError> {
                        n.[<to_ $t>]().ok_or(TryFromIntegerError)
                    }
                }

                impl TryFrom<Integer> for $t {
                    type Error = TryFromIntegerError;

                    fn try_from(n: Integer) -> Result<$t, TryFromIntegerError> {
                        <$t>::try_from(&n)
                    }
                }
            }
        )*
    };
}

integer_try_from!(i8, i16, i32, i64, i128, u8, u16, u32, u64, u128);

#[cfg(feature = "serde")]
impl serde::Serialize for Integer {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Integer {
    fn deserialize<D>(deserializer: D) -> Result<Integer, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = <String as serde::Deserialize>::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
