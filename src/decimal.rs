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
use std::iter::{Product, Sum};
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

use num_traits::{One, ToPrimitive, Zero};

use crate::context::{Context, Rounding};
use crate::conversion;
use crate::error::{
    ArithmeticError, ParseDecimalError, TryFromDecimalError, TryIntoDecimalError,
};
use crate::integer::Integer;

/// Powers of ten that fit in a signed 64-bit word.
pub(crate) const LONG_TEN_POW: [i64; 19] = [
    1,
    10,
    100,
    1_000,
    10_000,
    100_000,
    1_000_000,
    10_000_000,
    100_000_000,
    1_000_000_000,
    10_000_000_000,
    100_000_000_000,
    1_000_000_000_000,
    10_000_000_000_000,
    100_000_000_000_000,
    1_000_000_000_000_000,
    10_000_000_000_000_000,
    100_000_000_000_000_000,
    1_000_000_000_000_000_000,
];

/// Powers of five that fit in a signed 64-bit word.
pub(crate) const LONG_FIVE_POW: [i64; 28] = [
    1,
    5,
    25,
    125,
    625,
    3_125,
    15_625,
    78_125,
    390_625,
    1_953_125,
    9_765_625,
    48_828_125,
    244_140_625,
    1_220_703_125,
    6_103_515_625,
    30_517_578_125,
    152_587_890_625,
    762_939_453_125,
    3_814_697_265_625,
    19_073_486_328_125,
    95_367_431_640_625,
    476_837_158_203_125,
    2_384_185_791_015_625,
    11_920_928_955_078_125,
    59_604_644_775_390_625,
    298_023_223_876_953_125,
    1_490_116_119_384_765_625,
    7_450_580_596_923_828_125,
];

const LOG10_2: f64 = 0.301_029_995_663_981_2;

/// Returns `10^exp` as an integer.
pub(crate) fn ten_pow(exp: u64) -> Integer {
    if exp < LONG_TEN_POW.len() as u64 {
        Integer::from(LONG_TEN_POW[exp as usize])
    } else {
        Integer::from(10i64).pow_unbounded(exp)
    }
}

/// Multiplies an integer by `10^exp`.
fn multiply_by_ten_pow(n: &Integer, exp: u64) -> Integer {
    if exp < LONG_TEN_POW.len() as u64 {
        n * &Integer::from(LONG_TEN_POW[exp as usize])
    } else {
        n * &ten_pow(exp)
    }
}

/// Multiplies an integer by `5^exp`.
fn multiply_by_five_pow(n: &Integer, exp: u64) -> Integer {
    if exp < LONG_FIVE_POW.len() as u64 {
        n * &Integer::from(LONG_FIVE_POW[exp as usize])
    } else {
        n * &Integer::from(5i64).pow_unbounded(exp)
    }
}

fn to_int_scale(scale: i64) -> Result<i32, ArithmeticError> {
    i32::try_from(scale).map_err(|_| ArithmeticError::ScaleOutOfRange(scale))
}

/// The unscaled value of a decimal: a machine word when it fits, the
/// integer facade otherwise.
#[derive(Clone, PartialEq, Eq, Hash)]
enum Unscaled {
    Small(i64),
    Big(Integer),
}

/// An immutable arbitrary-precision signed decimal number.
///
/// A decimal is an unscaled integer value and a 32-bit scale: the value
/// is `unscaled × 10^-scale`. Unscaled values that fit in 63 bits are
/// kept in a machine word and only promoted to the arbitrary-precision
/// integer facade (and from there to the magnitude engine) when an
/// operation overflows the fast path.
///
/// Equality is exact: two decimals are equal only if both the unscaled
/// value and the scale match, so `1.0` and `1.00` are not equal even
/// though they compare numerically equivalent. Use [`Decimal::compare`]
/// or [`OrderedDecimal`](crate::OrderedDecimal) for numeric ordering.
///
/// The overloaded operators compute exact, unbounded results; rounded
/// arithmetic lives on [`Context`].
///
/// # Examples
///
/// ```
/// use bigdec::Decimal;
///
/// let x: Decimal = "0.125".parse()?;
/// let y: Decimal = "8".parse()?;
/// assert_eq!(x.divide(&y)?.to_string(), "0.015625");
/// # Ok::<_, Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Decimal {
    unscaled: Unscaled,
    scale: i32,
}

impl Decimal {
    /// The value 0 with scale 0.
    pub const ZERO: Decimal = Decimal {
        unscaled: Unscaled::Small(0),
        scale: 0,
    };

    /// The value 1 with scale 0.
    pub const ONE: Decimal = Decimal {
        unscaled: Unscaled::Small(1),
        scale: 0,
    };

    /// The value 10 with scale 0.
    pub const TEN: Decimal = Decimal {
        unscaled: Unscaled::Small(10),
        scale: 0,
    };

    /// Constructs a decimal from an arbitrary-precision unscaled value
    /// and a scale.
    pub fn new(unscaled: Integer, scale: i32) -> Decimal {
        Decimal::from_unscaled(unscaled, scale)
    }

    /// Constructs a decimal from a machine-word unscaled value and a
    /// scale.
    pub fn from_unscaled_i64(unscaled: i64, scale: i32) -> Decimal {
        Decimal {
            unscaled: Unscaled::Small(unscaled),
            scale,
        }
    }

    pub(crate) fn from_unscaled(unscaled: Integer, scale: i32) -> Decimal {
        match unscaled.to_i64() {
            Some(small) => Decimal::from_unscaled_i64(small, scale),
            None => Decimal {
                unscaled: Unscaled::Big(unscaled),
                scale,
            },
        }
    }

    fn zero_scaled_by(scale: i64) -> Result<Decimal, ArithmeticError> {
        Ok(Decimal::from_unscaled_i64(0, to_int_scale(scale)?))
    }

    fn small(&self) -> Option<i64> {
        match self.unscaled {
            Unscaled::Small(v) => Some(v),
            Unscaled::Big(_) => None,
        }
    }

    /// Returns the unscaled value.
    pub fn unscaled_value(&self) -> Integer {
        match &self.unscaled {
            Unscaled::Small(v) => Integer::from(*v),
            Unscaled::Big(n) => n.clone(),
        }
    }

    /// Returns the scale: the power of ten the unscaled value is
    /// divided by. A negative scale denotes trailing integral zeros.
    pub fn scale(&self) -> i32 {
        self.scale
    }

    /// Returns the number of significant decimal digits in the unscaled
    /// value; at least 1.
    pub fn precision(&self) -> u64 {
        match &self.unscaled {
            Unscaled::Small(0) => 1,
            Unscaled::Small(v) => u64::from(v.unsigned_abs().ilog10()) + 1,
            Unscaled::Big(n) => {
                let bits = n.magnitude_bit_length();
                let estimate = ((bits - 1) as f64 * LOG10_2) as u64 + 1;
                if n.abs().cmp(&ten_pow(estimate)) != Ordering::Less {
                    estimate + 1
                } else {
                    estimate
                }
            }
        }
    }

    /// An inexpensive estimate of [`Decimal::precision`], accurate to
    /// within one digit.
    fn aprox_precision(&self) -> i64 {
        let bits = match &self.unscaled {
            Unscaled::Small(v) => u64::from(64 - v.unsigned_abs().leading_zeros()),
            Unscaled::Big(n) => n.magnitude_bit_length(),
        };
        if bits == 0 {
            return 1;
        }
        ((bits - 1) as f64 * LOG10_2) as i64 + 1
    }

    /// Returns the sign of the value as `-1`, `0` or `+1`.
    pub fn signum(&self) -> i32 {
        match &self.unscaled {
            Unscaled::Small(v) => match v.cmp(&0) {
                Ordering::Less => -1,
                Ordering::Equal => 0,
                Ordering::Greater => 1,
            },
            Unscaled::Big(n) => n.signum(),
        }
    }

    /// Reports whether the value is zero at any scale.
    pub fn is_zero(&self) -> bool {
        matches!(self.unscaled, Unscaled::Small(0))
    }

    /// Returns the absolute value.
    pub fn abs(&self) -> Decimal {
        if self.signum() < 0 {
            -self
        } else {
            self.clone()
        }
    }

    /// Returns the size of an ulp, a unit in the last place: one at
    /// this value's scale.
    pub fn ulp(&self) -> Decimal {
        Decimal::from_unscaled_i64(1, self.scale)
    }

    /// Returns the numerically smaller of `self` and `other`.
    pub fn min(&self, other: &Decimal) -> Decimal {
        if self.compare(other) != Ordering::Greater {
            self.clone()
        } else {
            other.clone()
        }
    }

    /// Returns the numerically larger of `self` and `other`.
    pub fn max(&self, other: &Decimal) -> Decimal {
        if self.compare(other) != Ordering::Less {
            self.clone()
        } else {
            other.clone()
        }
    }

    /// Compares two decimals numerically, ignoring scale differences:
    /// `1.0` and `1.00` compare equal here while `==` distinguishes
    /// them.
    pub fn compare(&self, other: &Decimal) -> Ordering {
        let this_sign = self.signum();
        let other_sign = other.signum();
        if this_sign != other_sign {
            return this_sign.cmp(&other_sign);
        }
        if let (Some(a), Some(b)) = (self.small(), other.small()) {
            if self.scale == other.scale {
                return a.cmp(&b);
            }
        }
        let diff_scale = i64::from(self.scale) - i64::from(other.scale);
        let diff_precision = self.aprox_precision() - other.aprox_precision();
        if diff_precision > diff_scale + 1 {
            this_sign.cmp(&0)
        } else if diff_precision < diff_scale - 1 {
            0.cmp(&this_sign)
        } else {
            let mut this_unscaled = self.unscaled_value();
            let mut other_unscaled = other.unscaled_value();
            if diff_scale < 0 {
                this_unscaled = multiply_by_ten_pow(&this_unscaled, diff_scale.unsigned_abs());
            } else if diff_scale > 0 {
                other_unscaled = multiply_by_ten_pow(&other_unscaled, diff_scale as u64);
            }
            this_unscaled.cmp(&other_unscaled)
        }
    }

    /// Adds two decimals exactly; the result carries the larger scale.
    fn add_impl(&self, rhs: &Decimal) -> Decimal {
        let diff_scale = i64::from(self.scale) - i64::from(rhs.scale);
        if self.is_zero() {
            if diff_scale <= 0 {
                return rhs.clone();
            }
            if rhs.is_zero() {
                return self.clone();
            }
        } else if rhs.is_zero() && diff_scale >= 0 {
            return self.clone();
        }
        match diff_scale.cmp(&0) {
            Ordering::Equal => {
                if let (Some(a), Some(b)) = (self.small(), rhs.small()) {
                    if let Some(sum) = a.checked_add(b) {
                        return Decimal::from_unscaled_i64(sum, self.scale);
                    }
                }
                Decimal::from_unscaled(
                    self.unscaled_value() + rhs.unscaled_value(),
                    self.scale,
                )
            }
            Ordering::Greater => add_and_mult10(self, rhs, diff_scale as u64),
            Ordering::Less => add_and_mult10(rhs, self, diff_scale.unsigned_abs()),
        }
    }

    /// Divides exactly, failing when the quotient has a non-terminating
    /// decimal expansion.
    ///
    /// The dividend and divisor are reduced by their greatest common
    /// divisor and every factor of two and five is stripped from the
    /// reduced divisor; any residue beyond ±1 proves the expansion is
    /// periodic.
    pub fn divide(&self, divisor: &Decimal) -> Result<Decimal, ArithmeticError> {
        if divisor.is_zero() {
            return Err(ArithmeticError::DivisionByZero);
        }
        let diff_scale = i64::from(self.scale) - i64::from(divisor.scale);
        if self.is_zero() {
            return Decimal::zero_scaled_by(diff_scale);
        }
        let mut p = self.unscaled_value();
        let mut q = divisor.unscaled_value();
        let gcd = p.gcd(&q);
        p = p.checked_div(&gcd)?;
        q = q.checked_div(&gcd)?;
        // Strip the factors of two, then the factors of five.
        let k = q.lowest_set_bit().unwrap_or(0);
        q = &q >> k as usize;
        let mut l = 0u64;
        let mut i = 1usize;
        loop {
            let (quot, rem) = q.div_rem(&Integer::from(LONG_FIVE_POW[i]))?;
            if rem.is_zero() {
                l += i as u64;
                if i < LONG_FIVE_POW.len() - 1 {
                    i += 1;
                }
                q = quot;
            } else {
                if i == 1 {
                    break;
                }
                i = 1;
            }
        }
        if q.abs() != Integer::one() {
            return Err(ArithmeticError::NonTerminating);
        }
        if q.signum() < 0 {
            p = -p;
        }
        let new_scale = to_int_scale(diff_scale + k.max(l) as i64)?;
        let p = if k > l {
            multiply_by_five_pow(&p, k - l)
        } else {
            &p << (l - k) as usize
        };
        Ok(Decimal::from_unscaled(p, new_scale))
    }

    /// Divides to an explicit target scale, deciding the final rounding
    /// increment from the remainder's relation to half the divisor.
    pub fn divide_to_scale(
        &self,
        divisor: &Decimal,
        scale: i32,
        rounding: Rounding,
    ) -> Result<Decimal, ArithmeticError> {
        if divisor.is_zero() {
            return Err(ArithmeticError::DivisionByZero);
        }
        let diff_scale = i64::from(self.scale) - i64::from(divisor.scale) - i64::from(scale);
        if let (Some(a), Some(b)) = (self.small(), divisor.small()) {
            match diff_scale.cmp(&0) {
                Ordering::Equal => {
                    return divide_primitive_longs(a, b, scale, rounding);
                }
                Ordering::Greater => {
                    if diff_scale < LONG_TEN_POW.len() as i64 {
                        if let Some(scaled) = b.checked_mul(LONG_TEN_POW[diff_scale as usize]) {
                            return divide_primitive_longs(a, scaled, scale, rounding);
                        }
                    }
                }
                Ordering::Less => {
                    if -diff_scale < LONG_TEN_POW.len() as i64 {
                        if let Some(scaled) = a.checked_mul(LONG_TEN_POW[-diff_scale as usize]) {
                            return divide_primitive_longs(scaled, b, scale, rounding);
                        }
                    }
                }
            }
        }
        let mut scaled_dividend = self.unscaled_value();
        let mut scaled_divisor = divisor.unscaled_value();
        if diff_scale > 0 {
            scaled_divisor = multiply_by_ten_pow(&scaled_divisor, diff_scale as u64);
        } else if diff_scale < 0 {
            scaled_dividend = multiply_by_ten_pow(&scaled_dividend, diff_scale.unsigned_abs());
        }
        divide_big_integers(&scaled_dividend, &scaled_divisor, scale, rounding)
    }

    /// Divides and truncates to the integral part of the quotient,
    /// without rounding. The result's preferred scale is the difference
    /// of the operands' scales.
    pub fn divide_to_integral_value(
        &self,
        divisor: &Decimal,
    ) -> Result<Decimal, ArithmeticError> {
        if divisor.is_zero() {
            return Err(ArithmeticError::DivisionByZero);
        }
        let new_scale = i64::from(self.scale) - i64::from(divisor.scale);
        let integral: Integer;
        let mut result_scale = new_scale;
        if divisor.aprox_precision() + new_scale > self.aprox_precision() + 1 || self.is_zero() {
            // The divisor's integral part outweighs the dividend's.
            integral = Integer::zero();
        } else if new_scale == 0 {
            integral = self.unscaled_value().checked_div(&divisor.unscaled_value())?;
        } else if new_scale > 0 {
            let power = ten_pow(new_scale as u64);
            let quot = self
                .unscaled_value()
                .checked_div(&(divisor.unscaled_value() * power.clone()))?;
            integral = quot * power;
        } else {
            let power = ten_pow(new_scale.unsigned_abs());
            let mut quot = (self.unscaled_value() * power).checked_div(&divisor.unscaled_value())?;
            // Strip trailing zeros back toward the preferred scale.
            let mut temp_scale = 0i64;
            let mut i = 1usize;
            while !quot.test_bit(0) {
                let (stripped, rem) = quot.div_rem(&ten_pow(i as u64))?;
                if rem.is_zero() && temp_scale - i as i64 >= new_scale {
                    temp_scale -= i as i64;
                    if i < LONG_TEN_POW.len() - 1 {
                        i += 1;
                    }
                    quot = stripped;
                } else {
                    if i == 1 {
                        break;
                    }
                    i = 1;
                }
            }
            integral = quot;
            result_scale = temp_scale;
        }
        if integral.is_zero() {
            Decimal::zero_scaled_by(result_scale)
        } else {
            Ok(Decimal::from_unscaled(integral, to_int_scale(result_scale)?))
        }
    }

    /// Computes the remainder of [`Decimal::divide_to_integral_value`]:
    /// `self - (self ~/ divisor) * divisor`.
    pub fn remainder(&self, divisor: &Decimal) -> Result<Decimal, ArithmeticError> {
        Ok(self.div_rem(divisor)?.1)
    }

    /// Computes the truncated integral quotient and the remainder in
    /// one step.
    pub fn div_rem(&self, divisor: &Decimal) -> Result<(Decimal, Decimal), ArithmeticError> {
        let quotient = self.divide_to_integral_value(divisor)?;
        let remainder = self - &quotient.multiply_impl(divisor)?;
        Ok((quotient, remainder))
    }

    fn multiply_impl(&self, rhs: &Decimal) -> Result<Decimal, ArithmeticError> {
        let new_scale = i64::from(self.scale) + i64::from(rhs.scale);
        if self.is_zero() || rhs.is_zero() {
            return Decimal::zero_scaled_by(new_scale);
        }
        if let (Some(a), Some(b)) = (self.small(), rhs.small()) {
            // checked_mul catches every 64-bit wraparound, including the
            // MIN * -1 case.
            if let Some(product) = a.checked_mul(b) {
                return Ok(Decimal::from_unscaled_i64(product, to_int_scale(new_scale)?));
            }
        }
        Ok(Decimal::from_unscaled(
            self.unscaled_value() * rhs.unscaled_value(),
            to_int_scale(new_scale)?,
        ))
    }

    /// Raises the value to the `n`th power with an exact, unbounded
    /// result. The exponent is limited to `999_999_999`.
    ///
    /// `x.pow(0)` is 1 for every `x`, including zero.
    pub fn pow(&self, n: u32) -> Result<Decimal, ArithmeticError> {
        if n == 0 {
            return Ok(Decimal::ONE);
        }
        if n > 999_999_999 {
            return Err(ArithmeticError::ExponentOutOfRange(i64::from(n)));
        }
        let new_scale = i64::from(self.scale) * i64::from(n);
        if self.is_zero() {
            return Decimal::zero_scaled_by(new_scale);
        }
        Ok(Decimal::from_unscaled(
            self.unscaled_value().pow(n),
            to_int_scale(new_scale)?,
        ))
    }

    /// Returns a value with the given scale, rounding if digits must be
    /// shed. With [`Rounding::Unnecessary`] the rescale must be exact.
    pub fn set_scale(
        &self,
        new_scale: i32,
        rounding: Rounding,
    ) -> Result<Decimal, ArithmeticError> {
        let diff_scale = i64::from(new_scale) - i64::from(self.scale);
        if diff_scale == 0 {
            return Ok(self.clone());
        }
        if diff_scale > 0 {
            if diff_scale < LONG_TEN_POW.len() as i64 {
                if let Some(v) = self.small() {
                    if let Some(scaled) = v.checked_mul(LONG_TEN_POW[diff_scale as usize]) {
                        return Ok(Decimal::from_unscaled_i64(scaled, new_scale));
                    }
                }
            }
            return Ok(Decimal::from_unscaled(
                multiply_by_ten_pow(&self.unscaled_value(), diff_scale as u64),
                new_scale,
            ));
        }
        // diff_scale < 0: divide by the excess power of ten and round.
        if -diff_scale < LONG_TEN_POW.len() as i64 {
            if let Some(v) = self.small() {
                return divide_primitive_longs(
                    v,
                    LONG_TEN_POW[-diff_scale as usize],
                    new_scale,
                    rounding,
                );
            }
        }
        divide_big_integers(
            &self.unscaled_value(),
            &ten_pow(diff_scale.unsigned_abs()),
            new_scale,
            rounding,
        )
    }

    fn move_point(&self, new_scale: i64) -> Result<Decimal, ArithmeticError> {
        if self.is_zero() {
            return Decimal::zero_scaled_by(new_scale.max(0));
        }
        if new_scale >= 0 {
            let scale = to_int_scale(new_scale)?;
            return Ok(match self.small() {
                Some(v) => Decimal::from_unscaled_i64(v, scale),
                None => Decimal {
                    unscaled: self.unscaled.clone(),
                    scale,
                },
            });
        }
        // A negative target scale folds into the unscaled value.
        if -new_scale < LONG_TEN_POW.len() as i64 {
            if let Some(v) = self.small() {
                if let Some(scaled) = v.checked_mul(LONG_TEN_POW[-new_scale as usize]) {
                    return Ok(Decimal::from_unscaled_i64(scaled, 0));
                }
            }
        }
        Ok(Decimal::from_unscaled(
            multiply_by_ten_pow(&self.unscaled_value(), new_scale.unsigned_abs()),
            0,
        ))
    }

    /// Moves the decimal point `n` places to the left.
    pub fn move_point_left(&self, n: i32) -> Result<Decimal, ArithmeticError> {
        self.move_point(i64::from(self.scale) + i64::from(n))
    }

    /// Moves the decimal point `n` places to the right.
    pub fn move_point_right(&self, n: i32) -> Result<Decimal, ArithmeticError> {
        self.move_point(i64::from(self.scale) - i64::from(n))
    }

    /// Multiplies by `10^n` by adjusting the scale only.
    pub fn scale_by_power_of_ten(&self, n: i32) -> Result<Decimal, ArithmeticError> {
        let new_scale = i64::from(self.scale) - i64::from(n);
        if self.is_zero() {
            return Decimal::zero_scaled_by(new_scale);
        }
        let scale = to_int_scale(new_scale)?;
        Ok(match self.small() {
            Some(v) => Decimal::from_unscaled_i64(v, scale),
            None => Decimal {
                unscaled: self.unscaled.clone(),
                scale,
            },
        })
    }

    /// Removes trailing zeros from the unscaled value, reducing the
    /// scale accordingly; the result compares numerically equal.
    ///
    /// Panics in the degenerate case where shedding zeros pushes the
    /// scale below `i32::MIN`.
    pub fn strip_trailing_zeros(&self) -> Decimal {
        if self.is_zero() {
            return Decimal::ZERO;
        }
        let mut stripped = self.unscaled_value();
        let mut new_scale = i64::from(self.scale);
        let mut i = 1usize;
        // An odd unscaled value cannot end in zero.
        while !stripped.test_bit(0) {
            let (quot, rem) = stripped
                .div_rem(&ten_pow(i as u64))
                .expect("power of ten is nonzero");
            if rem.is_zero() {
                new_scale -= i as i64;
                if i < LONG_TEN_POW.len() - 1 {
                    i += 1;
                }
                stripped = quot;
            } else {
                if i == 1 {
                    break;
                }
                i = 1;
            }
        }
        let scale = to_int_scale(new_scale).expect("scale out of range");
        Decimal::from_unscaled(stripped, scale)
    }

    /// Rounds the value according to a context; a no-op when the
    /// context is exact or the value already fits its precision.
    pub(crate) fn rounded(&self, cx: &Context) -> Result<Decimal, ArithmeticError> {
        if cx.precision() == 0 {
            return Ok(self.clone());
        }
        let discarded = self.precision() as i64 - i64::from(cx.precision());
        if discarded <= 0 {
            return Ok(self.clone());
        }
        if let Some(v) = self.small() {
            return small_round(v, self.scale, discarded as usize, cx);
        }
        let size = ten_pow(discarded as u64);
        let (mut integer, fraction) = self.unscaled_value().div_rem(&size)?;
        let mut new_scale = i64::from(self.scale) - discarded;
        if !fraction.is_zero() {
            let comp = compare_ordering((fraction.abs().shift_left_one_bit()).cmp(&size));
            let parity = i64::from(integer.test_bit(0));
            let increment = rounding_behavior(
                parity,
                fraction.signum() * (5 + comp),
                cx.rounding(),
            )?;
            if increment != 0 {
                integer = integer + Integer::from(increment);
            }
            let rounded = Decimal::from_unscaled(integer.clone(), 0);
            if rounded.precision() > u64::from(cx.precision()) {
                // The increment grew the digit count past the target;
                // truncate once more.
                integer = integer.checked_div(&Integer::from(10i64))?;
                new_scale -= 1;
            }
        }
        Ok(Decimal::from_unscaled(integer, to_int_scale(new_scale)?))
    }

    /// Converts to the integral part of the value, truncating any
    /// fraction.
    pub fn to_integer(&self) -> Integer {
        let unscaled = self.unscaled_value();
        if self.scale == 0 || self.is_zero() {
            unscaled
        } else if self.scale < 0 {
            multiply_by_ten_pow(&unscaled, self.scale.unsigned_abs().into())
        } else {
            unscaled
                .checked_div(&ten_pow(u64::from(self.scale as u32)))
                .expect("power of ten is nonzero")
        }
    }

    /// Converts to an integer, failing if the value has a nonzero
    /// fractional part.
    pub fn to_integer_exact(&self) -> Result<Integer, ArithmeticError> {
        if self.scale <= 0 || self.is_zero() {
            return Ok(self.to_integer());
        }
        let (quotient, remainder) = self
            .unscaled_value()
            .div_rem(&ten_pow(u64::from(self.scale as u32)))?;
        if remainder.is_zero() {
            Ok(quotient)
        } else {
            Err(ArithmeticError::RoundingNecessary)
        }
    }

    /// Converts to the nearest `f64`.
    ///
    /// Routed through the standard library's correctly rounded decimal
    /// parser, so the result is the closest representable double.
    pub fn to_f64(&self) -> f64 {
        self.to_string()
            .parse()
            .expect("formatted decimal is valid float syntax")
    }

    /// Converts to the nearest `f32`.
    pub fn to_f32(&self) -> f32 {
        self.to_string()
            .parse()
            .expect("formatted decimal is valid float syntax")
    }

    /// Constructs a decimal from the shortest decimal representation of
    /// a float, the way it would print: `from_f64_shortest(0.1)` is
    /// exactly `0.1`, not the binary expansion of the double nearest
    /// 0.1. Fails on NaN and infinities.
    pub fn from_f64_shortest(value: f64) -> Result<Decimal, TryIntoDecimalError> {
        if !value.is_finite() {
            return Err(TryIntoDecimalError);
        }
        value.to_string().parse().map_err(|_| TryIntoDecimalError)
    }

    fn unsigned_digits(&self) -> String {
        match &self.unscaled {
            Unscaled::Small(v) => v.unsigned_abs().to_string(),
            Unscaled::Big(n) => conversion::magnitude_to_decimal_digits(n.digits()),
        }
    }

    /// Formats the value without an exponent, however many zeros that
    /// takes.
    pub fn to_plain_string(&self) -> String {
        conversion::plain_layout(self.signum() < 0, &self.unsigned_digits(), self.scale)
    }

    /// Formats the value in engineering notation: like scientific
    /// notation, but any exponent is a multiple of three.
    pub fn to_engineering_string(&self) -> String {
        conversion::engineering_layout(self.signum() < 0, &self.unsigned_digits(), self.scale)
    }
}

/// Computes `a + b * 10^diff_scale` at `a`'s scale.
fn add_and_mult10(a: &Decimal, b: &Decimal, diff_scale: u64) -> Decimal {
    if diff_scale < LONG_TEN_POW.len() as u64 {
        if let (Some(x), Some(y)) = (a.small(), b.small()) {
            if let Some(sum) = y
                .checked_mul(LONG_TEN_POW[diff_scale as usize])
                .and_then(|scaled| x.checked_add(scaled))
            {
                return Decimal::from_unscaled_i64(sum, a.scale);
            }
        }
    }
    Decimal::from_unscaled(
        a.unscaled_value() + multiply_by_ten_pow(&b.unscaled_value(), diff_scale),
        a.scale,
    )
}

fn compare_ordering(ord: Ordering) -> i32 {
    match ord {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }
}

/// Decides the -1/0/+1 increment applied after discarding digits.
///
/// `fraction` encodes the discarded remainder relative to half the
/// divisor: `sign * (5 + comp)` where `comp` compares twice the
/// remainder's magnitude against the divisor's, so `|fraction|` is 4, 5
/// or 6 for below, at and above the halfway point. `parity` is the low
/// bit of the kept digits.
fn rounding_behavior(
    parity: i64,
    fraction: i32,
    rounding: Rounding,
) -> Result<i64, ArithmeticError> {
    let sig = i64::from(fraction.signum());
    Ok(match rounding {
        Rounding::Unnecessary => {
            if fraction != 0 {
                return Err(ArithmeticError::RoundingNecessary);
            }
            0
        }
        Rounding::Up => sig,
        Rounding::Down => 0,
        Rounding::Ceiling => sig.max(0),
        Rounding::Floor => sig.min(0),
        Rounding::HalfUp => {
            if fraction.abs() >= 5 {
                sig
            } else {
                0
            }
        }
        Rounding::HalfDown => {
            if fraction.abs() > 5 {
                sig
            } else {
                0
            }
        }
        Rounding::HalfEven => {
            if i64::from(fraction.abs()) + parity > 5 {
                sig
            } else {
                0
            }
        }
    })
}

/// Division of machine-word unscaled values to a target scale.
///
/// Runs in 128-bit arithmetic: `i64::MIN / -1` and the doubled
/// remainder both leave the 64-bit range.
fn divide_primitive_longs(
    dividend: i64,
    divisor: i64,
    scale: i32,
    rounding: Rounding,
) -> Result<Decimal, ArithmeticError> {
    let dividend = i128::from(dividend);
    let divisor = i128::from(divisor);
    let mut quotient = dividend / divisor;
    let remainder = dividend % divisor;
    if remainder != 0 {
        let sign = compare_ordering(dividend.cmp(&0)) * compare_ordering(divisor.cmp(&0));
        let comp = compare_ordering((remainder.abs() << 1).cmp(&divisor.abs()));
        quotient += i128::from(rounding_behavior(
            (quotient & 1) as i64,
            sign * (5 + comp),
            rounding,
        )?);
    }
    match i64::try_from(quotient) {
        Ok(q) => Ok(Decimal::from_unscaled_i64(q, scale)),
        Err(_) => Ok(Decimal::from_unscaled(Integer::from(quotient), scale)),
    }
}

/// Division of arbitrary-precision unscaled values to a target scale.
fn divide_big_integers(
    scaled_dividend: &Integer,
    scaled_divisor: &Integer,
    scale: i32,
    rounding: Rounding,
) -> Result<Decimal, ArithmeticError> {
    let (mut quotient, remainder) = scaled_dividend.div_rem(scaled_divisor)?;
    if remainder.is_zero() {
        return Ok(Decimal::from_unscaled(quotient, scale));
    }
    let sign = scaled_dividend.signum() * scaled_divisor.signum();
    let comp = compare_ordering((remainder.abs().shift_left_one_bit()).cmp(&scaled_divisor.abs()));
    let parity = i64::from(quotient.test_bit(0));
    let increment = rounding_behavior(parity, sign * (5 + comp), rounding)?;
    if increment != 0 {
        quotient = quotient + Integer::from(increment);
    }
    Ok(Decimal::from_unscaled(quotient, scale))
}

/// Rounding of a machine-word unscaled value.
fn small_round(
    unscaled: i64,
    scale: i32,
    discarded: usize,
    cx: &Context,
) -> Result<Decimal, ArithmeticError> {
    let size = LONG_TEN_POW[discarded];
    let mut new_scale = i64::from(scale) - discarded as i64;
    let mut integer = unscaled / size;
    let fraction = unscaled % size;
    if fraction != 0 {
        let comp = compare_ordering((fraction.abs() * 2).cmp(&size));
        integer += rounding_behavior(
            integer & 1,
            (fraction.signum() as i32) * (5 + comp),
            cx.rounding(),
        )?;
        if Decimal::from_unscaled_i64(integer, 0).precision() > u64::from(cx.precision()) {
            integer /= 10;
            new_scale -= 1;
        }
    }
    Ok(Decimal::from_unscaled_i64(integer, to_int_scale(new_scale)?))
}

impl Context {
    /// Adds two decimals and rounds to this context.
    ///
    /// When the operands' scales are so far apart that the smaller
    /// operand cannot affect the rounded digits, it is collapsed into a
    /// single sticky digit rather than aligned in full.
    pub fn add(&self, lhs: &Decimal, rhs: &Decimal) -> Result<Decimal, ArithmeticError> {
        if lhs.is_zero() || rhs.is_zero() || self.precision() == 0 {
            return lhs.add_impl(rhs).rounded(self);
        }
        let diff_scale = i64::from(lhs.scale) - i64::from(rhs.scale);
        let (larger, smaller) = if lhs.aprox_precision() < diff_scale - 1 {
            (rhs, lhs)
        } else if rhs.aprox_precision() < -diff_scale - 1 {
            (lhs, rhs)
        } else {
            return lhs.add_impl(rhs).rounded(self);
        };
        if i64::from(self.precision()) >= larger.aprox_precision() {
            return lhs.add_impl(rhs).rounded(self);
        }
        let larger_signum = larger.signum();
        let ten = Integer::from(10i64);
        let temp = if larger_signum == smaller.signum() {
            larger.unscaled_value() * ten + Integer::from(larger_signum)
        } else {
            let borrowed = larger.unscaled_value() - Integer::from(larger_signum);
            borrowed * ten + Integer::from(larger_signum * 9)
        };
        let scale = to_int_scale(i64::from(larger.scale) + 1)?;
        Decimal::from_unscaled(temp, scale).rounded(self)
    }

    /// Subtracts `rhs` from `lhs` and rounds to this context, with the
    /// same far-scales sticky-digit shortcut as [`Context::add`].
    pub fn sub(&self, lhs: &Decimal, rhs: &Decimal) -> Result<Decimal, ArithmeticError> {
        if lhs.is_zero() || rhs.is_zero() || self.precision() == 0 {
            return lhs.add_impl(&-rhs).rounded(self);
        }
        let diff_scale = i64::from(rhs.scale) - i64::from(lhs.scale);
        if rhs.aprox_precision() < diff_scale - 1
            && i64::from(self.precision()) < lhs.aprox_precision()
        {
            let this_signum = lhs.signum();
            let ten = Integer::from(10i64);
            let temp = if this_signum != rhs.signum() {
                lhs.unscaled_value() * ten + Integer::from(this_signum)
            } else {
                let borrowed = lhs.unscaled_value() - Integer::from(this_signum);
                borrowed * ten + Integer::from(this_signum * 9)
            };
            let scale = to_int_scale(i64::from(lhs.scale) + 1)?;
            return Decimal::from_unscaled(temp, scale).rounded(self);
        }
        lhs.add_impl(&-rhs).rounded(self)
    }

    /// Multiplies two decimals and rounds to this context.
    pub fn mul(&self, lhs: &Decimal, rhs: &Decimal) -> Result<Decimal, ArithmeticError> {
        lhs.multiply_impl(rhs)?.rounded(self)
    }

    /// Divides to at least this context's precision of significant
    /// digits, then strips the quotient back toward the preferred scale.
    pub fn div(&self, lhs: &Decimal, rhs: &Decimal) -> Result<Decimal, ArithmeticError> {
        if self.precision() == 0 || lhs.is_zero() || rhs.is_zero() {
            return lhs.divide(rhs);
        }
        // Zeros to append to the dividend so the quotient carries at
        // least `precision` digits.
        let trailing_zeros =
            i64::from(self.precision()) + 2 + rhs.aprox_precision() - lhs.aprox_precision();
        let diff_scale = i64::from(lhs.scale) - i64::from(rhs.scale);
        let mut new_scale = diff_scale;
        let mut dividend = lhs.unscaled_value();
        if trailing_zeros > 0 {
            dividend = multiply_by_ten_pow(&dividend, trailing_zeros as u64);
            new_scale += trailing_zeros;
        }
        let divisor = rhs.unscaled_value();
        let (mut quotient, remainder) = dividend.div_rem(&divisor)?;
        if !remainder.is_zero() {
            // Append one sticky digit encoding the remainder's relation
            // to half the divisor.
            let sign = lhs.signum() * rhs.signum();
            let comp = compare_ordering((remainder.abs().shift_left_one_bit()).cmp(&divisor.abs()));
            quotient = quotient * Integer::from(10i64) + Integer::from(sign * (5 + comp));
            new_scale += 1;
        } else {
            // Strip trailing zeros down toward the preferred scale while
            // the precision allows.
            let mut i = 1usize;
            while !quotient.test_bit(0) {
                let (stripped, rem) = quotient.div_rem(&ten_pow(i as u64))?;
                if rem.is_zero() && new_scale - i as i64 >= diff_scale {
                    new_scale -= i as i64;
                    if i < LONG_TEN_POW.len() - 1 {
                        i += 1;
                    }
                    quotient = stripped;
                } else {
                    if i == 1 {
                        break;
                    }
                    i = 1;
                }
            }
        }
        Decimal::from_unscaled(quotient, to_int_scale(new_scale)?).rounded(self)
    }

    /// Divides to the integral part of the quotient, failing if it
    /// cannot be represented within this context's precision.
    pub fn div_integer(&self, lhs: &Decimal, rhs: &Decimal) -> Result<Decimal, ArithmeticError> {
        if self.precision() == 0 || lhs.is_zero() || rhs.is_zero() {
            return lhs.divide_to_integral_value(rhs);
        }
        let mc_precision = i64::from(self.precision());
        let diff_precision = lhs.precision() as i64 - rhs.precision() as i64;
        let diff_scale = i64::from(lhs.scale) - i64::from(rhs.scale);
        let quot_precision = diff_precision - diff_scale + 1;
        let mut new_scale = diff_scale;
        let mut quotient;
        if quot_precision <= 0 {
            quotient = Integer::zero();
        } else if diff_scale == 0 {
            quotient = lhs.unscaled_value().checked_div(&rhs.unscaled_value())?;
        } else if diff_scale > 0 {
            let divisor = rhs.unscaled_value() * ten_pow(diff_scale as u64);
            quotient = lhs.unscaled_value().checked_div(&divisor)?;
            // Pick the power of ten giving at least `precision` digits.
            new_scale = diff_scale.min((mc_precision - quot_precision + 1).max(0));
            quotient = quotient * ten_pow(new_scale as u64);
        } else {
            // The minimum power of ten so the quotient holds at least
            // `precision` digits.
            let exp = (-diff_scale).min((mc_precision - diff_precision).max(0));
            let dividend = lhs.unscaled_value() * ten_pow(exp as u64);
            let (q, r) = dividend.div_rem(&rhs.unscaled_value())?;
            new_scale += exp;
            quotient = q;
            let remaining = -new_scale;
            if !r.is_zero() && remaining > 0 {
                // The quotient gains more digits than the context allows
                // if the remainder still carries integral weight.
                let mut rem_digits = Decimal::from_unscaled(r.clone(), 0).precision() as i64
                    + remaining
                    - rhs.precision() as i64;
                if rem_digits == 0 {
                    let refined = (r * ten_pow(remaining as u64))
                        .checked_div(&rhs.unscaled_value())?;
                    rem_digits = i64::from(refined.signum().abs());
                }
                if rem_digits > 0 {
                    return Err(ArithmeticError::DivisionImpossible);
                }
            }
        }
        if quotient.is_zero() {
            return Decimal::zero_scaled_by(diff_scale);
        }
        let mut result_precision = Decimal::from_unscaled(quotient.clone(), 0).precision() as i64;
        let mut i = 1usize;
        while !quotient.test_bit(0) {
            let (stripped, rem) = quotient.div_rem(&ten_pow(i as u64))?;
            if rem.is_zero()
                && (result_precision - i as i64 >= mc_precision
                    || new_scale - (i as i64) >= diff_scale)
            {
                result_precision -= i as i64;
                new_scale -= i as i64;
                if i < LONG_TEN_POW.len() - 1 {
                    i += 1;
                }
                quotient = stripped;
            } else {
                if i == 1 {
                    break;
                }
                i = 1;
            }
        }
        if result_precision > mc_precision {
            return Err(ArithmeticError::DivisionImpossible);
        }
        Ok(Decimal::from_unscaled(quotient, to_int_scale(new_scale)?))
    }

    /// Computes integral quotient and remainder under this context; the
    /// quotient obeys [`Context::div_integer`]'s precision bound.
    pub fn div_rem(
        &self,
        lhs: &Decimal,
        rhs: &Decimal,
    ) -> Result<(Decimal, Decimal), ArithmeticError> {
        let quotient = self.div_integer(lhs, rhs)?;
        let remainder = lhs - &quotient.multiply_impl(rhs)?;
        Ok((quotient, remainder))
    }

    /// Computes the remainder of the context-bounded integral division.
    pub fn rem(&self, lhs: &Decimal, rhs: &Decimal) -> Result<Decimal, ArithmeticError> {
        Ok(self.div_rem(lhs, rhs)?.1)
    }

    /// Raises `base` to the `n`th power following the ANSI X3.274
    /// binary-exponentiation algorithm: intermediate steps run at an
    /// inflated precision (the exponent's digit count plus one guard
    /// digit) so rounding error cannot compound across the multiply
    /// chain, and the accumulator is rounded down to this context at
    /// the end.
    ///
    /// A negative exponent requires a nonzero precision.
    pub fn pow(&self, base: &Decimal, n: i32) -> Result<Decimal, ArithmeticError> {
        let m = n.unsigned_abs();
        let mc_precision = self.precision();
        if n == 0 || (base.is_zero() && n > 0) {
            return base.pow(m);
        }
        let exp_digits = if m == 0 { 1 } else { m.ilog10() + 1 };
        if m > 999_999_999
            || (mc_precision == 0 && n < 0)
            || (mc_precision > 0 && exp_digits > mc_precision)
        {
            return Err(ArithmeticError::ExponentOutOfRange(i64::from(n)));
        }
        let working = if mc_precision > 0 {
            Context::new(mc_precision + exp_digits + 1, self.rounding())
        } else {
            *self
        };
        // Square-and-multiply as if the exponent were positive.
        let mut accum = base.rounded(&working)?;
        if m > 1 {
            let mut mask = 1u32 << (31 - m.leading_zeros()) >> 1;
            while mask > 0 {
                accum = working.mul(&accum, &accum)?;
                if m & mask != 0 {
                    accum = working.mul(&accum, base)?;
                }
                mask >>= 1;
            }
        }
        if n < 0 {
            accum = working.div(&Decimal::ONE, &accum)?;
        }
        accum.rounded(self)
    }

    /// Rounds a decimal to this context's precision.
    pub fn round(&self, d: &Decimal) -> Result<Decimal, ArithmeticError> {
        d.rounded(self)
    }
}

impl Default for Decimal {
    fn default() -> Decimal {
        Decimal::ZERO
    }
}

impl fmt::Debug for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match &self.unscaled {
            Unscaled::Small(v) => conversion::small_to_decimal_scaled_string(*v, self.scale),
            Unscaled::Big(n) => {
                conversion::to_decimal_scaled_string(if n.signum() < 0 { -1 } else { 1 }, n.digits(), self.scale)
            }
        };
        f.write_str(&s)
    }
}

impl FromStr for Decimal {
    type Err = ParseDecimalError;

    fn from_str(s: &str) -> Result<Decimal, ParseDecimalError> {
        let bytes = s.as_bytes();
        if bytes.is_empty() {
            return Err(ParseDecimalError::new(s, "empty string"));
        }
        let mut unscaled = String::with_capacity(bytes.len());
        let mut i = 0;
        match bytes[0] {
            b'+' => i += 1,
            b'-' => {
                unscaled.push('-');
                i += 1;
            }
            _ => {}
        }
        let int_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        unscaled.push_str(&s[int_start..i]);
        let mut digit_count = i - int_start;
        let mut scale = 0i64;
        if i < bytes.len() && bytes[i] == b'.' {
            i += 1;
            let frac_start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            scale = (i - frac_start) as i64;
            digit_count += i - frac_start;
            unscaled.push_str(&s[frac_start..i]);
        }
        if digit_count == 0 {
            return Err(ParseDecimalError::new(s, "no digits"));
        }
        if i < bytes.len() {
            if bytes[i] != b'e' && bytes[i] != b'E' {
                return Err(ParseDecimalError::new(s, "unexpected character"));
            }
            i += 1;
            let exponent: i32 = s[i..]
                .parse()
                .map_err(|_| ParseDecimalError::new(s, "bad exponent"))?;
            scale -= i64::from(exponent);
        }
        let scale =
            i32::try_from(scale).map_err(|_| ParseDecimalError::new(s, "scale out of range"))?;
        if digit_count < 19 {
            let small: i64 = unscaled
                .parse()
                .expect("fewer than 19 decimal digits fit in an i64");
            Ok(Decimal::from_unscaled_i64(small, scale))
        } else {
            let big: Integer = unscaled
                .parse()
                .expect("digit string is a valid integer");
            Ok(Decimal::from_unscaled(big, scale))
        }
    }
}

impl From<Integer> for Decimal {
    fn from(n: Integer) -> Decimal {
        Decimal::from_unscaled(n, 0)
    }
}

impl TryFrom<f64> for Decimal {
    type Error = TryIntoDecimalError;

    /// Converts a double to the decimal that is its exact binary
    /// expansion, which is usually longer than the value prints:
    /// `0.1f64` becomes `0.1000000000000000055511151231257827...`. Use
    /// [`Decimal::from_f64_shortest`] for the printed form.
    fn try_from(value: f64) -> Result<Decimal, TryIntoDecimalError> {
        if !value.is_finite() {
            return Err(TryIntoDecimalError);
        }
        let bits = value.to_bits();
        // The exponent bias adjusted to treat the mantissa as an
        // integer.
        let mut scale = 1075 - ((bits >> 52) & 0x7FF) as i64;
        let mut mantissa = if scale == 1075 {
            // Subnormal: no implicit leading bit.
            (bits & 0xF_FFFF_FFFF_FFFF) << 1
        } else {
            (bits & 0xF_FFFF_FFFF_FFFF) | 0x10_0000_0000_0000
        };
        if mantissa == 0 {
            scale = 0;
        }
        if scale > 0 {
            let trailing = i64::from(mantissa.trailing_zeros().min(63)).min(scale);
            mantissa >>= trailing as u32;
            scale -= trailing;
        }
        let negative = bits >> 63 != 0;
        let signed_mantissa = if negative {
            -(mantissa as i64)
        } else {
            mantissa as i64
        };
        if scale < 0 {
            // mantissa * 2^(-scale), an integer.
            let unscaled = Integer::from(signed_mantissa) << (-scale) as usize;
            return Ok(Decimal::from_unscaled(unscaled, 0));
        }
        if scale == 0 {
            return Ok(Decimal::from_unscaled_i64(signed_mantissa, 0));
        }
        // mantissa * 2^-scale = (mantissa * 5^scale) * 10^-scale.
        if scale < LONG_FIVE_POW.len() as i64 {
            if let Some(unscaled) = signed_mantissa.checked_mul(LONG_FIVE_POW[scale as usize]) {
                return Ok(Decimal::from_unscaled_i64(unscaled, scale as i32));
            }
        }
        Ok(Decimal::from_unscaled(
            multiply_by_five_pow(&Integer::from(signed_mantissa), scale as u64),
            scale as i32,
        ))
    }
}

impl TryFrom<f32> for Decimal {
    type Error = TryIntoDecimalError;

    fn try_from(value: f32) -> Result<Decimal, TryIntoDecimalError> {
        Decimal::try_from(f64::from(value))
    }
}

impl TryFrom<&Decimal> for i64 {
    type Error = TryFromDecimalError;

    fn try_from(d: &Decimal) -> Result<i64, TryFromDecimalError> {
        let n = d.to_integer_exact().map_err(|_| TryFromDecimalError)?;
        i64::try_from(&n).map_err(|_| TryFromDecimalError)
    }
}

impl TryFrom<&Decimal> for i32 {
    type Error = TryFromDecimalError;

    fn try_from(d: &Decimal) -> Result<i32, TryFromDecimalError> {
        let n = d.to_integer_exact().map_err(|_| TryFromDecimalError)?;
        i32::try_from(&n).map_err(|_| TryFromDecimalError)
    }
}

impl TryFrom<&Decimal> for u64 {
    type Error = TryFromDecimalError;

    fn try_from(d: &Decimal) -> Result<u64, TryFromDecimalError> {
        let n = d.to_integer_exact().map_err(|_| TryFromDecimalError)?;
        u64::try_from(&n).map_err(|_| TryFromDecimalError)
    }
}

impl TryFrom<&Decimal> for u32 {
    type Error = TryFromDecimalError;

    fn try_from(d: &Decimal) -> Result<u32, TryFromDecimalError> {
        let n = d.to_integer_exact().map_err(|_| TryFromDecimalError)?;
        u32::try_from(&n).map_err(|_| TryFromDecimalError)
    }
}

impl Neg for &Decimal {
    type Output = Decimal;

    fn neg(self) -> Decimal {
        match self.small() {
            Some(v) => match v.checked_neg() {
                Some(neg) => Decimal::from_unscaled_i64(neg, self.scale),
                None => Decimal::from_unscaled(-Integer::from(v), self.scale),
            },
            None => Decimal::from_unscaled(-self.unscaled_value(), self.scale),
        }
    }
}

impl Neg for Decimal {
    type Output = Decimal;

    fn neg(self) -> Decimal {
        -&self
    }
}

impl Add<&Decimal> for &Decimal {
    type Output = Decimal;

    fn add(self, rhs: &Decimal) -> Decimal {
        self.add_impl(rhs)
    }
}

impl Add<Decimal> for Decimal {
    type Output = Decimal;

    fn add(self, rhs: Decimal) -> Decimal {
        self.add_impl(&rhs)
    }
}

impl AddAssign<Decimal> for Decimal {
    fn add_assign(&mut self, rhs: Decimal) {
        *self = self.add_impl(&rhs);
    }
}

impl Sub<&Decimal> for &Decimal {
    type Output = Decimal;

    fn sub(self, rhs: &Decimal) -> Decimal {
        self.add_impl(&-rhs)
    }
}

impl Sub<Decimal> for Decimal {
    type Output = Decimal;

    fn sub(self, rhs: Decimal) -> Decimal {
        self.add_impl(&-rhs)
    }
}

impl SubAssign<Decimal> for Decimal {
    fn sub_assign(&mut self, rhs: Decimal) {
        *self = self.add_impl(&-&rhs);
    }
}

impl Mul<&Decimal> for &Decimal {
    type Output = Decimal;

    /// Exact multiplication.
    ///
    /// Panics in the degenerate case where the summed scales leave the
    /// `i32` range; use [`Context::mul`] to handle that as an error.
    fn mul(self, rhs: &Decimal) -> Decimal {
        match self.multiply_impl(rhs) {
            Ok(product) => product,
            Err(err) => panic!("{}", err),
        }
    }
}

impl Mul<Decimal> for Decimal {
    type Output = Decimal;

    fn mul(self, rhs: Decimal) -> Decimal {
        &self * &rhs
    }
}

impl MulAssign<Decimal> for Decimal {
    fn mul_assign(&mut self, rhs: Decimal) {
        *self = &*self * &rhs;
    }
}

impl Sum for Decimal {
    fn sum<I>(iter: I) -> Decimal
    where
        I: Iterator<Item = Decimal>,
    {
        iter.fold(Decimal::ZERO, |acc, d| acc + d)
    }
}

impl<'a> Sum<&'a Decimal> for Decimal {
    fn sum<I>(iter: I) -> Decimal
    where
        I: Iterator<Item = &'a Decimal>,
    {
        iter.fold(Decimal::ZERO, |acc, d| &acc + d)
    }
}

impl Product for Decimal {
    fn product<I>(iter: I) -> Decimal
    where
        I: Iterator<Item = Decimal>,
    {
        iter.fold(Decimal::ONE, |acc, d| acc * d)
    }
}

impl<'a> Product<&'a Decimal> for Decimal {
    fn product<I>(iter: I) -> Decimal
    where
        I: Iterator<Item = &'a Decimal>,
    {
        iter.fold(Decimal::ONE, |acc, d| &acc * d)
    }
}

impl Zero for Decimal {
    fn zero() -> Decimal {
        Decimal::ZERO
    }

    fn is_zero(&self) -> bool {
        Decimal::is_zero(self)
    }
}

impl One for Decimal {
    fn one() -> Decimal {
        Decimal::ONE
    }
}

impl ToPrimitive for Decimal {
    fn to_i64(&self) -> Option<i64> {
        self.to_integer().to_i64()
    }

    fn to_u64(&self) -> Option<u64> {
        self.to_integer().to_u64()
    }

    fn to_i128(&self) -> Option<i128> {
        self.to_integer().to_i128()
    }

    fn to_u128(&self) -> Option<u128> {
        self.to_integer().to_u128()
    }

    fn to_f64(&self) -> Option<f64> {
        Some(Decimal::to_f64(self))
    }

    fn to_f32(&self) -> Option<f32> {
        Some(Decimal::to_f32(self))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Decimal {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Decimal {
    fn deserialize<D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = <String as serde::Deserialize>::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_promotion() {
        // A 20-digit literal lands in the big representation, a 19-digit
        // one stays small.
        let big: Decimal = "98765432109876543210".parse().unwrap();
        assert!(big.small().is_none());
        let small: Decimal = "9223372036854775807".parse().unwrap();
        assert_eq!(small.small(), Some(i64::MAX));
        // Leading zeros do not force a promotion.
        let padded: Decimal = "0000000000000000000001".parse().unwrap();
        assert_eq!(padded.small(), Some(1));
    }

    #[test]
    fn test_exact_equality_vs_numeric() {
        let one_zero: Decimal = "1.0".parse().unwrap();
        let one_zero_zero: Decimal = "1.00".parse().unwrap();
        assert_ne!(one_zero, one_zero_zero);
        assert_eq!(one_zero.compare(&one_zero_zero), Ordering::Equal);
    }

    #[test]
    fn test_add_alignment() {
        let a: Decimal = "1.23".parse().unwrap();
        let b: Decimal = "0.007".parse().unwrap();
        assert_eq!((&a + &b).to_string(), "1.237");
        assert_eq!((&b - &a).to_string(), "-1.223");
    }

    #[test]
    fn test_sticky_digit_far_scales() {
        // The tiny addend cannot move the rounded digits, but must
        // still break the half-even tie via the sticky digit.
        let cx = Context::new(4, Rounding::HalfEven);
        let a: Decimal = "123450".parse().unwrap();
        let tiny: Decimal = "0.000001".parse().unwrap();
        assert_eq!(cx.round(&a).unwrap().to_string(), "1.234E+5");
        assert_eq!(cx.add(&a, &tiny).unwrap().to_string(), "1.235E+5");
    }

    #[test]
    fn test_from_f64_exact_expansion() {
        let d = Decimal::try_from(0.5f64).unwrap();
        assert_eq!(d.to_string(), "0.5");
        let d = Decimal::try_from(0.1f64).unwrap();
        assert!(d.to_string().starts_with("0.1000000000000000055511151231257827"));
        assert!(Decimal::try_from(f64::NAN).is_err());
        assert_eq!(Decimal::from_f64_shortest(0.1).unwrap().to_string(), "0.1");
    }
}
