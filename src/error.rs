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
use std::fmt;

/// An error indicating that a string is not a valid decimal number.
///
/// The offending input is retained so that the failing parse can be
/// reconstructed from the error alone.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ParseDecimalError {
    pub(crate) input: String,
    pub(crate) reason: &'static str,
}

impl ParseDecimalError {
    pub(crate) fn new(input: &str, reason: &'static str) -> ParseDecimalError {
        ParseDecimalError {
            input: input.into(),
            reason,
        }
    }
}

impl fmt::Display for ParseDecimalError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid decimal syntax ({}): {:?}", self.reason, self.input)
    }
}

impl Error for ParseDecimalError {}

/// An error indicating that a string is not a valid integer in the
/// requested radix.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ParseIntegerError {
    pub(crate) input: String,
    pub(crate) radix: u32,
}

impl ParseIntegerError {
    pub(crate) fn new(input: &str, radix: u32) -> ParseIntegerError {
        ParseIntegerError {
            input: input.into(),
            radix,
        }
    }
}

impl fmt::Display for ParseIntegerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "invalid radix-{} integer syntax: {:?}",
            self.radix, self.input
        )
    }
}

impl Error for ParseIntegerError {}

/// An error raised by an arithmetic operation.
///
/// Every variant is a by-design condition of decimal or modular
/// arithmetic, not a bug: callers are expected to match on the kind and
/// react. Conditions that indicate caller programming errors (negative
/// bit indexes, invalid radixes) panic instead.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ArithmeticError {
    /// A divisor was zero.
    DivisionByZero,
    /// An exact division has a non-terminating decimal expansion, so no
    /// exact result exists at any finite scale.
    NonTerminating,
    /// Rounding was required but the rounding mode was
    /// [`Rounding::Unnecessary`](crate::Rounding::Unnecessary).
    RoundingNecessary,
    /// The integral part of a quotient needs more digits than the
    /// context's precision allows.
    DivisionImpossible,
    /// A result's scale does not fit in an `i32`. The payload is the
    /// scale that was requested.
    ScaleOutOfRange(i64),
    /// An exponent was outside the supported `[0, 999_999_999]` range,
    /// or a bounded power's inflated precision left the representable
    /// range. The payload is the offending exponent.
    ExponentOutOfRange(i64),
    /// A modulus was zero or negative.
    NonPositiveModulus,
    /// A modular inverse does not exist because the operands are not
    /// coprime.
    NotInvertible,
}

impl fmt::Display for ArithmeticError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ArithmeticError::DivisionByZero => f.write_str("division by zero"),
            ArithmeticError::NonTerminating => f.write_str(
                "non-terminating decimal expansion; no exact representable decimal result",
            ),
            ArithmeticError::RoundingNecessary => f.write_str("rounding necessary"),
            ArithmeticError::DivisionImpossible => f.write_str("division impossible"),
            ArithmeticError::ScaleOutOfRange(scale) => {
                write!(f, "scale out of range: {}", scale)
            }
            ArithmeticError::ExponentOutOfRange(exp) => {
                write!(f, "exponent out of range: {}", exp)
            }
            ArithmeticError::NonPositiveModulus => f.write_str("modulus not positive"),
            ArithmeticError::NotInvertible => f.write_str("value is not invertible"),
        }
    }
}

impl Error for ArithmeticError {}

/// An error indicating that a value cannot be cast to a primitive type.
///
/// Causes for this failure include calling exact cast functions on
/// values with a nonzero fractional part or whose integral part does not
/// fit into the target type.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct TryFromDecimalError;

impl fmt::Display for TryFromDecimalError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("decimal cannot be expressed in target primitive type")
    }
}

impl Error for TryFromDecimalError {}

/// An error indicating a value cannot be precisely cast to a decimal
/// value, e.g. a NaN or infinite float.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct TryIntoDecimalError;

impl fmt::Display for TryIntoDecimalError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("value cannot be precisely expressed as decimal")
    }
}

impl Error for TryIntoDecimalError {}

/// An error indicating that an integer value cannot be cast to a
/// primitive type without loss.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct TryFromIntegerError;

impl fmt::Display for TryFromIntegerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("integer cannot be expressed in target primitive type")
    }
}

impl Error for TryFromIntegerError {}
