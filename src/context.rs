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

use std::fmt;

/// A context for performing decimal operations.
///
/// A context configures two properties of decimal arithmetic:
///
///   * the number of significant digits results are rounded to
///     (`precision`), where zero means results are exact and unbounded;
///
///   * the rounding algorithm used when a result must shed digits.
///
/// Operations that honor a context live on `Context` itself, e.g.
/// [`Context::add`]. Operations on the value types and the overloaded
/// operators compute exact, unbounded results.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Context {
    precision: u32,
    rounding: Rounding,
}

impl Context {
    /// An exact context: unlimited precision, rounding never applied.
    pub const UNLIMITED: Context = Context {
        precision: 0,
        rounding: Rounding::HalfUp,
    };

    /// A context with the precision and rounding of the IEEE 754-2008
    /// decimal32 format: 7 digits, round half to even.
    pub const DECIMAL32: Context = Context {
        precision: 7,
        rounding: Rounding::HalfEven,
    };

    /// A context with the precision and rounding of the IEEE 754-2008
    /// decimal64 format: 16 digits, round half to even.
    pub const DECIMAL64: Context = Context {
        precision: 16,
        rounding: Rounding::HalfEven,
    };

    /// A context with the precision and rounding of the IEEE 754-2008
    /// decimal128 format: 34 digits, round half to even.
    pub const DECIMAL128: Context = Context {
        precision: 34,
        rounding: Rounding::HalfEven,
    };

    /// Constructs a context with the given precision and rounding
    /// algorithm.
    ///
    /// A precision of zero means unlimited: operations produce exact
    /// results and the rounding algorithm is never consulted.
    pub fn new(precision: u32, rounding: Rounding) -> Context {
        Context {
            precision,
            rounding,
        }
    }

    /// Returns the context's precision.
    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// Sets the context's precision.
    pub fn set_precision(&mut self, precision: u32) {
        self.precision = precision;
    }

    /// Returns the context's rounding algorithm.
    pub fn rounding(&self) -> Rounding {
        self.rounding
    }

    /// Sets the context's rounding algorithm.
    pub fn set_rounding(&mut self, rounding: Rounding) {
        self.rounding = rounding;
    }
}

impl Default for Context {
    fn default() -> Context {
        Context::UNLIMITED
    }
}

/// Algorithms for rounding decimal numbers.
///
/// A rounding algorithm decides which neighbor a result that cannot be
/// represented at the requested scale or precision is moved to.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Rounding {
    /// Round away from zero.
    Up,
    /// Round towards zero (truncation).
    Down,
    /// Round towards positive infinity.
    Ceiling,
    /// Round towards negative infinity.
    Floor,
    /// Round to nearest; if equidistant, round away from zero.
    HalfUp,
    /// Round to nearest; if equidistant, round towards zero.
    HalfDown,
    /// Round to nearest; if equidistant, round so that the final digit
    /// is even.
    HalfEven,
    /// Assert that no rounding is necessary.
    ///
    /// Operations that would discard a nonzero remainder under this mode
    /// fail with [`ArithmeticError::RoundingNecessary`] instead of
    /// rounding.
    ///
    /// [`ArithmeticError::RoundingNecessary`]: crate::ArithmeticError::RoundingNecessary
    Unnecessary,
}

impl Default for Rounding {
    fn default() -> Rounding {
        Rounding::HalfEven
    }
}

impl fmt::Display for Rounding {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Rounding::Up => f.write_str("up"),
            Rounding::Down => f.write_str("down"),
            Rounding::Ceiling => f.write_str("ceiling"),
            Rounding::Floor => f.write_str("floor"),
            Rounding::HalfUp => f.write_str("half-up"),
            Rounding::HalfDown => f.write_str("half-down"),
            Rounding::HalfEven => f.write_str("half-even"),
            Rounding::Unnecessary => f.write_str("unnecessary"),
        }
    }
}
