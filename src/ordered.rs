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
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::decimal::Decimal;
use crate::error::ParseDecimalError;

/// A wrapper for a decimal number that provides implementations of
/// [`Ord`] and [`Hash`] based on numeric equivalence.
///
/// [`Decimal`]'s intrinsic equality is exact, distinguishing `1.0` from
/// `1.00`, and so it cannot implement `Ord` consistently with numeric
/// comparison. `OrderedDecimal` equates numerically equivalent values:
/// `1.0` and `1.00` are equal, order identically and hash identically,
/// which makes the wrapper suitable for sorted and hashed collections.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrderedDecimal(pub Decimal);

impl OrderedDecimal {
    /// Consumes the ordered wrapper, returning the inner decimal.
    pub fn into_inner(self) -> Decimal {
        self.0
    }
}

impl fmt::Display for OrderedDecimal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl PartialEq for OrderedDecimal {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OrderedDecimal {}

impl PartialOrd for OrderedDecimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderedDecimal {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.compare(&other.0)
    }
}

impl Hash for OrderedDecimal {
    fn hash<H>(&self, state: &mut H)
    where
        H: Hasher,
    {
        // Numerically equivalent values strip to the same
        // (unscaled, scale) pair.
        self.0.strip_trailing_zeros().hash(state)
    }
}

impl FromStr for OrderedDecimal {
    type Err = ParseDecimalError;

    fn from_str(s: &str) -> Result<OrderedDecimal, ParseDecimalError> {
        Ok(OrderedDecimal(s.parse()?))
    }
}

impl From<Decimal> for OrderedDecimal {
    fn from(d: Decimal) -> OrderedDecimal {
        OrderedDecimal(d)
    }
}

impl From<i32> for OrderedDecimal {
    fn from(n: i32) -> OrderedDecimal {
        OrderedDecimal(Decimal::from(n))
    }
}

impl Neg for OrderedDecimal {
    type Output = OrderedDecimal;

    fn neg(self) -> OrderedDecimal {
        OrderedDecimal(-self.0)
    }
}

impl Add for OrderedDecimal {
    type Output = OrderedDecimal;

    fn add(self, other: OrderedDecimal) -> OrderedDecimal {
        OrderedDecimal(self.0 + other.0)
    }
}

impl Sub for OrderedDecimal {
    type Output = OrderedDecimal;

    fn sub(self, other: OrderedDecimal) -> OrderedDecimal {
        OrderedDecimal(self.0 - other.0)
    }
}

impl Mul for OrderedDecimal {
    type Output = OrderedDecimal;

    fn mul(self, other: OrderedDecimal) -> OrderedDecimal {
        OrderedDecimal(self.0 * other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(d: &OrderedDecimal) -> u64 {
        let mut hasher = DefaultHasher::new();
        d.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_numeric_equality_and_hash() {
        let a: OrderedDecimal = "1.0".parse().unwrap();
        let b: OrderedDecimal = "1.00".parse().unwrap();
        let c: OrderedDecimal = "10E-1".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_eq!(hash_of(&a), hash_of(&b));
        assert_eq!(hash_of(&a), hash_of(&c));
        let d: OrderedDecimal = "1.01".parse().unwrap();
        assert!(a < d);
    }
}
