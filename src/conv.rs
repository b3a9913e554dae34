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

//! Conversions from the primitive integer types.

use crate::decimal::Decimal;
use crate::integer::Integer;

/// Converts from a signed primitive integer by splitting it into a sign
/// and a magnitude that fits in 128 bits.
macro_rules! integer_from_signed {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for Integer {
                fn from(n: $t) -> Integer {
                    let sign = if n == 0 {
                        0
                    } else if n < 0 {
                        -1
                    } else {
                        1
                    };
                    Integer::from_u128_magnitude(sign, u128::from(n.unsigned_abs()))
                }
            }
        )*
    };
}

/// Like `integer_from_signed!` but for unsigned integers.
macro_rules! integer_from_unsigned {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for Integer {
                fn from(n: $t) -> Integer {
                    Integer::from_u128_magnitude((n != 0) as i8, u128::from(n))
                }
            }
        )*
    };
}

integer_from_signed!(i8, i16, i32, i64, i128);
integer_from_unsigned!(u8, u16, u32, u64, u128);

impl From<isize> for Integer {
    fn from(n: isize) -> Integer {
        Integer::from(n as i64)
    }
}

impl From<usize> for Integer {
    fn from(n: usize) -> Integer {
        Integer::from(n as u64)
    }
}

/// Converts from a primitive integer that always fits the decimal's
/// machine-word unscaled value.
macro_rules! decimal_from_small_int {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for Decimal {
                fn from(n: $t) -> Decimal {
                    Decimal::from_unscaled_i64(i64::from(n), 0)
                }
            }
        )*
    };
}

/// Converts from a primitive integer that may overflow the machine-word
/// unscaled value, promoting through the integer facade when it does.
macro_rules! decimal_from_large_int {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for Decimal {
                fn from(n: $t) -> Decimal {
                    Decimal::from_unscaled(Integer::from(n), 0)
                }
            }
        )*
    };
}

decimal_from_small_int!(i8, i16, i32, i64, u8, u16, u32);
decimal_from_large_int!(i128, u64, u128);
