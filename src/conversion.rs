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

//! Conversion of digit arrays to strings in radixes 2 through 36, and of
//! decimal (unscaled value, scale) pairs to plain, scientific and
//! engineering notation.
//!
//! Radix conversion divides the full digit array by the largest power of
//! the radix that fits in one machine word, peeling off several
//! characters per division. Radix 16 extracts nibbles directly and radix
//! 10 delegates to the decimal formatter.

use static_assertions::const_assert_eq;

use crate::bit_level;
use crate::division;

/// Number of radix-`r` digits that fit in a 32-bit word, indexed by `r`.
/// The first two entries are unused.
pub(crate) const DIGITS_PER_WORD: [u32; 37] = [
    0, 0, 31, 19, 15, 13, 11, 11, 10, 9, 9, 8, 8, 8, 8, 7, 7, 7, 7, 7, 7, 7, 6, 6, 6, 6, 6, 6, 6,
    6, 6, 6, 6, 6, 6, 5, 5,
];

/// The largest power of the radix that fits in a 32-bit word:
/// `BIG_RADICES[r - 2] == r.pow(DIGITS_PER_WORD[r])`.
pub(crate) const BIG_RADICES: [u32; 35] = [
    2147483648, 1162261467, 1073741824, 1220703125, 362797056, 1977326743, 1073741824, 387420489,
    1000000000, 214358881, 429981696, 815730721, 1475789056, 170859375, 268435456, 410338673,
    612220032, 893871739, 1280000000, 1801088541, 113379904, 148035889, 191102976, 244140625,
    308915776, 387420489, 481890304, 594823321, 729000000, 887503681, 1073741824, 1291467969,
    1544804416, 1838265625, 60466176,
];

const_assert_eq!(DIGITS_PER_WORD.len(), 37);
const_assert_eq!(BIG_RADICES.len(), 35);

/// Formats a signed 64-bit value in the given radix.
fn i64_to_radix_string(value: i64, radix: u32) -> String {
    let mut mag = value.unsigned_abs();
    let mut buf = Vec::new();
    loop {
        let digit = (mag % u64::from(radix)) as u32;
        buf.push(std::char::from_digit(digit, radix).unwrap() as u8);
        mag /= u64::from(radix);
        if mag == 0 {
            break;
        }
    }
    if value < 0 {
        buf.push(b'-');
    }
    buf.reverse();
    String::from_utf8(buf).unwrap()
}

/// Converts a sign-magnitude integer to a string in the given radix.
///
/// Panics if the radix is outside `2..=36`; that is a caller contract
/// violation, not a data error.
pub(crate) fn integer_to_string(sign: i8, digits: &[u32], radix: u32) -> String {
    assert!((2..=36).contains(&radix), "radix out of range: {}", radix);
    if sign == 0 {
        return "0".into();
    }
    if digits.len() == 1 {
        let mut v = i64::from(digits[0]);
        if sign < 0 {
            v = -v;
        }
        return i64_to_radix_string(v, radix);
    }
    if radix == 10 {
        return to_decimal_scaled_string(sign, digits, 0);
    }
    let mut out = Vec::<u8>::new();
    if radix == 16 {
        // Nibble fast path: no division required.
        for &digit in digits {
            for j in 0..8 {
                let nibble = (digit >> (j << 2)) & 0xf;
                out.push(std::char::from_digit(nibble, 16).unwrap() as u8);
            }
        }
    } else {
        let chars_per_word = DIGITS_PER_WORD[radix as usize];
        let big_radix = BIG_RADICES[radix as usize - 2];
        let mut temp = digits.to_vec();
        let mut temp_len = temp.len();
        loop {
            let mut rem = division::divide_array_by_word(&mut temp, temp_len, big_radix);
            // Emit exactly chars_per_word characters; high zeros of a
            // chunk matter unless this was the final chunk.
            for _ in 0..chars_per_word {
                out.push(std::char::from_digit(rem % radix, radix).unwrap() as u8);
                rem /= radix;
            }
            while temp_len > 1 && temp[temp_len - 1] == 0 {
                temp_len -= 1;
            }
            if temp_len == 1 && temp[0] == 0 {
                break;
            }
        }
    }
    // The digits were emitted least significant first with zero padding.
    while out.len() > 1 && *out.last().unwrap() == b'0' {
        out.pop();
    }
    if sign < 0 {
        out.push(b'-');
    }
    out.reverse();
    String::from_utf8(out).unwrap()
}

/// Extracts the decimal digit characters of a magnitude, most
/// significant first.
pub(crate) fn magnitude_to_decimal_digits(digits: &[u32]) -> String {
    if bit_level::is_zero(digits) {
        return "0".into();
    }
    let mut out = Vec::<u8>::new();
    let mut temp = digits.to_vec();
    let mut temp_len = temp.len();
    loop {
        let mut rem = division::divide_array_by_word(&mut temp, temp_len, 1_000_000_000);
        for _ in 0..9 {
            out.push(b'0' + (rem % 10) as u8);
            rem /= 10;
        }
        while temp_len > 1 && temp[temp_len - 1] == 0 {
            temp_len -= 1;
        }
        if temp_len == 1 && temp[0] == 0 {
            break;
        }
    }
    while out.len() > 1 && *out.last().unwrap() == b'0' {
        out.pop();
    }
    out.reverse();
    String::from_utf8(out).unwrap()
}

/// Formats a sign-magnitude unscaled value and scale in scientific
/// notation (the canonical decimal string form).
pub(crate) fn to_decimal_scaled_string(sign: i8, digits: &[u32], scale: i32) -> String {
    scientific_layout(sign < 0, &magnitude_to_decimal_digits(digits), scale)
}

/// Formats a machine-word unscaled value and scale in scientific
/// notation; the fast path that avoids the digit-array machinery.
pub(crate) fn small_to_decimal_scaled_string(unscaled: i64, scale: i32) -> String {
    scientific_layout(unscaled < 0, &unscaled.unsigned_abs().to_string(), scale)
}

/// Lays out unsigned decimal digits and a scale in scientific notation.
///
/// The decimal point is placed "plainly" when `scale > 0` and the
/// adjusted exponent is at least -6; otherwise the output takes the
/// `d.dddE[+]exp` form.
pub(crate) fn scientific_layout(negative: bool, digits: &str, scale: i32) -> String {
    if scale == 0 {
        return signed(negative, digits.into());
    }
    let len = digits.len() as i64;
    let exponent = -i64::from(scale) + len - 1;
    let mut out = String::with_capacity(digits.len() + 16);
    if scale > 0 && exponent >= -6 {
        if exponent >= 0 {
            let point = (len - i64::from(scale)) as usize;
            out.push_str(&digits[..point]);
            out.push('.');
            out.push_str(&digits[point..]);
        } else {
            out.push_str("0.");
            for _ in 0..(-exponent - 1) {
                out.push('0');
            }
            out.push_str(digits);
        }
    } else {
        out.push_str(&digits[..1]);
        if digits.len() > 1 {
            out.push('.');
            out.push_str(&digits[1..]);
        }
        out.push('E');
        if exponent > 0 {
            out.push('+');
        }
        out.push_str(&exponent.to_string());
    }
    signed(negative, out)
}

/// Lays out unsigned decimal digits and a scale in engineering notation:
/// like scientific notation, but the exponent is always a multiple of
/// three and the integer part carries one to three digits.
pub(crate) fn engineering_layout(negative: bool, digits: &str, scale: i32) -> String {
    if scale == 0 {
        return signed(negative, digits.into());
    }
    let len = digits.len() as i64;
    let mut exponent = -i64::from(scale) + len - 1;
    if scale > 0 && exponent >= -6 {
        // Same placement as the plain branch of scientific notation.
        return scientific_layout(negative, digits, scale);
    }
    let mut digits = digits.to_string();
    let mut int_digits = 1usize;
    let rem = (exponent % 3) as i32;
    if rem != 0 {
        if digits == "0" {
            // A zero coefficient adjusts the exponent upward instead.
            exponent += i64::from(if rem < 0 { -rem } else { 3 - rem });
        } else {
            let adj = if rem < 0 { rem + 3 } else { rem } as usize;
            exponent -= adj as i64;
            int_digits += adj;
            while digits.len() < int_digits {
                digits.push('0');
            }
        }
    }
    let mut out = String::with_capacity(digits.len() + 16);
    out.push_str(&digits[..int_digits.min(digits.len())]);
    if digits.len() > int_digits {
        out.push('.');
        out.push_str(&digits[int_digits..]);
    }
    if exponent != 0 {
        out.push('E');
        if exponent > 0 {
            out.push('+');
        }
        out.push_str(&exponent.to_string());
    }
    signed(negative, out)
}

/// Lays out unsigned decimal digits and a scale without an exponent.
pub(crate) fn plain_layout(negative: bool, digits: &str, scale: i32) -> String {
    // A zero with negative scale prints as plain zero; a zero with
    // positive scale keeps its fractional zeros.
    if scale == 0 || (digits == "0" && scale < 0) {
        return signed(negative, digits.into());
    }
    let mut out = String::with_capacity(digits.len() + scale.unsigned_abs() as usize + 2);
    if scale > 0 {
        let delta = i64::from(scale) - digits.len() as i64;
        if delta >= 0 {
            out.push_str("0.");
            for _ in 0..delta {
                out.push('0');
            }
            out.push_str(digits);
        } else {
            let point = (-delta) as usize;
            out.push_str(&digits[..point]);
            out.push('.');
            out.push_str(&digits[point..]);
        }
    } else {
        out.push_str(digits);
        for _ in 0..scale.unsigned_abs() {
            out.push('0');
        }
    }
    signed(negative, out)
}

fn signed(negative: bool, body: String) -> String {
    if negative {
        let mut s = String::with_capacity(body.len() + 1);
        s.push('-');
        s.push_str(&body);
        s
    } else {
        body
    }
}

/// Converts a sign-magnitude integer to the nearest `f64`, building the
/// IEEE-754 bit pattern directly.
///
/// The top 54 bits of the magnitude are extracted by shifting; the
/// lowest of them is the rounding bit, resolved round-half-to-even
/// against the dropped tail. Values beyond the double range collapse to
/// infinity, with the exact `MAX_VALUE`/infinity boundary handled at
/// adjusted exponent 1023.
pub(crate) fn magnitude_to_f64(sign: i8, digits: &[u32]) -> f64 {
    if sign == 0 {
        return 0.0;
    }
    let bit_len = bit_level::bit_length(false, digits);
    if bit_len < 64 {
        let mut v = u64::from(digits[0]);
        if digits.len() > 1 {
            v |= u64::from(digits[1]) << 32;
        }
        return if sign < 0 { -(v as f64) } else { v as f64 };
    }
    if digits.len() > 32 {
        // More than 1024 bits of magnitude is out of the double range.
        return if sign < 0 {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }
    let exponent = bit_len - 1;
    let delta = bit_len - 54;
    // The 54 most significant bits; bit 53 is always set.
    let shifted = bit_level::shift_right(false, digits, delta as usize);
    let mut window = u64::from(shifted[0]);
    if shifted.len() > 1 {
        window |= u64::from(shifted[1]) << 32;
    }
    // 52 mantissa bits plus the rounding bit in bit 0; the implicit
    // leading bit 53 of the window is dropped.
    let mut mantissa = window & 0x1F_FFFF_FFFF_FFFF;
    if exponent == 1023 {
        if mantissa == 0x1F_FFFF_FFFF_FFFF {
            return if sign < 0 {
                f64::NEG_INFINITY
            } else {
                f64::INFINITY
            };
        }
        if mantissa == 0x1F_FFFF_FFFF_FFFE {
            return if sign < 0 { -f64::MAX } else { f64::MAX };
        }
    }
    if mantissa & 1 == 1
        && (mantissa & 2 == 2 || bit_level::non_zero_dropped_bits(delta, digits))
    {
        // Round up; an overflow out of the mantissa carries into the
        // exponent field naturally.
        mantissa += 2;
    }
    mantissa >>= 1;
    let sign_bit = if sign < 0 { 1u64 << 63 } else { 0 };
    let exponent_field = ((1023 + exponent) << 52) & 0x7FF0_0000_0000_0000;
    f64::from_bits(sign_bit | exponent_field | mantissa)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radix_tables_agree() {
        for radix in 2u64..=36 {
            let digits = DIGITS_PER_WORD[radix as usize];
            let big = u64::from(BIG_RADICES[radix as usize - 2]);
            assert_eq!(big, radix.pow(digits), "radix {}", radix);
            assert!(big * radix > u64::from(u32::MAX), "radix {}", radix);
        }
    }

    #[test]
    fn test_integer_to_string_radixes() {
        // 2^64 + 255
        let digits = [255u32, 0, 1];
        assert_eq!(
            integer_to_string(1, &digits, 16),
            "100000000000000ff"
        );
        assert_eq!(
            integer_to_string(-1, &digits, 10),
            "-18446744073709551871"
        );
        assert_eq!(
            integer_to_string(1, &digits, 2),
            format!("1{}11111111", "0".repeat(56))
        );
        assert_eq!(integer_to_string(0, &[0], 36), "0");
    }

    #[test]
    fn test_scientific_layout() {
        assert_eq!(scientific_layout(false, "100", 2), "1.00");
        assert_eq!(scientific_layout(false, "100", -2), "1.00E+4");
        assert_eq!(scientific_layout(true, "123", 5), "-0.00123");
        assert_eq!(scientific_layout(false, "123", 10), "1.23E-8");
        assert_eq!(scientific_layout(false, "1", -1), "1E+1");
        assert_eq!(scientific_layout(false, "0", 1), "0.0");
    }

    #[test]
    fn test_engineering_layout() {
        assert_eq!(engineering_layout(false, "123456", -1), "1.23456E+6");
        assert_eq!(engineering_layout(false, "12345", -1), "123.45E+3");
        assert_eq!(engineering_layout(false, "1", -2), "100");
        assert_eq!(engineering_layout(false, "1", -4), "10E+3");
        assert_eq!(engineering_layout(false, "123", 10), "12.3E-9");
        assert_eq!(engineering_layout(false, "123", 7), "0.0000123");
    }

    #[test]
    fn test_plain_layout() {
        assert_eq!(plain_layout(false, "100", 2), "1.00");
        assert_eq!(plain_layout(true, "123", 5), "-0.00123");
        assert_eq!(plain_layout(false, "12", -3), "12000");
        assert_eq!(plain_layout(false, "0", -3), "0");
        assert_eq!(plain_layout(false, "0", 2), "0.00");
    }

    #[test]
    fn test_magnitude_to_f64_small() {
        assert_eq!(magnitude_to_f64(1, &[123]), 123.0);
        assert_eq!(magnitude_to_f64(-1, &[123]), -123.0);
        assert_eq!(magnitude_to_f64(0, &[0]), 0.0);
    }

    #[test]
    fn test_magnitude_to_f64_rounding() {
        // 2^53 - 1 is exactly representable.
        let exact = [0xffff_ffffu32, 0x001f_ffff];
        assert_eq!(magnitude_to_f64(1, &exact), (1u64 << 53) as f64 - 1.0);
        // 2^53 + 1 rounds to the even neighbor 2^53.
        let above = [1u32, 0x0020_0000];
        assert_eq!(magnitude_to_f64(1, &above), (1u64 << 53) as f64);
        // 2^53 + 3 rounds up to 2^53 + 4.
        let odd = [3u32, 0x0020_0000];
        assert_eq!(magnitude_to_f64(1, &odd), ((1u64 << 53) + 4) as f64);
    }

    #[test]
    fn test_magnitude_to_f64_wide() {
        // 2^64 + 1: the tail below the 54-bit window is nonzero but
        // under half an ulp, so it is dropped.
        assert_eq!(magnitude_to_f64(1, &[1, 0, 1]), (1u128 << 64) as f64);
        // 2^64 + 2^11: exactly half an ulp with an even mantissa stays.
        assert_eq!(magnitude_to_f64(1, &[2048, 0, 1]), (1u128 << 64) as f64);
        // 2^64 + 3 * 2^11: the tie breaks to the even neighbor above.
        assert_eq!(
            magnitude_to_f64(1, &[6144, 0, 1]),
            ((1u128 << 64) + 8192) as f64
        );
    }
}
