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
use std::error::Error;

use bigdec::{dec, ArithmeticError, Context, Decimal, Integer, Rounding};

#[test]
fn test_constants() -> Result<(), Box<dyn Error>> {
    assert_eq!(Decimal::ZERO.to_string(), "0");
    assert_eq!(Decimal::ONE.to_string(), "1");
    assert_eq!(Decimal::TEN.to_string(), "10");
    assert!(Decimal::ZERO.is_zero());
    Ok(())
}

const ROUNDING_TESTS: &[(&str, u32, Rounding, &str)] = &[
    // Ties: half-up rounds away from zero, half-down toward zero,
    // half-even to the even neighbor.
    ("2.5", 1, Rounding::HalfEven, "2"),
    ("2.5", 1, Rounding::HalfUp, "3"),
    ("2.5", 1, Rounding::HalfDown, "2"),
    ("1.5", 1, Rounding::HalfEven, "2"),
    ("1.5", 1, Rounding::HalfUp, "2"),
    ("1.5", 1, Rounding::HalfDown, "1"),
    ("-2.5", 1, Rounding::HalfEven, "-2"),
    ("-2.5", 1, Rounding::HalfUp, "-3"),
    ("-1.5", 1, Rounding::HalfEven, "-2"),
    // Directed modes.
    ("2.1", 1, Rounding::Up, "3"),
    ("2.9", 1, Rounding::Down, "2"),
    ("-2.1", 1, Rounding::Up, "-3"),
    ("-2.9", 1, Rounding::Down, "-2"),
    ("2.1", 1, Rounding::Ceiling, "3"),
    ("-2.1", 1, Rounding::Ceiling, "-2"),
    ("2.9", 1, Rounding::Floor, "2"),
    ("-2.1", 1, Rounding::Floor, "-3"),
    // Off-tie nearest cases.
    ("2.49", 1, Rounding::HalfUp, "2"),
    ("2.51", 1, Rounding::HalfDown, "3"),
    ("0.25", 1, Rounding::HalfEven, "0.2"),
    ("0.35", 1, Rounding::HalfEven, "0.4"),
    // Rounding that carries into a new digit re-truncates.
    ("9.9", 1, Rounding::HalfUp, "1E+1"),
    ("99.5", 2, Rounding::HalfUp, "1.0E+2"),
];

#[test]
fn test_rounding_modes() -> Result<(), Box<dyn Error>> {
    for (input, precision, rounding, expected) in ROUNDING_TESTS {
        let cx = Context::new(*precision, *rounding);
        let d: Decimal = input.parse()?;
        assert_eq!(
            cx.round(&d)?.to_string(),
            *expected,
            "round({}, {}, {})",
            input,
            precision,
            rounding
        );
    }
    Ok(())
}

#[test]
fn test_rounding_unnecessary() -> Result<(), Box<dyn Error>> {
    let cx = Context::new(2, Rounding::Unnecessary);
    let exact: Decimal = "1200".parse()?;
    // Shedding zero digits needs no rounding.
    assert_eq!(cx.round(&exact)?.to_string(), "1.2E+3");
    let inexact: Decimal = "1230".parse()?;
    assert_eq!(
        cx.round(&inexact).unwrap_err(),
        ArithmeticError::RoundingNecessary
    );
    Ok(())
}

#[test]
fn test_divide_exact() -> Result<(), Box<dyn Error>> {
    assert_eq!(dec!(1).divide(&dec!(8))?, dec!(0.125));
    assert_eq!(dec!(1).divide(&dec!(0.625))?.to_string(), "1.6");
    assert_eq!(dec!(-33).divide(&dec!(22))?.to_string(), "-1.5");
    assert_eq!(dec!(0).divide(&dec!(7))?.to_string(), "0");
    // A divisor of only twos and fives always terminates.
    assert_eq!(dec!(7).divide(&dec!(3.2))?.to_string(), "2.1875");
    Ok(())
}

#[test]
fn test_divide_non_terminating() -> Result<(), Box<dyn Error>> {
    assert_eq!(
        dec!(1).divide(&dec!(3)).unwrap_err(),
        ArithmeticError::NonTerminating
    );
    assert_eq!(
        dec!(10).divide(&dec!(7)).unwrap_err(),
        ArithmeticError::NonTerminating
    );
    assert_eq!(
        dec!(1).divide(&dec!(0)).unwrap_err(),
        ArithmeticError::DivisionByZero
    );
    Ok(())
}

#[test]
fn test_divide_to_scale() -> Result<(), Box<dyn Error>> {
    let one: Decimal = "1".parse()?;
    let three: Decimal = "3".parse()?;
    assert_eq!(
        one.divide_to_scale(&three, 4, Rounding::HalfUp)?.to_string(),
        "0.3333"
    );
    assert_eq!(
        one.divide_to_scale(&three, 4, Rounding::Up)?.to_string(),
        "0.3334"
    );
    let neg: Decimal = "-2".parse()?;
    assert_eq!(
        neg.divide_to_scale(&three, 3, Rounding::HalfEven)?.to_string(),
        "-0.667"
    );
    assert_eq!(
        one.divide_to_scale(&three, 2, Rounding::Unnecessary)
            .unwrap_err(),
        ArithmeticError::RoundingNecessary
    );
    Ok(())
}

#[test]
fn test_divide_with_context() -> Result<(), Box<dyn Error>> {
    let cx = Context::new(4, Rounding::HalfEven);
    assert_eq!(cx.div(&dec!(1), &dec!(3))?.to_string(), "0.3333");
    assert_eq!(cx.div(&dec!(2), &dec!(3))?.to_string(), "0.6667");
    // An exact quotient strips back to the preferred scale.
    assert_eq!(cx.div(&dec!(1.00), &dec!(4))?.to_string(), "0.25");
    Ok(())
}

#[test]
fn test_integral_division_and_remainder() -> Result<(), Box<dyn Error>> {
    assert_eq!(dec!(3.6).divide_to_integral_value(&dec!(1.5))?.to_string(), "2");
    assert_eq!(dec!(3.6).remainder(&dec!(1.5))?.to_string(), "0.6");
    let (q, r) = dec!(-7).div_rem(&dec!(2))?;
    assert_eq!(q.to_string(), "-3");
    assert_eq!(r.to_string(), "-1");
    // The integral part must fit the context's precision.
    let cx = Context::new(2, Rounding::Down);
    assert_eq!(
        cx.div_integer(&dec!(1000), &dec!(3)).unwrap_err(),
        ArithmeticError::DivisionImpossible
    );
    Ok(())
}

const FORMAT_TESTS: &[(i64, i32, &str)] = &[
    (100, 2, "1.00"),
    (100, -2, "1.00E+4"),
    (123, 0, "123"),
    (-123, 5, "-0.00123"),
    (123, 10, "1.23E-8"),
    (1, -1, "1E+1"),
    (0, 1, "0.0"),
    (0, -5, "0E+5"),
    (-1, 7, "-1E-7"),
];

#[test]
fn test_to_string() -> Result<(), Box<dyn Error>> {
    for (unscaled, scale, expected) in FORMAT_TESTS {
        let d = Decimal::from_unscaled_i64(*unscaled, *scale);
        assert_eq!(d.to_string(), *expected, "({}, {})", unscaled, scale);
    }
    Ok(())
}

#[test]
fn test_plain_and_engineering_strings() -> Result<(), Box<dyn Error>> {
    let d = Decimal::from_unscaled_i64(100, -2);
    assert_eq!(d.to_plain_string(), "10000");
    assert_eq!(d.to_engineering_string(), "10.0E+3");
    let d = Decimal::from_unscaled_i64(-123, 5);
    assert_eq!(d.to_plain_string(), "-0.00123");
    let d = Decimal::from_unscaled_i64(123450, -1);
    assert_eq!(d.to_engineering_string(), "1.23450E+6");
    let d = Decimal::from_unscaled_i64(123, 10);
    assert_eq!(d.to_plain_string(), "0.0000000123");
    Ok(())
}

#[test]
fn test_parse_round_trip() -> Result<(), Box<dyn Error>> {
    // toString output must parse back to a numerically equal value; an
    // exact (scale-preserving) round trip when no rounding occurred.
    for input in &[
        "0", "1", "-1", "1.00", "0.125", "-42.5", "1E+10", "1.23E-8",
        "98765432109876543210.5",
        "-0.000000000000000000000001",
        "9223372036854775807", "-9223372036854775808",
    ] {
        let d: Decimal = input.parse()?;
        let back: Decimal = d.to_string().parse()?;
        assert_eq!(back, d, "{}", input);
        assert_eq!(back.compare(&d), Ordering::Equal);
    }
    Ok(())
}

#[test]
fn test_parse_errors() -> Result<(), Box<dyn Error>> {
    for input in &["", " 1", "1 ", "1..2", "--1", "+", ".", "1e", "1e1.5", "1x", "1e99999999999"] {
        assert!(input.parse::<Decimal>().is_err(), "{:?}", input);
    }
    // Leniencies the grammar does allow.
    for input in &["+1", ".5", "-.5", "1.", "1.e3", "007"] {
        assert!(input.parse::<Decimal>().is_ok(), "{:?}", input);
    }
    Ok(())
}

#[test]
fn test_strip_trailing_zeros() -> Result<(), Box<dyn Error>> {
    for (input, unscaled, scale) in &[
        ("1.200", 12i64, 1i32),
        ("100", 1, -2),
        ("1.0E+4", 1, -4),
        ("0.000", 0, 0),
        ("101", 101, 0),
    ] {
        let d: Decimal = input.parse()?;
        let stripped = d.strip_trailing_zeros();
        assert_eq!(stripped.compare(&d), Ordering::Equal, "{}", input);
        assert_eq!(stripped.unscaled_value(), Integer::from(*unscaled));
        assert_eq!(stripped.scale(), *scale);
    }
    Ok(())
}

#[test]
fn test_set_scale() -> Result<(), Box<dyn Error>> {
    let d: Decimal = "1.23".parse()?;
    // Widening is exact; the result stays within one ulp of the
    // original and equals it when no digits were shed.
    let widened = d.set_scale(5, Rounding::Unnecessary)?;
    assert_eq!(widened.scale(), 5);
    assert_eq!(widened.compare(&d), Ordering::Equal);
    let narrowed = d.set_scale(1, Rounding::HalfUp)?;
    assert_eq!(narrowed.to_string(), "1.2");
    let diff = (&narrowed - &d).abs();
    assert_ne!(diff.compare(&"0.1".parse()?), Ordering::Greater);
    assert_eq!(
        d.set_scale(1, Rounding::Unnecessary).unwrap_err(),
        ArithmeticError::RoundingNecessary
    );
    Ok(())
}

#[test]
fn test_pow() -> Result<(), Box<dyn Error>> {
    assert_eq!(dec!(2).pow(10)?, dec!(1024));
    assert_eq!(dec!(2).pow(0)?, dec!(1));
    assert_eq!(dec!(0).pow(0)?, dec!(1));
    assert_eq!(dec!(0.5).pow(3)?.to_string(), "0.125");
    assert_eq!(dec!(-2).pow(3)?, dec!(-8));
    assert!(dec!(2).pow(1_000_000_000).is_err());
    Ok(())
}

#[test]
fn test_pow_with_context() -> Result<(), Box<dyn Error>> {
    let cx = Context::new(5, Rounding::HalfEven);
    assert_eq!(cx.pow(&dec!(2), 10)?.to_string(), "1024");
    // The X3.274 guard digits keep the rounded chain accurate.
    assert_eq!(cx.pow(&dec!(1.01), 100)?.to_string(), "2.7048");
    // A negative exponent inverts through division.
    assert_eq!(cx.pow(&dec!(2), -2)?.to_string(), "0.25");
    assert!(Context::UNLIMITED.pow(&dec!(2), -1).is_err());
    Ok(())
}

#[test]
fn test_add_sub_mul() -> Result<(), Box<dyn Error>> {
    assert_eq!((dec!(0.1) + dec!(0.2)).to_string(), "0.3");
    assert_eq!((dec!(1.23) + dec!(0.007)).to_string(), "1.237");
    assert_eq!((dec!(1) - dec!(1.000)).to_string(), "0.000");
    assert_eq!((dec!(1.5) * dec!(-2.5)).to_string(), "-3.75");
    // Scales add under multiplication.
    let product = dec!(0.001) * dec!(0.002);
    assert_eq!(product.scale(), 6);
    assert_eq!(product.to_string(), "0.000002");
    // The fast path promotes on overflow.
    let max = Decimal::from(i64::MAX);
    assert_eq!((&max + &Decimal::ONE).to_string(), "9223372036854775808");
    assert_eq!(
        (&max * &max).to_string(),
        "85070591730234615847396907784232501249"
    );
    Ok(())
}

#[test]
fn test_compare_and_equality() -> Result<(), Box<dyn Error>> {
    let a: Decimal = "1.0".parse()?;
    let b: Decimal = "1.00".parse()?;
    assert_ne!(a, b);
    assert_eq!(a.compare(&b), Ordering::Equal);
    assert_eq!(a.min(&b), a);
    assert_eq!(dec!(-2).compare(&dec!(1)), Ordering::Less);
    assert_eq!(dec!(3).max(&dec!(2.99)), dec!(3));
    // Far-apart magnitudes resolve by the precision estimate alone.
    let big: Decimal = "1E+100".parse()?;
    let small: Decimal = "1E-100".parse()?;
    assert_eq!(big.compare(&small), Ordering::Greater);
    assert_eq!((-&big).compare(&small), Ordering::Less);
    Ok(())
}

#[test]
fn test_numeric_conversions() -> Result<(), Box<dyn Error>> {
    let d: Decimal = "12.34".parse()?;
    assert_eq!(d.to_integer(), Integer::from(12));
    assert_eq!(
        d.to_integer_exact().unwrap_err(),
        ArithmeticError::RoundingNecessary
    );
    assert_eq!(dec!(-12.34).to_integer(), Integer::from(-12));
    assert_eq!(i64::try_from(&dec!(42.00))?, 42);
    assert!(i64::try_from(&d).is_err());
    assert_eq!(d.to_f64(), 12.34);
    assert_eq!(dec!(0.5).to_f64(), 0.5);
    // from-float construction is the exact binary expansion.
    let exact = Decimal::try_from(0.25f64)?;
    assert_eq!(exact.to_string(), "0.25");
    let exact = Decimal::try_from(3.0f64)?;
    assert_eq!(exact.to_string(), "3");
    Ok(())
}

#[test]
fn test_move_point_and_scaling() -> Result<(), Box<dyn Error>> {
    let d: Decimal = "1.23".parse()?;
    assert_eq!(d.move_point_left(1)?.to_string(), "0.123");
    assert_eq!(d.move_point_right(5)?.to_string(), "123000");
    assert_eq!(d.scale_by_power_of_ten(2)?.to_string(), "123");
    assert_eq!(d.scale_by_power_of_ten(-2)?.to_string(), "0.0123");
    assert_eq!(d.ulp().to_string(), "0.01");
    Ok(())
}

#[test]
fn test_context_add_far_scales_sticky() -> Result<(), Box<dyn Error>> {
    let cx = Context::new(4, Rounding::HalfEven);
    let a: Decimal = "123450".parse()?;
    let tiny: Decimal = "0.000001".parse()?;
    // Alone, the tie rounds to even (keeping 1234); the negligible
    // addend must flip it upward through the sticky digit.
    assert_eq!(cx.round(&a)?.to_string(), "1.234E+5");
    assert_eq!(cx.add(&a, &tiny)?.to_string(), "1.235E+5");
    // Subtraction nudges the tie the other way.
    assert_eq!(cx.sub(&a, &tiny)?.to_string(), "1.234E+5");
    Ok(())
}

#[test]
fn test_scale_overflow_reported() -> Result<(), Box<dyn Error>> {
    let huge: Decimal = "1E-2147483647".parse()?;
    match Context::UNLIMITED.mul(&huge, &huge) {
        Err(ArithmeticError::ScaleOutOfRange(_)) => {}
        other => panic!("expected scale overflow, got {:?}", other),
    }
    Ok(())
}
