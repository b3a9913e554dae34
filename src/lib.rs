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

//! bigdec is an arbitrary-precision decimal and integer arithmetic
//! library for Rust.
//!
//! # Introduction
//!
//! Binary floating-point numbers can only approximate common decimal
//! numbers. The value 0.1, for example, would need an infinitely
//! recurring binary fraction, so binary floating-point cannot be used
//! for financial calculations, or indeed for any calculations where
//! the results achieved are required to match those which might be
//! calculated by hand.
//!
//! bigdec represents a decimal number exactly, as an arbitrary-precision
//! unscaled integer paired with a signed scale: the value of a
//! [`Decimal`] is `unscaled × 10^-scale`. Arithmetic is exact by
//! default; results are rounded only when the caller asks for rounding
//! through a [`Context`].
//!
//! # Details
//!
//! The heavy integer arithmetic (multiplication, division, gcd, modular
//! exponentiation, primality) is delegated to the pure-Rust
//! [num-bigint-dig] engine. This crate implements everything above it:
//! the scale and rounding logic of the decimal engine, decimal and
//! arbitrary-radix string conversion, and the two's-complement bit and
//! logical operators synthesized over the engine's sign-and-magnitude
//! representation.
//!
//! The main types exposed by this library are as follows:
//!
//!  * [`Decimal`], an immutable arbitrary-precision decimal number with
//!    exact arithmetic and configurable rounding.
//!
//!  * [`Integer`], an immutable arbitrary-precision integer with the
//!    full complement of bitwise operators in two's-complement
//!    semantics.
//!
//!  * [`Context`], which hosts the rounded arithmetic operations. A
//!    context configures a precision and a [`Rounding`] algorithm;
//!    precision zero means exact.
//!
//!  * [`OrderedDecimal`], a wrapper providing numeric (rather than
//!    exact) equality, ordering and hashing for [`Decimal`].
//!
//! # Examples
//!
//! The following example demonstrates the basic usage of the library:
//!
//! ```
//! # use std::error::Error;
//! use bigdec::{Context, Decimal, Rounding};
//!
//! let x: Decimal = ".1".parse()?;
//! let y: Decimal = ".2".parse()?;
//! let z: Decimal = ".3".parse()?;
//!
//! assert_eq!(&x + &y, z);
//!
//! let cx = Context::new(2, Rounding::HalfEven);
//! let third = cx.div(&Decimal::ONE, &"3".parse()?)?;
//! assert_eq!(third.to_string(), "0.33");
//!
//! # Ok::<_, Box<dyn Error>>(())
//! ```
//!
//! [num-bigint-dig]: https://docs.rs/num-bigint-dig

#![deny(missing_debug_implementations, missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod bit_level;
mod context;
mod conv;
mod conversion;
mod decimal;
mod division;
mod error;
mod integer;
mod logical;
#[macro_use]
mod macros;
mod ordered;

pub use context::{Context, Rounding};
pub use decimal::Decimal;
pub use error::{
    ArithmeticError, ParseDecimalError, ParseIntegerError, TryFromDecimalError,
    TryFromIntegerError, TryIntoDecimalError,
};
pub use integer::Integer;
pub use ordered::OrderedDecimal;
