//! Decimal floating-point values.
//!
//! This module provides:
//! - [`Decimal`] - the capability every stack value must offer (arithmetic,
//!   comparison, transcendental functions, canonical digit export)
//! - [`Dec128`] - a software IEEE 754-2008 decimal128 implementation
//!   (34 digits, round-half-even)
//! - [`Flags`] - the exception flags an operation raises
//!
//! Operations never fail. Invalid operations produce NaN, overflow produces
//! signed infinity, and the condition is reported through the `Flags`
//! accumulator passed to every call.

mod dec128;
mod flags;
mod num;
mod transcend;
mod two_over_pi;
mod wide;

pub use dec128::Dec128;
pub use flags::Flags;

use std::cmp::Ordering;
use std::fmt;

/// Maximum number of coefficient digits a [`Parts`] decomposition carries.
pub const COEFFICIENT_DIGITS: usize = 34;

/// ASCII coefficient digits, most significant first.
pub type DigitBuf = heapless::Vec<u8, COEFFICIENT_DIGITS>;

/// Canonical decomposition of a decimal value.
///
/// A finite value equals `(-1)^negative * digits * 10^exponent`. `digits`
/// has no leading zeros; zero is the single digit `0`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Parts {
    NaN,
    Infinite { negative: bool },
    Finite { negative: bool, digits: DigitBuf, exponent: i32 },
}

/// A decimal floating-point value with IEEE 754-2008 semantics.
///
/// Every fallible condition is signalled through `flags` instead of a
/// `Result`; callers collect them per operation.
pub trait Decimal: Copy + PartialEq + fmt::Debug + fmt::Display {
    fn zero() -> Self;
    fn one() -> Self;
    fn from_i64(v: i64) -> Self;

    /// Parse a literal (`-1.5E3`, `Inf`, `NaN`). Returns `None` for text
    /// that is not a complete literal.
    fn parse(text: &str, flags: &mut Flags) -> Option<Self>;

    /// Canonical sign, digits and exponent.
    fn parts(&self) -> Parts;

    fn is_zero(&self) -> bool;
    fn is_nan(&self) -> bool;
    fn is_infinite(&self) -> bool;
    /// Sign bit, including for zeros and infinities.
    fn is_negative(&self) -> bool;

    fn negate(self) -> Self;

    fn add(self, rhs: Self, flags: &mut Flags) -> Self;
    fn sub(self, rhs: Self, flags: &mut Flags) -> Self;
    fn mul(self, rhs: Self, flags: &mut Flags) -> Self;
    fn div(self, rhs: Self, flags: &mut Flags) -> Self;
    /// `self` raised to `exponent`.
    fn pow(self, exponent: Self, flags: &mut Flags) -> Self;

    fn sqrt(self, flags: &mut Flags) -> Self;
    fn cbrt(self, flags: &mut Flags) -> Self;
    fn ln(self, flags: &mut Flags) -> Self;
    fn log10(self, flags: &mut Flags) -> Self;
    fn exp(self, flags: &mut Flags) -> Self;
    fn exp10(self, flags: &mut Flags) -> Self;

    fn sin(self, flags: &mut Flags) -> Self;
    fn cos(self, flags: &mut Flags) -> Self;
    fn tan(self, flags: &mut Flags) -> Self;
    fn asin(self, flags: &mut Flags) -> Self;
    fn acos(self, flags: &mut Flags) -> Self;
    fn atan(self, flags: &mut Flags) -> Self;

    fn sinh(self, flags: &mut Flags) -> Self;
    fn cosh(self, flags: &mut Flags) -> Self;
    fn tanh(self, flags: &mut Flags) -> Self;
    fn asinh(self, flags: &mut Flags) -> Self;
    fn acosh(self, flags: &mut Flags) -> Self;
    fn atanh(self, flags: &mut Flags) -> Self;

    fn tgamma(self, flags: &mut Flags) -> Self;

    /// Round to an integral value (ties to even), raising inexact if the
    /// value changed.
    fn round_integral_exact(self, flags: &mut Flags) -> Self;

    /// Quiet comparison; NaN is unordered and raises nothing.
    fn compare(&self, other: &Self) -> Option<Ordering>;

    #[inline]
    fn is_special(&self) -> bool {
        self.is_nan() || self.is_infinite()
    }

    #[inline]
    fn quiet_less(&self, other: &Self) -> bool {
        self.compare(other) == Some(Ordering::Less)
    }

    #[inline]
    fn quiet_less_equal(&self, other: &Self) -> bool {
        matches!(self.compare(other), Some(Ordering::Less | Ordering::Equal))
    }

    #[inline]
    fn quiet_equal(&self, other: &Self) -> bool {
        self.compare(other) == Some(Ordering::Equal)
    }
}
