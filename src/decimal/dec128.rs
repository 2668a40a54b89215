//! Software decimal128.
//!
//! Values are kept unpacked (class, sign, coefficient, exponent) rather
//! than in the 128-bit interchange encoding; every observable result is
//! the same: 34-digit coefficients, exponents in [-6176, 6111], and
//! round-half-even everywhere.

use crate::decimal::num::{parse_literal, shed, Literal, Num, Raw, Rounded, WORK};
use crate::decimal::transcend::{self, HALF_PI, LN10, PI};
use crate::decimal::wide::{digit_count, Wide, POW10};
use crate::decimal::{Decimal, DigitBuf, Flags, Parts};
use serde::{Serialize, Deserialize};
use std::cmp::Ordering;
use std::fmt;

/// Coefficient digits.
pub const PRECISION: u32 = 34;
/// Largest adjusted exponent.
pub const EMAX: i64 = 6144;
/// Smallest normal adjusted exponent.
pub const EMIN: i64 = -6143;
/// Smallest stored exponent (subnormal limit).
pub const ETINY: i64 = -6176;
/// Largest stored exponent.
const EXP_MAX: i64 = EMAX - PRECISION as i64 + 1;

/// e^x overflows decimal128 above this argument and underflows below its
/// negated companion.
const EXP_OVERFLOW: i64 = 14200;
const EXP_UNDERFLOW: i64 = -14300;

/// Gamma overflows/underflows well before these magnitudes.
const GAMMA_LIMIT: i64 = 3000;

/// Largest n computed exactly as (n - 1)! by tgamma.
const EXACT_FACTORIAL_MAX: i64 = 70;

/// Integer exponents up to this magnitude use repeated squaring in pow.
const POW_INT_MAX: i64 = 9999;

/// Split point for the mantissa of a pow base.
const SQRT_10: Num = Num::new(false, 3162277660168379332, -18);

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
enum Class {
    Finite,
    Infinite,
    NaN,
}

/// A decimal128 value.
///
/// Equality is representational: `1.0` and `1.00` differ. Use
/// [`Decimal::compare`] for numeric comparison.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dec128 {
    class: Class,
    negative: bool,
    coefficient: u128,
    exponent: i32,
}

impl Dec128 {
    pub const ZERO: Dec128 = Dec128::finite(false, 0, 0);
    pub const ONE: Dec128 = Dec128::finite(false, 1, 0);
    pub const NAN: Dec128 = Dec128 { class: Class::NaN, negative: false, coefficient: 0, exponent: 0 };
    pub const INFINITY: Dec128 = Dec128::infinity(false);
    pub const NEG_INFINITY: Dec128 = Dec128::infinity(true);

    const fn finite(negative: bool, coefficient: u128, exponent: i32) -> Self {
        Self { class: Class::Finite, negative, coefficient, exponent }
    }

    const fn infinity(negative: bool) -> Self {
        Self { class: Class::Infinite, negative, coefficient: 0, exponent: 0 }
    }

    #[inline]
    fn is_finite(&self) -> bool {
        self.class == Class::Finite
    }

    #[inline]
    fn num(&self) -> Num {
        Num::new(self.negative, self.coefficient, self.exponent)
    }

    #[inline]
    fn signed_zero(negative: bool) -> Self {
        Self::finite(negative, 0, 0)
    }

    /// Round to 34 digits and the decimal128 exponent range, raising
    /// inexact, underflow and overflow as appropriate.
    fn finish(negative: bool, coeff: Wide, exp: i32, sticky: bool, flags: &mut Flags) -> Self {
        if coeff.is_zero() {
            if sticky {
                flags.raise(Flags::UNDERFLOW | Flags::INEXACT);
            }
            return Self::finite(negative, 0, (exp as i64).clamp(ETINY, EXP_MAX) as i32);
        }
        let digits = coeff.digits() as i64;
        let mut drop = (digits - PRECISION as i64).max(0);
        if exp as i64 + drop < ETINY {
            drop = ETINY - exp as i64;
        }
        // Anything past the Wide capacity is sticky either way.
        let drop = drop.min(200) as u32;
        let (mut c, inexact) = shed(&coeff, drop, sticky);
        let mut e = exp as i64 + drop as i64;
        if c.digits() > PRECISION {
            c = c.div_pow10(1).0;
            e += 1;
        }
        let c = c.to_u128().unwrap_or(0);
        if c == 0 {
            if inexact {
                flags.raise(Flags::UNDERFLOW | Flags::INEXACT);
            }
            return Self::finite(negative, 0, ETINY as i32);
        }
        let adjusted = e + digit_count(c) as i64 - 1;
        if adjusted > EMAX {
            flags.raise(Flags::OVERFLOW | Flags::INEXACT);
            return Self::infinity(negative);
        }
        let (c, e) = if e > EXP_MAX {
            (c * POW10[(e - EXP_MAX) as usize], EXP_MAX)
        } else {
            (c, e)
        };
        if inexact {
            flags.raise(Flags::INEXACT);
            if adjusted < EMIN {
                flags.raise(Flags::UNDERFLOW);
            }
        }
        Self::finite(negative, c, e as i32)
    }

    fn from_raw(raw: Raw, flags: &mut Flags) -> Self {
        Self::finish(raw.neg, raw.coeff, raw.exp, raw.sticky, flags)
    }

    fn from_rounded(r: Rounded, flags: &mut Flags) -> Self {
        Self::finish(r.num.neg, Wide::from_u128(r.num.coeff), r.num.exp, r.inexact, flags)
    }

    /// A working-precision approximation of a transcendental result.
    fn approx(num: Num, flags: &mut Flags) -> Self {
        Self::finish(num.neg, Wide::from_u128(num.coeff), num.exp, true, flags)
    }

    fn invalid(flags: &mut Flags) -> Self {
        flags.raise(Flags::INVALID);
        Self::NAN
    }

    fn div_by_zero(negative: bool, flags: &mut Flags) -> Self {
        flags.raise(Flags::DIV_ZERO);
        Self::infinity(negative)
    }

    fn overflow(negative: bool, flags: &mut Flags) -> Self {
        flags.raise(Flags::OVERFLOW | Flags::INEXACT);
        Self::infinity(negative)
    }

    fn underflow(negative: bool, flags: &mut Flags) -> Self {
        flags.raise(Flags::UNDERFLOW | Flags::INEXACT);
        Self::finite(negative, 0, ETINY as i32)
    }

    /// Numeric comparison of |self| against one. Finite values only.
    fn cmp_abs_one(&self) -> Ordering {
        self.num().cmp_abs(&Num::ONE)
    }

    fn is_integer(&self) -> bool {
        self.is_finite() && self.num().is_integer()
    }

    fn is_odd_integer(&self) -> bool {
        self.is_finite() && self.num().is_odd_integer()
    }

    /// Compare against an integer bound; finite values only.
    fn gt_int(&self, bound: i64) -> bool {
        self.num().cmp(&Num::from_i64(bound)) == Ordering::Greater
    }

    fn lt_int(&self, bound: i64) -> bool {
        self.num().cmp(&Num::from_i64(bound)) == Ordering::Less
    }
}

impl Default for Dec128 {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Decimal for Dec128 {
    fn zero() -> Self {
        Self::ZERO
    }

    fn one() -> Self {
        Self::ONE
    }

    fn from_i64(v: i64) -> Self {
        Self::finite(v < 0, v.unsigned_abs() as u128, 0)
    }

    fn parse(text: &str, flags: &mut Flags) -> Option<Self> {
        match parse_literal(text.as_bytes())? {
            Literal::Finite { neg, coeff, exp, sticky } => Some(Self::finish(neg, coeff, exp, sticky, flags)),
            Literal::Infinite { neg } => Some(Self::infinity(neg)),
            Literal::NaN => Some(Self::NAN),
        }
    }

    fn parts(&self) -> Parts {
        match self.class {
            Class::NaN => Parts::NaN,
            Class::Infinite => Parts::Infinite { negative: self.negative },
            Class::Finite => {
                let mut reversed = [0u8; 40];
                let mut n = 0;
                let mut c = self.coefficient;
                loop {
                    reversed[n] = b'0' + (c % 10) as u8;
                    n += 1;
                    c /= 10;
                    if c == 0 {
                        break;
                    }
                }
                let mut digits = DigitBuf::new();
                for &d in reversed[..n].iter().rev() {
                    if digits.push(d).is_err() {
                        break;
                    }
                }
                Parts::Finite { negative: self.negative, digits, exponent: self.exponent }
            }
        }
    }

    #[inline]
    fn is_zero(&self) -> bool {
        self.is_finite() && self.coefficient == 0
    }

    #[inline]
    fn is_nan(&self) -> bool {
        self.class == Class::NaN
    }

    #[inline]
    fn is_infinite(&self) -> bool {
        self.class == Class::Infinite
    }

    #[inline]
    fn is_negative(&self) -> bool {
        self.negative
    }

    fn negate(self) -> Self {
        Self { negative: !self.negative, ..self }
    }

    // ==================== Arithmetic ====================

    fn add(self, rhs: Self, flags: &mut Flags) -> Self {
        match (self.class, rhs.class) {
            (Class::NaN, _) | (_, Class::NaN) => Self::NAN,
            (Class::Infinite, Class::Infinite) => {
                if self.negative == rhs.negative {
                    self
                } else {
                    Self::invalid(flags)
                }
            }
            (Class::Infinite, _) => self,
            (_, Class::Infinite) => rhs,
            _ => Self::from_raw(self.num().add_raw(&rhs.num(), PRECISION), flags),
        }
    }

    fn sub(self, rhs: Self, flags: &mut Flags) -> Self {
        self.add(rhs.negate(), flags)
    }

    fn mul(self, rhs: Self, flags: &mut Flags) -> Self {
        let negative = self.negative != rhs.negative;
        match (self.class, rhs.class) {
            (Class::NaN, _) | (_, Class::NaN) => Self::NAN,
            (Class::Infinite, _) | (_, Class::Infinite) => {
                if self.is_zero() || rhs.is_zero() {
                    Self::invalid(flags)
                } else {
                    Self::infinity(negative)
                }
            }
            _ => Self::from_raw(self.num().mul_raw(&rhs.num()), flags),
        }
    }

    fn div(self, rhs: Self, flags: &mut Flags) -> Self {
        let negative = self.negative != rhs.negative;
        match (self.class, rhs.class) {
            (Class::NaN, _) | (_, Class::NaN) => Self::NAN,
            (Class::Infinite, Class::Infinite) => Self::invalid(flags),
            (Class::Infinite, _) => Self::infinity(negative),
            (_, Class::Infinite) => Self::finite(negative, 0, ETINY as i32),
            _ if rhs.is_zero() => {
                if self.is_zero() {
                    Self::invalid(flags)
                } else {
                    Self::div_by_zero(negative, flags)
                }
            }
            _ => Self::from_raw(self.num().div_raw(&rhs.num(), PRECISION), flags),
        }
    }

    fn pow(self, exponent: Self, flags: &mut Flags) -> Self {
        let (x, y) = (self, exponent);
        if y.is_zero() {
            return Self::ONE;
        }
        if x.is_finite() && !x.negative && x.cmp_abs_one() == Ordering::Equal {
            return Self::ONE;
        }
        if x.is_nan() || y.is_nan() {
            return Self::NAN;
        }
        if y.is_infinite() {
            if x.is_finite() && x.negative && x.cmp_abs_one() == Ordering::Equal {
                return Self::ONE;
            }
            let below_one = x.is_finite() && x.cmp_abs_one() == Ordering::Less;
            return if below_one == y.negative { Self::INFINITY } else { Self::ZERO };
        }
        let y_odd = y.is_odd_integer();
        if x.is_zero() {
            let negative = x.negative && y_odd;
            return if y.negative {
                Self::div_by_zero(negative, flags)
            } else {
                Self::signed_zero(negative)
            };
        }
        if x.is_infinite() {
            let negative = x.negative && y_odd;
            return if y.negative { Self::signed_zero(negative) } else { Self::infinity(negative) };
        }
        if x.negative && !y.is_integer() {
            return Self::invalid(flags);
        }
        let negative = x.negative && y_odd;
        let base = x.num().abs();
        if y.is_integer() && !y.gt_int(POW_INT_MAX) && !y.lt_int(-POW_INT_MAX) {
            let n = y.num().to_i64().unwrap_or(0);
            let (value, inexact) = transcend::pow_int(&base, n, WORK);
            return Self::finish(negative, Wide::from_u128(value.coeff), value.exp, inexact, flags);
        }
        let t = y.num().mul(&transcend::ln(&base));
        if t.cmp(&Num::from_i64(EXP_OVERFLOW)) == Ordering::Greater {
            return Self::overflow(negative, flags);
        }
        if t.cmp(&Num::from_i64(EXP_UNDERFLOW)) == Ordering::Less {
            return Self::underflow(negative, flags);
        }
        // x = m * 10^a with m in [1/sqrt 10, sqrt 10) and y*a = n + g, so
        // x^y = 10^n * e^(y ln m + g ln 10) with a small exponent.
        let a = match base.scale(-base.adjusted()).cmp(&SQRT_10) {
            Ordering::Less => base.adjusted(),
            _ => base.adjusted() + 1,
        };
        let m = base.scale(-a);
        let q = y.num().mul_p(&Num::from_i64(a as i64), WORK);
        let n = q.num.to_i64().unwrap_or(0);
        let g = q.num.sub(&Num::from_i64(n));
        if !q.inexact && g.is_zero() && m.cmp(&Num::ONE) == Ordering::Equal {
            return Self::finish(negative, Wide::from_u128(1), n as i32, false, flags);
        }
        let u = y.num().mul(&transcend::ln(&m)).add(&g.mul(&LN10));
        let r = transcend::exp(&u).scale(n as i32);
        Self::approx(Num { neg: negative, ..r }, flags)
    }

    // ==================== Roots, logarithms, exponentials ====================

    fn sqrt(self, flags: &mut Flags) -> Self {
        match self.class {
            Class::NaN => Self::NAN,
            _ if self.is_zero() => self,
            _ if self.negative => Self::invalid(flags),
            Class::Infinite => self,
            Class::Finite => Self::from_rounded(self.num().sqrt_p(PRECISION), flags),
        }
    }

    fn cbrt(self, flags: &mut Flags) -> Self {
        match self.class {
            Class::NaN => Self::NAN,
            Class::Infinite => self,
            Class::Finite if self.coefficient == 0 => self,
            Class::Finite => Self::from_rounded(self.num().cbrt_p(PRECISION), flags),
        }
    }

    fn ln(self, flags: &mut Flags) -> Self {
        match self.class {
            Class::NaN => Self::NAN,
            _ if self.is_zero() => Self::div_by_zero(true, flags),
            _ if self.negative => Self::invalid(flags),
            Class::Infinite => self,
            Class::Finite => {
                if self.num().cmp(&Num::ONE) == Ordering::Equal {
                    return Self::ZERO;
                }
                Self::approx(transcend::ln(&self.num()), flags)
            }
        }
    }

    fn log10(self, flags: &mut Flags) -> Self {
        match self.class {
            Class::NaN => Self::NAN,
            _ if self.is_zero() => Self::div_by_zero(true, flags),
            _ if self.negative => Self::invalid(flags),
            Class::Infinite => self,
            Class::Finite => {
                let reduced = self.num().reduce_toward(i32::MAX);
                if reduced.coeff == 1 {
                    return Self::from_i64(reduced.exp as i64);
                }
                Self::approx(transcend::ln(&self.num()).div(&LN10), flags)
            }
        }
    }

    fn exp(self, flags: &mut Flags) -> Self {
        match self.class {
            Class::NaN => Self::NAN,
            Class::Infinite => if self.negative { Self::ZERO } else { self },
            _ if self.is_zero() => Self::ONE,
            _ if self.gt_int(EXP_OVERFLOW) => Self::overflow(false, flags),
            _ if self.lt_int(EXP_UNDERFLOW) => Self::underflow(false, flags),
            _ => Self::approx(transcend::exp(&self.num()), flags),
        }
    }

    fn exp10(self, flags: &mut Flags) -> Self {
        // Beyond this 10^x is outside the range in either direction.
        const LIMIT: i64 = 7000;
        match self.class {
            Class::NaN => Self::NAN,
            Class::Infinite => if self.negative { Self::ZERO } else { self },
            _ if self.gt_int(LIMIT) => Self::overflow(false, flags),
            _ if self.lt_int(-LIMIT) => Self::underflow(false, flags),
            _ if self.is_integer() => {
                let k = self.num().to_i64().unwrap_or(0);
                Self::finish(false, Wide::from_u128(1), k as i32, false, flags)
            }
            _ => Self::approx(transcend::exp(&self.num().mul(&LN10)), flags),
        }
    }

    // ==================== Circular functions ====================

    fn sin(self, flags: &mut Flags) -> Self {
        match self.class {
            Class::NaN => Self::NAN,
            Class::Infinite => Self::invalid(flags),
            _ if self.is_zero() => self,
            _ => Self::approx(transcend::sin_cos(&self.num()).0, flags),
        }
    }

    fn cos(self, flags: &mut Flags) -> Self {
        match self.class {
            Class::NaN => Self::NAN,
            Class::Infinite => Self::invalid(flags),
            _ if self.is_zero() => Self::ONE,
            _ => Self::approx(transcend::sin_cos(&self.num()).1, flags),
        }
    }

    fn tan(self, flags: &mut Flags) -> Self {
        match self.class {
            Class::NaN => Self::NAN,
            Class::Infinite => Self::invalid(flags),
            _ if self.is_zero() => self,
            _ => {
                let (s, c) = transcend::sin_cos(&self.num());
                if c.is_zero() {
                    return Self::div_by_zero(s.neg, flags);
                }
                Self::approx(s.div(&c), flags)
            }
        }
    }

    fn asin(self, flags: &mut Flags) -> Self {
        match self.class {
            Class::NaN => Self::NAN,
            Class::Infinite => Self::invalid(flags),
            _ if self.is_zero() => self,
            _ => match self.cmp_abs_one() {
                Ordering::Greater => Self::invalid(flags),
                Ordering::Equal => {
                    let v = if self.negative { HALF_PI.neg() } else { HALF_PI };
                    Self::approx(v, flags)
                }
                Ordering::Less => Self::approx(transcend::asin(&self.num()), flags),
            },
        }
    }

    fn acos(self, flags: &mut Flags) -> Self {
        match self.class {
            Class::NaN => Self::NAN,
            Class::Infinite => Self::invalid(flags),
            _ => match self.cmp_abs_one() {
                Ordering::Greater => Self::invalid(flags),
                Ordering::Equal if !self.negative => Self::ZERO,
                Ordering::Equal => Self::approx(PI, flags),
                Ordering::Less => Self::approx(transcend::acos(&self.num()), flags),
            },
        }
    }

    fn atan(self, flags: &mut Flags) -> Self {
        match self.class {
            Class::NaN => Self::NAN,
            Class::Infinite => {
                let v = if self.negative { HALF_PI.neg() } else { HALF_PI };
                Self::approx(v, flags)
            }
            _ if self.is_zero() => self,
            _ => Self::approx(transcend::atan(&self.num()), flags),
        }
    }

    // ==================== Hyperbolic functions ====================

    fn sinh(self, flags: &mut Flags) -> Self {
        match self.class {
            Class::NaN => Self::NAN,
            Class::Infinite => self,
            _ if self.is_zero() => self,
            _ if self.gt_int(EXP_OVERFLOW) || self.lt_int(-EXP_OVERFLOW) => {
                Self::overflow(self.negative, flags)
            }
            _ => Self::approx(transcend::sinh(&self.num()), flags),
        }
    }

    fn cosh(self, flags: &mut Flags) -> Self {
        match self.class {
            Class::NaN => Self::NAN,
            Class::Infinite => Self::INFINITY,
            _ if self.is_zero() => Self::ONE,
            _ if self.gt_int(EXP_OVERFLOW) || self.lt_int(-EXP_OVERFLOW) => Self::overflow(false, flags),
            _ => Self::approx(transcend::cosh(&self.num()), flags),
        }
    }

    fn tanh(self, flags: &mut Flags) -> Self {
        match self.class {
            Class::NaN => Self::NAN,
            Class::Infinite => Self::finite(self.negative, 1, 0),
            _ if self.is_zero() => self,
            _ => Self::approx(transcend::tanh(&self.num()), flags),
        }
    }

    fn asinh(self, flags: &mut Flags) -> Self {
        match self.class {
            Class::NaN => Self::NAN,
            Class::Infinite => self,
            _ if self.is_zero() => self,
            _ => Self::approx(transcend::asinh(&self.num()), flags),
        }
    }

    fn acosh(self, flags: &mut Flags) -> Self {
        match self.class {
            Class::NaN => Self::NAN,
            _ if self.negative => Self::invalid(flags),
            Class::Infinite => self,
            _ => match self.cmp_abs_one() {
                Ordering::Less => Self::invalid(flags),
                Ordering::Equal => Self::ZERO,
                Ordering::Greater => Self::approx(transcend::acosh(&self.num()), flags),
            },
        }
    }

    fn atanh(self, flags: &mut Flags) -> Self {
        match self.class {
            Class::NaN => Self::NAN,
            Class::Infinite => Self::invalid(flags),
            _ if self.is_zero() => self,
            _ => match self.cmp_abs_one() {
                Ordering::Greater => Self::invalid(flags),
                Ordering::Equal => Self::div_by_zero(self.negative, flags),
                Ordering::Less => Self::approx(transcend::atanh(&self.num()), flags),
            },
        }
    }

    // ==================== Gamma ====================

    fn tgamma(self, flags: &mut Flags) -> Self {
        match self.class {
            Class::NaN => return Self::NAN,
            Class::Infinite => {
                return if self.negative { Self::invalid(flags) } else { self };
            }
            Class::Finite => {}
        }
        if self.is_zero() {
            return Self::div_by_zero(self.negative, flags);
        }
        let x = self.num();
        if self.is_integer() {
            if self.negative {
                return Self::invalid(flags);
            }
            if !self.gt_int(EXACT_FACTORIAL_MAX) {
                // (n - 1)! fits a Wide exactly.
                let n = x.to_i64().unwrap_or(1);
                let mut acc = Wide::from_u128(1);
                for i in 2..n {
                    acc = acc.mul_small(i as u64);
                }
                return Self::finish(false, acc, 0, false, flags);
            }
        }
        if self.gt_int(GAMMA_LIMIT) {
            return Self::overflow(false, flags);
        }
        if self.lt_int(-GAMMA_LIMIT) {
            // Sign of Gamma on (-m, -m+1) is (-1)^m, m = ceil(-x).
            let floor = transcend::round_integral(&x);
            let floor = if floor.cmp(&x) == Ordering::Greater { floor.sub(&Num::ONE) } else { floor };
            return Self::underflow(floor.is_odd_integer(), flags);
        }
        Self::approx(transcend::gamma(&x), flags)
    }

    fn round_integral_exact(self, flags: &mut Flags) -> Self {
        if !self.is_finite() || self.exponent >= 0 {
            return self;
        }
        let drop = (-self.exponent) as u32;
        let (q, inexact) = shed(&Wide::from_u128(self.coefficient), drop, false);
        if inexact {
            flags.raise(Flags::INEXACT);
        }
        Self::finite(self.negative, q.to_u128().unwrap_or(0), 0)
    }

    fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self.class, other.class) {
            (Class::NaN, _) | (_, Class::NaN) => None,
            (Class::Infinite, Class::Infinite) => Some(other.negative.cmp(&self.negative)),
            (Class::Infinite, _) => Some(if self.negative { Ordering::Less } else { Ordering::Greater }),
            (_, Class::Infinite) => Some(if other.negative { Ordering::Greater } else { Ordering::Less }),
            _ => Some(self.num().cmp(&other.num())),
        }
    }
}

impl fmt::Display for Dec128 {
    /// BID-style canonical text: `+31415E-4`, `-Inf`, `+NaN`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.negative { '-' } else { '+' };
        match self.class {
            Class::NaN => write!(f, "{}NaN", sign),
            Class::Infinite => write!(f, "{}Inf", sign),
            Class::Finite => {
                let exp_sign = if self.exponent < 0 { '-' } else { '+' };
                write!(f, "{}{}E{}{}", sign, self.coefficient, exp_sign, self.exponent.unsigned_abs())
            }
        }
    }
}

impl fmt::Debug for Dec128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dec128({})", self)
    }
}
