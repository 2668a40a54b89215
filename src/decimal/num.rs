//! Finite working-precision decimals.
//!
//! [`Num`] is the unbounded-exponent finite value every algorithm in this
//! module works on. Each arithmetic primitive rounds half-to-even to a
//! caller-chosen precision (at most [`WORK`] digits) and reports whether the
//! rounding discarded anything.

use crate::decimal::wide::{digit_count, Wide, POW10};
use std::cmp::Ordering;

/// Working precision of the transcendental functions.
pub(crate) const WORK: u32 = 37;

/// A finite decimal: `(-1)^neg * coeff * 10^exp`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Num {
    pub neg: bool,
    pub coeff: u128,
    pub exp: i32,
}

/// Result of a rounding step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Rounded {
    pub num: Num,
    pub inexact: bool,
}

/// An unrounded result: exact digits plus a sticky bit standing for any
/// non-zero remainder below them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Raw {
    pub neg: bool,
    pub coeff: Wide,
    pub exp: i32,
    pub sticky: bool,
}

impl Raw {
    pub fn zero(neg: bool, exp: i32) -> Self {
        Self { neg, coeff: Wide::ZERO, exp, sticky: false }
    }

    pub fn from_num(num: Num) -> Self {
        Self { neg: num.neg, coeff: Wide::from_u128(num.coeff), exp: num.exp, sticky: false }
    }

    #[inline]
    pub fn round(self, prec: u32) -> Rounded {
        round_wide(self.neg, self.coeff, self.exp, prec, self.sticky)
    }
}

/// Drop the lowest `drop` digits of `coeff`, rounding half-to-even.
///
/// The result may carry into one extra digit (999 -> 1000); callers that
/// need a digit bound check for it.
pub(crate) fn shed(coeff: &Wide, drop: u32, sticky_in: bool) -> (Wide, bool) {
    if drop == 0 {
        return (*coeff, sticky_in);
    }
    let (q, round, sticky) = coeff.div_pow10(drop);
    let sticky = sticky || sticky_in;
    let up = round > 5 || (round == 5 && (sticky || q.is_odd()));
    let q = if up { q.add_small(1) } else { q };
    (q, round != 0 || sticky)
}

/// Round an exact (or sticky-marked) value to at most `prec` digits.
pub(crate) fn round_wide(neg: bool, coeff: Wide, exp: i32, prec: u32, sticky_in: bool) -> Rounded {
    let digits = coeff.digits();
    let drop = digits.saturating_sub(prec);
    let (mut c, inexact) = shed(&coeff, drop, sticky_in);
    let mut exp = exp + drop as i32;
    if c.digits() > prec {
        // Carried to exactly 10^prec.
        c = c.div_pow10(1).0;
        exp += 1;
    }
    Rounded {
        num: Num { neg, coeff: c.to_u128().unwrap_or(0), exp },
        inexact,
    }
}

impl Num {
    pub const ZERO: Num = Num { neg: false, coeff: 0, exp: 0 };
    pub const ONE: Num = Num { neg: false, coeff: 1, exp: 0 };

    pub const fn new(neg: bool, coeff: u128, exp: i32) -> Self {
        Self { neg, coeff, exp }
    }

    pub fn from_i64(v: i64) -> Self {
        Self { neg: v < 0, coeff: v.unsigned_abs() as u128, exp: 0 }
    }

    /// Parse a trusted literal at working precision. Malformed text yields zero.
    pub fn lit(text: &str) -> Self {
        match parse_literal(text.as_bytes()) {
            Some(Literal::Finite { neg, coeff, exp, sticky }) => round_wide(neg, coeff, exp, WORK, sticky).num,
            _ => Num::ZERO,
        }
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.coeff == 0
    }

    #[inline]
    pub fn digits(&self) -> u32 {
        digit_count(self.coeff)
    }

    /// Exponent of the most significant digit.
    #[inline]
    pub fn adjusted(&self) -> i32 {
        self.exp + self.digits() as i32 - 1
    }

    #[inline]
    pub fn neg(self) -> Self {
        Self { neg: !self.neg, ..self }
    }

    #[inline]
    pub fn abs(self) -> Self {
        Self { neg: false, ..self }
    }

    /// Multiply by 10^k (exact).
    #[inline]
    pub fn scale(self, k: i32) -> Self {
        Self { exp: self.exp + k, ..self }
    }

    /// Remove trailing zeros while the exponent stays at or below `ideal`.
    pub fn reduce_toward(mut self, ideal: i32) -> Self {
        while self.coeff != 0 && self.exp < ideal && self.coeff % 10 == 0 {
            self.coeff /= 10;
            self.exp += 1;
        }
        self
    }

    /// Is the value an integer?
    pub fn is_integer(&self) -> bool {
        if self.exp >= 0 || self.coeff == 0 {
            return true;
        }
        let frac = (-self.exp) as u32;
        frac < 39 && self.coeff % POW10[frac as usize] == 0
    }

    /// Parity of an integral value with a non-negative exponent or small scale.
    pub fn is_odd_integer(&self) -> bool {
        if !self.is_integer() || self.coeff == 0 {
            return false;
        }
        if self.exp > 0 {
            return false;
        }
        let frac = (-self.exp) as u32;
        (self.coeff / POW10[frac as usize]) % 2 == 1
    }

    /// Round to the nearest integer (ties to even), if it fits an `i64`.
    pub fn to_i64(&self) -> Option<i64> {
        if self.coeff == 0 {
            return Some(0);
        }
        let magnitude = if self.exp >= 0 {
            if self.adjusted() > 18 {
                return None;
            }
            self.coeff.checked_mul(POW10[self.exp as usize])?
        } else {
            let drop = (-self.exp) as u32;
            let (q, _) = shed(&Wide::from_u128(self.coeff), drop, false);
            q.to_u128()?
        };
        let magnitude = i64::try_from(magnitude).ok()?;
        Some(if self.neg { -magnitude } else { magnitude })
    }

    /// Leading digits as an `f64` mantissa in [1, 10) plus the adjusted exponent.
    pub fn approx(&self) -> (f64, i32) {
        let digits = self.digits();
        let top = if digits > 17 { self.coeff / POW10[(digits - 17) as usize] } else { self.coeff };
        let top_digits = digit_count(top);
        let mantissa = top as f64 / POW10[(top_digits - 1) as usize] as f64;
        (mantissa, self.adjusted())
    }

    /// Build a positive value from an `f64` in [1, 1000) scaled by 10^exp10.
    pub fn from_f64_scaled(v: f64, exp10: i32) -> Self {
        let coeff = (v * 1e15).round().max(1.0) as u128;
        Self { neg: false, coeff, exp: exp10 - 15 }
    }

    pub fn cmp_abs(&self, other: &Num) -> Ordering {
        if self.coeff == 0 || other.coeff == 0 {
            return self.coeff.cmp(&other.coeff);
        }
        let (a, b) = (self.adjusted(), other.adjusted());
        if a != b {
            return a.cmp(&b);
        }
        // Same magnitude: align the shorter coefficient.
        let (da, db) = (self.digits(), other.digits());
        if da >= db {
            self.coeff.cmp(&(other.coeff * POW10[(da - db) as usize]))
        } else {
            (self.coeff * POW10[(db - da) as usize]).cmp(&other.coeff)
        }
    }

    pub fn cmp(&self, other: &Num) -> Ordering {
        let a_neg = self.neg && self.coeff != 0;
        let b_neg = other.neg && other.coeff != 0;
        match (a_neg, b_neg) {
            (false, true) => Ordering::Greater,
            (true, false) => Ordering::Less,
            (false, false) => self.cmp_abs(other),
            (true, true) => other.cmp_abs(self),
        }
    }

    // ==================== Arithmetic ====================

    /// Unrounded sum. `prec` bounds how far a negligible operand is kept.
    pub fn add_raw(&self, other: &Num, prec: u32) -> Raw {
        if self.coeff == 0 && other.coeff == 0 {
            let neg = self.neg && other.neg;
            return Raw::zero(neg, self.exp.min(other.exp));
        }
        if other.coeff == 0 {
            return Raw::from_num(rescale_down(*self, other.exp, prec));
        }
        if self.coeff == 0 {
            return Raw::from_num(rescale_down(*other, self.exp, prec));
        }
        let (big, small) = if self.exp >= other.exp { (self, other) } else { (other, self) };
        let mut small = *small;
        let mut sticky = false;
        // A lower operand entirely below the rounding position only matters
        // through its sign; replace it by a single sticky unit.
        let floor = big.exp.min(big.adjusted() - prec as i32);
        if small.adjusted() <= floor - 3 {
            small = Num { neg: small.neg, coeff: 1, exp: floor - 3 };
            sticky = true;
        }
        let shift = (big.exp - small.exp) as u32;
        let a = Wide::from_u128(big.coeff).mul_pow10(shift);
        let b = Wide::from_u128(small.coeff);
        let exp = small.exp;
        if big.neg == small.neg {
            return Raw { neg: big.neg, coeff: a.add(&b), exp, sticky };
        }
        match a.cmp(&b) {
            Ordering::Equal => Raw::zero(false, exp),
            Ordering::Greater => Raw { neg: big.neg, coeff: a.sub(&b), exp, sticky },
            Ordering::Less => Raw { neg: small.neg, coeff: b.sub(&a), exp, sticky },
        }
    }

    pub fn add_p(&self, other: &Num, prec: u32) -> Rounded {
        self.add_raw(other, prec).round(prec)
    }

    /// Exact product.
    pub fn mul_raw(&self, other: &Num) -> Raw {
        Raw {
            neg: self.neg != other.neg,
            coeff: Wide::mul_u128(self.coeff, other.coeff),
            exp: self.exp + other.exp,
            sticky: false,
        }
    }

    pub fn mul_p(&self, other: &Num, prec: u32) -> Rounded {
        self.mul_raw(other).round(prec)
    }

    /// Quotient developed to `prec + 1` digits; `other` must be non-zero.
    ///
    /// A terminating quotient stops early and keeps the ideal exponent
    /// `self.exp - other.exp` or the smallest exponent that holds it exactly.
    pub fn div_raw(&self, other: &Num, prec: u32) -> Raw {
        let neg = self.neg != other.neg;
        let ideal = self.exp - other.exp;
        if self.coeff == 0 {
            return Raw::zero(neg, ideal);
        }
        let d = other.coeff;
        let mut q = self.coeff / d;
        let mut r = self.coeff % d;
        let mut exp = ideal;
        while r != 0 && digit_count(q) <= prec {
            r *= 10;
            q = q * 10 + r / d;
            r %= d;
            exp -= 1;
        }
        Raw { neg, coeff: Wide::from_u128(q), exp, sticky: r != 0 }
    }

    pub fn div_p(&self, other: &Num, prec: u32) -> Rounded {
        self.div_raw(other, prec).round(prec)
    }

    /// Square root of a non-negative value.
    pub fn sqrt_p(&self, prec: u32) -> Rounded {
        if self.coeff == 0 {
            return exact(Num { neg: self.neg, coeff: 0, exp: self.exp.div_euclid(2) });
        }
        let (m, adj) = self.approx();
        let half = adj.div_euclid(2);
        let m = if adj.rem_euclid(2) == 1 { m * 10.0 } else { m };
        let mut y = Num::from_f64_scaled(m.sqrt(), half);
        for _ in 0..4 {
            let q = self.div_p(&y, WORK).num;
            y = y.add_p(&q, WORK).num.mul_p(&HALF, WORK).num;
        }
        let candidate = round_wide(false, Wide::from_u128(y.coeff), y.exp, prec, false).num;
        if let Some(exact_root) = exact_power_root(self, &candidate, 2) {
            return exact(exact_root.reduce_toward(self.exp.div_euclid(2)));
        }
        // Not exact: round from the working value, never reporting exactness.
        let r = round_wide(false, Wide::from_u128(y.coeff), y.exp, prec, true);
        Rounded { num: r.num, inexact: true }
    }

    /// Cube root of any finite value.
    pub fn cbrt_p(&self, prec: u32) -> Rounded {
        if self.coeff == 0 {
            return exact(*self);
        }
        let x = self.abs();
        let (m, adj) = x.approx();
        let third = adj.div_euclid(3);
        let m = m * 10f64.powi(adj.rem_euclid(3));
        let mut y = Num::from_f64_scaled(m.cbrt(), third);
        for _ in 0..4 {
            // y <- (2y + x/y^2) / 3
            let y2 = y.mul_p(&y, WORK).num;
            let q = x.div_p(&y2, WORK).num;
            let twice = y.add_p(&y, WORK).num;
            y = twice.add_p(&q, WORK).num.div_p(&Num::from_i64(3), WORK).num;
        }
        let candidate = round_wide(false, Wide::from_u128(y.coeff), y.exp, prec, false).num;
        if let Some(root) = exact_power_root(&x, &candidate, 3) {
            let root = root.reduce_toward(self.exp.div_euclid(3));
            return exact(Num { neg: self.neg, ..root });
        }
        let r = round_wide(self.neg, Wide::from_u128(y.coeff), y.exp, prec, true);
        Rounded { num: r.num, inexact: true }
    }

    // Working-precision shorthands.

    #[inline]
    pub fn add(&self, other: &Num) -> Num {
        self.add_p(other, WORK).num
    }

    #[inline]
    pub fn sub(&self, other: &Num) -> Num {
        self.add_p(&other.neg(), WORK).num
    }

    #[inline]
    pub fn mul(&self, other: &Num) -> Num {
        self.mul_p(other, WORK).num
    }

    /// Working-precision quotient; a zero divisor yields zero.
    #[inline]
    pub fn div(&self, other: &Num) -> Num {
        if other.is_zero() {
            return Num::ZERO;
        }
        self.div_p(other, WORK).num
    }

    #[inline]
    pub fn sqrt(&self) -> Num {
        self.sqrt_p(WORK).num
    }
}

pub(crate) const HALF: Num = Num::new(false, 5, -1);

#[inline]
fn exact(num: Num) -> Rounded {
    Rounded { num, inexact: false }
}

/// Lower the exponent of `v` toward `target` by appending zeros, staying
/// within `prec` digits.
fn rescale_down(v: Num, target: i32, prec: u32) -> Num {
    if target >= v.exp {
        return v;
    }
    let room = prec.saturating_sub(v.digits()) as i32;
    let shift = (v.exp - target).min(room);
    if shift <= 0 {
        return v;
    }
    Num { coeff: v.coeff * POW10[shift as usize], exp: v.exp - shift, ..v }
}

/// If `root^n == x` exactly, return `root`.
fn exact_power_root(x: &Num, root: &Num, n: u32) -> Option<Num> {
    let mut power = Wide::from_u128(root.coeff);
    for _ in 1..n {
        power = power.mul(&Wide::from_u128(root.coeff));
    }
    let power_exp = root.exp * n as i32;
    let x_coeff = Wide::from_u128(x.coeff);
    let matches = if power_exp >= x.exp {
        let shift = (power_exp - x.exp) as u32;
        power.digits() + shift == x.digits() && power.mul_pow10(shift) == x_coeff
    } else {
        let shift = (x.exp - power_exp) as u32;
        x.digits() + shift == power.digits() && x_coeff.mul_pow10(shift) == power
    };
    matches.then_some(*root)
}

// ==================== Literal parsing ====================

/// A parsed numeric literal before rounding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Literal {
    Finite { neg: bool, coeff: Wide, exp: i32, sticky: bool },
    Infinite { neg: bool },
    NaN,
}

/// Significant digits kept from a literal before the rest become sticky.
const LITERAL_DIGITS: u32 = 40;

/// Parse `[+-]digits[.digits][(E|e)[+-]digits]`, `Inf`, `Infinity` or `NaN`.
pub(crate) fn parse_literal(text: &[u8]) -> Option<Literal> {
    let (neg, body) = match text.first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    if body.eq_ignore_ascii_case(b"inf") || body.eq_ignore_ascii_case(b"infinity") {
        return Some(Literal::Infinite { neg });
    }
    if body.eq_ignore_ascii_case(b"nan") {
        return Some(Literal::NaN);
    }

    let mut coeff = Wide::ZERO;
    let mut significant = 0u32;
    let mut exp: i64 = 0;
    let mut sticky = false;
    let mut seen_digit = false;
    let mut seen_dot = false;
    let mut i = 0;
    while i < body.len() {
        match body[i] {
            c @ b'0'..=b'9' => {
                seen_digit = true;
                let d = c - b'0';
                if significant < LITERAL_DIGITS {
                    if significant > 0 || d != 0 {
                        coeff = coeff.mul_small(10).add_small(d as u64);
                        significant += 1;
                    }
                    if seen_dot {
                        exp -= 1;
                    }
                } else {
                    sticky |= d != 0;
                    if !seen_dot {
                        exp += 1;
                    }
                }
            }
            b'.' if !seen_dot => seen_dot = true,
            b'e' | b'E' => break,
            _ => return None,
        }
        i += 1;
    }
    if !seen_digit {
        return None;
    }
    if i < body.len() {
        let marker = &body[i + 1..];
        let (exp_neg, digits) = match marker.first() {
            Some(b'-') => (true, &marker[1..]),
            Some(b'+') => (false, &marker[1..]),
            _ => (false, marker),
        };
        if digits.is_empty() {
            return None;
        }
        let mut e: i64 = 0;
        for &c in digits {
            if !c.is_ascii_digit() {
                return None;
            }
            e = (e * 10 + (c - b'0') as i64).min(1_000_000_000);
        }
        exp += if exp_neg { -e } else { e };
    }
    let exp = exp.clamp(-2_000_000_000, 2_000_000_000) as i32;
    Some(Literal::Finite { neg, coeff, exp, sticky })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(text: &str) -> Num {
        Num::lit(text)
    }

    #[test]
    fn test_literal_shapes() {
        assert_eq!(n("12.50"), Num::new(false, 1250, -2));
        assert_eq!(n("-0.001"), Num::new(true, 1, -3));
        assert_eq!(n("7E-3"), Num::new(false, 7, -3));
        assert_eq!(parse_literal(b"1E"), None);
        assert_eq!(parse_literal(b"."), None);
        assert_eq!(parse_literal(b"-INF"), Some(Literal::Infinite { neg: true }));
    }

    #[test]
    fn test_round_half_even() {
        let r = round_wide(false, Wide::from_u128(125), 0, 2, false);
        assert_eq!(r.num, Num::new(false, 12, 1));
        assert!(r.inexact);
        let r = round_wide(false, Wide::from_u128(135), 0, 2, false);
        assert_eq!(r.num, Num::new(false, 14, 1));
        let r = round_wide(false, Wide::from_u128(125), 0, 2, true);
        assert_eq!(r.num, Num::new(false, 13, 1));
        let r = round_wide(false, Wide::from_u128(999), 0, 2, false);
        assert_eq!(r.num, Num::new(false, 10, 2));
    }

    #[test]
    fn test_add_alignment() {
        assert_eq!(n("1.5").add(&n("2.25")), Num::new(false, 375, -2));
        assert_eq!(n("1").sub(&n("1")), Num::new(false, 0, 0));
        let tiny = n("1E-80");
        let r = Num::ONE.add_p(&tiny, 34);
        assert_eq!(r.num, Num::new(false, POW10[33], -33));
        assert!(r.inexact);
        let r = Num::ONE.add_p(&tiny.neg(), 34);
        assert_eq!(r.num, Num::new(false, POW10[33], -33));
        assert!(r.inexact);
        let r = Num::ONE.add_p(&n("-1E-34"), 34);
        assert_eq!(r.num, Num::new(false, POW10[34] - 1, -34));
        assert!(!r.inexact);
    }

    #[test]
    fn test_div_exact_and_inexact() {
        let r = n("1").div_p(&n("4"), 34);
        assert_eq!(r.num, Num::new(false, 25, -2));
        assert!(!r.inexact);
        let r = n("6").div_p(&n("3"), 34);
        assert_eq!(r.num, Num::new(false, 2, 0));
        let r = n("2").div_p(&n("3"), 34);
        assert!(r.inexact);
        assert_eq!(r.num.coeff, 6666666666666666666666666666666667);
        assert_eq!(r.num.exp, -34);
    }

    #[test]
    fn test_sqrt_and_cbrt() {
        let r = n("2.25").sqrt_p(34);
        assert!(!r.inexact);
        assert_eq!(r.num, Num::new(false, 15, -1));
        let r = n("2").sqrt_p(34);
        assert!(r.inexact);
        assert_eq!(r.num.coeff, 1414213562373095048801688724209698);
        let r = n("-27").cbrt_p(34);
        assert!(!r.inexact);
        assert_eq!(r.num, Num::new(true, 3, 0));
    }

    #[test]
    fn test_integer_helpers() {
        assert!(n("4.000").is_integer());
        assert!(!n("4.5").is_integer());
        assert!(n("3.0").is_odd_integer());
        assert!(!n("40").is_odd_integer());
        assert_eq!(n("2.5").to_i64(), Some(2));
        assert_eq!(n("-3.5").to_i64(), Some(-4));
        assert_eq!(n("1E30").to_i64(), None);
    }
}
