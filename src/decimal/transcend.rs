//! Elementary and special functions at working precision.
//!
//! Every function here takes and returns finite [`Num`] values and assumes
//! the caller already dealt with special operands and domain errors. Results
//! carry [`WORK`] digits, a few more than a decimal128 can hold, so the final
//! rounding to 34 digits absorbs the series error.

use crate::decimal::num::{round_wide, shed, Num, HALF, WORK};
use crate::decimal::two_over_pi;
use crate::decimal::wide::Wide;
use std::cmp::Ordering;

// ==================== Constants ====================

pub(crate) const PI: Num = Num::new(false, 3141592653589793238462643383279502884, -36);
pub(crate) const HALF_PI: Num = Num::new(false, 1570796326794896619231321691639751442, -36);
pub(crate) const LN2: Num = Num::new(false, 6931471805599453094172321214581765681, -37);
pub(crate) const LN10: Num = Num::new(false, 2302585092994045684017991454684364208, -36);
const LN10_HI: Num = Num::new(false, 2302585092994045684, -18);
const LN10_LO: Num = Num::new(false, 1799145468436420760110148862877297603, -56);
const LN_SQRT_2PI: Num = Num::new(false, 9189385332046727417803297364056176399, -37);

// pi/2 split so that k * PIO2_1 and k * PIO2_2 are exact for k < 10^18.
const PIO2_1: Num = Num::new(false, 1570796326794896619, -18);
const PIO2_2: Num = Num::new(false, 231321691639751442, -36);
const PIO2_3: Num = Num::new(false, 9858469968755291048747229615390820314, -74);

/// B(2k) / (2k (2k - 1)) for the Stirling series, k = 1..=15.
const STIRLING: [(i128, i128); 15] = [
    (1, 12),
    (-1, 360),
    (1, 1260),
    (-1, 1680),
    (1, 1188),
    (-691, 360360),
    (1, 156),
    (-3617, 122400),
    (43867, 244188),
    (-174611, 125400),
    (77683, 5796),
    (-236364091, 1506960),
    (657931, 300),
    (-3392780147, 93960),
    (1723168255201, 2492028),
];

/// Stirling is applied once the argument reaches this value.
const STIRLING_MIN: i64 = 40;

#[inline]
fn int(v: i64) -> Num {
    Num::from_i64(v)
}

/// True once `term` can no longer change `sum` at working precision.
fn negligible(term: &Num, sum: &Num) -> bool {
    term.is_zero() || (!sum.is_zero() && term.adjusted() < sum.adjusted() - WORK as i32 - 2)
}

/// Round to the nearest integer, ties to even.
pub(crate) fn round_integral(x: &Num) -> Num {
    if x.exp >= 0 {
        return *x;
    }
    let drop = (-x.exp) as u32;
    let (q, _) = shed(&Wide::from_u128(x.coeff), drop, false);
    Num::new(x.neg, q.to_u128().unwrap_or(0), 0)
}

/// Integer `k` modulo 4, for quadrant selection.
fn mod4(k: &Num) -> u32 {
    if k.exp >= 2 || k.is_zero() {
        return 0;
    }
    let scaled = if k.exp == 1 { k.coeff * 10 } else { k.coeff };
    let v = (scaled % 4) as u32;
    if k.neg { (4 - v) % 4 } else { v }
}

// ==================== Exponential and logarithm ====================

/// e^x for |x| below a few ten thousands.
pub(crate) fn exp(x: &Num) -> Num {
    if x.is_zero() {
        return Num::ONE;
    }
    let k = round_integral(&x.div(&LN10));
    let r = x.sub(&k.mul(&LN10_HI)).sub(&k.mul(&LN10_LO));
    let mut sum = Num::ONE;
    let mut term = Num::ONE;
    for n in 1..200 {
        term = term.mul(&r).div(&int(n));
        if negligible(&term, &sum) {
            break;
        }
        sum = sum.add(&term);
    }
    let shift = k.to_i64().unwrap_or(0) as i32;
    sum.scale(shift)
}

/// 2 * atanh(z) by its odd power series; |z| stays well below 1.
fn two_atanh_series(z: &Num) -> Num {
    atanh_series(z).mul(&int(2))
}

fn atanh_series(z: &Num) -> Num {
    let z2 = z.mul(z);
    let mut power = *z;
    let mut sum = *z;
    let mut n = 1;
    loop {
        power = power.mul(&z2);
        n += 2;
        let term = power.div(&int(n));
        if negligible(&term, &sum) || n > 400 {
            break;
        }
        sum = sum.add(&term);
    }
    sum
}

/// Natural logarithm of a positive value.
pub(crate) fn ln(x: &Num) -> Num {
    if x.cmp(&Num::ONE) == Ordering::Equal {
        return Num::ZERO;
    }
    let near_one = x.cmp(&HALF) == Ordering::Greater && x.cmp(&Num::new(false, 15, -1)) == Ordering::Less;
    if near_one {
        let z = x.sub(&Num::ONE).div(&x.add(&Num::ONE));
        return two_atanh_series(&z);
    }
    let a = x.adjusted();
    let mut m = x.scale(-a);
    let j = if m.cmp(&Num::new(false, 15, -1)) == Ordering::Less {
        0
    } else if m.cmp(&int(3)) == Ordering::Less {
        1
    } else if m.cmp(&int(6)) == Ordering::Less {
        2
    } else {
        3
    };
    for _ in 0..j {
        m = m.mul(&HALF);
    }
    let z = m.sub(&Num::ONE).div(&m.add(&Num::ONE));
    two_atanh_series(&z)
        .add(&int(j).mul(&LN2))
        .add(&int(a as i64).mul(&LN10))
}

// ==================== Circular functions ====================

fn sin_series(r: &Num) -> Num {
    let r2 = r.mul(r).neg();
    let mut term = *r;
    let mut sum = *r;
    let mut n = 1;
    loop {
        term = term.mul(&r2).div(&int((n + 1) * (n + 2)));
        n += 2;
        if negligible(&term, &sum) || n > 400 {
            break;
        }
        sum = sum.add(&term);
    }
    sum
}

fn cos_series(r: &Num) -> Num {
    let r2 = r.mul(r).neg();
    let mut term = Num::ONE;
    let mut sum = Num::ONE;
    let mut n = 0;
    loop {
        term = term.mul(&r2).div(&int((n + 1) * (n + 2)));
        n += 2;
        if negligible(&term, &sum) || n > 400 {
            break;
        }
        sum = sum.add(&term);
    }
    sum
}

/// Reduce `x` by the nearest multiple of pi/2. Returns the remainder and
/// the quadrant.
///
/// The split constant keeps the reduction exact while the multiple stays
/// well below 10^18. Larger arguments go through [`reduce_large`].
fn reduce_half_pi(x: &Num) -> (Num, u32) {
    if x.cmp_abs(&HALF_PI.mul(&HALF)) != Ordering::Greater {
        return (*x, 0);
    }
    if x.adjusted() >= LARGE_ARGUMENT {
        return reduce_large(x);
    }
    let k = round_integral(&x.div(&HALF_PI));
    let r = x.sub(&k.mul(&PIO2_1)).sub(&k.mul(&PIO2_2)).sub(&k.mul(&PIO2_3));
    (r, mod4(&k))
}

/// Adjusted exponent from which arguments are reduced against 2/pi.
const LARGE_ARGUMENT: i32 = 15;

/// Digits of 2/pi multiplied into the coefficient. A 37-digit coefficient
/// times this many digits still fits a [`Wide`].
const WINDOW: usize = 76;

/// Reduce against the digit expansion of 2/pi.
///
/// With `x = c * 10^e`, digit `i` of 2/pi contributes `c * d_i * 10^(e - i)`
/// to `x * 2/pi`, a multiple of 4 whenever `e - i >= 2`. Those digits are
/// skipped; the next [`WINDOW`] digits give the quadrant and the fraction
/// with about 74 correct places.
fn reduce_large(x: &Num) -> (Num, u32) {
    let start = (x.exp - 1).max(1) as usize;
    let mut window = Wide::ZERO;
    for i in start..start + WINDOW {
        window = window.mul_small(10).add_small(two_over_pi::digit(i) as u64);
    }
    let product = Wide::from_u128(x.coeff).mul(&window);
    let places = ((start + WINDOW - 1) as i32 - x.exp) as u32;
    let (whole, _, _) = product.div_pow10(places);
    let mut quadrant = (whole.digit(1) as u32 * 10 + whole.digit(0) as u32) % 4;
    let rest = product.sub(&whole.mul_pow10(places));
    let mut frac = round_wide(false, rest, -(places as i32), WORK, false).num;
    if frac.cmp_abs(&HALF) == Ordering::Greater {
        frac = frac.sub(&Num::ONE);
        quadrant = (quadrant + 1) % 4;
    }
    let r = frac.mul(&HALF_PI);
    if x.neg {
        (r.neg(), (4 - quadrant) % 4)
    } else {
        (r, quadrant)
    }
}

/// (sin x, cos x) in radians.
pub(crate) fn sin_cos(x: &Num) -> (Num, Num) {
    let (r, quadrant) = reduce_half_pi(x);
    let s = sin_series(&r);
    let c = cos_series(&r);
    match quadrant {
        0 => (s, c),
        1 => (c, s.neg()),
        2 => (s.neg(), c.neg()),
        _ => (c.neg(), s),
    }
}

fn atan_series(y: &Num) -> Num {
    let y2 = y.mul(y).neg();
    let mut power = *y;
    let mut sum = *y;
    let mut n = 1;
    loop {
        power = power.mul(&y2);
        n += 2;
        let term = power.div(&int(n));
        if negligible(&term, &sum) || n > 400 {
            break;
        }
        sum = sum.add(&term);
    }
    sum
}

/// Arctangent in radians.
pub(crate) fn atan(x: &Num) -> Num {
    if x.is_zero() {
        return *x;
    }
    let ax = x.abs();
    let inverted = ax.cmp(&Num::ONE) == Ordering::Greater;
    let mut y = if inverted { Num::ONE.div(&ax) } else { ax };
    // Two argument halvings bring |y| below tan(pi/16).
    for _ in 0..2 {
        let hyp = Num::ONE.add(&y.mul(&y)).sqrt();
        y = y.div(&Num::ONE.add(&hyp));
    }
    let t = atan_series(&y).mul(&int(4));
    let t = if inverted { HALF_PI.sub(&t) } else { t };
    if x.neg { t.neg() } else { t }
}

/// Arcsine for |x| < 1.
pub(crate) fn asin(x: &Num) -> Num {
    let one_minus = Num::ONE.sub(x);
    let one_plus = Num::ONE.add(x);
    let denom = one_minus.mul(&one_plus).sqrt();
    atan(&x.div(&denom))
}

/// Arccosine for -1 < x <= 1.
pub(crate) fn acos(x: &Num) -> Num {
    let one_minus = Num::ONE.sub(x);
    let one_plus = Num::ONE.add(x);
    atan(&one_minus.div(&one_plus).sqrt()).mul(&int(2))
}

// ==================== Hyperbolic functions ====================

fn sinh_series(x: &Num) -> Num {
    let x2 = x.mul(x);
    let mut term = *x;
    let mut sum = *x;
    let mut n = 1;
    loop {
        term = term.mul(&x2).div(&int((n + 1) * (n + 2)));
        n += 2;
        if negligible(&term, &sum) || n > 400 {
            break;
        }
        sum = sum.add(&term);
    }
    sum
}

pub(crate) fn sinh(x: &Num) -> Num {
    if x.cmp_abs(&Num::ONE) == Ordering::Less {
        return sinh_series(x);
    }
    let e = exp(x);
    e.sub(&Num::ONE.div(&e)).mul(&HALF)
}

pub(crate) fn cosh(x: &Num) -> Num {
    let e = exp(&x.abs());
    e.add(&Num::ONE.div(&e)).mul(&HALF)
}

pub(crate) fn tanh(x: &Num) -> Num {
    let ax = x.abs();
    let t = if ax.cmp(&int(45)) == Ordering::Greater {
        Num::ONE
    } else if ax.cmp(&Num::ONE) == Ordering::Less {
        sinh_series(&ax).div(&cosh(&ax))
    } else {
        let e2 = exp(&ax.mul(&int(2)));
        e2.sub(&Num::ONE).div(&e2.add(&Num::ONE))
    };
    if x.neg { t.neg() } else { t }
}

pub(crate) fn asinh(x: &Num) -> Num {
    let ax = x.abs();
    let t = if ax.cmp(&HALF) == Ordering::Less {
        // x - x^3/6 + 3x^5/40 - ...
        let x2 = ax.mul(&ax).neg();
        let mut term = ax;
        let mut sum = ax;
        let mut n: i64 = 0;
        loop {
            let odd = 2 * n + 1;
            term = term.mul(&x2).mul(&int(odd * odd)).div(&int((2 * n + 2) * (2 * n + 3)));
            n += 1;
            if negligible(&term, &sum) || n > 400 {
                break;
            }
            sum = sum.add(&term);
        }
        sum
    } else {
        let hyp = ax.mul(&ax).add(&Num::ONE).sqrt();
        ln(&ax.add(&hyp))
    };
    if x.neg { t.neg() } else { t }
}

/// Inverse hyperbolic cosine for x >= 1.
pub(crate) fn acosh(x: &Num) -> Num {
    if x.cmp(&Num::ONE) == Ordering::Equal {
        return Num::ZERO;
    }
    let root = x.sub(&Num::ONE).mul(&x.add(&Num::ONE)).sqrt();
    ln(&x.add(&root))
}

/// Inverse hyperbolic tangent for |x| < 1.
pub(crate) fn atanh(x: &Num) -> Num {
    if x.cmp_abs(&HALF) == Ordering::Less {
        return atanh_series(x);
    }
    let ratio = Num::ONE.add(x).div(&Num::ONE.sub(x));
    ln(&ratio).mul(&HALF)
}

// ==================== Gamma ====================

/// ln Gamma(z) by the Stirling series, z >= 40.
fn ln_gamma_stirling(z: &Num) -> Num {
    let mut sum = z.sub(&HALF).mul(&ln(z)).sub(z).add(&LN_SQRT_2PI);
    let z2 = z.mul(z);
    let mut power = *z;
    for (num, den) in STIRLING {
        let coeff = Num::new(num < 0, num.unsigned_abs(), 0).div(&Num::new(false, den as u128, 0));
        let term = coeff.div(&power);
        if negligible(&term, &sum) {
            break;
        }
        sum = sum.add(&term);
        power = power.mul(&z2);
    }
    sum
}

/// Gamma(x) for a finite x that is not a pole.
///
/// Callers bound |x| to a few thousand; beyond that the result is outside
/// the decimal128 range anyway.
pub(crate) fn gamma(x: &Num) -> Num {
    if x.cmp(&HALF) == Ordering::Less {
        // Reflection: Gamma(x) Gamma(1 - x) = pi / sin(pi x).
        let n = round_integral(x);
        let f = x.sub(&n);
        let mut s = sin_cos(&PI.mul(&f)).0;
        if mod4(&n) % 2 == 1 {
            s = s.neg();
        }
        let g = gamma(&Num::ONE.sub(x));
        return PI.div(&s.mul(&g));
    }
    let mut z = *x;
    let mut product = Num::ONE;
    while z.cmp(&int(STIRLING_MIN)) == Ordering::Less {
        product = product.mul(&z);
        z = z.add(&Num::ONE);
    }
    exp(&ln_gamma_stirling(&z)).div(&product)
}

/// y^n for an integer n by repeated squaring. The flag reports whether any
/// step rounded.
pub(crate) fn pow_int(base: &Num, n: i64, prec: u32) -> (Num, bool) {
    let mut result = Num::ONE;
    let mut square = *base;
    let mut inexact = false;
    let mut e = n.unsigned_abs();
    while e > 0 {
        if e & 1 == 1 {
            let r = result.mul_p(&square, prec);
            result = r.num;
            inexact |= r.inexact;
        }
        e >>= 1;
        if e > 0 {
            let r = square.mul_p(&square, prec);
            square = r.num;
            inexact |= r.inexact;
        }
    }
    if n < 0 {
        let r = Num::ONE.div_p(&result, prec);
        result = r.num;
        inexact |= r.inexact;
    }
    (result, inexact)
}
