//! Fixed-width unsigned integers for exact intermediate results.
//!
//! A [`Wide`] holds up to 114 decimal digits as six base-10^19 limbs
//! (least significant first). That covers the full product of two 37-digit
//! coefficients and the cube of a 34-digit one, which is all the rounding
//! code ever needs.

use std::cmp::Ordering;

/// Digits per limb.
pub(crate) const LIMB_DIGITS: u32 = 19;
/// Limb radix, 10^19.
pub(crate) const LIMB_BASE: u64 = 10_000_000_000_000_000_000;
const LIMBS: usize = 6;

const fn pow10_table() -> [u128; 39] {
    let mut table = [1u128; 39];
    let mut i = 1;
    while i < 39 {
        table[i] = table[i - 1] * 10;
        i += 1;
    }
    table
}

/// Powers of ten that fit in a `u128` (10^0 ..= 10^38).
pub(crate) const POW10: [u128; 39] = pow10_table();

/// Number of decimal digits in `v` (zero has one digit).
pub(crate) fn digit_count(v: u128) -> u32 {
    let mut n = 1;
    while n < 39 && v >= POW10[n as usize] {
        n += 1;
    }
    n
}

#[inline]
fn pow10_u64(n: u32) -> u64 {
    POW10[n as usize] as u64
}

/// An unsigned integer of up to 114 decimal digits.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) struct Wide {
    limbs: [u64; LIMBS],
}

impl Wide {
    pub const ZERO: Wide = Wide { limbs: [0; LIMBS] };

    pub fn from_u128(mut v: u128) -> Self {
        let base = LIMB_BASE as u128;
        let mut limbs = [0u64; LIMBS];
        for limb in limbs.iter_mut().take(3) {
            *limb = (v % base) as u64;
            v /= base;
        }
        Self { limbs }
    }

    /// Value as a `u128`, if it fits.
    pub fn to_u128(&self) -> Option<u128> {
        if self.limbs[3..].iter().any(|&l| l != 0) {
            return None;
        }
        let base = LIMB_BASE as u128;
        (self.limbs[2] as u128)
            .checked_mul(base)?
            .checked_mul(base)?
            .checked_add(self.limbs[1] as u128 * base)?
            .checked_add(self.limbs[0] as u128)
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.limbs.iter().all(|&l| l == 0)
    }

    #[inline]
    pub fn is_odd(&self) -> bool {
        self.limbs[0] % 2 == 1
    }

    /// Number of decimal digits (zero has one digit).
    pub fn digits(&self) -> u32 {
        for i in (0..LIMBS).rev() {
            if self.limbs[i] != 0 {
                return i as u32 * LIMB_DIGITS + digit_count(self.limbs[i] as u128);
            }
        }
        1
    }

    /// Decimal digit `k`, counting from the least significant (k = 0).
    pub fn digit(&self, k: u32) -> u8 {
        let limb = (k / LIMB_DIGITS) as usize;
        if limb >= LIMBS {
            return 0;
        }
        ((self.limbs[limb] / pow10_u64(k % LIMB_DIGITS)) % 10) as u8
    }

    /// True if any of the lowest `k` digits is non-zero.
    fn any_below(&self, k: u32) -> bool {
        let whole = ((k / LIMB_DIGITS) as usize).min(LIMBS);
        if self.limbs[..whole].iter().any(|&l| l != 0) {
            return true;
        }
        let part = k % LIMB_DIGITS;
        whole < LIMBS && part > 0 && self.limbs[whole] % pow10_u64(part) != 0
    }

    pub fn add(&self, other: &Wide) -> Wide {
        let mut out = [0u64; LIMBS];
        let mut carry = 0u128;
        for i in 0..LIMBS {
            let s = self.limbs[i] as u128 + other.limbs[i] as u128 + carry;
            out[i] = (s % LIMB_BASE as u128) as u64;
            carry = s / LIMB_BASE as u128;
        }
        Wide { limbs: out }
    }

    /// `self - other`; callers guarantee `self >= other`.
    pub fn sub(&self, other: &Wide) -> Wide {
        let mut out = [0u64; LIMBS];
        let mut borrow = 0u64;
        for i in 0..LIMBS {
            let rhs = other.limbs[i] + borrow;
            if self.limbs[i] >= rhs {
                out[i] = self.limbs[i] - rhs;
                borrow = 0;
            } else {
                out[i] = LIMB_BASE - rhs + self.limbs[i];
                borrow = 1;
            }
        }
        debug_assert_eq!(borrow, 0, "Wide::sub underflow");
        Wide { limbs: out }
    }

    /// Add a small value (< 10^19).
    pub fn add_small(&self, v: u64) -> Wide {
        self.add(&Wide::from_u128(v as u128))
    }

    /// Multiply by a single limb value (< 10^19).
    pub fn mul_small(&self, m: u64) -> Wide {
        let base = LIMB_BASE as u128;
        let mut out = [0u64; LIMBS];
        let mut carry = 0u128;
        for i in 0..LIMBS {
            let t = self.limbs[i] as u128 * m as u128 + carry;
            out[i] = (t % base) as u64;
            carry = t / base;
        }
        debug_assert_eq!(carry, 0, "Wide::mul_small overflow");
        Wide { limbs: out }
    }

    /// Schoolbook product, truncated to the limb capacity.
    pub fn mul(&self, other: &Wide) -> Wide {
        let base = LIMB_BASE as u128;
        let mut out = [0u64; LIMBS];
        for i in 0..LIMBS {
            if self.limbs[i] == 0 {
                continue;
            }
            let mut carry = 0u128;
            for j in 0..LIMBS - i {
                let t = out[i + j] as u128 + self.limbs[i] as u128 * other.limbs[j] as u128 + carry;
                out[i + j] = (t % base) as u64;
                carry = t / base;
            }
        }
        Wide { limbs: out }
    }

    /// Full product of two `u128` coefficients.
    pub fn mul_u128(a: u128, b: u128) -> Wide {
        Wide::from_u128(a).mul(&Wide::from_u128(b))
    }

    /// Multiply by 10^n.
    pub fn mul_pow10(&self, n: u32) -> Wide {
        let shift = (n / LIMB_DIGITS) as usize;
        let mut limbs = [0u64; LIMBS];
        for i in shift..LIMBS {
            limbs[i] = self.limbs[i - shift];
        }
        Wide { limbs }.mul_small(pow10_u64(n % LIMB_DIGITS))
    }

    /// Divide by 10^n, returning the quotient, the first discarded digit and
    /// whether any digit below it was non-zero.
    pub fn div_pow10(&self, n: u32) -> (Wide, u8, bool) {
        if n == 0 {
            return (*self, 0, false);
        }
        let round = self.digit(n - 1);
        let sticky = self.any_below(n - 1);
        let shift = (n / LIMB_DIGITS) as usize;
        let r = n % LIMB_DIGITS;
        let mut limbs = [0u64; LIMBS];
        for (i, limb) in limbs.iter_mut().enumerate() {
            let src = i + shift;
            if src >= LIMBS {
                break;
            }
            let low = self.limbs[src] / pow10_u64(r);
            let high = if r > 0 && src + 1 < LIMBS {
                (self.limbs[src + 1] % pow10_u64(r)) * pow10_u64(LIMB_DIGITS - r)
            } else {
                0
            };
            *limb = low + high;
        }
        (Wide { limbs }, round, sticky)
    }
}

impl PartialOrd for Wide {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Wide {
    fn cmp(&self, other: &Self) -> Ordering {
        for i in (0..LIMBS).rev() {
            match self.limbs[i].cmp(&other.limbs[i]) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        Ordering::Equal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_count() {
        assert_eq!(digit_count(0), 1);
        assert_eq!(digit_count(9), 1);
        assert_eq!(digit_count(10), 2);
        assert_eq!(digit_count(POW10[38]), 39);
        assert_eq!(digit_count(POW10[34] - 1), 34);
    }

    #[test]
    fn test_u128_roundtrip() {
        let v = 123_456_789_012_345_678_901_234_567_890_123_456u128;
        let w = Wide::from_u128(v);
        assert_eq!(w.to_u128(), Some(v));
        assert_eq!(w.digits(), 36);
    }

    #[test]
    fn test_mul_and_shift() {
        // (10^20 + 1)^2 = 10^40 + 2*10^20 + 1
        let a = POW10[20] + 1;
        let sq = Wide::mul_u128(a, a);
        assert_eq!(sq.digits(), 41);
        let (q, round, sticky) = sq.div_pow10(20);
        assert_eq!(q.to_u128(), Some(POW10[20] + 2));
        assert_eq!(round, 0);
        assert!(sticky);
    }

    #[test]
    fn test_div_pow10_round_digit() {
        let w = Wide::from_u128(123_456);
        let (q, round, sticky) = w.div_pow10(3);
        assert_eq!(q.to_u128(), Some(123));
        assert_eq!(round, 4);
        assert!(sticky);

        let (q, round, sticky) = Wide::from_u128(1_500).div_pow10(3);
        assert_eq!(q.to_u128(), Some(1));
        assert_eq!(round, 5);
        assert!(!sticky);
    }

    #[test]
    fn test_add_sub_cmp() {
        let a = Wide::from_u128(POW10[37]).mul_pow10(40);
        let b = Wide::from_u128(1);
        let c = a.add(&b);
        assert!(c > a);
        assert_eq!(c.sub(&b), a);
        assert_eq!(a.digits(), 78);
        assert_eq!(c.to_u128(), None);
    }

    #[test]
    fn test_huge_shift_is_all_sticky() {
        let w = Wide::from_u128(42);
        let (q, round, sticky) = w.div_pow10(500);
        assert!(q.is_zero());
        assert_eq!(round, 0);
        assert!(sticky);
    }
}
