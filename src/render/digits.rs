//! Bounded ASCII digit strings and banker's rounding.

use heapless::Vec;
use std::fmt;

/// Capacity of a [`DigitString`]; enough for every layout the renderer builds.
pub const DIGIT_CAPACITY: usize = 128;

/// A string of ASCII decimal digits, most significant first.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct DigitString {
    digits: Vec<u8, DIGIT_CAPACITY>,
}

impl DigitString {
    pub fn new() -> Self {
        Self { digits: Vec::new() }
    }

    /// Build from ASCII digits. Returns `None` on a non-digit byte or
    /// when the input exceeds the capacity.
    pub fn from_ascii(text: &[u8]) -> Option<Self> {
        let mut out = Self::new();
        for &b in text {
            if !b.is_ascii_digit() || !out.push(b) {
                return None;
            }
        }
        Some(out)
    }

    /// Append one ASCII digit; false when full.
    #[inline]
    pub fn push(&mut self, digit: u8) -> bool {
        self.digits.push(digit).is_ok()
    }

    /// Append `count` zeros, stopping silently at capacity.
    pub fn push_zeros(&mut self, count: usize) {
        for _ in 0..count {
            if !self.push(b'0') {
                break;
            }
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.digits.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    /// Digit at `index`, or `'0'` past the end.
    #[inline]
    pub fn digit_or_zero(&self, index: usize) -> u8 {
        self.digits.get(index).copied().unwrap_or(b'0')
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.digits
    }

    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.digits).unwrap_or("")
    }

    /// Length of `[start, len)` once trailing zeros are dropped, measured
    /// from `start`.
    pub fn significant_after(&self, start: usize, len: usize) -> usize {
        let len = len.min(self.len());
        let mut end = len;
        while end > start && self.digits[end - 1] == b'0' {
            end -= 1;
        }
        end.saturating_sub(start)
    }

    /// Round to `keep` digits, ties to even, and return the new length.
    ///
    /// A carry out of the leading digit prepends a `1`, so the result can be
    /// `keep + 1` digits long. `keep >= len` leaves the string untouched.
    pub fn round_half_even(&mut self, keep: usize) -> usize {
        let len = self.len();
        if keep >= len {
            return len;
        }
        let next = self.digits[keep] - b'0';
        let round_up = match next {
            6..=9 => true,
            5 => {
                let any_after = self.digits[keep + 1..].iter().any(|&d| d != b'0');
                any_after || (keep > 0 && (self.digits[keep - 1] - b'0') % 2 == 1)
            }
            _ => false,
        };
        self.digits.truncate(keep);
        if round_up {
            let mut carried_out = true;
            for d in self.digits.iter_mut().rev() {
                if *d == b'9' {
                    *d = b'0';
                } else {
                    *d += 1;
                    carried_out = false;
                    break;
                }
            }
            if carried_out {
                // Every kept digit is now zero: 1 followed by `keep` zeros.
                if let Some(first) = self.digits.first_mut() {
                    *first = b'1';
                    let _ = self.digits.push(b'0');
                } else {
                    let _ = self.digits.push(b'1');
                }
            }
        }
        self.len()
    }
}

impl fmt::Debug for DigitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DigitString({:?})", self.as_str())
    }
}

impl fmt::Display for DigitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rounded(text: &str, keep: usize) -> String {
        let mut d = DigitString::from_ascii(text.as_bytes()).unwrap();
        let len = d.round_half_even(keep);
        assert_eq!(len, d.len());
        d.as_str().to_string()
    }

    #[test]
    fn test_ties_go_to_even() {
        assert_eq!(rounded("25", 1), "2");
        assert_eq!(rounded("35", 1), "4");
        assert_eq!(rounded("1250", 2), "12");
        assert_eq!(rounded("1350", 2), "14");
    }

    #[test]
    fn test_nonzero_tail_rounds_up() {
        assert_eq!(rounded("125", 1), "1");
        assert_eq!(rounded("1251", 2), "13");
        assert_eq!(rounded("12500001", 2), "13");
    }

    #[test]
    fn test_below_and_above_half() {
        assert_eq!(rounded("314159", 3), "314");
        assert_eq!(rounded("271828", 3), "272");
    }

    #[test]
    fn test_carry_prepends_one() {
        assert_eq!(rounded("999", 2), "100");
        assert_eq!(rounded("0996", 3), "100");
        assert_eq!(rounded("96", 1), "10");
    }

    #[test]
    fn test_keep_zero() {
        assert_eq!(rounded("7", 0), "1");
        assert_eq!(rounded("5", 0), "");
        assert_eq!(rounded("4", 0), "");
    }

    #[test]
    fn test_keep_past_end_is_noop() {
        assert_eq!(rounded("123", 3), "123");
        assert_eq!(rounded("123", 10), "123");
    }

    #[test]
    fn test_rejects_non_digits() {
        assert!(DigitString::from_ascii(b"12a").is_none());
        assert!(DigitString::from_ascii(&[b'1'; DIGIT_CAPACITY + 1]).is_none());
    }

    #[test]
    fn test_significant_after() {
        let d = DigitString::from_ascii(b"120300").unwrap();
        assert_eq!(d.significant_after(1, 6), 3);
        assert_eq!(d.significant_after(4, 6), 0);
    }
}
