//! Number renderer.
//!
//! Converts a decimal value into a single display line of at most `width`
//! visible characters. Three layouts are supported:
//!
//! - NORMAL: fixed point (`3.14159265358979`), falling back to scientific
//!   when the integer part does not fit or no significant digit would show
//! - SCIENTIFIC: one leading digit (`1.5E+20`)
//! - ENGINEERING: exponent a multiple of three (`150E+18`)
//!
//! All three round through [`DigitString::round_half_even`].

mod digits;

pub use digits::{DigitString, DIGIT_CAPACITY};

use crate::decimal::{Decimal, Parts};
use crate::rpn::{DispMode, ZeroMode};
use tracing::trace;

/// Longest line the renderer produces.
pub const DISPLAY_CAPACITY: usize = 64;

/// Rendered text.
pub type DisplayText = heapless::String<DISPLAY_CAPACITY>;

/// Render `value` into at most `width` characters.
pub fn render<D: Decimal>(value: &D, width: usize, disp_mode: DispMode, zero_mode: ZeroMode) -> DisplayText {
    let mut line = Line::new(width);
    match value.parts() {
        Parts::NaN => line.push_str("NaN"),
        Parts::Infinite { negative } => line.push_str(if negative { "-Inf" } else { "Inf" }),
        Parts::Finite { negative, digits, exponent } => {
            // Coefficient digits always fit the digit buffer.
            let mant = DigitString::from_ascii(&digits).unwrap_or_default();
            let number = Number { negative, mant, exponent };
            match disp_mode {
                DispMode::Normal => normal(&number, zero_mode, &mut line),
                DispMode::Scientific => scientific(&number, zero_mode, &mut line),
                DispMode::Engineering => engineering(&number, zero_mode, &mut line),
            }
        }
    }
    line.text
}

// ==================== Output line ====================

/// Output that silently stops at the width limit.
struct Line {
    text: DisplayText,
    max: usize,
}

impl Line {
    fn new(width: usize) -> Self {
        Self { text: DisplayText::new(), max: width.min(DISPLAY_CAPACITY) }
    }

    #[inline]
    fn has_room(&self) -> bool {
        self.text.len() < self.max
    }

    fn push(&mut self, c: char) {
        if self.has_room() {
            let _ = self.text.push(c);
        }
    }

    fn push_digit(&mut self, d: u8) {
        self.push(d as char);
    }

    fn push_str(&mut self, s: &str) {
        for c in s.chars() {
            self.push(c);
        }
    }

    fn push_digits(&mut self, digits: &DigitString, from: usize, count: usize) {
        for i in from..from + count {
            self.push_digit(digits.digit_or_zero(i));
        }
    }

    fn push_zeros(&mut self, count: usize) {
        for _ in 0..count {
            self.push('0');
        }
    }

    /// `E`, a sign, then the exponent digits.
    fn push_exponent(&mut self, exponent: i32) {
        self.push('E');
        self.push(if exponent < 0 { '-' } else { '+' });
        let mut buf = [0u8; 10];
        let mut n = 0;
        let mut e = exponent.unsigned_abs();
        loop {
            buf[n] = b'0' + (e % 10) as u8;
            n += 1;
            e /= 10;
            if e == 0 {
                break;
            }
        }
        for &d in buf[..n].iter().rev() {
            self.push_digit(d);
        }
    }
}

// ==================== Layouts ====================

/// A finite value split into sign, coefficient digits and exponent.
struct Number {
    negative: bool,
    mant: DigitString,
    exponent: i32,
}

impl Number {
    #[inline]
    fn sign_len(&self) -> i32 {
        self.negative as i32
    }

    #[inline]
    fn mlen(&self) -> i32 {
        self.mant.len() as i32
    }

    /// Position of the decimal point within the digit string.
    #[inline]
    fn dec_pos(&self) -> i32 {
        self.mlen() + self.exponent
    }
}

fn exponent_digits(e: i32) -> i32 {
    let mut a = e.unsigned_abs();
    let mut n = 1;
    while a >= 10 {
        a /= 10;
        n += 1;
    }
    n
}

/// Fractional digits that fit after an integer part, net of the point.
#[inline]
fn fraction_room(avail_after_int: i32) -> i32 {
    (avail_after_int - 1).max(0)
}

/// Fixed-point layout; falls back to scientific (once) when it cannot fit.
fn normal(n: &Number, zero: ZeroMode, line: &mut Line) {
    let max = line.max as i32;
    let sign = n.sign_len();
    let mlen = n.mlen();
    let dec_pos = n.dec_pos();
    let int_len = dec_pos.max(1);
    if sign + int_len > max {
        trace!(dec_pos, max, "integer part too wide, using scientific");
        return scientific(n, zero, line);
    }
    let cap_frac = fraction_room(max - sign - int_len);
    if dec_pos <= 0 && cap_frac <= -dec_pos {
        trace!(dec_pos, max, "no significant digit visible, using scientific");
        return scientific(n, zero, line);
    }

    // Integer digits followed by every fractional digit.
    let mut work = DigitString::new();
    if dec_pos > 0 {
        for i in 0..dec_pos as usize {
            work.push(n.mant.digit_or_zero(i));
        }
    } else {
        work.push(b'0');
        work.push_zeros((-dec_pos) as usize);
    }
    let int_digits = int_len as usize;
    if dec_pos < mlen {
        for i in dec_pos.max(0) as usize..mlen as usize {
            work.push(n.mant.digit_or_zero(i));
        }
    }
    let frac_full = work.len() - int_digits;

    let (int_digits, mut frac_len, cap) = if (cap_frac as usize) < frac_full {
        let keep_total = int_digits + cap_frac as usize;
        let new_len = work.round_half_even(keep_total);
        let new_int = if new_len > keep_total { int_digits + 1 } else { int_digits };
        if sign + new_int as i32 > max {
            trace!(max, "rounding carry widened the integer part, using scientific");
            return scientific(n, zero, line);
        }
        let cap = fraction_room(max - sign - new_int as i32) as usize;
        (new_int, (new_len - new_int).min(cap), cap)
    } else {
        (int_digits, frac_full, cap_frac as usize)
    };
    if zero == ZeroMode::Trim {
        frac_len = work.significant_after(int_digits, int_digits + frac_len);
    }

    if n.negative {
        line.push('-');
    }
    line.push_digits(&work, 0, int_digits);
    if !line.has_room() {
        return;
    }
    match zero {
        ZeroMode::Trim => {
            if frac_len > 0 {
                line.push('.');
                line.push_digits(&work, int_digits, frac_len);
            }
        }
        ZeroMode::Pad => {
            if cap > 0 {
                line.push('.');
                line.push_digits(&work, int_digits, frac_len);
                line.push_zeros(cap - frac_len);
            }
        }
    }
}

/// Significant digits a scientific line can show.
fn sci_capacity(avail: i32, exp_digits: i32) -> usize {
    let base = 3 + exp_digits;
    if avail > base {
        (avail - base) as usize
    } else {
        1
    }
}

fn scientific(n: &Number, zero: ZeroMode, line: &mut Line) {
    let avail = line.max as i32 - n.sign_len();
    let mut esci = n.exponent + n.mlen() - 1;
    let exp_digits = exponent_digits(esci);
    let mut cap = sci_capacity(avail, exp_digits);
    let mut tmp = n.mant.clone();
    let keep = cap.min(tmp.len());
    let mut len = tmp.round_half_even(keep);
    if len > keep {
        esci += 1;
        let exp_digits2 = exponent_digits(esci);
        if exp_digits2 > exp_digits {
            cap = sci_capacity(avail, exp_digits2);
            if cap < len {
                len = tmp.round_half_even(cap);
            }
        }
    }

    if n.negative {
        line.push('-');
    }
    line.push_digit(tmp.digit_or_zero(0));
    push_fraction(line, &tmp, 1, len, cap - 1, zero);
    line.push_exponent(esci);
}

/// Integer-part width and exponent of an engineering layout.
fn eng_split(dec_pos: i32) -> (usize, i32) {
    let r = dec_pos.rem_euclid(3);
    let before = if r == 0 { 3 } else { r };
    (before as usize, dec_pos - before)
}

/// Significant digits an engineering line can show.
fn eng_capacity(avail: i32, before: usize, exp_digits: i32) -> usize {
    let base = before as i32 + 2 + exp_digits;
    let extra = avail - base - 1;
    if avail > base && extra > 0 {
        before + extra as usize
    } else {
        before
    }
}

fn engineering(n: &Number, zero: ZeroMode, line: &mut Line) {
    let avail = line.max as i32 - n.sign_len();
    let mut dec_pos = n.dec_pos();
    let (mut before, mut eeng) = eng_split(dec_pos);
    let exp_digits = exponent_digits(eeng);
    let mut cap = eng_capacity(avail, before, exp_digits);
    let mut tmp = n.mant.clone();
    let keep = cap.min(tmp.len());
    let mut len = tmp.round_half_even(keep);
    if len > keep {
        // The value grew tenfold.
        dec_pos += 1;
        (before, eeng) = eng_split(dec_pos);
        let exp_digits2 = exponent_digits(eeng);
        if exp_digits2 != exp_digits {
            cap = eng_capacity(avail, before, exp_digits2);
            if cap < len {
                len = tmp.round_half_even(cap);
            }
        }
    }

    if n.negative {
        line.push('-');
    }
    line.push_digits(&tmp, 0, before);
    if line.has_room() {
        push_fraction(line, &tmp, before, len, cap.saturating_sub(before), zero);
    }
    line.push_exponent(eeng);
}

/// Fractional digits `[start, len)` of `digits`, trimmed or padded to `pad_to`.
fn push_fraction(line: &mut Line, digits: &DigitString, start: usize, len: usize, pad_to: usize, zero: ZeroMode) {
    let available = len.saturating_sub(start);
    match zero {
        ZeroMode::Trim => {
            let shown = digits.significant_after(start, len);
            if shown > 0 && line.has_room() {
                line.push('.');
                line.push_digits(digits, start, shown);
            }
        }
        ZeroMode::Pad => {
            if pad_to > 0 && line.has_room() {
                line.push('.');
                let take = available.min(pad_to);
                line.push_digits(digits, start, take);
                line.push_zeros(pad_to - take);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::{Dec128, Flags};
    use proptest::prelude::*;

    fn d(text: &str) -> Dec128 {
        let mut flags = Flags::NONE;
        Dec128::parse(text, &mut flags).unwrap()
    }

    fn show(text: &str, width: usize, mode: DispMode, zero: ZeroMode) -> String {
        render(&d(text), width, mode, zero).as_str().to_string()
    }

    fn trim(text: &str, width: usize) -> String {
        show(text, width, DispMode::Normal, ZeroMode::Trim)
    }

    #[test]
    fn test_pi_at_line_width() {
        let pi = d("3.1415926535897932384626433832795028842");
        let text = render(&pi, 16, DispMode::Normal, ZeroMode::Trim);
        assert_eq!(text.as_str(), "3.14159265358979");
    }

    #[test]
    fn test_large_value_falls_back_to_scientific() {
        assert_eq!(trim("1E20", 16), "1E+20");
        assert_eq!(trim("-12345678901234567", 16), "-1.23456789E+16");
    }

    #[test]
    fn test_tiny_value_falls_back_to_scientific() {
        assert_eq!(trim("1E-20", 16), "1E-20");
        assert_eq!(trim("0.00012", 16), "0.00012");
    }

    #[test]
    fn test_normal_trim() {
        assert_eq!(trim("10", 16), "10");
        assert_eq!(trim("1.500", 16), "1.5");
        assert_eq!(trim("0", 16), "0");
        assert_eq!(trim("-0.25", 16), "-0.25");
        assert_eq!(trim("123456", 16), "123456");
    }

    #[test]
    fn test_normal_pad() {
        assert_eq!(show("1.5", 8, DispMode::Normal, ZeroMode::Pad), "1.500000");
        assert_eq!(show("0", 5, DispMode::Normal, ZeroMode::Pad), "0.000");
        assert_eq!(show("-2", 6, DispMode::Normal, ZeroMode::Pad), "-2.000");
    }

    #[test]
    fn test_normal_rounding_carry() {
        // 9.9999999 at six characters rounds to 10.000.
        assert_eq!(show("9.9999999", 6, DispMode::Normal, ZeroMode::Pad), "10.000");
        assert_eq!(trim("9.9999999", 6), "10");
        assert_eq!(trim("0.99999999", 6), "1");
        // 99999.9 at five characters no longer fits once it carries.
        assert_eq!(trim("99999.9", 5), "1E+5");
    }

    #[test]
    fn test_normal_bankers_tie() {
        assert_eq!(trim("0.125", 4), "0.12");
        assert_eq!(trim("0.135", 4), "0.14");
        assert_eq!(trim("0.1251", 4), "0.13");
    }

    #[test]
    fn test_scientific() {
        let sci = |t: &str, z| show(t, 16, DispMode::Scientific, z);
        assert_eq!(sci("12345", ZeroMode::Trim), "1.2345E+4");
        assert_eq!(sci("0.001", ZeroMode::Trim), "1E-3");
        assert_eq!(sci("-1.5E-300", ZeroMode::Trim), "-1.5E-300");
        assert_eq!(sci("1.5", ZeroMode::Pad), "1.50000000000E+0");
        assert_eq!(sci("0", ZeroMode::Trim), "0E+0");
    }

    #[test]
    fn test_scientific_carry_changes_exponent_width() {
        // 9.99...E9 rounds up to 1E10, which needs one more exponent digit.
        let text = show("9.9999999999999999E9", 16, DispMode::Scientific, ZeroMode::Pad);
        assert_eq!(text, "1.0000000000E+10");
        assert_eq!(text.len(), 16);
    }

    #[test]
    fn test_engineering() {
        let eng = |t: &str| show(t, 16, DispMode::Engineering, ZeroMode::Trim);
        assert_eq!(eng("12345"), "12.345E+3");
        assert_eq!(eng("1"), "1E+0");
        assert_eq!(eng("1E20"), "100E+18");
        assert_eq!(eng("0.001234"), "1.234E-3");
        assert_eq!(eng("-123456789"), "-123.456789E+6");
    }

    #[test]
    fn test_engineering_pad_and_carry() {
        assert_eq!(show("1E20", 12, DispMode::Engineering, ZeroMode::Pad), "100.0000E+18");
        let text = show("999.9999999999999", 10, DispMode::Engineering, ZeroMode::Trim);
        assert_eq!(text, "1E+3");
        // The carry moves the exponent from -12 to -9, freeing a digit.
        let text = show("999.9999999999999E-12", 16, DispMode::Engineering, ZeroMode::Pad);
        assert_eq!(text, "1.00000000000E-9");
    }

    #[test]
    fn test_specials() {
        assert_eq!(trim("Inf", 16), "Inf");
        assert_eq!(trim("-Inf", 16), "-Inf");
        assert_eq!(trim("NaN", 16), "NaN");
        assert_eq!(trim("-Inf", 2), "-I");
        assert_eq!(trim("5", 0), "");
    }

    #[test]
    fn test_never_exceeds_width() {
        for width in 1..20 {
            for text in ["-9.87654321E-123", "123456789012", "0.000001", "-0.5"] {
                for mode in [DispMode::Normal, DispMode::Scientific, DispMode::Engineering] {
                    assert!(show(text, width, mode, ZeroMode::Pad).len() <= width);
                }
            }
        }
    }

    proptest! {
        #[test]
        fn prop_engineering_exponent_multiple_of_three(coeff in 1u64..10_000_000_000_000_000, exp in -400i32..400) {
            let text = show(&format!("{}E{}", coeff, exp), 16, DispMode::Engineering, ZeroMode::Trim);
            let e = text.find('E').unwrap();
            let printed: i32 = text[e + 1..].parse().unwrap();
            prop_assert_eq!(printed % 3, 0);
        }

        #[test]
        fn prop_normal_trim_round_trips(coeff in 0u64..10_000_000_000, exp in -5i32..5, negative: bool) {
            let sign = if negative { "-" } else { "" };
            let value = d(&format!("{}{}E{}", sign, coeff, exp));
            let text = render(&value, 32, DispMode::Normal, ZeroMode::Trim);
            let back = d(text.as_str());
            prop_assert!(back.quiet_equal(&value));
        }
    }
}
