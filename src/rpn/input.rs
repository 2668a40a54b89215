//! The numeric literal editor.
//!
//! [`InputBuffer`] only manages text. The push-pending protocol and the
//! mirroring into X live in [`crate::rpn::Calculator`].

use heapless::String;
use tracing::trace;

/// Longest literal the editor accepts, sign, point and exponent included.
pub const MAX_INPUT_LEN: usize = 39;

/// What a backspace left behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Erased {
    /// Nothing to erase.
    Nothing,
    /// Text remains.
    Editing,
    /// The buffer emptied (or only a sign remained); X should become zero.
    Emptied,
}

/// A partially typed literal.
///
/// The text is always a prefix of `[-+]digits[.digits][E[-+]digits]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputBuffer {
    text: String<MAX_INPUT_LEN>,
    dot_pos: Option<usize>,
    exp_pos: Option<usize>,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.dot_pos = None;
        self.exp_pos = None;
    }

    /// True while at least one character has been typed.
    #[inline]
    pub fn is_active(&self) -> bool {
        !self.text.is_empty()
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    #[inline]
    pub fn has_dot(&self) -> bool {
        self.dot_pos.is_some()
    }

    #[inline]
    pub fn has_exponent(&self) -> bool {
        self.exp_pos.is_some()
    }

    /// The text, if it denotes a complete number (ends in a digit).
    pub fn complete(&self) -> Option<&str> {
        match self.text.as_bytes().last() {
            Some(b) if b.is_ascii_digit() => Some(&self.text),
            _ => None,
        }
    }

    /// Append a digit; false when full.
    pub fn push_digit(&mut self, digit: char) -> bool {
        debug_assert!(digit.is_ascii_digit());
        let ok = self.text.push(digit).is_ok();
        trace!(digit = %digit, ok, text = %self.text, "input digit");
        ok
    }

    /// Insert the decimal point, seeding `0.` on an empty buffer.
    pub fn push_dot(&mut self) -> bool {
        if self.dot_pos.is_some() || self.exp_pos.is_some() {
            return false;
        }
        let ok = if self.text.is_empty() {
            self.text.push_str("0.").is_ok()
        } else {
            self.text.push('.').is_ok()
        };
        if ok {
            self.dot_pos = Some(self.text.len() - 1);
        }
        trace!(ok, text = %self.text, "input dot");
        ok
    }

    /// Insert the exponent marker. A literal cannot start with one.
    pub fn push_exponent(&mut self) -> bool {
        if self.exp_pos.is_some() || self.text.is_empty() {
            return false;
        }
        let ok = self.text.push('E').is_ok();
        if ok {
            self.exp_pos = Some(self.text.len() - 1);
        }
        trace!(ok, text = %self.text, "input exponent");
        ok
    }

    /// Toggle the exponent sign if an exponent marker is present,
    /// otherwise the sign of the whole literal.
    pub fn toggle_sign(&mut self) {
        match self.exp_pos {
            Some(e) => self.toggle_sign_at(e + 1),
            None => self.toggle_sign_at(0),
        }
        trace!(text = %self.text, "input sign");
    }

    fn toggle_sign_at(&mut self, pos: usize) {
        let bytes = self.text.as_bytes();
        let flipped = match bytes.get(pos) {
            Some(b'-') => Some('+'),
            Some(b'+') => Some('-'),
            _ => None,
        };
        let mut rebuilt: String<MAX_INPUT_LEN> = String::new();
        let (head, tail) = self.text.split_at(pos);
        let ok = match flipped {
            Some(sign) => rebuilt.push_str(head).is_ok()
                && rebuilt.push(sign).is_ok()
                && rebuilt.push_str(&tail[1..]).is_ok(),
            None => rebuilt.push_str(head).is_ok()
                && rebuilt.push('-').is_ok()
                && rebuilt.push_str(tail).is_ok(),
        };
        if !ok {
            return;
        }
        if flipped.is_none() {
            // Everything at or after `pos` moved right by one.
            self.dot_pos = self.dot_pos.map(|p| if p >= pos { p + 1 } else { p });
            self.exp_pos = self.exp_pos.map(|p| if p >= pos { p + 1 } else { p });
        }
        self.text = rebuilt;
    }

    /// Remove the last character.
    pub fn backspace(&mut self) -> Erased {
        let Some(removed) = self.text.pop() else {
            return Erased::Nothing;
        };
        let len = self.text.len();
        if removed == '.' {
            self.dot_pos = None;
        }
        if removed == 'E' {
            self.exp_pos = None;
        }
        trace!(removed = %removed, text = %self.text, "input backspace");
        if len == 0 || (len == 1 && matches!(self.text.as_bytes()[0], b'-' | b'+')) {
            self.clear();
            return Erased::Emptied;
        }
        Erased::Editing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(keys: &str) -> InputBuffer {
        let mut input = InputBuffer::new();
        for c in keys.chars() {
            match c {
                '0'..='9' => {
                    input.push_digit(c);
                }
                '.' => {
                    input.push_dot();
                }
                'E' => {
                    input.push_exponent();
                }
                '~' => input.toggle_sign(),
                '<' => {
                    input.backspace();
                }
                _ => panic!("bad key {}", c),
            }
        }
        input
    }

    #[test]
    fn test_digits_and_dot() {
        assert_eq!(typed("12.5").as_str(), "12.5");
        assert_eq!(typed(".5").as_str(), "0.5");
        assert_eq!(typed("1..2.").as_str(), "1.2");
        assert!(typed("1.").complete().is_none());
        assert_eq!(typed("1.2").complete(), Some("1.2"));
    }

    #[test]
    fn test_exponent_rules() {
        assert_eq!(typed("E5").as_str(), "5");
        assert_eq!(typed("1E2E3").as_str(), "1E23");
        assert!(typed("1E").complete().is_none());
    }

    #[test]
    fn test_no_dot_in_exponent() {
        let mut input = typed("1E2");
        assert!(!input.push_dot());
        assert_eq!(input.as_str(), "1E2");
        assert_eq!(typed("1E.5").as_str(), "1E5");
        assert_eq!(typed("1E2.5").complete(), Some("1E25"));
        // Erasing the marker makes the point available again.
        assert_eq!(typed("1E<.5").as_str(), "1.5");
    }

    #[test]
    fn test_sign_toggle() {
        assert_eq!(typed("5~").as_str(), "-5");
        assert_eq!(typed("5~~").as_str(), "+5");
        assert_eq!(typed("1E~").as_str(), "1E-");
        assert_eq!(typed("1E~2").as_str(), "1E-2");
        assert_eq!(typed("1E2~").as_str(), "1E-2");
        assert_eq!(typed("1E2~~").as_str(), "1E+2");
    }

    #[test]
    fn test_sign_insert_shifts_markers() {
        let mut input = typed("1.5E2");
        input.toggle_sign();
        assert_eq!(input.as_str(), "1.5E-2");
        let mut input = typed("1.5");
        input.toggle_sign();
        assert_eq!(input.as_str(), "-1.5");
        // The marker moved with the text, so removing the point clears it.
        assert_eq!(input.backspace(), Erased::Editing);
        assert_eq!(input.backspace(), Erased::Editing);
        assert!(!input.has_dot());
        assert_eq!(input.as_str(), "-1");
    }

    #[test]
    fn test_backspace() {
        let mut input = typed("1.");
        assert_eq!(input.backspace(), Erased::Editing);
        assert!(!input.has_dot());
        assert_eq!(input.backspace(), Erased::Emptied);
        assert_eq!(input.backspace(), Erased::Nothing);

        let mut input = typed("5~");
        assert_eq!(input.backspace(), Erased::Emptied);
        assert!(!input.is_active());

        let mut input = typed("2E");
        input.backspace();
        assert!(!input.has_exponent());
        input.push_exponent();
        assert_eq!(input.as_str(), "2E");
    }

    #[test]
    fn test_capacity() {
        let mut input = InputBuffer::new();
        for _ in 0..MAX_INPUT_LEN {
            assert!(input.push_digit('9'));
        }
        assert!(!input.push_digit('9'));
        assert!(!input.push_dot());
        assert_eq!(input.len(), MAX_INPUT_LEN);
    }
}
