//! Decimal exception flags.
//!
//! | Bit  | Flag      | Raised when                                   |
//! |------|-----------|-----------------------------------------------|
//! | 0x01 | INVALID   | no meaningful result exists (0/0, ln(-1), ..) |
//! | 0x04 | DIV_ZERO  | an exact infinite result from finite operands |
//! | 0x08 | OVERFLOW  | the rounded result exceeds the largest finite |
//! | 0x10 | UNDERFLOW | the result is tiny and inexact                |
//! | 0x20 | INEXACT   | the delivered result differs from the exact   |
//!
//! Bit values follow the BID decimal library so raw values can be compared
//! against firmware dumps.

use serde::{Serialize, Deserialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// A set of accumulated decimal exception flags.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Flags(u8);

impl Flags {
    /// No exceptions raised.
    pub const NONE: Self = Self(0);
    /// Invalid operation.
    pub const INVALID: Self = Self(0x01);
    /// Division by zero.
    pub const DIV_ZERO: Self = Self(0x04);
    /// Overflow.
    pub const OVERFLOW: Self = Self(0x08);
    /// Underflow.
    pub const UNDERFLOW: Self = Self(0x10);
    /// Inexact.
    pub const INEXACT: Self = Self(0x20);

    const NAMED: [(Flags, &'static str); 5] = [
        (Self::INVALID, "invalid"),
        (Self::DIV_ZERO, "div-by-zero"),
        (Self::OVERFLOW, "overflow"),
        (Self::UNDERFLOW, "underflow"),
        (Self::INEXACT, "inexact"),
    ];

    /// Rebuild a flag set from raw bits. Unknown bits are dropped.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & 0x3D)
    }

    /// Raw bit value.
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns true if no flags are set.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns true if every flag in `other` is set.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Raise the flags in `other`.
    #[inline]
    pub fn raise(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Return the current set and leave this one empty.
    #[inline]
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}

impl BitOr for Flags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Flags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }
        let mut first = true;
        for (flag, name) in Self::NAMED {
            if self.contains(flag) {
                if !first {
                    write!(f, "|")?;
                }
                write!(f, "{}", name)?;
                first = false;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Flags({})", self)
    }
}
