//! Variable bank: six slots A-F and the pending store/load/clear selector.

use crate::decimal::Decimal;
use serde::{Serialize, Deserialize};

/// Number of variable slots.
pub const VAR_SLOTS: usize = 6;

/// The operation the next slot key applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VarOp {
    #[default]
    None,
    Store,
    Load,
    Clear,
}

impl VarOp {
    /// Indicator character shown on the display.
    pub fn indicator(self) -> Option<char> {
        match self {
            VarOp::None => None,
            VarOp::Store => Some('S'),
            VarOp::Load => Some('L'),
            VarOp::Clear => Some('C'),
        }
    }
}

/// Slot letter for an index (`0` -> `'A'`).
pub fn slot_name(index: usize) -> Option<char> {
    (index < VAR_SLOTS).then(|| (b'A' + index as u8) as char)
}

/// Slot index for a letter, case-insensitive.
pub fn slot_index(name: char) -> Option<usize> {
    let upper = name.to_ascii_uppercase();
    ('A'..='F').contains(&upper).then(|| (upper as u8 - b'A') as usize)
}

/// The six variable slots plus the pending operation.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableBank<D> {
    slots: [D; VAR_SLOTS],
    pending: VarOp,
}

impl<D: Decimal> VariableBank<D> {
    pub fn new() -> Self {
        Self { slots: [D::zero(); VAR_SLOTS], pending: VarOp::None }
    }

    /// Zero every slot and drop the pending operation.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    #[inline]
    pub fn pending(&self) -> VarOp {
        self.pending
    }

    #[inline]
    pub fn set_pending(&mut self, op: VarOp) {
        self.pending = op;
    }

    /// Take the pending operation, leaving `None`.
    #[inline]
    pub fn take_pending(&mut self) -> VarOp {
        std::mem::take(&mut self.pending)
    }

    pub fn get(&self, index: usize) -> Option<D> {
        self.slots.get(index).copied()
    }

    pub fn set(&mut self, index: usize, value: D) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn slots(&self) -> [D; VAR_SLOTS] {
        self.slots
    }

    pub fn load_slots(&mut self, slots: [D; VAR_SLOTS]) {
        self.slots = slots;
    }
}

impl<D: Decimal> Default for VariableBank<D> {
    fn default() -> Self {
        Self::new()
    }
}
