//! The four-level register stack.

use crate::decimal::Decimal;
use serde::{Serialize, Deserialize};

/// Index of each register in [`Stack::regs`].
pub const X: usize = 0;
pub const Y: usize = 1;
pub const Z: usize = 2;
pub const T: usize = 3;

/// X/Y/Z/T plus LastX.
///
/// Always holds exactly four values; every operation is total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stack<D> {
    regs: [D; 4],
    last_x: D,
}

impl<D: Decimal> Stack<D> {
    /// All registers and LastX zero.
    pub fn new() -> Self {
        Self { regs: [D::zero(); 4], last_x: D::zero() }
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }

    #[inline]
    pub fn x(&self) -> D {
        self.regs[X]
    }

    #[inline]
    pub fn y(&self) -> D {
        self.regs[Y]
    }

    #[inline]
    pub fn z(&self) -> D {
        self.regs[Z]
    }

    #[inline]
    pub fn t(&self) -> D {
        self.regs[T]
    }

    #[inline]
    pub fn last_x(&self) -> D {
        self.last_x
    }

    /// Registers in X, Y, Z, T order.
    #[inline]
    pub fn regs(&self) -> [D; 4] {
        self.regs
    }

    #[inline]
    pub fn set_x(&mut self, value: D) {
        self.regs[X] = value;
    }

    #[inline]
    pub fn set_last_x(&mut self, value: D) {
        self.last_x = value;
    }

    /// LastX <- X.
    #[inline]
    pub fn save_last_x(&mut self) {
        self.last_x = self.regs[X];
    }

    /// Y,Z,T <- X,Y,Z. X keeps its value; T is lost.
    pub fn push(&mut self) {
        self.regs[T] = self.regs[Z];
        self.regs[Z] = self.regs[Y];
        self.regs[Y] = self.regs[X];
    }

    /// X,Y,Z <- Y,Z,T. T keeps its value.
    pub fn pop(&mut self) {
        self.regs[X] = self.regs[Y];
        self.regs[Y] = self.regs[Z];
        self.regs[Z] = self.regs[T];
    }

    pub fn swap(&mut self) {
        self.regs.swap(X, Y);
    }

    /// T moves to X, everything else up one.
    pub fn roll_up(&mut self) {
        self.regs.rotate_right(1);
    }

    /// X moves to T, everything else down one.
    pub fn roll_down(&mut self) {
        self.regs.rotate_left(1);
    }

    /// Replace every register and LastX at once.
    pub fn load(&mut self, regs: [D; 4], last_x: D) {
        self.regs = regs;
        self.last_x = last_x;
    }
}

impl<D: Decimal> Default for Stack<D> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Dec128;
    use proptest::prelude::*;

    fn stack(values: [i64; 4]) -> Stack<Dec128> {
        let mut s = Stack::new();
        s.load(values.map(Dec128::from_i64), Dec128::ZERO);
        s
    }

    fn ints(s: &Stack<Dec128>) -> [Dec128; 4] {
        s.regs()
    }

    #[test]
    fn test_push_pop() {
        let mut s = stack([1, 2, 3, 4]);
        s.push();
        assert_eq!(ints(&s), stack([1, 1, 2, 3]).regs());
        s.pop();
        assert_eq!(ints(&s), stack([1, 2, 3, 3]).regs());
    }

    #[test]
    fn test_swap_and_rolls() {
        let mut s = stack([1, 2, 3, 4]);
        s.swap();
        assert_eq!(ints(&s), stack([2, 1, 3, 4]).regs());
        let mut s = stack([1, 2, 3, 4]);
        s.roll_up();
        assert_eq!(ints(&s), stack([4, 1, 2, 3]).regs());
        s.roll_down();
        assert_eq!(ints(&s), stack([1, 2, 3, 4]).regs());
        s.roll_down();
        assert_eq!(ints(&s), stack([2, 3, 4, 1]).regs());
    }

    #[test]
    fn test_last_x() {
        let mut s = stack([7, 0, 0, 0]);
        s.save_last_x();
        s.set_x(Dec128::from_i64(9));
        assert_eq!(s.last_x(), Dec128::from_i64(7));
        assert_eq!(s.x(), Dec128::from_i64(9));
    }

    proptest! {
        #[test]
        fn prop_push_then_pop_restores_upper_registers(values in proptest::array::uniform4(-1_000_000i64..1_000_000)) {
            let mut s = stack(values);
            let before = s;
            s.push();
            s.pop();
            prop_assert_eq!(s.y(), before.y());
            prop_assert_eq!(s.z(), before.z());
            // X ends up with the old Y, which push copied from X.
            prop_assert_eq!(s.x(), before.x());
            // The old T fell off during push; pop duplicates Z into it.
            prop_assert_eq!(s.t(), before.z());
        }
    }
}
