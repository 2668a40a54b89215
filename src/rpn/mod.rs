//! RPN engine
//!
//! A four-level stack calculator with LastX, six variables, a constant
//! catalog and single-level undo. The engine is generic over the
//! [`Decimal`](crate::decimal::Decimal) backend and never performs I/O.

pub mod calculator;
pub mod constants;
pub mod input;
pub mod ops;
pub mod settings;
pub mod stack;
pub mod vars;

pub use calculator::{Calculator, Outcome, State, LINE_WIDTH, SHOW_WIDTH};
pub use input::{InputBuffer, MAX_INPUT_LEN};
pub use ops::{Arity, Operation};
pub use settings::{
    AngleMode, DirtyFlag, DispMode, HyperbolicMode, LastKeyMode, Settings, SettingsObserver,
    ZeroMode,
};
pub use stack::Stack;
pub use vars::{VarOp, VariableBank, VAR_SLOTS};
