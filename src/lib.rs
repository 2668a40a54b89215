//! # RPN Calculator
//!
//! The computation core of a handheld RPN scientific calculator.
//!
//! Values are IEEE 754-2008 decimal128 numbers (34 significant digits,
//! round-half-even), so `0.1 + 0.2` is exactly `0.3`. The engine keeps a
//! four-level X/Y/Z/T stack with LastX, six variables, a catalog of
//! physical constants and single-level undo, and renders numbers for a
//! fixed-width display in NORMAL, SCIENTIFIC or ENGINEERING layout.
//!
//! ```
//! use rpncalc::{Calculator, Operation, LINE_WIDTH};
//!
//! let mut calc: Calculator = Calculator::new();
//! calc.input_digit('7');
//! calc.enter();
//! calc.input_digit('3');
//! calc.apply(Operation::Add);
//! assert_eq!(calc.display_x(LINE_WIDTH).as_str(), "10");
//! ```

pub mod decimal;
pub mod render;
pub mod rpn;
pub mod script;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use decimal::{Dec128, Decimal, Flags};
pub use render::{render, DisplayText};
pub use rpn::{
    AngleMode, Calculator, DispMode, HyperbolicMode, LastKeyMode, Operation, Outcome, Settings,
    State, ZeroMode, LINE_WIDTH, SHOW_WIDTH,
};
pub use script::{load_state, parse_script, run_script, save_state, Key, ScriptError, StateFile};
