//! Host-side collaborators.
//!
//! This module provides:
//! - A keystroke script parser (text -> [`Key`] presses)
//! - A runner that feeds keys into a [`Calculator`]
//! - The JSON resume file

pub mod parser;
pub mod state_file;

pub use parser::{format_keys, parse_script, Key, ScriptError};
pub use state_file::{load_state, save_state, StateFile, StateFileError};

use crate::decimal::Decimal;
use crate::rpn::{Calculator, VarOp};
use tracing::trace;

impl Key {
    /// Press this key on `calc`.
    pub fn press<D: Decimal>(self, calc: &mut Calculator<D>) {
        trace!(key = %self, "press");
        match self {
            Key::Digit(c) => {
                calc.input_digit(c);
            }
            Key::Dot => {
                calc.input_dot();
            }
            Key::Exponent => {
                calc.input_exponent();
            }
            Key::ChangeSign => calc.toggle_sign(),
            Key::Backspace => calc.backspace(),
            Key::ClearX => calc.clear_x(),
            Key::Enter => calc.enter(),
            Key::Swap => {
                calc.commit_input();
                calc.swap();
            }
            Key::RollUp => {
                calc.commit_input();
                calc.roll_up();
            }
            Key::RollDown => {
                calc.commit_input();
                calc.roll_down();
            }
            Key::Op(op) => {
                calc.apply_key_op(op);
            }
            Key::Pi => calc.input_pi(),
            Key::E => calc.input_e(),
            Key::Last => calc.last_key(),
            Key::Undo => {
                calc.undo();
            }
            Key::Store(slot) => select_slot(calc, VarOp::Store, slot),
            Key::Recall(slot) => select_slot(calc, VarOp::Load, slot),
            Key::ClearVar(slot) => select_slot(calc, VarOp::Clear, slot),
            Key::Constant { group, index } => {
                calc.load_constant(group, index);
            }
            Key::Hyperbolic(mode) => calc.set_hyperbolic_mode(mode),
            Key::Angle(mode) => calc.set_angle_mode(mode),
            Key::Disp(mode) => calc.set_disp_mode(mode),
            Key::Zero(mode) => calc.set_zero_mode(mode),
        }
    }
}

fn select_slot<D: Decimal>(calc: &mut Calculator<D>, op: VarOp, slot: usize) {
    calc.set_pending_var_op(op);
    calc.apply_slot(slot);
}

/// Parse `source` and press every key on `calc`. Returns the number of
/// keys pressed.
pub fn run_script<D: Decimal>(calc: &mut Calculator<D>, source: &str) -> Result<usize, ScriptError> {
    let keys = parse_script(source)?;
    for key in &keys {
        key.press(calc);
    }
    Ok(keys.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Dec128;
    use crate::rpn::LINE_WIDTH;

    fn eval(source: &str) -> Calculator {
        let mut calc = Calculator::new();
        run_script(&mut calc, source).unwrap();
        calc
    }

    fn shown(calc: &Calculator) -> String {
        calc.display_x(LINE_WIDTH).as_str().to_string()
    }

    #[test]
    fn test_run_arithmetic() {
        let calc = eval("7 enter 3 +");
        assert_eq!(shown(&calc), "10");
        assert_eq!(calc.render_value(&calc.last_x(), LINE_WIDTH).as_str(), "3");
    }

    #[test]
    fn test_run_literals() {
        let calc = eval("-1.5E-3 enter 1000 *");
        assert_eq!(shown(&calc), "-1.5");
        let calc = eval("1E20");
        assert_eq!(calc.render_x(LINE_WIDTH).as_str(), "1E+20");
    }

    #[test]
    fn test_run_variables_and_constants() {
        let calc = eval("42 sto A clx rcl A 2 /");
        assert_eq!(shown(&calc), "21");
        let calc = eval("const 1 9 rcl F");
        assert_eq!(calc.render_value(&calc.y(), LINE_WIDTH).as_str(), "9.80665");
        assert!(calc.x().is_zero());
    }

    #[test]
    fn test_run_modes() {
        let calc = eval("angle rad pi 2 / sin");
        assert_eq!(shown(&calc), "1");
        let calc = eval("hyp on 0 cos");
        assert_eq!(shown(&calc), "1");
        let calc = eval("disp eng 12345");
        assert_eq!(calc.render_x(LINE_WIDTH).as_str(), "12.345E+3");
    }

    #[test]
    fn test_run_stack_keys() {
        let calc = eval("1 enter 2 enter 3 enter 4 rdn");
        assert_eq!(shown(&calc), "3");
        assert_eq!(calc.render_value(&calc.t(), LINE_WIDTH).as_str(), "4");
        let calc = eval("1 enter 2 swap -");
        assert_eq!(shown(&calc), "1");
    }

    #[test]
    fn test_run_undo() {
        let calc = eval("9 sqrt undo");
        assert_eq!(shown(&calc), "9");
    }

    #[test]
    fn test_run_reports_errors() {
        let mut calc: Calculator<Dec128> = Calculator::new();
        let err = run_script(&mut calc, "1 enter\n2 wat").unwrap_err();
        assert_eq!(err, ScriptError::UnknownToken { line: 2, token: "wat".into() });
        assert!(calc.x().is_zero());
    }
}
