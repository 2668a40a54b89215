//! The calculator engine.
//!
//! [`Calculator`] owns every piece of state: the register stack, the
//! literal editor, the variable bank, the settings and the exception
//! accumulator. Hosts drive it with one synchronous call per key and then
//! ask for display text.

use crate::decimal::{Dec128, Decimal, Flags};
use crate::render::{render, DisplayText};
use crate::rpn::constants;
use crate::rpn::input::{Erased, InputBuffer};
use crate::rpn::ops::{Arity, Operation};
use crate::rpn::settings::{
    AngleMode, DispMode, HyperbolicMode, LastKeyMode, Settings, SettingsObserver, ZeroMode,
};
use crate::rpn::stack::Stack;
use crate::rpn::vars::{slot_name, VarOp, VariableBank, VAR_SLOTS};
use serde::{Serialize, Deserialize};
use tracing::{debug, warn};

/// Width of a normal display line.
pub const LINE_WIDTH: usize = 16;
/// Width of the two-line "show" mode.
pub const SHOW_WIDTH: usize = 32;

/// Result of one operation: the new X and the flags it raised.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outcome<D> {
    pub value: D,
    pub flags: Flags,
}

/// Everything that survives a power cycle: registers, LastX and variables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct State<D> {
    pub x: D,
    pub y: D,
    pub z: D,
    pub t: D,
    pub last_x: D,
    pub vars: [D; VAR_SLOTS],
}

impl<D: Decimal> Default for State<D> {
    fn default() -> Self {
        Self {
            x: D::zero(),
            y: D::zero(),
            z: D::zero(),
            t: D::zero(),
            last_x: D::zero(),
            vars: [D::zero(); VAR_SLOTS],
        }
    }
}

/// Registers captured for undo.
#[derive(Debug, Clone, Copy, PartialEq)]
struct UndoSnapshot<D> {
    regs: [D; 4],
    last_x: D,
}

/// The RPN engine.
pub struct Calculator<D: Decimal = Dec128> {
    stack: Stack<D>,
    input: InputBuffer,
    vars: VariableBank<D>,
    settings: Settings,
    observer: Option<Box<dyn SettingsObserver>>,
    /// X holds a finished value; the next literal-start edit pushes first.
    push_pending: bool,
    /// Live exception accumulator.
    flags: Flags,
    last_exceptions: Flags,
    shift: bool,
    undo: Option<UndoSnapshot<D>>,
    undo_pinned: bool,
}

impl<D: Decimal> Calculator<D> {
    /// A cleared engine with default settings.
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            stack: Stack::new(),
            input: InputBuffer::new(),
            vars: VariableBank::new(),
            settings,
            observer: None,
            push_pending: false,
            flags: Flags::NONE,
            last_exceptions: Flags::NONE,
            shift: false,
            undo: None,
            undo_pinned: false,
        }
    }

    /// Register the settings change listener.
    pub fn set_observer(&mut self, observer: Box<dyn SettingsObserver>) {
        self.observer = Some(observer);
    }

    // ==================== Accessors ====================

    #[inline]
    pub fn x(&self) -> D {
        self.stack.x()
    }

    #[inline]
    pub fn y(&self) -> D {
        self.stack.y()
    }

    #[inline]
    pub fn z(&self) -> D {
        self.stack.z()
    }

    #[inline]
    pub fn t(&self) -> D {
        self.stack.t()
    }

    #[inline]
    pub fn last_x(&self) -> D {
        self.stack.last_x()
    }

    #[inline]
    pub fn stack(&self) -> &Stack<D> {
        &self.stack
    }

    /// Raw literal text while editing.
    #[inline]
    pub fn input_text(&self) -> &str {
        self.input.as_str()
    }

    #[inline]
    pub fn is_input_active(&self) -> bool {
        self.input.is_active()
    }

    #[inline]
    pub fn push_pending(&self) -> bool {
        self.push_pending
    }

    /// Flags raised by the most recent operation. Each operation
    /// overwrites them.
    #[inline]
    pub fn last_exceptions(&self) -> Flags {
        self.last_exceptions
    }

    #[inline]
    pub fn shift(&self) -> bool {
        self.shift
    }

    #[inline]
    pub fn set_shift(&mut self, on: bool) {
        self.shift = on;
    }

    // ==================== Post-operation ====================

    fn after_operation(&mut self) -> Outcome<D> {
        let flags = self.flags.take();
        self.last_exceptions = flags;
        let mut x = self.stack.x();
        if x.is_zero() {
            x = D::zero();
            self.stack.set_x(x);
        }
        self.input.clear();
        self.push_pending = !x.is_special();
        self.shift = false;
        debug!(x = %x, flags = %flags, "result");
        Outcome { value: x, flags }
    }

    /// Parse a trusted literal without touching the live flags.
    fn literal(text: &str) -> D {
        let mut scratch = Flags::NONE;
        D::parse(text, &mut scratch).unwrap_or_else(D::zero)
    }

    /// Present a finished value in X the way a recall does.
    fn present(&mut self, value: D) {
        if self.push_pending {
            self.stack.push();
        }
        self.input.clear();
        self.stack.set_x(value);
        self.push_pending = true;
    }

    // ==================== Literal editing ====================

    /// Push first if X holds a finished value.
    fn begin_edit(&mut self) {
        if self.push_pending || !self.input.is_active() {
            self.capture_undo();
        }
        if self.push_pending {
            self.stack.push();
            self.input.clear();
            self.push_pending = false;
        }
    }

    /// Mirror a complete literal into X.
    fn mirror_input(&mut self) {
        if let Some(text) = self.input.complete() {
            if let Some(value) = D::parse(text, &mut self.flags) {
                self.stack.set_x(value);
            }
        }
    }

    /// Type a digit `'0'..='9'`. False if rejected.
    pub fn input_digit(&mut self, digit: char) -> bool {
        if !digit.is_ascii_digit() {
            warn!(digit = %digit, "not a digit");
            return false;
        }
        self.begin_edit();
        let ok = self.input.push_digit(digit);
        self.mirror_input();
        ok
    }

    /// Type the decimal point.
    pub fn input_dot(&mut self) -> bool {
        self.begin_edit();
        self.input.push_dot()
    }

    /// Type the exponent marker.
    pub fn input_exponent(&mut self) -> bool {
        self.begin_edit();
        self.input.push_exponent()
    }

    /// Toggle the sign being typed, or negate X when not editing.
    pub fn toggle_sign(&mut self) {
        if self.input.is_active() {
            self.input.toggle_sign();
            self.mirror_input();
            return;
        }
        self.capture_undo();
        self.stack.save_last_x();
        let x = self.stack.x().negate();
        self.stack.set_x(x);
        self.after_operation();
    }

    pub fn backspace(&mut self) {
        match self.input.backspace() {
            Erased::Nothing => {}
            Erased::Editing => self.mirror_input(),
            Erased::Emptied => self.stack.set_x(D::zero()),
        }
    }

    /// Commit the literal and push. Never pushes twice.
    pub fn enter(&mut self) {
        self.capture_undo();
        if self.input.is_active() {
            self.mirror_input();
        }
        self.stack.push();
        self.input.clear();
        self.push_pending = false;
        debug!(x = %self.stack.x(), "enter");
    }

    /// Commit the literal into X without pushing.
    pub fn commit_input(&mut self) {
        if self.input.is_active() {
            self.mirror_input();
        }
        self.input.clear();
        self.push_pending = false;
    }

    /// X <- 0; the next digit overwrites it.
    pub fn clear_x(&mut self) {
        self.capture_undo();
        self.input.clear();
        self.stack.set_x(D::zero());
        self.push_pending = false;
    }

    /// Drop any partial literal without touching X.
    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    // ==================== Stack manipulation ====================

    pub fn swap(&mut self) {
        self.capture_undo();
        self.stack.swap();
        self.input.clear();
        self.push_pending = true;
    }

    pub fn roll_up(&mut self) {
        self.capture_undo();
        self.stack.roll_up();
        self.input.clear();
        self.push_pending = true;
    }

    pub fn roll_down(&mut self) {
        self.capture_undo();
        self.stack.roll_down();
        self.input.clear();
        self.push_pending = true;
    }

    /// Overwrite X directly, saving LastX and dropping any partial literal.
    pub fn set_x(&mut self, value: D) {
        self.capture_undo();
        self.stack.save_last_x();
        self.stack.set_x(value);
        self.input.clear();
    }

    // ==================== Recall ====================

    pub fn recall_last_x(&mut self) {
        self.capture_undo();
        let last = self.stack.last_x();
        self.present(last);
    }

    pub fn input_pi(&mut self) {
        self.capture_undo();
        self.present(Self::literal(constants::PI));
    }

    pub fn input_e(&mut self) {
        self.capture_undo();
        self.present(Self::literal(constants::E));
    }

    /// Recall catalog entry `index` of `group` (1 or 2).
    pub fn load_constant(&mut self, group: usize, index: usize) -> bool {
        let Some(entry) = constants::lookup(group, index) else {
            warn!(group, index, "no such constant");
            return false;
        };
        self.capture_undo();
        self.present(Self::literal(entry.value));
        debug!(symbol = entry.symbol, "constant");
        true
    }

    /// The LAST key: LastX recall or undo, by setting.
    pub fn last_key(&mut self) {
        match self.settings.last_key_mode {
            LastKeyMode::LastX => self.recall_last_x(),
            LastKeyMode::Undo => {
                self.undo();
            }
        }
    }

    // ==================== Variables ====================

    pub fn set_pending_var_op(&mut self, op: VarOp) {
        self.vars.set_pending(op);
    }

    #[inline]
    pub fn pending_var_op(&self) -> VarOp {
        self.vars.pending()
    }

    /// `S`, `L` or `C` while a variable operation waits for its slot.
    #[inline]
    pub fn var_indicator(&self) -> Option<char> {
        self.vars.pending().indicator()
    }

    pub fn var(&self, index: usize) -> Option<D> {
        self.vars.get(index)
    }

    /// Apply the pending variable operation to slot `index` (0..6).
    pub fn apply_slot(&mut self, index: usize) -> bool {
        if index >= VAR_SLOTS {
            warn!(index, "no such variable slot");
            return false;
        }
        let op = self.vars.take_pending();
        match op {
            VarOp::None => return false,
            VarOp::Store => {
                self.vars.set(index, self.stack.x());
            }
            VarOp::Load => {
                self.capture_undo();
                let value = self.vars.get(index).unwrap_or_else(D::zero);
                self.present(value);
            }
            VarOp::Clear => {
                self.vars.set(index, D::zero());
            }
        }
        debug!(?op, slot = ?slot_name(index), "variable");
        true
    }

    /// A slot key: applies the pending operation, or loads when none is set.
    pub fn press_slot(&mut self, index: usize) -> bool {
        if self.vars.pending() == VarOp::None {
            self.vars.set_pending(VarOp::Load);
        }
        let ok = self.apply_slot(index);
        if !ok {
            self.vars.set_pending(VarOp::None);
        }
        ok
    }

    // ==================== Operations ====================

    /// Run a function key, routing trig keys to their hyperbolic
    /// counterparts while hyperbolic mode is on.
    pub fn apply_key_op(&mut self, op: Operation) -> Outcome<D> {
        let op = if self.settings.hyperbolic_mode.is_on() { op.hyperbolic() } else { op };
        self.apply(op)
    }

    /// Run one operation on the stack.
    pub fn apply(&mut self, op: Operation) -> Outcome<D> {
        self.capture_undo();
        debug!(op = %op, x = %self.stack.x(), "apply");
        let x = self.stack.x();
        self.stack.save_last_x();
        let result = match op.arity() {
            Arity::Binary => {
                let y = self.stack.y();
                let r = self.binary(op, y, x);
                self.stack.pop();
                r
            }
            Arity::Unary => self.unary(op, x),
        };
        self.stack.set_x(result);
        self.after_operation()
    }

    fn binary(&mut self, op: Operation, y: D, x: D) -> D {
        let f = &mut self.flags;
        match op {
            Operation::Add => y.add(x, f),
            Operation::Sub => y.sub(x, f),
            Operation::Mul => y.mul(x, f),
            Operation::Div => y.div(x, f),
            Operation::Pow => y.pow(x, f),
            Operation::NthRoot => {
                let inv = D::one().div(y, f);
                x.pow(inv, f)
            }
            Operation::LogXY => {
                let ln_y = y.ln(f);
                let ln_x = x.ln(f);
                ln_y.div(ln_x, f)
            }
            _ => self.unary(op, x),
        }
    }

    fn unary(&mut self, op: Operation, x: D) -> D {
        match op {
            Operation::Sin | Operation::Cos | Operation::Tan => {
                let r = self.to_radians(x);
                let f = &mut self.flags;
                match op {
                    Operation::Sin => r.sin(f),
                    Operation::Cos => r.cos(f),
                    _ => r.tan(f),
                }
            }
            Operation::Asin | Operation::Acos | Operation::Atan => {
                let f = &mut self.flags;
                let r = match op {
                    Operation::Asin => x.asin(f),
                    Operation::Acos => x.acos(f),
                    _ => x.atan(f),
                };
                self.from_radians(r)
            }
            Operation::Factorial => self.factorial(x),
            _ => {
                let f = &mut self.flags;
                match op {
                    Operation::Sqrt => x.sqrt(f),
                    Operation::Reciprocal => D::one().div(x, f),
                    Operation::Square => x.mul(x, f),
                    Operation::Cube => {
                        let sq = x.mul(x, f);
                        sq.mul(x, f)
                    }
                    Operation::Cbrt => x.cbrt(f),
                    Operation::Log10 => x.log10(f),
                    Operation::Ln => x.ln(f),
                    Operation::Exp => x.exp(f),
                    Operation::Exp10 => x.exp10(f),
                    Operation::Sinh => x.sinh(f),
                    Operation::Cosh => x.cosh(f),
                    Operation::Tanh => x.tanh(f),
                    Operation::Asinh => x.asinh(f),
                    Operation::Acosh => x.acosh(f),
                    Operation::Atanh => x.atanh(f),
                    // Binary operations never reach here through `apply`.
                    _ => x,
                }
            }
        }
    }

    fn to_radians(&mut self, x: D) -> D {
        let factor = match self.settings.angle_mode {
            AngleMode::Rad => return x,
            AngleMode::Deg => constants::DEG_TO_RAD,
            AngleMode::Grad => constants::GRAD_TO_RAD,
        };
        x.mul(Self::literal(factor), &mut self.flags)
    }

    fn from_radians(&mut self, r: D) -> D {
        let factor = match self.settings.angle_mode {
            AngleMode::Rad => return r,
            AngleMode::Deg => constants::RAD_TO_DEG,
            AngleMode::Grad => constants::RAD_TO_GRAD,
        };
        r.mul(Self::literal(factor), &mut self.flags)
    }

    /// n! by repeated multiplication for non-negative integers, Gamma(x + 1)
    /// otherwise.
    fn factorial(&mut self, x: D) -> D {
        // -Inf falls through to Gamma(-Inf), which is invalid.
        if x.is_nan() || (x.is_infinite() && !x.is_negative()) {
            return x;
        }
        let mut probe = Flags::NONE;
        let n = x.round_integral_exact(&mut probe);
        let integral = !probe.contains(Flags::INEXACT);
        if integral && !x.quiet_less(&D::zero()) {
            let one = D::one();
            let mut acc = one;
            let mut i = D::from_i64(2);
            while i.quiet_less_equal(&n) {
                acc = acc.mul(i, &mut self.flags);
                if acc.is_infinite() {
                    break;
                }
                i = i.add(one, &mut self.flags);
            }
            return acc;
        }
        let z = x.add(D::one(), &mut self.flags);
        z.tgamma(&mut self.flags)
    }

    // ==================== Settings ====================

    #[inline]
    pub fn settings(&self) -> Settings {
        self.settings
    }

    #[inline]
    pub fn disp_mode(&self) -> DispMode {
        self.settings.disp_mode
    }

    #[inline]
    pub fn zero_mode(&self) -> ZeroMode {
        self.settings.zero_mode
    }

    #[inline]
    pub fn angle_mode(&self) -> AngleMode {
        self.settings.angle_mode
    }

    #[inline]
    pub fn hyperbolic_mode(&self) -> HyperbolicMode {
        self.settings.hyperbolic_mode
    }

    fn notify(&mut self) {
        debug!(settings = %self.settings, "settings changed");
        let settings = self.settings;
        if let Some(observer) = self.observer.as_mut() {
            observer.settings_changed(&settings);
        }
    }

    pub fn set_disp_mode(&mut self, mode: DispMode) {
        self.settings.disp_mode = mode;
        self.notify();
    }

    pub fn set_zero_mode(&mut self, mode: ZeroMode) {
        self.settings.zero_mode = mode;
        self.notify();
    }

    pub fn set_angle_mode(&mut self, mode: AngleMode) {
        self.settings.angle_mode = mode;
        self.notify();
    }

    pub fn set_hyperbolic_mode(&mut self, mode: HyperbolicMode) {
        self.settings.hyperbolic_mode = mode;
        self.notify();
    }

    pub fn set_last_key_mode(&mut self, mode: LastKeyMode) {
        self.settings.last_key_mode = mode;
        self.notify();
    }

    pub fn set_resume_enabled(&mut self, enabled: bool) {
        self.settings.resume_enabled = enabled;
        self.notify();
    }

    /// Replace all settings at once.
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
        self.notify();
    }

    // ==================== Undo ====================

    fn capture_undo(&mut self) {
        if !self.undo_pinned {
            self.undo = Some(UndoSnapshot { regs: self.stack.regs(), last_x: self.stack.last_x() });
        }
    }

    /// Capture now and keep this snapshot until it is used, cleared or
    /// released.
    pub fn undo_capture_boundary(&mut self) {
        self.undo_pinned = false;
        self.capture_undo();
        self.undo_pinned = true;
        debug!("undo boundary");
    }

    /// Let automatic captures resume, keeping the current snapshot.
    pub fn undo_release_boundary(&mut self) {
        self.undo_pinned = false;
    }

    pub fn undo_clear(&mut self) {
        self.undo = None;
        self.undo_pinned = false;
    }

    #[inline]
    pub fn can_undo(&self) -> bool {
        self.undo.is_some()
    }

    /// Restore the registers captured before the last stack change.
    pub fn undo(&mut self) -> bool {
        self.undo_pinned = false;
        let Some(snapshot) = self.undo.take() else {
            return false;
        };
        self.stack.load(snapshot.regs, snapshot.last_x);
        self.input.clear();
        self.push_pending = true;
        debug!(x = %self.stack.x(), "undo");
        true
    }

    // ==================== Resets and snapshots ====================

    /// Zero X/Y/Z/T and LastX, drop the literal and the undo slot.
    pub fn reset_stack(&mut self) {
        self.stack.clear();
        self.input.clear();
        self.push_pending = false;
        self.undo_clear();
        debug!("stack reset");
    }

    pub fn reset_vars(&mut self) {
        self.vars.clear();
        debug!("variables reset");
    }

    /// Stack, variables, pending operation and exception flags.
    pub fn reset_memory(&mut self) {
        self.reset_stack();
        self.reset_vars();
        self.flags = Flags::NONE;
        self.last_exceptions = Flags::NONE;
        self.shift = false;
    }

    pub fn snapshot(&self) -> State<D> {
        let [x, y, z, t] = self.stack.regs();
        State { x, y, z, t, last_x: self.stack.last_x(), vars: self.vars.slots() }
    }

    /// Replace registers, LastX and variables as one unit.
    pub fn restore(&mut self, state: &State<D>) {
        self.stack.load([state.x, state.y, state.z, state.t], state.last_x);
        self.vars.load_slots(state.vars);
        self.input.clear();
        self.push_pending = true;
        self.undo_clear();
        debug!(x = %state.x, "state restored");
    }

    // ==================== Display ====================

    /// Render any value with the current modes.
    pub fn render_value(&self, value: &D, width: usize) -> DisplayText {
        render(value, width, self.settings.disp_mode, self.settings.zero_mode)
    }

    /// Render X with the current modes, ignoring any literal being typed.
    pub fn render_x(&self, width: usize) -> DisplayText {
        self.render_value(&self.stack.x(), width)
    }

    /// The X line: the raw literal while editing, the rendered value
    /// otherwise.
    pub fn display_x(&self, width: usize) -> DisplayText {
        if !self.input.is_active() {
            return self.render_x(width);
        }
        // Scroll so the newest keystroke stays at the right edge.
        let literal = self.input.as_str();
        let skip = literal.len().saturating_sub(width);
        let mut text = DisplayText::new();
        for c in literal[skip..].chars() {
            if text.push(c).is_err() {
                break;
            }
        }
        text
    }
}

impl<D: Decimal> Default for Calculator<D> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn calc() -> Calculator {
        Calculator::new()
    }

    fn num(text: &str) -> Dec128 {
        let mut flags = Flags::NONE;
        Dec128::parse(text, &mut flags).unwrap()
    }

    fn type_keys(c: &mut Calculator, keys: &str) {
        for k in keys.chars() {
            match k {
                '0'..='9' => {
                    c.input_digit(k);
                }
                '.' => {
                    c.input_dot();
                }
                'E' => {
                    c.input_exponent();
                }
                _ => panic!("bad key {}", k),
            }
        }
    }

    fn shown(c: &Calculator) -> String {
        c.render_x(LINE_WIDTH).as_str().to_string()
    }

    #[test]
    fn test_seven_enter_three_add() {
        let mut c = calc();
        type_keys(&mut c, "7");
        c.enter();
        type_keys(&mut c, "3");
        let out = c.apply(Operation::Add);
        assert!(out.value.quiet_equal(&num("10")));
        assert!(c.x().quiet_equal(&num("10")));
        assert!(c.y().is_zero());
        assert!(c.z().is_zero());
        assert!(c.t().is_zero());
        assert!(c.last_x().quiet_equal(&num("3")));
        assert!(out.flags.is_empty());
    }

    #[test]
    fn test_pi_display() {
        let mut c = calc();
        c.input_pi();
        assert_eq!(c.display_x(LINE_WIDTH).as_str(), "3.14159265358979");
    }

    #[test]
    fn test_large_literal_renders_scientific() {
        let mut c = calc();
        type_keys(&mut c, "1E20");
        assert_eq!(c.display_x(LINE_WIDTH).as_str(), "1E20");
        assert_eq!(shown(&c), "1E+20");
        c.commit_input();
        assert_eq!(c.display_x(LINE_WIDTH).as_str(), "1E+20");
    }

    #[test]
    fn test_reciprocal_of_zero() {
        let mut c = calc();
        type_keys(&mut c, "1");
        c.enter();
        c.clear_x();
        let out = c.apply(Operation::Reciprocal);
        assert_eq!(out.value, Dec128::INFINITY);
        assert!(out.flags.contains(Flags::DIV_ZERO));
        assert!(c.last_exceptions().contains(Flags::DIV_ZERO));
        assert_eq!(shown(&c), "Inf");
        assert!(!c.push_pending());

        type_keys(&mut c, "5");
        assert!(c.x().quiet_equal(&num("5")));
        assert!(c.y().quiet_equal(&num("1")));
    }

    #[test]
    fn test_finite_result_pushes_once() {
        let mut c = calc();
        type_keys(&mut c, "2");
        c.enter();
        type_keys(&mut c, "3");
        c.apply(Operation::Mul);
        assert!(c.push_pending());
        type_keys(&mut c, "45");
        assert!(c.x().quiet_equal(&num("45")));
        assert!(c.y().quiet_equal(&num("6")));
        assert!(c.z().is_zero());
    }

    #[test]
    fn test_nan_result_does_not_push() {
        let mut c = calc();
        type_keys(&mut c, "4");
        c.toggle_sign();
        c.enter();
        type_keys(&mut c, "9");
        c.swap();
        let out = c.apply(Operation::Sqrt);
        assert!(out.value.is_nan());
        assert!(out.flags.contains(Flags::INVALID));
        type_keys(&mut c, "2");
        assert!(c.x().quiet_equal(&num("2")));
        assert!(c.y().quiet_equal(&num("9")));
    }

    #[test]
    fn test_input_mirrors_into_x() {
        let mut c = calc();
        type_keys(&mut c, "1.");
        assert!(c.x().quiet_equal(&num("1")));
        type_keys(&mut c, "5");
        assert!(c.x().quiet_equal(&num("1.5")));
        c.toggle_sign();
        assert!(c.x().quiet_equal(&num("-1.5")));
        assert_eq!(c.input_text(), "-1.5");
        c.backspace();
        assert!(c.x().quiet_equal(&num("-1.5")));
        c.backspace();
        assert!(c.x().quiet_equal(&num("-1")));
        c.backspace();
        assert!(!c.is_input_active());
        assert!(c.x().is_zero());
    }

    #[test]
    fn test_dot_after_exponent_rejected() {
        let mut c = calc();
        type_keys(&mut c, "1E2");
        assert!(!c.input_dot());
        type_keys(&mut c, "5");
        assert_eq!(c.input_text(), "1E25");
        c.enter();
        assert!(c.y().quiet_equal(&num("1E25")));
    }

    #[test]
    fn test_long_literal_scrolls() {
        let mut c = calc();
        type_keys(&mut c, "12345678901234567890");
        assert_eq!(c.display_x(LINE_WIDTH).as_str(), "5678901234567890");
        assert_eq!(c.display_x(SHOW_WIDTH).as_str(), "12345678901234567890");
        type_keys(&mut c, "1");
        assert_eq!(c.display_x(LINE_WIDTH).as_str(), "6789012345678901");
    }

    #[test]
    fn test_dot_on_fresh_entry_pushes() {
        let mut c = calc();
        type_keys(&mut c, "8");
        c.apply(Operation::Square);
        type_keys(&mut c, ".5");
        assert_eq!(c.input_text(), "0.5");
        assert!(c.x().quiet_equal(&num("0.5")));
        assert!(c.y().quiet_equal(&num("64")));
    }

    #[test]
    fn test_toggle_sign_outside_editing() {
        let mut c = calc();
        type_keys(&mut c, "7");
        c.enter();
        c.toggle_sign();
        assert!(c.x().quiet_equal(&num("-7")));
        assert!(c.last_x().quiet_equal(&num("7")));
        assert!(c.push_pending());
    }

    #[test]
    fn test_enter_does_not_double_push() {
        let mut c = calc();
        type_keys(&mut c, "3");
        c.enter();
        type_keys(&mut c, "4");
        assert!(c.y().quiet_equal(&num("3")));
        assert!(c.z().is_zero());
    }

    #[test]
    fn test_zero_result_is_canonical() {
        let mut c = calc();
        type_keys(&mut c, "2.50");
        c.enter();
        type_keys(&mut c, "2.5");
        c.toggle_sign();
        c.apply(Operation::Add);
        assert_eq!(c.x(), Dec128::ZERO);
        assert_eq!(c.x().to_string(), "+0E+0");
    }

    #[test]
    fn test_binary_operand_order() {
        let mut c = calc();
        type_keys(&mut c, "10");
        c.enter();
        type_keys(&mut c, "4");
        c.apply(Operation::Sub);
        assert!(c.x().quiet_equal(&num("6")));

        type_keys(&mut c, "2");
        c.apply(Operation::Div);
        assert!(c.x().quiet_equal(&num("3")));

        type_keys(&mut c, "4");
        c.apply(Operation::Pow);
        assert!(c.x().quiet_equal(&num("81")));
    }

    #[test]
    fn test_root_and_log_base() {
        let mut c = calc();
        type_keys(&mut c, "3");
        c.enter();
        type_keys(&mut c, "8");
        c.apply(Operation::NthRoot);
        assert_eq!(shown(&c), "2");

        c.clear_x();
        type_keys(&mut c, "8");
        c.enter();
        type_keys(&mut c, "2");
        c.apply(Operation::LogXY);
        assert_eq!(shown(&c), "3");
    }

    #[test]
    fn test_degree_trig() {
        let mut c = calc();
        type_keys(&mut c, "30");
        c.apply(Operation::Sin);
        assert_eq!(shown(&c), "0.5");
        c.apply(Operation::Asin);
        assert_eq!(shown(&c), "30");
    }

    #[test]
    fn test_radian_and_grad_trig() {
        let mut c = calc();
        c.set_angle_mode(AngleMode::Rad);
        type_keys(&mut c, "1");
        c.apply(Operation::Atan);
        type_keys(&mut c, "4");
        c.apply(Operation::Mul);
        assert_eq!(shown(&c), "3.14159265358979");

        c.set_angle_mode(AngleMode::Grad);
        c.clear_x();
        type_keys(&mut c, "1");
        c.apply(Operation::Asin);
        assert_eq!(shown(&c), "100");
    }

    #[test]
    fn test_hyperbolic_routing() {
        let mut routed = calc();
        routed.set_hyperbolic_mode(HyperbolicMode::On);
        type_keys(&mut routed, "1");
        routed.apply_key_op(Operation::Sin);

        let mut direct = calc();
        type_keys(&mut direct, "1");
        direct.apply(Operation::Sinh);
        assert_eq!(routed.x(), direct.x());
    }

    #[test]
    fn test_factorial() {
        let mut c = calc();
        type_keys(&mut c, "5");
        let out = c.apply(Operation::Factorial);
        assert!(out.value.quiet_equal(&num("120")));
        assert!(out.flags.is_empty());

        c.clear_x();
        let out = c.apply(Operation::Factorial);
        assert!(out.value.quiet_equal(&num("1")));

        c.set_x(num("3.5"));
        c.apply(Operation::Factorial);
        assert_eq!(shown(&c), "11.6317283965674");

        c.set_x(num("-1"));
        let out = c.apply(Operation::Factorial);
        assert_eq!(out.value, Dec128::INFINITY);
        assert!(out.flags.contains(Flags::DIV_ZERO));

        c.set_x(num("-2"));
        let out = c.apply(Operation::Factorial);
        assert!(out.value.is_nan());
        assert!(out.flags.contains(Flags::INVALID));

        c.set_x(Dec128::NAN);
        assert!(c.apply(Operation::Factorial).value.is_nan());
    }

    #[test]
    fn test_factorial_overflow() {
        let mut c = calc();
        c.set_x(num("5000"));
        let out = c.apply(Operation::Factorial);
        assert_eq!(out.value, Dec128::INFINITY);
        assert!(out.flags.contains(Flags::OVERFLOW));
    }

    #[test]
    fn test_unary_ops() {
        let mut c = calc();
        c.set_x(num("3"));
        c.apply(Operation::Cube);
        assert!(c.x().quiet_equal(&num("27")));
        c.apply(Operation::Cbrt);
        assert_eq!(shown(&c), "3");
        c.apply(Operation::Exp10);
        assert_eq!(shown(&c), "1000");
        c.apply(Operation::Log10);
        assert_eq!(shown(&c), "3");
        c.set_x(num("0"));
        c.apply(Operation::Exp);
        assert_eq!(shown(&c), "1");
        c.apply(Operation::Ln);
        assert_eq!(shown(&c), "0");

        c.set_x(num("2"));
        c.apply(Operation::Reciprocal);
        assert_eq!(shown(&c), "0.5");
    }

    #[test]
    fn test_variables() {
        let mut c = calc();
        type_keys(&mut c, "42");
        assert!(!c.apply_slot(0));
        c.set_pending_var_op(VarOp::Store);
        assert_eq!(c.var_indicator(), Some('S'));
        assert!(!c.apply_slot(6));
        assert!(c.apply_slot(2));
        assert_eq!(c.var_indicator(), None);
        assert!(c.var(2).is_some_and(|v| v.quiet_equal(&num("42"))));

        c.clear_x();
        c.set_pending_var_op(VarOp::Load);
        assert!(c.apply_slot(2));
        assert!(c.x().quiet_equal(&num("42")));
        assert!(c.push_pending());

        c.set_pending_var_op(VarOp::Clear);
        assert!(c.apply_slot(2));
        assert!(c.var(2).is_some_and(|v| v.is_zero()));
        assert_eq!(c.pending_var_op(), VarOp::None);

        // A bad index keeps the selection for the next slot key.
        c.set_pending_var_op(VarOp::Store);
        assert!(!c.apply_slot(9));
        assert_eq!(c.pending_var_op(), VarOp::Store);
        assert!(c.apply_slot(0));
        assert_eq!(c.pending_var_op(), VarOp::None);
    }

    #[test]
    fn test_press_slot_loads_by_default() {
        let mut c = calc();
        type_keys(&mut c, "9");
        c.set_pending_var_op(VarOp::Store);
        c.press_slot(1);
        c.enter();
        type_keys(&mut c, "1");
        c.apply(Operation::Add);
        assert!(c.press_slot(1));
        assert!(c.x().quiet_equal(&num("9")));
        assert!(c.y().quiet_equal(&num("10")));
        assert!(!c.press_slot(7));
        assert_eq!(c.pending_var_op(), VarOp::None);
    }

    #[test]
    fn test_constants() {
        let mut c = calc();
        assert!(c.load_constant(1, 0));
        assert!(c.x().quiet_equal(&num("299792458")));
        assert!(c.load_constant(2, 9));
        assert!(c.y().quiet_equal(&num("299792458")));
        assert!(!c.load_constant(3, 0));
        assert!(!c.load_constant(1, 10));
    }

    #[test]
    fn test_recall_last_x() {
        let mut c = calc();
        type_keys(&mut c, "6");
        c.enter();
        type_keys(&mut c, "2");
        c.apply(Operation::Div);
        c.recall_last_x();
        assert!(c.x().quiet_equal(&num("2")));
        assert!(c.y().quiet_equal(&num("3")));
    }

    #[test]
    fn test_undo_single_level() {
        let mut c = calc();
        type_keys(&mut c, "7");
        c.enter();
        type_keys(&mut c, "3");
        c.apply(Operation::Add);
        assert!(c.undo());
        assert!(c.x().quiet_equal(&num("3")));
        assert!(c.y().quiet_equal(&num("7")));
        assert!(c.push_pending());
        assert!(!c.undo());
    }

    #[test]
    fn test_undo_boundary_survives_several_steps() {
        let mut c = calc();
        type_keys(&mut c, "5");
        c.enter();
        c.undo_capture_boundary();
        c.apply(Operation::Square);
        c.apply(Operation::Square);
        c.swap();
        assert!(c.undo());
        assert!(c.x().quiet_equal(&num("5")));
        assert!(c.y().quiet_equal(&num("5")));

        c.undo_capture_boundary();
        c.undo_clear();
        assert!(!c.can_undo());
    }

    #[test]
    fn test_last_key_mode() {
        let mut c = calc();
        c.set_last_key_mode(LastKeyMode::Undo);
        type_keys(&mut c, "4");
        c.apply(Operation::Sqrt);
        c.last_key();
        assert!(c.x().quiet_equal(&num("4")));
    }

    #[test]
    fn test_snapshot_restore() {
        let mut c = calc();
        type_keys(&mut c, "1");
        c.enter();
        type_keys(&mut c, "2");
        c.set_pending_var_op(VarOp::Store);
        c.apply_slot(5);
        let state = c.snapshot();

        let mut other = calc();
        type_keys(&mut other, "99");
        other.restore(&state);
        assert_eq!(other.snapshot(), state);
        assert!(!other.is_input_active());
        assert!(other.push_pending());
        type_keys(&mut other, "3");
        assert!(other.y().quiet_equal(&num("2")));
    }

    #[test]
    fn test_resets() {
        let mut c = calc();
        type_keys(&mut c, "8");
        c.set_pending_var_op(VarOp::Store);
        c.apply_slot(0);
        c.enter();
        c.reset_stack();
        assert!(c.x().is_zero() && c.y().is_zero());
        assert!(c.var(0).is_some_and(|v| !v.is_zero()));
        c.reset_memory();
        assert!(c.var(0).is_some_and(|v| v.is_zero()));
        assert!(c.last_exceptions().is_empty());
    }

    #[test]
    fn test_settings_observer() {
        struct Counter(Rc<Cell<u32>>);
        impl SettingsObserver for Counter {
            fn settings_changed(&mut self, _settings: &Settings) {
                self.0.set(self.0.get() + 1);
            }
        }
        let count = Rc::new(Cell::new(0));
        let mut c = calc();
        c.set_observer(Box::new(Counter(count.clone())));
        c.set_disp_mode(DispMode::Scientific);
        c.set_zero_mode(ZeroMode::Pad);
        c.set_angle_mode(AngleMode::Rad);
        c.set_hyperbolic_mode(HyperbolicMode::On);
        assert_eq!(count.get(), 4);
        assert_eq!(c.disp_mode(), DispMode::Scientific);
        assert_eq!(c.zero_mode(), ZeroMode::Pad);
    }

    #[test]
    fn test_shift_cleared_by_operation() {
        let mut c = calc();
        c.set_shift(true);
        c.apply(Operation::Cos);
        assert!(!c.shift());
    }

    #[test]
    fn test_display_modes() {
        let mut c = calc();
        type_keys(&mut c, "12345");
        c.commit_input();
        c.set_disp_mode(DispMode::Engineering);
        assert_eq!(c.display_x(LINE_WIDTH).as_str(), "12.345E+3");
        c.set_disp_mode(DispMode::Scientific);
        assert_eq!(c.display_x(SHOW_WIDTH).as_str(), "1.2345E+4");
    }
}
