//! WebAssembly bindings for the calculator.
//!
//! This module provides JavaScript-friendly wrappers around the engine.

use wasm_bindgen::prelude::*;
use crate::decimal::{Dec128, Decimal, Flags};
use crate::rpn::{AngleMode, Calculator, DispMode, Operation, ZeroMode, LINE_WIDTH};
use crate::script::{parse_script, run_script, StateFile};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// WebAssembly-friendly calculator wrapper.
#[wasm_bindgen]
pub struct WasmCalculator {
    calc: Calculator<Dec128>,
    width: usize,
}

#[wasm_bindgen]
impl WasmCalculator {
    /// Create a cleared calculator.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            calc: Calculator::new(),
            width: LINE_WIDTH,
        }
    }

    /// Press the keys named by one script token group, e.g. `"sin"` or
    /// `"sto A"`.
    #[wasm_bindgen]
    pub fn key(&mut self, token: &str) -> Result<(), JsError> {
        let keys = parse_script(token)
            .map_err(|e| JsError::new(&format!("{}", e)))?;
        for key in keys {
            key.press(&mut self.calc);
        }
        Ok(())
    }

    /// Run a whole script. Returns the number of keys pressed.
    #[wasm_bindgen]
    pub fn run(&mut self, source: &str) -> Result<usize, JsError> {
        run_script(&mut self.calc, source)
            .map_err(|e| JsError::new(&format!("{}", e)))
    }

    /// Apply an operation by mnemonic (`"+"`, `"sqrt"`, ...).
    #[wasm_bindgen]
    pub fn apply(&mut self, name: &str) -> Result<String, JsError> {
        let op = Operation::from_name(name)
            .ok_or_else(|| JsError::new(&format!("unknown operation: {}", name)))?;
        let outcome = self.calc.apply_key_op(op);
        Ok(self.calc.render_value(&outcome.value, self.width).to_string())
    }

    /// Set the display width used by the accessors below.
    #[wasm_bindgen]
    pub fn set_width(&mut self, width: usize) {
        self.width = width;
    }

    /// The X line as shown on the display.
    #[wasm_bindgen]
    pub fn display(&self) -> String {
        self.calc.display_x(self.width).to_string()
    }

    #[wasm_bindgen]
    pub fn x(&self) -> String {
        self.render(self.calc.x())
    }

    #[wasm_bindgen]
    pub fn y(&self) -> String {
        self.render(self.calc.y())
    }

    #[wasm_bindgen]
    pub fn z(&self) -> String {
        self.render(self.calc.z())
    }

    #[wasm_bindgen]
    pub fn t(&self) -> String {
        self.render(self.calc.t())
    }

    #[wasm_bindgen]
    pub fn last_x(&self) -> String {
        self.render(self.calc.last_x())
    }

    /// Flags raised by the last operation, e.g. `"div-by-zero|inexact"`.
    #[wasm_bindgen]
    pub fn exceptions(&self) -> String {
        let flags: Flags = self.calc.last_exceptions();
        flags.to_string()
    }

    /// Status line: modes and the pending variable indicator.
    #[wasm_bindgen]
    pub fn status(&self) -> String {
        match self.calc.var_indicator() {
            Some(c) => format!("{} {}", self.calc.settings(), c),
            None => self.calc.settings().to_string(),
        }
    }

    #[wasm_bindgen]
    pub fn cycle_disp_mode(&mut self) {
        let mode: DispMode = self.calc.disp_mode().next();
        self.calc.set_disp_mode(mode);
    }

    #[wasm_bindgen]
    pub fn cycle_zero_mode(&mut self) {
        let mode: ZeroMode = self.calc.zero_mode().next();
        self.calc.set_zero_mode(mode);
    }

    #[wasm_bindgen]
    pub fn cycle_angle_mode(&mut self) {
        let mode: AngleMode = self.calc.angle_mode().next();
        self.calc.set_angle_mode(mode);
    }

    #[wasm_bindgen]
    pub fn toggle_hyperbolic(&mut self) {
        let mode = self.calc.hyperbolic_mode().next();
        self.calc.set_hyperbolic_mode(mode);
    }

    /// Clear stack, variables and flags.
    #[wasm_bindgen]
    pub fn reset(&mut self) {
        self.calc.reset_memory();
    }

    /// Serialize registers, variables and settings as the resume JSON.
    #[wasm_bindgen]
    pub fn save_json(&self) -> Result<String, JsError> {
        StateFile::capture(&self.calc)
            .to_json()
            .map_err(|e| JsError::new(&format!("{}", e)))
    }

    /// Restore from resume JSON.
    #[wasm_bindgen]
    pub fn load_json(&mut self, text: &str) -> Result<(), JsError> {
        let file = StateFile::from_json(text)
            .map_err(|e| JsError::new(&format!("{}", e)))?;
        file.apply(&mut self.calc);
        Ok(())
    }
}

impl WasmCalculator {
    fn render(&self, value: Dec128) -> String {
        self.calc.render_value(&value, self.width).to_string()
    }
}

impl Default for WasmCalculator {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a literal with the given modes (`"normal"|"sci"|"eng"`,
/// `"pad"|"trim"`).
#[wasm_bindgen]
pub fn wasm_render(literal: &str, width: usize, mode: &str, zero: &str) -> Result<String, JsError> {
    let mut flags = Flags::NONE;
    let value = Dec128::parse(literal, &mut flags)
        .ok_or_else(|| JsError::new(&format!("not a number: {}", literal)))?;
    let disp = match mode {
        "sci" => DispMode::Scientific,
        "eng" => DispMode::Engineering,
        _ => DispMode::Normal,
    };
    let zero = if zero == "pad" { ZeroMode::Pad } else { ZeroMode::Trim };
    Ok(crate::render::render(&value, width, disp, zero).to_string())
}
