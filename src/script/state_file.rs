//! Resume file.
//!
//! A JSON document holding the register/variable snapshot and the
//! settings, written when the host shuts down and read back at start-up:
//!
//! ```json
//! { "version": 1, "settings": { "disp_mode": "Normal", ... }, "state": { "x": ..., ... } }
//! ```

use crate::decimal::Dec128;
use crate::rpn::{Calculator, Settings, State};
use serde::{Serialize, Deserialize};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Current document version.
pub const STATE_VERSION: u32 = 1;

/// What the resume file stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateFile {
    pub version: u32,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub state: State<Dec128>,
}

impl StateFile {
    /// Capture a calculator.
    pub fn capture(calc: &Calculator<Dec128>) -> Self {
        Self { version: STATE_VERSION, settings: calc.settings(), state: calc.snapshot() }
    }

    /// Apply to a calculator. The registers are only restored when the
    /// stored settings allow it.
    pub fn apply(&self, calc: &mut Calculator<Dec128>) {
        calc.set_settings(self.settings);
        if self.settings.resume_enabled {
            calc.restore(&self.state);
        }
    }

    pub fn to_json(&self) -> Result<String, StateFileError> {
        serde_json::to_string_pretty(self).map_err(|e| StateFileError::ParseError(e.to_string()))
    }

    pub fn from_json(text: &str) -> Result<Self, StateFileError> {
        let file: StateFile = serde_json::from_str(text)
            .map_err(|e| StateFileError::ParseError(e.to_string()))?;
        if file.version != STATE_VERSION {
            return Err(StateFileError::UnsupportedVersion(file.version));
        }
        Ok(file)
    }
}

impl Default for StateFile {
    fn default() -> Self {
        Self { version: STATE_VERSION, settings: Settings::default(), state: State::default() }
    }
}

/// Load a resume file from disk.
pub fn load_state<P: AsRef<Path>>(path: P) -> Result<StateFile, StateFileError> {
    let text = std::fs::read_to_string(path.as_ref())
        .map_err(|e| StateFileError::IoError(e.to_string()))?;
    let file = StateFile::from_json(&text)?;
    debug!(path = %path.as_ref().display(), "state loaded");
    Ok(file)
}

/// Save a resume file to disk.
pub fn save_state<P: AsRef<Path>>(path: P, file: &StateFile) -> Result<(), StateFileError> {
    let text = file.to_json()?;
    std::fs::write(path.as_ref(), text).map_err(|e| StateFileError::IoError(e.to_string()))?;
    debug!(path = %path.as_ref().display(), "state saved");
    Ok(())
}

/// Errors that can occur while reading or writing the resume file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateFileError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("malformed state file: {0}")]
    ParseError(String),

    #[error("unsupported state file version {0}")]
    UnsupportedVersion(u32),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Decimal;
    use crate::rpn::{AngleMode, Operation, VarOp};

    fn sample() -> Calculator {
        let mut calc = Calculator::new();
        calc.input_digit('2');
        calc.enter();
        calc.input_digit('3');
        calc.apply(Operation::Div);
        calc.set_pending_var_op(VarOp::Store);
        calc.apply_slot(4);
        calc.set_angle_mode(AngleMode::Grad);
        calc
    }

    #[test]
    fn test_json_round_trip() {
        let calc = sample();
        let file = StateFile::capture(&calc);
        let text = file.to_json().unwrap();
        let back = StateFile::from_json(&text).unwrap();
        assert_eq!(back, file);

        let mut fresh = Calculator::new();
        back.apply(&mut fresh);
        assert_eq!(fresh.snapshot(), calc.snapshot());
        assert_eq!(fresh.angle_mode(), AngleMode::Grad);
    }

    #[test]
    fn test_resume_disabled_keeps_registers() {
        let calc = sample();
        let mut file = StateFile::capture(&calc);
        file.settings.resume_enabled = false;

        let mut fresh = Calculator::new();
        file.apply(&mut fresh);
        assert!(fresh.x().is_zero());
        assert_eq!(fresh.angle_mode(), AngleMode::Grad);
    }

    #[test]
    fn test_rejects_bad_documents() {
        assert!(matches!(StateFile::from_json("not json"), Err(StateFileError::ParseError(_))));
        assert_eq!(
            StateFile::from_json(r#"{"version": 9}"#),
            Err(StateFileError::UnsupportedVersion(9))
        );
        let minimal = StateFile::from_json(r#"{"version": 1}"#).unwrap();
        assert_eq!(minimal, StateFile::default());
    }

    #[test]
    fn test_disk_round_trip() {
        let path = std::env::temp_dir().join(format!("rpn-calc-state-{}.json", std::process::id()));
        let file = StateFile::capture(&sample());
        save_state(&path, &file).unwrap();
        let back = load_state(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(back, file);
        assert!(matches!(load_state(&path), Err(StateFileError::IoError(_))));
    }
}
