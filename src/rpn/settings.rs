//! Display and angle settings.
//!
//! The engine reads these on every render and trig operation. Every setter
//! on [`crate::rpn::Calculator`] hands the full [`Settings`] to the
//! registered [`SettingsObserver`] so a persistence layer can mark itself
//! dirty; the engine itself never performs I/O.

use serde::{Serialize, Deserialize};
use std::fmt;

/// How numbers are laid out on the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DispMode {
    /// Fixed point, falling back to scientific when it does not fit.
    #[default]
    Normal,
    Scientific,
    /// Exponent restricted to multiples of three.
    Engineering,
}

impl DispMode {
    /// Cycle NORMAL -> SCI -> ENG -> NORMAL.
    pub fn next(self) -> Self {
        match self {
            DispMode::Normal => DispMode::Scientific,
            DispMode::Scientific => DispMode::Engineering,
            DispMode::Engineering => DispMode::Normal,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DispMode::Normal => "NORM",
            DispMode::Scientific => "SCI",
            DispMode::Engineering => "ENG",
        }
    }
}

/// Whether trailing fractional zeros are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ZeroMode {
    Pad,
    #[default]
    Trim,
}

impl ZeroMode {
    pub fn next(self) -> Self {
        match self {
            ZeroMode::Pad => ZeroMode::Trim,
            ZeroMode::Trim => ZeroMode::Pad,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ZeroMode::Pad => "PAD",
            ZeroMode::Trim => "TRIM",
        }
    }
}

/// Unit of the circular trig functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AngleMode {
    #[default]
    Deg,
    Rad,
    Grad,
}

impl AngleMode {
    /// Cycle DEG -> RAD -> GRAD -> DEG.
    pub fn next(self) -> Self {
        match self {
            AngleMode::Deg => AngleMode::Rad,
            AngleMode::Rad => AngleMode::Grad,
            AngleMode::Grad => AngleMode::Deg,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AngleMode::Deg => "DEG",
            AngleMode::Rad => "RAD",
            AngleMode::Grad => "GRAD",
        }
    }
}

/// Whether the trig keys select the hyperbolic functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HyperbolicMode {
    #[default]
    Off,
    On,
}

impl HyperbolicMode {
    pub fn next(self) -> Self {
        match self {
            HyperbolicMode::Off => HyperbolicMode::On,
            HyperbolicMode::On => HyperbolicMode::Off,
        }
    }

    #[inline]
    pub fn is_on(self) -> bool {
        self == HyperbolicMode::On
    }
}

/// What the LAST key does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LastKeyMode {
    /// Recall LastX.
    #[default]
    LastX,
    /// Undo the last stack change.
    Undo,
}

/// All persisted preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub disp_mode: DispMode,
    pub zero_mode: ZeroMode,
    pub angle_mode: AngleMode,
    pub hyperbolic_mode: HyperbolicMode,
    pub last_key_mode: LastKeyMode,
    /// Restore the stack and variables at power-on.
    pub resume_enabled: bool,
}

impl Settings {
    pub const fn new() -> Self {
        Self {
            disp_mode: DispMode::Normal,
            zero_mode: ZeroMode::Trim,
            angle_mode: AngleMode::Deg,
            hyperbolic_mode: HyperbolicMode::Off,
            last_key_mode: LastKeyMode::LastX,
            resume_enabled: true,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}{}",
            self.disp_mode.label(),
            self.zero_mode.label(),
            self.angle_mode.label(),
            if self.hyperbolic_mode.is_on() { " HYP" } else { "" }
        )
    }
}

/// Receives the full settings after every change.
pub trait SettingsObserver {
    fn settings_changed(&mut self, settings: &Settings);
}

/// Observer that only records that something changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirtyFlag {
    pub dirty: bool,
}

impl DirtyFlag {
    /// Read and clear the flag.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

impl SettingsObserver for DirtyFlag {
    fn settings_changed(&mut self, _settings: &Settings) {
        self.dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.disp_mode, DispMode::Normal);
        assert_eq!(s.zero_mode, ZeroMode::Trim);
        assert_eq!(s.angle_mode, AngleMode::Deg);
        assert_eq!(s.hyperbolic_mode, HyperbolicMode::Off);
        assert_eq!(s.last_key_mode, LastKeyMode::LastX);
    }

    #[test]
    fn test_cycles() {
        assert_eq!(DispMode::Normal.next().next().next(), DispMode::Normal);
        assert_eq!(DispMode::Normal.next(), DispMode::Scientific);
        assert_eq!(AngleMode::Deg.next(), AngleMode::Rad);
        assert_eq!(AngleMode::Rad.next(), AngleMode::Grad);
        assert_eq!(AngleMode::Grad.next(), AngleMode::Deg);
        assert_eq!(ZeroMode::Pad.next(), ZeroMode::Trim);
        assert!(HyperbolicMode::Off.next().is_on());
    }

    #[test]
    fn test_missing_fields_default_when_deserializing() {
        let s: Settings = serde_json::from_str(r#"{"disp_mode":"Engineering"}"#).unwrap();
        assert_eq!(s.disp_mode, DispMode::Engineering);
        assert_eq!(s.angle_mode, AngleMode::Deg);
        assert!(s.resume_enabled);
    }

    #[test]
    fn test_display() {
        let mut s = Settings::new();
        s.hyperbolic_mode = HyperbolicMode::On;
        assert_eq!(s.to_string(), "NORM TRIM DEG HYP");
    }

    #[test]
    fn test_dirty_flag() {
        let mut flag = DirtyFlag::default();
        flag.settings_changed(&Settings::new());
        assert!(flag.take());
        assert!(!flag.take());
    }
}
