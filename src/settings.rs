//! Player-facing settings and preferences
//!
//! Loaded from JSON handed over by the host page. Anything that fails to
//! parse or validate is reported as a [`SettingsError`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which device steers the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum InputMode {
    /// Mouse position relative to the player, keyboard as fallback
    #[default]
    Pointer,
    /// Drag from the touch origin, tap to shoot
    Touch,
    /// Arrow keys / A-D only
    Keyboard,
}

impl InputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputMode::Pointer => "Pointer",
            InputMode::Touch => "Touch",
            InputMode::Keyboard => "Keyboard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pointer" | "mouse" => Some(InputMode::Pointer),
            "touch" => Some(InputMode::Touch),
            "keyboard" | "keys" => Some(InputMode::Keyboard),
            _ => None,
        }
    }

    /// Hint line shown at the bottom of the screen early in a session
    pub fn controls_hint(&self) -> &'static str {
        match self {
            InputMode::Pointer => "Mouse to move \u{2022} Click or Space to shoot",
            InputMode::Touch => "Drag to move \u{2022} Tap to shoot",
            InputMode::Keyboard => "Arrows to move \u{2022} Space to shoot",
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub input_mode: InputMode,

    // === Pointer ===
    /// Pixels around the player's center that do not steer
    pub pointer_dead_zone: f32,
    /// Pixels per frame of horizontal speed per pixel of pointer offset
    pub pointer_gain: f32,

    // === Touch ===
    /// Pixels per frame of horizontal speed per pixel dragged
    pub touch_sensitivity: f32,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === HUD ===
    /// Show the controls hint while the score is still low
    pub show_controls_hint: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input_mode: InputMode::Pointer,

            pointer_dead_zone: 5.0,
            pointer_gain: 0.1,

            touch_sensitivity: 0.02,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,

            show_controls_hint: true,
        }
    }
}

/// Reasons a settings document is rejected
#[derive(Debug)]
pub enum SettingsError {
    /// Not valid JSON, or fields of the wrong type
    Parse(serde_json::Error),
    /// A numeric field outside its allowed range
    OutOfRange { field: &'static str, value: f32 },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Parse(err) => write!(f, "invalid settings JSON: {err}"),
            SettingsError::OutOfRange { field, value } => {
                write!(f, "setting `{field}` out of range: {value}")
            }
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Parse(err) => Some(err),
            SettingsError::OutOfRange { .. } => None,
        }
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(err: serde_json::Error) -> Self {
        SettingsError::Parse(err)
    }
}

impl Settings {
    /// Parse and validate a settings document. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse settings, falling back to defaults with a warning
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(settings) => {
                log::info!("Loaded settings ({} input)", settings.input_mode.as_str());
                settings
            }
            Err(err) => {
                log::warn!("{err}; using default settings");
                Self::default()
            }
        }
    }

    /// Reject values the input and audio layers cannot use
    pub fn validate(&self) -> Result<(), SettingsError> {
        let unit = [
            ("master_volume", self.master_volume),
            ("sfx_volume", self.sfx_volume),
        ];
        for (field, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(SettingsError::OutOfRange { field, value });
            }
        }

        let non_negative = [
            ("pointer_dead_zone", self.pointer_dead_zone),
            ("pointer_gain", self.pointer_gain),
            ("touch_sensitivity", self.touch_sensitivity),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(SettingsError::OutOfRange { field, value });
            }
        }
        Ok(())
    }

    /// Effective cue volume (respects mute)
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.pointer_dead_zone, 5.0);
        assert_eq!(settings.touch_sensitivity, 0.02);
    }

    #[test]
    fn test_json_round_trip_keeps_changes() {
        let settings = Settings {
            input_mode: InputMode::Touch,
            muted: true,
            ..Settings::default()
        };
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let settings = Settings::from_json(r#"{"input_mode":"Keyboard"}"#).unwrap();
        assert_eq!(settings.input_mode, InputMode::Keyboard);
        assert_eq!(settings.master_volume, Settings::default().master_volume);
    }

    #[test]
    fn test_rejects_bad_json() {
        let err = Settings::from_json("{not json").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
        assert!(err.to_string().starts_with("invalid settings JSON"));
    }

    #[test]
    fn test_rejects_out_of_range() {
        let err = Settings::from_json(r#"{"sfx_volume":1.5}"#).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::OutOfRange {
                field: "sfx_volume",
                ..
            }
        ));

        let err = Settings::from_json(r#"{"pointer_gain":-0.1}"#).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::OutOfRange {
                field: "pointer_gain",
                ..
            }
        ));
    }

    #[test]
    fn test_fallback_to_default() {
        assert_eq!(Settings::from_json_or_default("not json"), Settings::default());
    }

    #[test]
    fn test_effective_volume() {
        let mut settings = Settings::default();
        assert!((settings.effective_volume() - 0.8).abs() < 1e-6);
        settings.muted = true;
        assert_eq!(settings.effective_volume(), 0.0);
    }

    #[test]
    fn test_input_mode_from_str() {
        assert_eq!(InputMode::from_str("Mouse"), Some(InputMode::Pointer));
        assert_eq!(InputMode::from_str("touch"), Some(InputMode::Touch));
        assert_eq!(InputMode::from_str("gamepad"), None);
        assert_eq!(
            InputMode::from_str(InputMode::Keyboard.as_str()),
            Some(InputMode::Keyboard)
        );
    }
}
