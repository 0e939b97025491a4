//! # Configuration Module
//!
//! Handles loading and validating engine settings from TOML files.
//!
//! Binding persistence (which physical control drives which game input) is
//! a separate concern owned by the frontend; this module only covers the
//! engine's own knobs.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{InputError, Result};

/// Engine configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct InputConfig {
    /// Name of the backend driver to select.
    pub backend: String,

    /// Scale applied to mouse axes and relative joystick axes.
    pub analog_speed: u16,

    /// Request exclusive access to the mouse.
    pub exclusive_mouse: bool,

    /// Process input only while the application is in the foreground.
    pub foreground_only: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            analog_speed: default_analog_speed(),
            exclusive_mouse: false,
            foreground_only: true,
        }
    }
}

fn default_backend() -> String {
    "null".to_string()
}

fn default_analog_speed() -> u16 {
    0x0100
}

impl InputConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read, parsed or validated.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn parse(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.analog_speed == 0 {
            return Err(InputError::Config(serde::de::Error::custom(
                "analog_speed must be greater than zero",
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = InputConfig::default();
        assert_eq!(config.backend, "null");
        assert_eq!(config.analog_speed, 0x0100);
        assert!(!config.exclusive_mouse);
        assert!(config.foreground_only);
    }

    #[test]
    fn test_parse_empty_uses_defaults() {
        let config = InputConfig::parse("").unwrap();
        assert_eq!(config.analog_speed, 0x0100);
    }

    #[test]
    fn test_parse_overrides() {
        let config = InputConfig::parse(
            r#"
            backend = "sdl"
            analog_speed = 512
            exclusive_mouse = true
            "#,
        )
        .unwrap();
        assert_eq!(config.backend, "sdl");
        assert_eq!(config.analog_speed, 512);
        assert!(config.exclusive_mouse);
        assert!(config.foreground_only);
    }

    #[test]
    fn test_zero_analog_speed_rejected() {
        let result = InputConfig::parse("analog_speed = 0");
        assert!(matches!(result, Err(InputError::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "backend = \"directinput\"").unwrap();

        let config = InputConfig::load(file.path()).unwrap();
        assert_eq!(config.backend, "directinput");
    }

    #[test]
    fn test_load_missing_file() {
        let result = InputConfig::load("/nonexistent/input.toml");
        assert!(matches!(result, Err(InputError::Io(_))));
    }
}
