use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SessionError, SessionResult};
use crate::face::{FACE_MIN_X, FACE_RIGHT_MARGIN};

/// Configuration for a play session.
///
/// Timing constants are part of the protocol and live next to the components
/// that use them; only environment-dependent values are configurable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionConfig {
    /// RNG seed for deterministic sessions.
    pub seed: u64,
    /// Screen width in pixels. Its midpoint is the gaze center line.
    pub screen_width: f64,
    /// Screen height in pixels. Horror faces are vertically centered.
    pub screen_height: f64,
    /// Maximum event log size (oldest events dropped when exceeded). 0 = unlimited.
    pub max_events: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            screen_width: 1920.0,
            screen_height: 1080.0,
            max_events: 0,
        }
    }
}

impl SessionConfig {
    /// Set the RNG seed for deterministic sessions.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the screen dimensions in pixels.
    pub fn with_screen(mut self, width: f64, height: f64) -> Self {
        self.screen_width = width;
        self.screen_height = height;
        self
    }

    /// Set the maximum event log size (0 = unlimited).
    pub fn with_max_events(mut self, max: usize) -> Self {
        self.max_events = max;
        self
    }

    /// Horizontal center of the screen, used by the side classifier.
    pub fn center_x(&self) -> f64 {
        self.screen_width / 2.0
    }

    /// Parse a config from JSON. Missing fields fall back to defaults.
    pub fn from_json_str(json: &str) -> SessionResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON config file.
    pub fn load(path: &Path) -> SessionResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Reject dimensions the face spawner cannot place a face in.
    pub fn validate(&self) -> SessionResult<()> {
        let min_width = FACE_MIN_X + FACE_RIGHT_MARGIN;
        if !self.screen_width.is_finite() || self.screen_width <= min_width {
            return Err(SessionError::InvalidConfig(format!(
                "screen width must exceed {min_width}px, got {}",
                self.screen_width
            )));
        }
        if !self.screen_height.is_finite() || self.screen_height <= 0.0 {
            return Err(SessionError::InvalidConfig(format!(
                "screen height must be positive, got {}",
                self.screen_height
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default_values() {
        let config = SessionConfig::default();
        assert_eq!(config.seed, 42);
        assert!((config.screen_width - 1920.0).abs() < f64::EPSILON);
        assert!((config.center_x() - 960.0).abs() < f64::EPSILON);
        assert_eq!(config.max_events, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_builder_chain() {
        let config = SessionConfig::default()
            .with_seed(123)
            .with_screen(1280.0, 720.0)
            .with_max_events(500);
        assert_eq!(config.seed, 123);
        assert!((config.screen_height - 720.0).abs() < f64::EPSILON);
        assert_eq!(config.max_events, 500);
    }

    #[test]
    fn json_fills_missing_fields() {
        let config = SessionConfig::from_json_str(r#"{"seed": 7, "screenWidth": 1024}"#).unwrap();
        assert_eq!(config.seed, 7);
        assert!((config.screen_width - 1024.0).abs() < f64::EPSILON);
        assert!((config.screen_height - 1080.0).abs() < f64::EPSILON);
    }

    #[test]
    fn narrow_screen_rejected() {
        let err = SessionConfig::from_json_str(r#"{"screenWidth": 300}"#).unwrap_err();
        assert!(matches!(err, SessionError::InvalidConfig(_)));
    }

    #[test]
    fn malformed_json_rejected() {
        let err = SessionConfig::from_json_str("{seed:").unwrap_err();
        assert!(matches!(err, SessionError::Config(_)));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("cabin.json");
        std::fs::write(&path, r#"{"seed": 99}"#).unwrap();
        let config = SessionConfig::load(&path).unwrap();
        assert_eq!(config.seed, 99);
    }
}
