//! Player signals as the session sees them.
//!
//! The camera/microphone pipeline lives outside the core. What arrives here
//! is already derived: a gaze side (or a raw horizontal face position for the
//! side classifier), a 0-100 noise level, an eye state and an optional
//! pointer. Out-of-range values are clamped instead of rejected.

use serde::{Deserialize, Serialize};

use crate::side::SideClassifier;

/// Raw noise at or above which the player is in the red zone.
pub const RED_ZONE_NOISE: f64 = 60.0;
/// Noise ratio at or above which an insanity event is failed.
pub const INSANITY_NOISE_RATIO: f64 = 0.7;
/// Top of the published noise scale.
pub const NOISE_SCALE_MAX: f64 = 100.0;

/// Which half of the screen the player is facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GazeSide {
    /// Facing the left side.
    Left,
    /// Facing the middle band.
    Center,
    /// Facing the right side.
    Right,
    /// No face tracked.
    #[default]
    Unknown,
}

impl GazeSide {
    /// Whether the player is looking away from the center.
    pub fn is_off_center(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

impl std::fmt::Display for GazeSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Center => write!(f, "center"),
            Self::Right => write!(f, "right"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// A screen position in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
}

impl Point {
    /// Create a point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Noise level on the canonical 0-100 scale.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct NoiseLevel(f64);

impl NoiseLevel {
    /// Clamp a raw reading into `[0, 100]`. Non-finite readings count as silence.
    pub fn new(raw: f64) -> Self {
        if raw.is_nan() {
            return Self(0.0);
        }
        Self(raw.clamp(0.0, NOISE_SCALE_MAX))
    }

    /// The raw 0-100 value.
    pub fn raw(self) -> f64 {
        self.0
    }

    /// The level as a fraction of the scale.
    pub fn ratio(self) -> f64 {
        self.0 / NOISE_SCALE_MAX
    }

    /// At or above the red zone.
    pub fn in_red_zone(self) -> bool {
        self.0 >= RED_ZONE_NOISE
    }

    /// Loud enough to fail an insanity event.
    pub fn breaks_insanity(self) -> bool {
        self.ratio() >= INSANITY_NOISE_RATIO
    }
}

/// One inbound signal sample from the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Signals {
    /// Pre-classified gaze side.
    pub gaze: GazeSide,
    /// Horizontal face position. When present it is run through the side
    /// classifier and overrides `gaze`.
    pub gaze_x: Option<f64>,
    /// Noise on the 0-100 scale.
    pub noise: f64,
    /// Whether the eyes are closed.
    pub eyes_closed: bool,
    /// Pointer used for horror-face collision (face center or mouse).
    pub pointer: Option<Point>,
}

impl Signals {
    /// Eyes open, centered, silent, no pointer.
    pub fn calm() -> Self {
        Self {
            gaze: GazeSide::Center,
            ..Self::default()
        }
    }

    /// Set the eye state.
    pub fn with_eyes_closed(mut self, closed: bool) -> Self {
        self.eyes_closed = closed;
        self
    }

    /// Set the gaze side.
    pub fn with_gaze(mut self, gaze: GazeSide) -> Self {
        self.gaze = gaze;
        self
    }

    /// Set the noise level.
    pub fn with_noise(mut self, noise: f64) -> Self {
        self.noise = noise;
        self
    }

    /// Set the pointer.
    pub fn with_pointer(mut self, pointer: Option<Point>) -> Self {
        self.pointer = pointer;
        self
    }
}

/// The single authoritative copy of the latest signals.
///
/// Owned by the session, updated once per ingest, read by every component.
#[derive(Debug, Clone, Default)]
pub struct SignalState {
    gaze: GazeSide,
    noise: NoiseLevel,
    eyes_closed: bool,
    pointer: Option<Point>,
    classifier: SideClassifier,
}

impl SignalState {
    /// Replace the current signals with a new sample, clamping as needed.
    pub fn apply(&mut self, sample: Signals, center_x: f64) {
        self.gaze = match sample.gaze_x {
            Some(x) if x.is_finite() => self.classifier.classify(x, center_x),
            Some(_) => self.classifier.lose_track(),
            None => {
                self.classifier.set(sample.gaze);
                sample.gaze
            }
        };
        self.noise = NoiseLevel::new(sample.noise);
        self.eyes_closed = sample.eyes_closed;
        self.pointer = sample.pointer.filter(|p| p.is_finite());
    }

    /// Current gaze side.
    pub fn gaze(&self) -> GazeSide {
        self.gaze
    }

    /// Current noise level.
    pub fn noise(&self) -> NoiseLevel {
        self.noise
    }

    /// Current eye state.
    pub fn eyes_closed(&self) -> bool {
        self.eyes_closed
    }

    /// Current pointer, if tracked.
    pub fn pointer(&self) -> Option<Point> {
        self.pointer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noise_is_clamped() {
        assert_eq!(NoiseLevel::new(-5.0).raw(), 0.0);
        assert_eq!(NoiseLevel::new(250.0).raw(), 100.0);
        assert_eq!(NoiseLevel::new(f64::NAN).raw(), 0.0);
        assert_eq!(NoiseLevel::new(f64::INFINITY).raw(), 100.0);
    }

    #[test]
    fn noise_thresholds_share_one_scale() {
        assert!(!NoiseLevel::new(59.9).in_red_zone());
        assert!(NoiseLevel::new(60.0).in_red_zone());
        assert!(!NoiseLevel::new(69.9).breaks_insanity());
        assert!(NoiseLevel::new(70.0).breaks_insanity());
        // Anything loud enough to break insanity is already in the red zone.
        assert!(NoiseLevel::new(70.0).in_red_zone());
    }

    #[test]
    fn apply_prefers_gaze_position() {
        let mut state = SignalState::default();
        state.apply(
            Signals::calm().with_gaze(GazeSide::Left).with_noise(12.0),
            960.0,
        );
        assert_eq!(state.gaze(), GazeSide::Left);

        let sample = Signals {
            gaze_x: Some(1200.0),
            ..Signals::calm()
        };
        state.apply(sample, 960.0);
        assert_eq!(state.gaze(), GazeSide::Right);
    }

    #[test]
    fn non_finite_inputs_are_dropped() {
        let mut state = SignalState::default();
        let sample = Signals {
            gaze_x: Some(f64::NAN),
            pointer: Some(Point::new(f64::NAN, 3.0)),
            ..Signals::calm()
        };
        state.apply(sample, 960.0);
        assert_eq!(state.gaze(), GazeSide::Unknown);
        assert!(state.pointer().is_none());
    }

    #[test]
    fn signals_parse_from_camel_case_json() {
        let signals: Signals =
            serde_json::from_str(r#"{"gaze":"left","noise":40,"eyesClosed":true}"#).unwrap();
        assert_eq!(signals.gaze, GazeSide::Left);
        assert!(signals.eyes_closed);
        assert!(signals.pointer.is_none());
    }
}
