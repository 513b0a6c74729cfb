//! Signal sources: stand-ins for the camera and microphone adapters.
//!
//! A source is sampled once per step with the session time and is told
//! about every event the session emits, so scripted players can react.

use std::path::Path;

use serde::Deserialize;

use crate::ambient::AmbientKind;
use crate::collision::{FaceSize, face_center};
use crate::error::{SessionError, SessionResult};
use crate::event::SessionEvent;
use crate::session::Session;
use crate::signal::{Point, Signals};

/// Something that produces player signals.
pub trait SignalSource {
    /// Human-readable name for this source.
    fn name(&self) -> &str;

    /// Signals at `elapsed_ms` into the session.
    fn sample(&mut self, elapsed_ms: u64) -> Signals;

    /// Called with every event the session emits. Optional.
    fn observe(&mut self, _event: &SessionEvent) {}
}

/// Eyes open, centered, silent. Never reacts to anything.
#[derive(Debug, Default)]
pub struct IdleSource;

impl SignalSource for IdleSource {
    fn name(&self) -> &str {
        "idle"
    }

    fn sample(&mut self, _elapsed_ms: u64) -> Signals {
        Signals::calm()
    }
}

/// Eyes closed before heavy footsteps stop, this long before they do.
const HEAVY_CLOSE_LEAD_MS: u64 = 500;

/// Plays by the rules: stays centered and quiet, never looks at faces,
/// closes the eyes for the end of heavy footsteps and through insanity.
#[derive(Debug, Default)]
pub struct Autopilot {
    last_ms: u64,
    insanity: Option<u64>,
    heavy: Option<(u64, u64)>,
}

impl Autopilot {
    /// Create an autopilot.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SignalSource for Autopilot {
    fn name(&self) -> &str {
        "autopilot"
    }

    fn sample(&mut self, elapsed_ms: u64) -> Signals {
        self.last_ms = elapsed_ms;
        let heavy = self.heavy.is_some_and(|(_, close_at)| elapsed_ms >= close_at);
        Signals::calm().with_eyes_closed(self.insanity.is_some() || heavy)
    }

    fn observe(&mut self, event: &SessionEvent) {
        match *event {
            SessionEvent::EventWarning {
                id,
                kind: AmbientKind::Insanity,
            } => self.insanity = Some(id),
            SessionEvent::EventStarted {
                id,
                kind: AmbientKind::HeavyFootsteps,
                duration_ms,
            } => {
                let close_at = (self.last_ms + duration_ms).saturating_sub(HEAVY_CLOSE_LEAD_MS);
                self.heavy = Some((id, close_at));
            }
            SessionEvent::EventResolved { id, .. } => {
                if self.insanity == Some(id) {
                    self.insanity = None;
                }
                if self.heavy.is_some_and(|(heavy_id, _)| heavy_id == id) {
                    self.heavy = None;
                }
            }
            _ => {}
        }
    }
}

/// Does everything wrong: never closes the eyes and stares at every face.
#[derive(Debug)]
pub struct Reckless {
    screen_height: f64,
    face: Option<(u64, Point)>,
}

impl Reckless {
    /// Create a reckless player for a screen of the given height.
    pub fn new(screen_height: f64) -> Self {
        Self {
            screen_height,
            face: None,
        }
    }
}

impl SignalSource for Reckless {
    fn name(&self) -> &str {
        "reckless"
    }

    fn sample(&mut self, _elapsed_ms: u64) -> Signals {
        Signals::calm().with_pointer(self.face.map(|(_, center)| center))
    }

    fn observe(&mut self, event: &SessionEvent) {
        match *event {
            SessionEvent::FaceEventStarted { id, x, .. } => {
                let center = face_center(x, self.screen_height, FaceSize::Small);
                self.face = Some((id, center));
            }
            SessionEvent::FaceEventResolved { id, .. } => {
                if self.face.is_some_and(|(face_id, _)| face_id == id) {
                    self.face = None;
                }
            }
            _ => {}
        }
    }
}

/// One step of a signal script.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Keyframe {
    /// Session time the signals take effect at.
    pub at_ms: u64,
    /// Signals held until the next keyframe.
    #[serde(flatten)]
    pub signals: Signals,
}

/// Replays a list of keyframes, holding each until the next one.
///
/// Before the first keyframe the player is calm.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    frames: Vec<Keyframe>,
}

impl ScriptedSource {
    /// Build from keyframes in any order.
    pub fn new(mut frames: Vec<Keyframe>) -> Self {
        frames.sort_by_key(|f| f.at_ms);
        Self { frames }
    }

    /// Parse a JSON array of keyframes.
    pub fn from_json_str(json: &str) -> SessionResult<Self> {
        let frames: Vec<Keyframe> = serde_json::from_str(json)?;
        Ok(Self::new(frames))
    }

    /// Read a JSON script file.
    pub fn load(path: &Path) -> SessionResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Number of keyframes.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the script has no keyframes.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl SignalSource for ScriptedSource {
    fn name(&self) -> &str {
        "script"
    }

    fn sample(&mut self, elapsed_ms: u64) -> Signals {
        let due = self.frames.partition_point(|f| f.at_ms <= elapsed_ms);
        due.checked_sub(1)
            .map_or_else(Signals::calm, |i| self.frames[i].signals)
    }
}

impl Session {
    /// Run the session against `source` in steps of `step_ms` until it ends
    /// or `until_elapsed_ms` of session time has passed.
    pub fn drive<S: SignalSource + ?Sized>(
        &mut self,
        source: &mut S,
        step_ms: u64,
        until_elapsed_ms: u64,
    ) -> SessionResult<()> {
        if step_ms == 0 {
            return Err(SessionError::InvalidConfig(
                "step must be at least 1ms".to_string(),
            ));
        }
        if !self.state().is_live() {
            return Err(SessionError::NotRunning);
        }
        let start = self.clock().start_ms();
        let until = start + until_elapsed_ms;
        let mut now = self.clock().now_ms();
        tracing::debug!(source = source.name(), step_ms, until_elapsed_ms, "driving session");
        while self.state().is_live() && now < until {
            now = (now + step_ms).min(until);
            self.ingest(source.sample(now - start));
            self.tick(now);
            for event in self.drain_events() {
                source.observe(&event);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::GazeSide;

    #[test]
    fn script_holds_frames_between_keys() {
        let mut script = ScriptedSource::from_json_str(
            r#"[
                {"atMs": 5000, "eyesClosed": true},
                {"atMs": 1000, "gaze": "left", "noise": 30}
            ]"#,
        )
        .unwrap();
        assert_eq!(script.len(), 2);
        assert_eq!(script.sample(0), Signals::calm());
        let held = script.sample(4_999);
        assert_eq!(held.gaze, GazeSide::Left);
        assert!(!held.eyes_closed);
        let last = script.sample(60_000);
        assert!(last.eyes_closed);
        assert_eq!(last.gaze, GazeSide::Unknown);
    }

    #[test]
    fn script_rejects_bad_json() {
        assert!(matches!(
            ScriptedSource::from_json_str("[{\"atMs\": \"soon\"}]"),
            Err(SessionError::Config(_))
        ));
    }

    #[test]
    fn autopilot_closes_eyes_for_heavy_footsteps_and_insanity() {
        let mut pilot = Autopilot::new();
        assert!(!pilot.sample(40_000).eyes_closed);
        pilot.observe(&SessionEvent::EventStarted {
            id: 1,
            kind: AmbientKind::HeavyFootsteps,
            duration_ms: 4_000,
        });
        assert!(!pilot.sample(43_400).eyes_closed);
        assert!(pilot.sample(43_500).eyes_closed);
        pilot.observe(&SessionEvent::EventResolved {
            id: 1,
            kind: AmbientKind::HeavyFootsteps,
            outcome: crate::event::EventOutcome::Survived,
        });
        assert!(!pilot.sample(44_100).eyes_closed);

        pilot.observe(&SessionEvent::EventWarning {
            id: 2,
            kind: AmbientKind::Insanity,
        });
        assert!(pilot.sample(50_000).eyes_closed);
    }

    #[test]
    fn reckless_points_at_faces() {
        let mut player = Reckless::new(1080.0);
        assert!(player.sample(0).pointer.is_none());
        player.observe(&SessionEvent::FaceEventStarted {
            id: 3,
            side: crate::face::FaceSide::Left,
            x: 400.0,
            duration_ms: 6_000,
        });
        assert_eq!(player.sample(100).pointer, Some(Point::new(475.0, 540.0)));
        player.observe(&SessionEvent::FaceEventResolved {
            id: 3,
            jump_scare_triggered: false,
        });
        assert!(player.sample(200).pointer.is_none());
    }

    #[test]
    fn drive_rejects_zero_step() {
        let mut session = Session::new(crate::config::SessionConfig::default()).unwrap();
        session.start(0).unwrap();
        assert!(session.drive(&mut IdleSource, 0, 1_000).is_err());
    }
}
