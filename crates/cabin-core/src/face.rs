//! Horror-face scheduling. Faces run independently of ambient events.

use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::collision::{FaceSize, face_center};
use crate::signal::{GazeSide, Point};

/// Leftmost spawn position of a face.
pub const FACE_MIN_X: f64 = 100.0;
/// Space kept free to the right of the rightmost spawn position.
pub const FACE_RIGHT_MARGIN: f64 = 250.0;
/// Shortest wait before the next face attempt.
pub const FACE_ATTEMPT_MIN_MS: u64 = 3_000;
/// Longest wait before the next face attempt.
pub const FACE_ATTEMPT_MAX_MS: u64 = 8_000;
/// Chance that an attempt actually spawns a face.
pub const FACE_SPAWN_CHANCE: f64 = 0.9;
/// Shortest time a face stays on screen.
pub const FACE_DURATION_MIN_MS: u64 = 5_000;
/// Longest time a face stays on screen.
pub const FACE_DURATION_MAX_MS: u64 = 10_000;
/// Delay between a face jump scare and the life it costs.
pub const FACE_RESOLVE_DELAY_MS: u64 = 1_500;

/// Screen side a face appears on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FaceSide {
    /// Left half.
    Left,
    /// Right half.
    Right,
}

impl FaceSide {
    /// Side opposite to where the player is looking; a coin flip if the
    /// player is centered or untracked.
    pub fn opposite_of(gaze: GazeSide, rng: &mut StdRng) -> Self {
        match gaze {
            GazeSide::Left => Self::Right,
            GazeSide::Right => Self::Left,
            GazeSide::Center | GazeSide::Unknown => {
                if rng.random_bool(0.5) {
                    Self::Left
                } else {
                    Self::Right
                }
            }
        }
    }
}

impl std::fmt::Display for FaceSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}

/// A horror face on screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceEvent {
    /// Unique within the session, shared with ambient event ids.
    pub id: u64,
    /// Side it appeared on.
    pub side: FaceSide,
    /// Left edge in pixels.
    pub x: f64,
    /// Absolute time it appeared.
    pub start_ms: u64,
    /// Time until it leaves on its own.
    pub duration_ms: u64,
    /// Set once the player has stared at it for too long.
    pub jump_scare_triggered: bool,
}

impl FaceEvent {
    /// Draw a new face. `screen_width` must leave room for the spawn band.
    pub fn spawn(
        id: u64,
        gaze: GazeSide,
        screen_width: f64,
        start_ms: u64,
        rng: &mut StdRng,
    ) -> Self {
        let side = FaceSide::opposite_of(gaze, rng);
        let max_x = (screen_width - FACE_RIGHT_MARGIN).max(FACE_MIN_X);
        let x = rng.random_range(FACE_MIN_X..=max_x);
        let duration_ms = rng.random_range(FACE_DURATION_MIN_MS..=FACE_DURATION_MAX_MS);
        Self {
            id,
            side,
            x,
            start_ms,
            duration_ms,
            jump_scare_triggered: false,
        }
    }

    /// Rendered size; faces grow during their jump scare.
    pub fn size(&self) -> FaceSize {
        if self.jump_scare_triggered {
            FaceSize::Enlarged
        } else {
            FaceSize::Small
        }
    }

    /// Center point used for collision.
    pub fn center(&self, screen_height: f64) -> Point {
        face_center(self.x, screen_height, self.size())
    }

    /// Absolute time it leaves on its own.
    pub fn end_ms(&self) -> u64 {
        self.start_ms + self.duration_ms
    }
}

/// Draw the wait before the next face attempt.
pub fn draw_face_attempt_delay_ms(rng: &mut StdRng) -> u64 {
    rng.random_range(FACE_ATTEMPT_MIN_MS..=FACE_ATTEMPT_MAX_MS)
}

/// Roll whether an attempt spawns a face.
pub fn roll_face_spawn(rng: &mut StdRng) -> bool {
    rng.random_bool(FACE_SPAWN_CHANCE)
}

/// The face slot.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum FaceSlot {
    /// Nothing scheduled.
    #[default]
    Idle,
    /// An attempt timer is armed.
    Waiting,
    /// A face is on screen.
    Active(FaceEvent),
    /// A jump scare is playing; the life loss is pending.
    JumpScare(FaceEvent),
}

/// Owns the face slot. Timers are armed by the session.
#[derive(Debug, Default)]
pub struct FaceScheduler {
    slot: FaceSlot,
}

impl FaceScheduler {
    /// Create an idle scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current slot.
    pub fn slot(&self) -> FaceSlot {
        self.slot
    }

    /// The face on screen, including one mid jump scare.
    pub fn current(&self) -> Option<&FaceEvent> {
        match &self.slot {
            FaceSlot::Active(face) | FaceSlot::JumpScare(face) => Some(face),
            FaceSlot::Idle | FaceSlot::Waiting => None,
        }
    }

    /// The face on screen if it can still be looked at.
    pub fn watchable(&self) -> Option<&FaceEvent> {
        match &self.slot {
            FaceSlot::Active(face) => Some(face),
            _ => None,
        }
    }

    /// Whether a new attempt may be armed.
    pub fn is_idle(&self) -> bool {
        self.slot == FaceSlot::Idle
    }

    /// An attempt timer was armed.
    pub fn mark_waiting(&mut self) {
        self.slot = FaceSlot::Waiting;
    }

    /// Put a face on screen.
    pub fn show(&mut self, face: FaceEvent) {
        self.slot = FaceSlot::Active(face);
    }

    /// Start the jump scare for face `id`. Returns the enlarged face.
    pub fn trigger_jump_scare(&mut self, id: u64) -> Option<FaceEvent> {
        match self.slot {
            FaceSlot::Active(mut face) if face.id == id => {
                face.jump_scare_triggered = true;
                self.slot = FaceSlot::JumpScare(face);
                Some(face)
            }
            _ => None,
        }
    }

    /// Face `id` timed out without a jump scare.
    pub fn expire(&mut self, id: u64) -> Option<FaceEvent> {
        match self.slot {
            FaceSlot::Active(face) if face.id == id => {
                self.slot = FaceSlot::Idle;
                Some(face)
            }
            _ => None,
        }
    }

    /// The jump scare for face `id` finished playing.
    pub fn finish_jump_scare(&mut self, id: u64) -> Option<FaceEvent> {
        match self.slot {
            FaceSlot::JumpScare(face) if face.id == id => {
                self.slot = FaceSlot::Idle;
                Some(face)
            }
            _ => None,
        }
    }

    /// Drop everything. Returns a face that was cut short.
    pub fn clear(&mut self) -> Option<FaceEvent> {
        let cut = self.current().copied();
        self.slot = FaceSlot::Idle;
        cut
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn face_appears_opposite_the_gaze() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(FaceSide::opposite_of(GazeSide::Left, &mut rng), FaceSide::Right);
        assert_eq!(FaceSide::opposite_of(GazeSide::Right, &mut rng), FaceSide::Left);
    }

    #[test]
    fn centered_gaze_picks_both_sides() {
        let mut rng = StdRng::seed_from_u64(2);
        let lefts = (0..200)
            .filter(|_| FaceSide::opposite_of(GazeSide::Center, &mut rng) == FaceSide::Left)
            .count();
        assert!((50..150).contains(&lefts), "{lefts}");
    }

    #[test]
    fn spawn_stays_in_bounds() {
        let mut rng = StdRng::seed_from_u64(3);
        for id in 0..300 {
            let face = FaceEvent::spawn(id, GazeSide::Unknown, 1280.0, 40_000, &mut rng);
            assert!((FACE_MIN_X..=1030.0).contains(&face.x));
            assert!((5_000..=10_000).contains(&face.duration_ms));
            assert!(!face.jump_scare_triggered);
            assert_eq!(face.end_ms(), 40_000 + face.duration_ms);
        }
    }

    #[test]
    fn spawn_chance_is_roughly_ninety_percent() {
        let mut rng = StdRng::seed_from_u64(4);
        let spawned = (0..2_000).filter(|_| roll_face_spawn(&mut rng)).count();
        assert!((1_740..1_860).contains(&spawned), "{spawned}");
    }

    #[test]
    fn jump_scare_enlarges_and_blocks_rescheduling() {
        let mut rng = StdRng::seed_from_u64(5);
        let face = FaceEvent::spawn(7, GazeSide::Left, 1920.0, 0, &mut rng);
        let mut s = FaceScheduler::new();
        s.show(face);
        assert_eq!(s.watchable().map(|f| f.id), Some(7));
        assert_eq!(s.trigger_jump_scare(6), None);
        let scared = s.trigger_jump_scare(7).unwrap();
        assert_eq!(scared.size(), FaceSize::Enlarged);
        assert!(s.watchable().is_none());
        assert!(!s.is_idle());
        assert_eq!(s.expire(7), None);
        assert!(s.finish_jump_scare(7).is_some());
        assert!(s.is_idle());
    }

    #[test]
    fn clear_reports_cut_face() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut s = FaceScheduler::new();
        s.mark_waiting();
        assert_eq!(s.clear(), None);
        s.show(FaceEvent::spawn(2, GazeSide::Right, 1920.0, 0, &mut rng));
        assert_eq!(s.clear().map(|f| f.id), Some(2));
        assert!(s.is_idle());
    }
}
