//! Ambient scare scheduling: which event fires next, when, and for how long.

use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// Shortest wait before the next ambient attempt.
pub const ATTEMPT_DELAY_MIN_MS: u64 = 5_000;
/// Longest wait before the next ambient attempt.
pub const ATTEMPT_DELAY_MAX_MS: u64 = 15_000;
/// Quiet window after any ambient event resolves.
pub const COOLDOWN_MS: u64 = 1_000;
/// Insanity warning before its active window opens.
pub const INSANITY_WARNING_MS: u64 = 1_000;
/// Insanity active window.
pub const INSANITY_DURATION_MS: u64 = 12_000;
/// Delay before normal scheduling resumes after a forced event.
pub const DEBUG_RESUME_MS: u64 = 2_000;

/// Relative selection weights, normalized over their sum.
pub const AMBIENT_WEIGHTS: [(AmbientKind, u32); 3] = [
    (AmbientKind::Footsteps, 7),
    (AmbientKind::HeavyFootsteps, 5),
    (AmbientKind::Insanity, 1),
];

/// Kind of ambient scare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AmbientKind {
    /// Light footsteps. Survived by not closing the eyes for too long.
    Footsteps,
    /// Heavy footsteps. Survived by having the eyes closed when they stop.
    HeavyFootsteps,
    /// Survived by staying centered, silent and eyes-closed throughout.
    Insanity,
}

impl AmbientKind {
    /// Pick a kind from a uniform roll in `[0, 1)`.
    pub fn from_roll(roll: f64) -> Self {
        let total: u32 = AMBIENT_WEIGHTS.iter().map(|(_, w)| w).sum();
        let mut cumulative = 0.0;
        for (kind, weight) in AMBIENT_WEIGHTS {
            cumulative += f64::from(weight) / f64::from(total);
            if roll < cumulative {
                return kind;
            }
        }
        Self::Insanity
    }

    /// Draw a kind.
    pub fn draw(rng: &mut StdRng) -> Self {
        Self::from_roll(rng.random::<f64>())
    }

    /// Draw the length of the active window.
    pub fn draw_duration_ms(self, rng: &mut StdRng) -> u64 {
        match self {
            Self::Footsteps => rng.random_range(3_000..=8_000),
            Self::HeavyFootsteps => rng.random_range(3_000..=5_000),
            Self::Insanity => INSANITY_DURATION_MS,
        }
    }

    /// Warning lead time before the active window.
    pub fn warning_ms(self) -> Option<u64> {
        match self {
            Self::Insanity => Some(INSANITY_WARNING_MS),
            Self::Footsteps | Self::HeavyFootsteps => None,
        }
    }
}

impl std::fmt::Display for AmbientKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Footsteps => write!(f, "footsteps"),
            Self::HeavyFootsteps => write!(f, "heavy footsteps"),
            Self::Insanity => write!(f, "insanity"),
        }
    }
}

/// Draw the wait before the next attempt.
pub fn draw_attempt_delay_ms(rng: &mut StdRng) -> u64 {
    rng.random_range(ATTEMPT_DELAY_MIN_MS..=ATTEMPT_DELAY_MAX_MS)
}

/// An active ambient scare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameEvent {
    /// Unique within the session.
    pub id: u64,
    /// What kind of scare.
    pub kind: AmbientKind,
    /// Absolute time the active window opened.
    pub start_ms: u64,
    /// Length of the active window.
    pub duration_ms: u64,
}

impl GameEvent {
    /// Absolute time the active window closes.
    pub fn end_ms(&self) -> u64 {
        self.start_ms + self.duration_ms
    }
}

/// Whether scheduling follows the normal gates or a forced event is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchedulingMode {
    /// Phase and cooldown gates apply.
    #[default]
    Normal,
    /// A forced event bypasses the gates until it resolves.
    DebugOverride,
}

/// The ambient slot. At most one event occupies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AmbientSlot {
    /// Nothing scheduled.
    #[default]
    Idle,
    /// An attempt timer is armed.
    Waiting,
    /// Insanity announced, active window not open yet.
    Warning {
        /// Event id, already allocated.
        id: u64,
    },
    /// An event is running.
    Active(GameEvent),
    /// Post-event quiet window.
    Cooldown,
}

/// Owns the ambient slot. Timers are armed by the session.
#[derive(Debug, Default)]
pub struct AmbientScheduler {
    slot: AmbientSlot,
}

impl AmbientScheduler {
    /// Create an idle scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current slot.
    pub fn slot(&self) -> AmbientSlot {
        self.slot
    }

    /// The running event, if any.
    pub fn active(&self) -> Option<&GameEvent> {
        match &self.slot {
            AmbientSlot::Active(event) => Some(event),
            _ => None,
        }
    }

    /// Whether an event is warning or running.
    pub fn has_event(&self) -> bool {
        matches!(self.slot, AmbientSlot::Warning { .. } | AmbientSlot::Active(_))
    }

    /// Whether the slot is in cooldown.
    pub fn in_cooldown(&self) -> bool {
        self.slot == AmbientSlot::Cooldown
    }

    /// Whether a new attempt may be armed: no event, no cooldown, nothing pending.
    pub fn is_idle(&self) -> bool {
        self.slot == AmbientSlot::Idle
    }

    /// An attempt timer was armed.
    pub fn mark_waiting(&mut self) {
        self.slot = AmbientSlot::Waiting;
    }

    /// Enter the insanity warning.
    pub fn warn(&mut self, id: u64) {
        self.slot = AmbientSlot::Warning { id };
    }

    /// The insanity warning for `id`, if that is what is pending.
    pub fn warning_id(&self) -> Option<u64> {
        match self.slot {
            AmbientSlot::Warning { id } => Some(id),
            _ => None,
        }
    }

    /// Open an event's active window.
    pub fn activate(&mut self, event: GameEvent) {
        self.slot = AmbientSlot::Active(event);
    }

    /// Close the active event `id` and enter cooldown. Returns `None` if `id`
    /// is not the running event.
    pub fn resolve(&mut self, id: u64) -> Option<GameEvent> {
        match self.slot {
            AmbientSlot::Active(event) if event.id == id => {
                self.slot = AmbientSlot::Cooldown;
                Some(event)
            }
            _ => None,
        }
    }

    /// Leave cooldown.
    pub fn end_cooldown(&mut self) -> bool {
        if self.in_cooldown() {
            self.slot = AmbientSlot::Idle;
            true
        } else {
            false
        }
    }

    /// Drop everything. Returns the id and kind of a warning or running event
    /// that was cut short.
    pub fn clear(&mut self) -> Option<(u64, AmbientKind)> {
        let cut = match self.slot {
            AmbientSlot::Warning { id } => Some((id, AmbientKind::Insanity)),
            AmbientSlot::Active(event) => Some((event.id, event.kind)),
            AmbientSlot::Idle | AmbientSlot::Waiting | AmbientSlot::Cooldown => None,
        };
        self.slot = AmbientSlot::Idle;
        cut
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn roll_thresholds_follow_weights() {
        assert_eq!(AmbientKind::from_roll(0.0), AmbientKind::Footsteps);
        assert_eq!(AmbientKind::from_roll(0.538), AmbientKind::Footsteps);
        assert_eq!(AmbientKind::from_roll(0.54), AmbientKind::HeavyFootsteps);
        assert_eq!(AmbientKind::from_roll(0.923), AmbientKind::HeavyFootsteps);
        assert_eq!(AmbientKind::from_roll(0.924), AmbientKind::Insanity);
        assert_eq!(AmbientKind::from_roll(0.999_999), AmbientKind::Insanity);
    }

    #[test]
    fn weighted_draw_converges() {
        let draws = 13_000;
        let mut pooled = [0usize; 3];
        for seed in [1, 2, 3] {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut counts = [0usize; 3];
            for _ in 0..draws {
                let idx = match AmbientKind::draw(&mut rng) {
                    AmbientKind::Footsteps => 0,
                    AmbientKind::HeavyFootsteps => 1,
                    AmbientKind::Insanity => 2,
                };
                counts[idx] += 1;
            }
            for (i, expected) in [7.0 / 13.0, 5.0 / 13.0, 1.0 / 13.0].iter().enumerate() {
                let observed = counts[i] as f64 / draws as f64;
                assert!(
                    (observed - expected).abs() < 0.015,
                    "seed {seed} kind {i}: {observed} vs {expected}"
                );
                pooled[i] += counts[i];
            }
        }
        let total = (draws * 3) as f64;
        for (i, expected) in [0.538, 0.385, 0.077].iter().enumerate() {
            let observed = pooled[i] as f64 / total;
            assert!((observed - expected).abs() < 0.01, "kind {i}: {observed}");
        }
    }

    #[test]
    fn durations_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..500 {
            let f = AmbientKind::Footsteps.draw_duration_ms(&mut rng);
            assert!((3_000..=8_000).contains(&f));
            let h = AmbientKind::HeavyFootsteps.draw_duration_ms(&mut rng);
            assert!((3_000..=5_000).contains(&h));
            let d = draw_attempt_delay_ms(&mut rng);
            assert!((5_000..=15_000).contains(&d));
        }
        assert_eq!(AmbientKind::Insanity.draw_duration_ms(&mut rng), 12_000);
        assert_eq!(AmbientKind::Insanity.warning_ms(), Some(1_000));
        assert_eq!(AmbientKind::HeavyFootsteps.warning_ms(), None);
    }

    #[test]
    fn slot_lifecycle() {
        let mut s = AmbientScheduler::new();
        assert!(s.is_idle());
        s.mark_waiting();
        assert!(!s.is_idle());
        let event = GameEvent {
            id: 4,
            kind: AmbientKind::HeavyFootsteps,
            start_ms: 40_000,
            duration_ms: 4_000,
        };
        s.activate(event);
        assert_eq!(s.active().map(|e| e.end_ms()), Some(44_000));
        assert_eq!(s.resolve(3), None);
        assert_eq!(s.resolve(4), Some(event));
        assert!(s.in_cooldown());
        assert!(!s.has_event());
        assert!(s.end_cooldown());
        assert!(s.is_idle());
    }

    #[test]
    fn clear_reports_cut_event() {
        let mut s = AmbientScheduler::new();
        s.warn(11);
        assert_eq!(s.warning_id(), Some(11));
        assert_eq!(s.clear(), Some((11, AmbientKind::Insanity)));
        assert_eq!(s.clear(), None);
    }
}
