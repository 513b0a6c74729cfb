//! Survival rules for each ambient event kind.
//!
//! - Footsteps always resolves as survived; closing the eyes for a full
//!   second while it plays costs a life through [`FootstepsEyeWatch`].
//! - Heavy footsteps is judged once, at expiry: eyes must be closed.
//! - Insanity is judged every pulse of its active window and once more at
//!   expiry: eyes closed, gaze not off to a side, and quiet.

use crate::countdown::DeathReason;
use crate::signal::{GazeSide, SignalState};

/// Pulses of continuous eye closure during footsteps that cost a life.
pub const FOOTSTEPS_CLOSURE_PULSES: u32 = 10;

/// What broke an insanity event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsanityBreach {
    /// The eyes opened.
    EyesOpened,
    /// The player looked to a side.
    LookedAway(GazeSide),
    /// The player was too loud.
    TooLoud,
}

impl std::fmt::Display for InsanityBreach {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EyesOpened => write!(f, "eyes opened"),
            Self::LookedAway(side) => write!(f, "looked {side}"),
            Self::TooLoud => write!(f, "too loud"),
        }
    }
}

/// Heavy footsteps is survived iff the eyes are closed at the expiry instant.
pub fn heavy_footsteps_survived(signals: &SignalState) -> bool {
    signals.eyes_closed()
}

/// First broken insanity condition, if any.
pub fn insanity_breach(signals: &SignalState) -> Option<InsanityBreach> {
    if !signals.eyes_closed() {
        Some(InsanityBreach::EyesOpened)
    } else if signals.gaze().is_off_center() {
        Some(InsanityBreach::LookedAway(signals.gaze()))
    } else if signals.noise().breaks_insanity() {
        Some(InsanityBreach::TooLoud)
    } else {
        None
    }
}

/// Which countdown a failed insanity event starts.
pub fn insanity_countdown(signals: &SignalState) -> DeathReason {
    if signals.noise().in_red_zone() {
        DeathReason::NoiseDeath
    } else {
        DeathReason::LivesDeath
    }
}

/// Tracks continuous eye closure while light footsteps play.
#[derive(Debug, Clone, Default)]
pub struct FootstepsEyeWatch {
    closed_pulses: u32,
    spent: bool,
}

impl FootstepsEyeWatch {
    /// Create a fresh watch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one pulse. Returns `true` on the pulse that costs a life;
    /// at most once per continuous closure.
    pub fn pulse(&mut self, eyes_closed: bool) -> bool {
        if !eyes_closed {
            self.reset();
            return false;
        }
        if self.spent {
            return false;
        }
        self.closed_pulses += 1;
        if self.closed_pulses >= FOOTSTEPS_CLOSURE_PULSES {
            self.spent = true;
            return true;
        }
        false
    }

    /// Seconds of continuous closure counted so far.
    pub fn closed_seconds(&self) -> f64 {
        f64::from(self.closed_pulses) / 10.0
    }

    /// Forget the current closure.
    pub fn reset(&mut self) {
        self.closed_pulses = 0;
        self.spent = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::Signals;

    fn state(signals: Signals) -> SignalState {
        let mut s = SignalState::default();
        s.apply(signals, 960.0);
        s
    }

    #[test]
    fn heavy_footsteps_needs_closed_eyes() {
        assert!(heavy_footsteps_survived(&state(
            Signals::calm().with_eyes_closed(true)
        )));
        assert!(!heavy_footsteps_survived(&state(Signals::calm())));
    }

    #[test]
    fn insanity_conditions_checked_in_order() {
        let calm_closed = Signals::calm().with_eyes_closed(true);
        assert_eq!(insanity_breach(&state(calm_closed)), None);
        assert_eq!(
            insanity_breach(&state(Signals::calm().with_noise(90.0))),
            Some(InsanityBreach::EyesOpened)
        );
        assert_eq!(
            insanity_breach(&state(calm_closed.with_gaze(GazeSide::Right))),
            Some(InsanityBreach::LookedAway(GazeSide::Right))
        );
        assert_eq!(
            insanity_breach(&state(calm_closed.with_noise(70.0))),
            Some(InsanityBreach::TooLoud)
        );
        assert_eq!(insanity_breach(&state(calm_closed.with_noise(69.0))), None);
        assert_eq!(
            insanity_breach(&state(calm_closed.with_gaze(GazeSide::Unknown))),
            None
        );
    }

    #[test]
    fn insanity_routes_loud_failures_to_noise_countdown() {
        assert_eq!(
            insanity_countdown(&state(Signals::calm().with_noise(60.0))),
            DeathReason::NoiseDeath
        );
        assert_eq!(
            insanity_countdown(&state(Signals::calm().with_noise(59.0))),
            DeathReason::LivesDeath
        );
    }

    #[test]
    fn footsteps_watch_fires_once_per_closure() {
        let mut watch = FootstepsEyeWatch::new();
        for _ in 0..9 {
            assert!(!watch.pulse(true));
        }
        assert!(watch.pulse(true));
        for _ in 0..30 {
            assert!(!watch.pulse(true));
        }
        assert!(!watch.pulse(false));
        for _ in 0..9 {
            assert!(!watch.pulse(true));
        }
        assert!(watch.pulse(true));
    }

    #[test]
    fn footsteps_watch_resets_on_open() {
        let mut watch = FootstepsEyeWatch::new();
        for _ in 0..9 {
            watch.pulse(true);
        }
        assert!((watch.closed_seconds() - 0.9).abs() < 1e-9);
        watch.pulse(false);
        assert_eq!(watch.closed_seconds(), 0.0);
    }
}
