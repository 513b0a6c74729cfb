use serde::{Deserialize, Serialize};

/// Elapsed time at which the intro ends and scares may begin.
pub const INTRO_END_MS: u64 = 35_000;
/// Elapsed time at which the final safe zone begins.
pub const SAFE_ZONE_START_MS: u64 = 150_000;
/// Elapsed time at which the player has survived the session.
pub const SESSION_LENGTH_MS: u64 = 160_000;

/// A named interval of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    /// `[0s, 35s)`: no scares are scheduled.
    Intro,
    /// `[35s, 150s)`: ambient and face events are scheduled.
    Active,
    /// `[150s, 160s)`: events are cleared and nothing new is scheduled.
    FinalSafeZone,
    /// `>= 160s`: the session has been survived.
    Won,
}

impl Phase {
    /// Phase for an elapsed time in seconds.
    pub fn at_seconds(elapsed: f64) -> Self {
        if elapsed < 35.0 {
            Self::Intro
        } else if elapsed < 150.0 {
            Self::Active
        } else if elapsed < 160.0 {
            Self::FinalSafeZone
        } else {
            Self::Won
        }
    }

    /// Phase for an elapsed time in milliseconds.
    pub fn at_ms(elapsed_ms: u64) -> Self {
        match elapsed_ms {
            0..INTRO_END_MS => Self::Intro,
            INTRO_END_MS..SAFE_ZONE_START_MS => Self::Active,
            SAFE_ZONE_START_MS..SESSION_LENGTH_MS => Self::FinalSafeZone,
            _ => Self::Won,
        }
    }

    /// Elapsed millisecond at which this phase ends, if it ends.
    pub fn end_ms(self) -> Option<u64> {
        match self {
            Self::Intro => Some(INTRO_END_MS),
            Self::Active => Some(SAFE_ZONE_START_MS),
            Self::FinalSafeZone => Some(SESSION_LENGTH_MS),
            Self::Won => None,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Intro => write!(f, "intro"),
            Self::Active => write!(f, "active"),
            Self::FinalSafeZone => write!(f, "final safe zone"),
            Self::Won => write!(f, "won"),
        }
    }
}

/// The master phase timer.
///
/// Holds absolute timestamps; the phase is derived from elapsed time on
/// every read and never stored.
#[derive(Debug, Clone)]
pub struct SessionClock {
    start_ms: u64,
    now_ms: u64,
}

impl SessionClock {
    /// Create a clock anchored at `start_ms`.
    pub fn new(start_ms: u64) -> Self {
        Self {
            start_ms,
            now_ms: start_ms,
        }
    }

    /// Move the clock forward. Returns `false` and leaves the clock untouched
    /// if `now_ms` lies in the past.
    pub fn advance_to(&mut self, now_ms: u64) -> bool {
        if now_ms < self.now_ms {
            return false;
        }
        self.now_ms = now_ms;
        true
    }

    /// Absolute timestamp the session started at.
    pub fn start_ms(&self) -> u64 {
        self.start_ms
    }

    /// Absolute timestamp of the last processed instant.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Milliseconds since session start.
    pub fn elapsed_ms(&self) -> u64 {
        self.now_ms - self.start_ms
    }

    /// Seconds since session start.
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed_ms() as f64 / 1000.0
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        Phase::at_ms(self.elapsed_ms())
    }

    /// Absolute timestamp of the next phase boundary.
    pub fn next_boundary_ms(&self) -> Option<u64> {
        self.phase().end_ms().map(|end| self.start_ms + end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn phase_boundaries_in_seconds() {
        assert_eq!(Phase::at_seconds(0.0), Phase::Intro);
        assert_eq!(Phase::at_seconds(34.9), Phase::Intro);
        assert_eq!(Phase::at_seconds(35.0), Phase::Active);
        assert_eq!(Phase::at_seconds(149.9), Phase::Active);
        assert_eq!(Phase::at_seconds(150.0), Phase::FinalSafeZone);
        assert_eq!(Phase::at_seconds(159.9), Phase::FinalSafeZone);
        assert_eq!(Phase::at_seconds(160.0), Phase::Won);
    }

    #[test]
    fn clock_advances_and_rejects_regression() {
        let mut clock = SessionClock::new(1_000);
        assert!(clock.advance_to(36_000));
        assert_eq!(clock.elapsed_ms(), 35_000);
        assert_eq!(clock.phase(), Phase::Active);
        assert!(!clock.advance_to(2_000));
        assert_eq!(clock.now_ms(), 36_000);
    }

    #[test]
    fn next_boundary_is_absolute() {
        let mut clock = SessionClock::new(500);
        assert_eq!(clock.next_boundary_ms(), Some(35_500));
        clock.advance_to(150_500);
        assert_eq!(clock.next_boundary_ms(), Some(160_500));
        clock.advance_to(160_500);
        assert_eq!(clock.phase(), Phase::Won);
        assert_eq!(clock.next_boundary_ms(), None);
    }

    proptest! {
        #[test]
        fn phase_is_pure_function_of_elapsed(elapsed_ms in 0u64..400_000) {
            let mut clock = SessionClock::new(10_000);
            clock.advance_to(10_000 + elapsed_ms);
            prop_assert_eq!(clock.phase(), Phase::at_ms(elapsed_ms));
            prop_assert_eq!(clock.phase(), Phase::at_seconds(clock.elapsed_seconds()));
        }
    }
}
