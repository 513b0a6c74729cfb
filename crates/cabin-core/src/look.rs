/// Continuous looking time that triggers a face jump scare.
pub const LOOK_TRIGGER_MS: u64 = 1_200;

/// Where the look timer stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LookState {
    /// Not looking at the face.
    #[default]
    Idle,
    /// Looking at the face since `since_ms`.
    Accumulating {
        /// Timestamp the current unbroken look started at.
        since_ms: u64,
    },
    /// The threshold was reached. Stays here until [`LookDurationTimer::reset`].
    Triggered,
}

/// Accumulates sustained looking at a horror face.
///
/// No partial credit: looking away resets the accumulated time to zero.
#[derive(Debug, Clone, Default)]
pub struct LookDurationTimer {
    state: LookState,
}

impl LookDurationTimer {
    /// Create an idle timer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the current collision result. Returns `true` exactly once, on
    /// the observation that reaches the threshold.
    pub fn observe(&mut self, looking: bool, now_ms: u64) -> bool {
        match (self.state, looking) {
            (LookState::Triggered, _) => false,
            (_, false) => {
                self.state = LookState::Idle;
                false
            }
            (LookState::Idle, true) => {
                self.state = LookState::Accumulating { since_ms: now_ms };
                false
            }
            (LookState::Accumulating { since_ms }, true) => {
                if now_ms.saturating_sub(since_ms) >= LOOK_TRIGGER_MS {
                    self.state = LookState::Triggered;
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Milliseconds of unbroken looking so far.
    pub fn looking_ms(&self, now_ms: u64) -> u64 {
        match self.state {
            LookState::Accumulating { since_ms } => now_ms.saturating_sub(since_ms),
            LookState::Idle | LookState::Triggered => 0,
        }
    }

    /// Current state.
    pub fn state(&self) -> LookState {
        self.state
    }

    /// Return to idle, e.g. when a new face appears.
    pub fn reset(&mut self) {
        self.state = LookState::Idle;
    }
}
