use serde::{Deserialize, Serialize};

/// Lives a player can lose before the lives countdown starts.
pub const MAX_LOST_LIVES: u8 = 3;

/// Why a life was lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LifeLossReason {
    /// Eyes were open when heavy footsteps stopped.
    HeavyFootstepsEyesOpen,
    /// Eyes stayed closed too long during light footsteps.
    FootstepsEyesClosed,
    /// A horror face jump scare finished playing.
    HorrorFaceJumpScare,
}

impl std::fmt::Display for LifeLossReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HeavyFootstepsEyesOpen => write!(f, "heavy-footsteps-eyes-open"),
            Self::FootstepsEyesClosed => write!(f, "footsteps-eyes-closed"),
            Self::HorrorFaceJumpScare => write!(f, "horror-face-jump-scare"),
        }
    }
}

/// Result of a [`LivesTracker::lose_life`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifeLoss {
    /// Lives lost after this call.
    pub lost_lives: u8,
    /// Whether this call used up the last life.
    pub exhausted: bool,
}

/// Counts lost lives. Never decrements within a session.
#[derive(Debug, Clone, Default)]
pub struct LivesTracker {
    lost: u8,
}

impl LivesTracker {
    /// Create a tracker with no lives lost.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a lost life. The count saturates at [`MAX_LOST_LIVES`], and
    /// `exhausted` is set only on the call that reaches it.
    pub fn lose_life(&mut self) -> LifeLoss {
        let before = self.lost;
        self.lost = (self.lost + 1).min(MAX_LOST_LIVES);
        LifeLoss {
            lost_lives: self.lost,
            exhausted: before < MAX_LOST_LIVES && self.lost == MAX_LOST_LIVES,
        }
    }

    /// Lives lost so far.
    pub fn lost_lives(&self) -> u8 {
        self.lost
    }

    /// Lives left.
    pub fn remaining(&self) -> u8 {
        MAX_LOST_LIVES - self.lost
    }
}
