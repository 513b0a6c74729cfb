//! One registry for every pending deadline in a session.
//!
//! Each logical purpose owns at most one slot. Scheduling a purpose that is
//! already armed replaces it, and cancelling is idempotent. A timer carries
//! the token (usually an event id) it was armed for, so a handler can tell
//! whether the state it refers to is still current.

use std::collections::HashMap;

/// The purpose a timer serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKey {
    /// Next phase boundary.
    Phase,
    /// Fixed 100 ms cadence for accumulators, monitors and countdown display.
    Pulse,
    /// Next ambient scheduling attempt.
    AmbientAttempt,
    /// End of the insanity warning sub-phase.
    InsanityWarning,
    /// End of the active ambient event.
    AmbientEnd,
    /// End of the post-event cooldown.
    Cooldown,
    /// Return to normal scheduling after a forced event.
    DebugResume,
    /// Next face scheduling attempt.
    FaceAttempt,
    /// Natural timeout of the active face.
    FaceEnd,
    /// Life loss after a face jump scare has played.
    FaceResolve,
    /// Terminal instant of the live death countdown.
    CountdownEnd,
    /// End of the terminal jump scare presentation.
    Presentation,
}

impl std::fmt::Display for TimerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Phase => "phase",
            Self::Pulse => "pulse",
            Self::AmbientAttempt => "ambient-attempt",
            Self::InsanityWarning => "insanity-warning",
            Self::AmbientEnd => "ambient-end",
            Self::Cooldown => "cooldown",
            Self::DebugResume => "debug-resume",
            Self::FaceAttempt => "face-attempt",
            Self::FaceEnd => "face-end",
            Self::FaceResolve => "face-resolve",
            Self::CountdownEnd => "countdown-end",
            Self::Presentation => "presentation",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    deadline_ms: u64,
    token: u64,
    seq: u64,
}

/// A timer that has come due and been removed from the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiredTimer {
    /// What the timer was for.
    pub key: TimerKey,
    /// The token it was armed with.
    pub token: u64,
    /// When it was due.
    pub deadline_ms: u64,
}

/// Pending deadlines keyed by purpose.
#[derive(Debug, Default)]
pub struct TimerRegistry {
    slots: HashMap<TimerKey, Slot>,
    next_seq: u64,
}

impl TimerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm `key` to fire at `deadline_ms`, replacing any pending deadline.
    pub fn schedule(&mut self, key: TimerKey, deadline_ms: u64, token: u64) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.slots.insert(
            key,
            Slot {
                deadline_ms,
                token,
                seq,
            },
        );
    }

    /// Disarm `key`. Returns whether anything was pending.
    pub fn cancel(&mut self, key: TimerKey) -> bool {
        self.slots.remove(&key).is_some()
    }

    /// Disarm every timer.
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Whether `key` is pending.
    pub fn is_armed(&self, key: TimerKey) -> bool {
        self.slots.contains_key(&key)
    }

    /// Pending deadline for `key`.
    pub fn deadline(&self, key: TimerKey) -> Option<u64> {
        self.slots.get(&key).map(|s| s.deadline_ms)
    }

    /// Remove and return the earliest timer due at or before `now_ms`.
    /// Ties go to the timer armed first.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<FiredTimer> {
        let (key, slot) = self
            .slots
            .iter()
            .filter(|(_, s)| s.deadline_ms <= now_ms)
            .min_by_key(|(_, s)| (s.deadline_ms, s.seq))
            .map(|(k, s)| (*k, *s))?;
        self.slots.remove(&key);
        Some(FiredTimer {
            key,
            token: slot.token,
            deadline_ms: slot.deadline_ms,
        })
    }

    /// Number of pending timers.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_deadline_order() {
        let mut timers = TimerRegistry::new();
        timers.schedule(TimerKey::FaceEnd, 300, 1);
        timers.schedule(TimerKey::AmbientEnd, 100, 2);
        timers.schedule(TimerKey::Cooldown, 200, 3);

        assert_eq!(timers.pop_due(250).map(|t| t.key), Some(TimerKey::AmbientEnd));
        assert_eq!(timers.pop_due(250).map(|t| t.key), Some(TimerKey::Cooldown));
        assert_eq!(timers.pop_due(250), None);
        assert_eq!(timers.len(), 1);
    }

    #[test]
    fn ties_fire_in_registration_order() {
        let mut timers = TimerRegistry::new();
        timers.schedule(TimerKey::Pulse, 100, 0);
        timers.schedule(TimerKey::Phase, 100, 0);
        assert_eq!(timers.pop_due(100).map(|t| t.key), Some(TimerKey::Pulse));
        assert_eq!(timers.pop_due(100).map(|t| t.key), Some(TimerKey::Phase));
    }

    #[test]
    fn rescheduling_replaces_slot() {
        let mut timers = TimerRegistry::new();
        timers.schedule(TimerKey::CountdownEnd, 1_000, 1);
        timers.schedule(TimerKey::CountdownEnd, 2_500, 2);
        assert_eq!(timers.len(), 1);
        assert_eq!(timers.pop_due(1_000), None);
        let fired = timers.pop_due(3_000).unwrap();
        assert_eq!(fired.token, 2);
        assert_eq!(fired.deadline_ms, 2_500);
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut timers = TimerRegistry::new();
        timers.schedule(TimerKey::FaceAttempt, 50, 0);
        assert!(timers.cancel(TimerKey::FaceAttempt));
        assert!(!timers.cancel(TimerKey::FaceAttempt));
        assert!(!timers.is_armed(TimerKey::FaceAttempt));
        assert!(timers.is_empty());
    }
}
