//! The death countdown: a short random-length countdown ending in a
//! terminal jump scare.
//!
//! Three failure paths feed it (noise, eye closure, lives), but at most one
//! countdown is ever live. Starting a new one replaces whatever is running,
//! except that an eye-closure countdown never displaces one the player
//! cannot call off.

use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// Shortest countdown.
pub const COUNTDOWN_MIN_MS: u64 = 1_000;
/// Longest countdown.
pub const COUNTDOWN_MAX_MS: u64 = 3_000;
/// How long the terminal jump scare plays before the session is lost.
pub const PRESENTATION_MS: u64 = 4_000;

/// Failure path that started a countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeathReason {
    /// Sustained red-zone noise, or a loud insanity failure.
    #[serde(rename = "microphone-death")]
    NoiseDeath,
    /// Eyes closed for too long.
    #[serde(rename = "eye-closure-death")]
    EyeClosureDeath,
    /// Out of lives, or a quiet insanity failure.
    #[serde(rename = "lives-death")]
    LivesDeath,
}

impl DeathReason {
    /// Whether the player can call this countdown off. Only eye closure
    /// can be undone, by opening the eyes.
    pub fn is_cancellable(self) -> bool {
        matches!(self, Self::EyeClosureDeath)
    }
}

impl std::fmt::Display for DeathReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoiseDeath => write!(f, "microphone-death"),
            Self::EyeClosureDeath => write!(f, "eye-closure-death"),
            Self::LivesDeath => write!(f, "lives-death"),
        }
    }
}

/// Which terminal jump scare plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScareVariant {
    /// First scream clip.
    #[serde(rename = "scream-1")]
    Scream1,
    /// Second scream clip.
    #[serde(rename = "scream-2")]
    Scream2,
}

impl ScareVariant {
    /// Pick one of the two variants with equal odds.
    pub fn draw(rng: &mut StdRng) -> Self {
        if rng.random_bool(0.5) {
            Self::Scream1
        } else {
            Self::Scream2
        }
    }
}

impl std::fmt::Display for ScareVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scream1 => write!(f, "scream-1"),
            Self::Scream2 => write!(f, "scream-2"),
        }
    }
}

/// A live countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    /// Failure path that started it.
    pub reason: DeathReason,
    /// Absolute start time.
    pub started_ms: u64,
    /// Drawn length.
    pub duration_ms: u64,
}

impl Countdown {
    /// Absolute time it runs out.
    pub fn deadline_ms(&self) -> u64 {
        self.started_ms + self.duration_ms
    }

    /// Time left at `now_ms`, never negative.
    pub fn remaining_ms(&self, now_ms: u64) -> u64 {
        self.deadline_ms().saturating_sub(now_ms)
    }
}

/// Where the countdown machine stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CountdownState {
    /// Nothing running.
    #[default]
    Idle,
    /// Counting down.
    Running(Countdown),
    /// Ran out; the terminal scare is playing and the loss is sealed.
    Terminal {
        /// Failure path that killed the player.
        reason: DeathReason,
        /// Scare being played.
        variant: ScareVariant,
    },
}

/// Single-instance death countdown.
#[derive(Debug, Default)]
pub struct DeathCountdownMachine {
    state: CountdownState,
}

impl DeathCountdownMachine {
    /// Create an idle machine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> CountdownState {
        self.state
    }

    /// The running countdown, if any.
    pub fn running(&self) -> Option<&Countdown> {
        match &self.state {
            CountdownState::Running(countdown) => Some(countdown),
            _ => None,
        }
    }

    /// Whether the terminal scare has fired.
    pub fn is_terminal(&self) -> bool {
        matches!(self.state, CountdownState::Terminal { .. })
    }

    /// Start a countdown for `reason`, drawing its length. Returns the new
    /// countdown and the one it replaced, if any. Returns `None` once the
    /// machine is terminal, or when a cancellable countdown would replace
    /// one that cannot be cancelled.
    pub fn start(
        &mut self,
        reason: DeathReason,
        now_ms: u64,
        rng: &mut StdRng,
    ) -> Option<(Countdown, Option<Countdown>)> {
        if self.is_terminal() {
            return None;
        }
        let replaced = self.running().copied();
        if reason.is_cancellable() && replaced.is_some_and(|c| !c.reason.is_cancellable()) {
            return None;
        }
        let countdown = Countdown {
            reason,
            started_ms: now_ms,
            duration_ms: rng.random_range(COUNTDOWN_MIN_MS..=COUNTDOWN_MAX_MS),
        };
        self.state = CountdownState::Running(countdown);
        Some((countdown, replaced))
    }

    /// Cancel the running countdown, whatever its reason.
    pub fn cancel(&mut self) -> Option<Countdown> {
        let running = self.running().copied();
        if running.is_some() {
            self.state = CountdownState::Idle;
        }
        running
    }

    /// Cancel the running countdown only if `reason` started it.
    pub fn cancel_if(&mut self, reason: DeathReason) -> Option<Countdown> {
        match self.running() {
            Some(countdown) if countdown.reason == reason => self.cancel(),
            _ => None,
        }
    }

    /// The countdown ran out. Seals the loss and picks the scare variant.
    pub fn expire(&mut self, rng: &mut StdRng) -> Option<(DeathReason, ScareVariant)> {
        let countdown = self.running().copied()?;
        let variant = ScareVariant::draw(rng);
        self.state = CountdownState::Terminal {
            reason: countdown.reason,
            variant,
        };
        Some((countdown.reason, variant))
    }

    /// Back to idle for a new session.
    pub fn reset(&mut self) {
        self.state = CountdownState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn start_draws_length_in_range() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut machine = DeathCountdownMachine::new();
        for _ in 0..200 {
            let (countdown, _) = machine
                .start(DeathReason::LivesDeath, 10_000, &mut rng)
                .unwrap();
            assert!((1_000..=3_000).contains(&countdown.duration_ms));
        }
    }

    #[test]
    fn restart_replaces_running_countdown() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut machine = DeathCountdownMachine::new();
        let (first, replaced) = machine
            .start(DeathReason::EyeClosureDeath, 0, &mut rng)
            .unwrap();
        assert!(replaced.is_none());
        let (second, replaced) = machine
            .start(DeathReason::NoiseDeath, 500, &mut rng)
            .unwrap();
        assert_eq!(replaced, Some(first));
        assert_eq!(machine.running(), Some(&second));
        let (third, replaced) = machine
            .start(DeathReason::LivesDeath, 900, &mut rng)
            .unwrap();
        assert_eq!(replaced, Some(second));
        assert_eq!(machine.running(), Some(&third));
    }

    #[test]
    fn eye_closure_never_displaces_a_sealed_path() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut machine = DeathCountdownMachine::new();
        for reason in [DeathReason::LivesDeath, DeathReason::NoiseDeath] {
            machine.reset();
            let (running, _) = machine.start(reason, 0, &mut rng).unwrap();
            assert!(machine
                .start(DeathReason::EyeClosureDeath, 100, &mut rng)
                .is_none());
            assert_eq!(machine.running(), Some(&running));
            assert!(machine.cancel_if(DeathReason::EyeClosureDeath).is_none());
        }
    }

    #[test]
    fn cancel_if_respects_owner() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut machine = DeathCountdownMachine::new();
        machine.start(DeathReason::NoiseDeath, 0, &mut rng);
        assert!(machine.cancel_if(DeathReason::EyeClosureDeath).is_none());
        assert!(machine.running().is_some());
        assert!(machine.cancel_if(DeathReason::NoiseDeath).is_some());
        assert!(machine.cancel().is_none());
    }

    #[test]
    fn remaining_decreases_to_zero() {
        let countdown = Countdown {
            reason: DeathReason::LivesDeath,
            started_ms: 1_000,
            duration_ms: 2_000,
        };
        assert_eq!(countdown.remaining_ms(1_000), 2_000);
        assert_eq!(countdown.remaining_ms(2_900), 100);
        assert_eq!(countdown.remaining_ms(3_500), 0);
    }

    #[test]
    fn terminal_is_sealed() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut machine = DeathCountdownMachine::new();
        assert!(machine.expire(&mut rng).is_none());
        machine.start(DeathReason::EyeClosureDeath, 0, &mut rng);
        let (reason, _) = machine.expire(&mut rng).unwrap();
        assert_eq!(reason, DeathReason::EyeClosureDeath);
        assert!(machine.is_terminal());
        assert!(machine.start(DeathReason::LivesDeath, 10, &mut rng).is_none());
        assert!(machine.cancel().is_none());
    }

    #[test]
    fn variants_are_evenly_split() {
        let mut rng = StdRng::seed_from_u64(5);
        let firsts = (0..2_000)
            .filter(|_| ScareVariant::draw(&mut rng) == ScareVariant::Scream1)
            .count();
        assert!((900..1_100).contains(&firsts), "{firsts}");
    }

    #[test]
    fn reasons_use_wire_names() {
        let json = serde_json::to_string(&DeathReason::NoiseDeath).unwrap();
        assert_eq!(json, "\"microphone-death\"");
        assert_eq!(DeathReason::LivesDeath.to_string(), "lives-death");
    }
}
