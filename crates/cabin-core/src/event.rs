use serde::Serialize;

use crate::ambient::AmbientKind;
use crate::clock::Phase;
use crate::countdown::{DeathReason, ScareVariant};
use crate::face::FaceSide;
use crate::lives::LifeLossReason;

/// How an ambient event ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventOutcome {
    /// The survival condition held.
    Survived,
    /// The survival condition was broken.
    Failed,
    /// Cleared before it could resolve (safe zone, debug clear, shutdown).
    Cancelled,
}

impl std::fmt::Display for EventOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Survived => write!(f, "survived"),
            Self::Failed => write!(f, "failed"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A discrete transition emitted to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SessionEvent {
    /// The session clock crossed a phase boundary.
    PhaseChanged {
        /// Phase being left.
        from: Phase,
        /// Phase being entered.
        to: Phase,
    },
    /// An ambient event announced itself ahead of its active window.
    EventWarning {
        /// Event id.
        id: u64,
        /// Event kind.
        kind: AmbientKind,
    },
    /// An ambient event became active.
    EventStarted {
        /// Event id.
        id: u64,
        /// Event kind.
        kind: AmbientKind,
        /// Length of the active window.
        duration_ms: u64,
    },
    /// An ambient event ended.
    EventResolved {
        /// Event id.
        id: u64,
        /// Event kind.
        kind: AmbientKind,
        /// How it ended.
        outcome: EventOutcome,
    },
    /// A horror face appeared.
    FaceEventStarted {
        /// Face id.
        id: u64,
        /// Side of the screen it appeared on.
        side: FaceSide,
        /// Left edge of the face in pixels.
        x: f64,
        /// Time until it leaves on its own.
        duration_ms: u64,
    },
    /// The player stared at a face for too long.
    FaceJumpScare {
        /// Face id.
        id: u64,
    },
    /// A horror face went away.
    FaceEventResolved {
        /// Face id.
        id: u64,
        /// Whether it ended through a jump scare.
        jump_scare_triggered: bool,
    },
    /// A life was lost.
    LifeLost {
        /// Why.
        reason: LifeLossReason,
        /// Lives lost so far, 1 to 3.
        lost_lives: u8,
    },
    /// A death countdown began.
    DeathCountdownStarted {
        /// Failure path that started it.
        reason: DeathReason,
        /// Drawn countdown length.
        duration_ms: u64,
    },
    /// Display update for the live death countdown.
    DeathCountdownTick {
        /// Time left.
        remaining_ms: u64,
        /// Failure path that started it.
        reason: DeathReason,
    },
    /// A death countdown was called off.
    DeathCountdownCancelled {
        /// Failure path that had started it.
        reason: DeathReason,
    },
    /// A death countdown ran out and the terminal scare is playing.
    JumpScareTriggered {
        /// Which scare plays.
        variant: ScareVariant,
        /// Failure path that led here.
        reason: DeathReason,
    },
    /// The player survived the whole session.
    SessionWon,
    /// The player died.
    SessionLost {
        /// Failure path that killed them.
        reason: DeathReason,
    },
}

impl std::fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PhaseChanged { from, to } => write!(f, "phase {from} -> {to}"),
            Self::EventWarning { id, kind } => write!(f, "{kind} #{id} incoming"),
            Self::EventStarted {
                id,
                kind,
                duration_ms,
            } => write!(f, "{kind} #{id} started ({duration_ms}ms)"),
            Self::EventResolved { id, kind, outcome } => write!(f, "{kind} #{id} {outcome}"),
            Self::FaceEventStarted {
                id,
                side,
                x,
                duration_ms,
            } => write!(
                f,
                "face #{id} appeared {side} at x={x:.0} ({duration_ms}ms)"
            ),
            Self::FaceJumpScare { id } => write!(f, "face #{id} jump scare"),
            Self::FaceEventResolved {
                id,
                jump_scare_triggered,
            } => {
                if *jump_scare_triggered {
                    write!(f, "face #{id} gone after jump scare")
                } else {
                    write!(f, "face #{id} gone")
                }
            }
            Self::LifeLost { reason, lost_lives } => {
                write!(f, "life lost ({reason}), {lost_lives}/3 lost")
            }
            Self::DeathCountdownStarted {
                reason,
                duration_ms,
            } => write!(f, "death countdown {reason} started ({duration_ms}ms)"),
            Self::DeathCountdownTick {
                remaining_ms,
                reason,
            } => write!(f, "death countdown {reason}: {remaining_ms}ms left"),
            Self::DeathCountdownCancelled { reason } => {
                write!(f, "death countdown {reason} cancelled")
            }
            Self::JumpScareTriggered { variant, reason } => {
                write!(f, "jump scare {variant} ({reason})")
            }
            Self::SessionWon => write!(f, "session won"),
            Self::SessionLost { reason } => write!(f, "session lost ({reason})"),
        }
    }
}

/// An emitted event with the session time it happened at.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggedEvent {
    /// Milliseconds since session start.
    pub elapsed_ms: u64,
    /// What happened.
    pub event: SessionEvent,
}

/// Accumulates events during a session.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<LoggedEvent>,
    max_events: usize,
}

impl EventLog {
    /// Create a new event log with the given maximum capacity (0 = unlimited).
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Vec::new(),
            max_events,
        }
    }

    /// Append an event, dropping the oldest events if the log exceeds its capacity.
    pub fn push(&mut self, event: LoggedEvent) {
        self.events.push(event);
        if self.max_events > 0 && self.events.len() > self.max_events {
            let drain_count = self.events.len() - self.max_events;
            self.events.drain(..drain_count);
        }
    }

    /// Return a slice of all recorded events.
    pub fn events(&self) -> &[LoggedEvent] {
        &self.events
    }

    /// Count recorded events matching a predicate.
    pub fn count(&self, pred: impl Fn(&SessionEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(&e.event)).count()
    }

    /// Return the number of recorded events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Return `true` if no events have been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Remove all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}
