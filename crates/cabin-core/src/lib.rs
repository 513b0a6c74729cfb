//! Session orchestrator for The Last Cabin.
//!
//! A play session is 160 seconds of discrete-event time. The [`Session`]
//! owns a phase clock, a single timer registry, the latest player signals,
//! and every scheduler and accumulator that turns those signals into scares,
//! lost lives, death countdowns and finally a win or a loss. Presentation
//! and sensing live outside: signals come in through [`Session::ingest`],
//! time through [`Session::tick`], and [`SessionEvent`]s go out.

/// Ambient scare kinds, weighted selection and the ambient slot.
pub mod ambient;
/// Phase boundaries and the session clock.
pub mod clock;
/// Pointer-versus-face collision.
pub mod collision;
/// Configuration types for sessions.
pub mod config;
/// The death countdown and its terminal jump scare.
pub mod countdown;
/// Error types for the session crate.
pub mod error;
/// Outbound session events and the event log.
pub mod event;
/// Eye-closure accumulator.
pub mod eyes;
/// Horror faces and their scheduler.
pub mod face;
/// Lost lives.
pub mod lives;
/// Sustained-look detection for horror faces.
pub mod look;
/// Noise red-zone monitor.
pub mod noise;
/// The session orchestrator.
pub mod session;
/// Gaze side classification with hysteresis.
pub mod side;
/// Player signals and the authoritative signal state.
pub mod signal;
/// Scripted and synthetic signal sources.
pub mod source;
/// Survival rules per ambient event kind.
pub mod survival;
/// The timer registry.
pub mod timer;

/// Re-exports of [`ambient::AmbientKind`], [`ambient::GameEvent`] and [`ambient::SchedulingMode`].
pub use ambient::{AmbientKind, GameEvent, SchedulingMode};
/// Re-exports of [`clock::Phase`] and [`clock::SessionClock`].
pub use clock::{Phase, SessionClock};
/// Re-export of [`config::SessionConfig`].
pub use config::SessionConfig;
/// Re-exports of [`countdown::DeathReason`] and [`countdown::ScareVariant`].
pub use countdown::{DeathReason, ScareVariant};
/// Re-exports of [`error::SessionError`] and [`error::SessionResult`].
pub use error::{SessionError, SessionResult};
/// Re-exports of [`event::EventLog`], [`event::EventOutcome`], [`event::LoggedEvent`] and [`event::SessionEvent`].
pub use event::{EventLog, EventOutcome, LoggedEvent, SessionEvent};
/// Re-exports of [`face::FaceEvent`] and [`face::FaceSide`].
pub use face::{FaceEvent, FaceSide};
/// Re-export of [`lives::LifeLossReason`].
pub use lives::LifeLossReason;
/// Re-exports of [`session::ForcedEvent`], [`session::Session`] and [`session::SessionState`].
pub use session::{ForcedEvent, Session, SessionState};
/// Re-exports of [`signal::GazeSide`], [`signal::Point`] and [`signal::Signals`].
pub use signal::{GazeSide, Point, Signals};
/// Re-exports of the bundled [`source::SignalSource`] implementations.
pub use source::{Autopilot, IdleSource, Keyframe, Reckless, ScriptedSource, SignalSource};
