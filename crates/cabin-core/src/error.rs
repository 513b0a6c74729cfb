//! Error types for the session orchestrator.

use thiserror::Error;

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors surfaced by session commands and configuration loading.
///
/// Stale timers, out-of-range signals and countdown conflicts are handled
/// inside the orchestrator and never show up here.
#[derive(Debug, Error)]
pub enum SessionError {
    /// `start` was called while a session is still live.
    #[error("session is already running")]
    AlreadyRunning,

    /// A command needs a live session.
    #[error("no running session")]
    NotRunning,

    /// Configuration values that cannot describe a playable screen.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A config or signal script could not be parsed.
    #[error("malformed json: {0}")]
    Config(#[from] serde_json::Error),

    /// A config or signal script could not be read.
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// A timer handler hit a state it cannot act on.
    #[error("handler error: {0}")]
    Handler(String),
}
