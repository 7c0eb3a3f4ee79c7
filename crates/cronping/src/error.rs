//! Error types.

use std::time::Duration;

/// Invalid heartbeat configuration. Raised while building a request or
/// monitor, before any network activity.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("ping target is empty")]
    EmptyTarget,

    #[error("invalid ping target {target:?}: {reason}")]
    InvalidTarget { target: String, reason: String },

    #[error("invalid ping token {0:?}")]
    InvalidToken(String),

    #[error("max attempts must be at least 1")]
    ZeroAttempts,

    #[error("per-attempt timeout must be greater than zero")]
    ZeroTimeout,

    #[error("http client: {0}")]
    HttpClient(String),
}

/// Why a single delivery attempt failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttemptError {
    #[error("unexpected status {0}")]
    Status(u16),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("transport: {0}")]
    Transport(String),
}
