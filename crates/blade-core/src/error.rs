use thiserror::Error;

/// Unified error type for the entire blade runtime.
#[derive(Error, Debug)]
pub enum BladeError {
    // ── Behavior errors ────────────────────────────────────────
    #[error("behavior failed: {behavior} ({phase}): {reason}")]
    Behavior {
        behavior: String,
        phase: String,
        reason: String,
    },

    #[error("behavior panicked: {behavior} ({phase})")]
    BehaviorPanic { behavior: String, phase: String },

    #[error("behavior could not be created: {candidate}: {reason}")]
    Discovery { candidate: String, reason: String },

    // ── Remote service errors ──────────────────────────────────
    #[error("remote call failed: {endpoint}: {reason}")]
    Remote { endpoint: String, reason: String },

    #[error("remote returned HTTP {status}: {endpoint}")]
    RemoteStatus { endpoint: String, status: u16 },

    #[error("remote client already closed")]
    RemoteClosed,

    // ── Lifecycle errors ───────────────────────────────────────
    #[error("invalid scheduler state: {0}")]
    InvalidState(String),

    // ── Config errors ──────────────────────────────────────────
    #[error("config error: {0}")]
    Config(String),

    #[error("config validation failed: {field}: {reason}")]
    ConfigValidation { field: String, reason: String },

    // ── Generic wrappers ───────────────────────────────────────
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl BladeError {
    /// Shorthand for a behavior hook returning a plain failure message.
    pub fn behavior(
        behavior: impl Into<String>,
        phase: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Behavior {
            behavior: behavior.into(),
            phase: phase.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BladeError>;
