//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Tally
///
/// The first four variants are timer state-machine violations. They are
/// always recoverable by the caller (refresh state or pick another action).
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum TallyError {
    #[error("A timer is already running for this user")]
    AlreadyRunning,

    #[error("No active time entry")]
    NoActiveEntry,

    #[error("No running time entry to pause")]
    NotRunning,

    #[error("The active time entry is not paused")]
    NotPaused,

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl TallyError {
    /// True for timer transitions rejected by the state machine.
    pub fn is_state_violation(&self) -> bool {
        matches!(self, Self::AlreadyRunning | Self::NoActiveEntry | Self::NotRunning | Self::NotPaused)
    }
}

/// Result type alias for Tally operations
pub type Result<T> = std::result::Result<T, TallyError>;
