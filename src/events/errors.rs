//! # Event Log Errors

use thiserror::Error;

/// Result type for event log operations
pub type EventResult<T> = Result<T, EventError>;

/// Event log errors
#[derive(Debug, Clone, Error)]
pub enum EventError {
    /// The log cannot accept writes. Fatal for the current operation.
    #[error("Event storage unavailable: {0}")]
    StorageUnavailable(String),

    /// A journal line failed its checksum or did not parse
    #[error("Event journal corrupted at line {line}: {reason}")]
    Corrupted { line: usize, reason: String },
}

impl EventError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            EventError::StorageUnavailable(_) => 503,
            EventError::Corrupted { .. } => 500,
        }
    }
}
