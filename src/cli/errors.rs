//! CLI-specific error types
//!
//! All CLI errors end the process with a non-zero exit code.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::events::EventError;

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

/// CLI errors
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Cannot read config {}: {source}", .path.display())]
    ConfigUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Config parsed but a value is out of range, or the JSON is malformed
    #[error("Invalid config {}: {reason}", .path.display())]
    InvalidConfig { path: PathBuf, reason: String },

    #[error("Data directory {} already initialized", .data_dir.display())]
    AlreadyInitialized { data_dir: PathBuf },

    #[error("Data directory {} not initialized. Run 'vellum init' first.", .data_dir.display())]
    NotInitialized { data_dir: PathBuf },

    /// `init` could not create part of the data directory layout
    #[error("Cannot create {}: {source}", .path.display())]
    Layout {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The event journal exists but cannot be replayed or opened for append
    #[error("Event journal {} failed to open: {source}", .path.display())]
    Journal {
        path: PathBuf,
        #[source]
        source: EventError,
    },

    #[error("Async runtime failed to start: {0}")]
    Runtime(#[source] io::Error),

    /// stdin or stdout failed mid-session
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Stable code written into error responses
    pub fn code(&self) -> &'static str {
        match self {
            CliError::ConfigUnreadable { .. } | CliError::InvalidConfig { .. } => {
                "VELLUM_CLI_CONFIG_ERROR"
            }
            CliError::AlreadyInitialized { .. } => "VELLUM_CLI_ALREADY_INITIALIZED",
            CliError::NotInitialized { .. } => "VELLUM_CLI_NOT_INITIALIZED",
            CliError::Layout { .. } => "VELLUM_CLI_LAYOUT_ERROR",
            CliError::Journal { .. } | CliError::Runtime(_) => "VELLUM_CLI_BOOT_FAILED",
            CliError::Io(_) | CliError::Json(_) => "VELLUM_CLI_IO_ERROR",
        }
    }
}
