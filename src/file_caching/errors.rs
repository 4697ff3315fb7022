//! # File Caching Errors

use thiserror::Error;

use crate::access::AccessDenied;
use crate::file_storage::StorageError;

/// Result type for cache operations
pub type CacheResult<T> = Result<T, CacheError>;

/// Cache errors
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid derivation key: {0}")]
    InvalidKey(String),

    /// The generator failed; nothing was persisted
    #[error("Artifact generation failed: {0}")]
    GenerationFailed(String),

    #[error("Artifact too large: {size} bytes (max: {limit})")]
    TooLarge { size: u64, limit: u64 },

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Cache index unavailable")]
    LockPoisoned,
}

impl CacheError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            CacheError::NotFound(_) => 404,
            CacheError::InvalidKey(_) => 400,
            CacheError::GenerationFailed(_) => 500,
            CacheError::TooLarge { .. } => 413,
            CacheError::Storage(e) => e.status_code(),
            CacheError::LockPoisoned => 503,
        }
    }
}

impl From<AccessDenied> for CacheError {
    fn from(denied: AccessDenied) -> Self {
        CacheError::NotFound(denied.object().to_string())
    }
}
