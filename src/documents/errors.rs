//! # Document Errors

use thiserror::Error;

use crate::access::AccessDenied;
use crate::events::EventError;
use crate::file_caching::CacheError;
use crate::file_storage::StorageError;

/// Result type for document operations
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Document and version errors
#[derive(Debug, Clone, Error)]
pub enum DocumentError {
    /// Absent, or present but not visible to the caller
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Render failed: {0}")]
    Render(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Events(#[from] EventError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("Document registry unavailable")]
    LockPoisoned,
}

impl DocumentError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            DocumentError::NotFound(_) => 404,
            DocumentError::InvalidRequest(_) => 400,
            DocumentError::Render(_) => 500,
            DocumentError::Storage(e) => e.status_code(),
            DocumentError::Events(e) => e.status_code(),
            DocumentError::Cache(e) => e.status_code(),
            DocumentError::LockPoisoned => 503,
        }
    }
}

impl From<AccessDenied> for DocumentError {
    fn from(denied: AccessDenied) -> Self {
        DocumentError::NotFound(denied.object().to_string())
    }
}

/// Failure reported by a `PageRenderer`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct RenderError(pub String);

impl From<RenderError> for DocumentError {
    fn from(e: RenderError) -> Self {
        DocumentError::Render(e.0)
    }
}
