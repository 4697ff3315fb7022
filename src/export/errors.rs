//! # Export Errors

use thiserror::Error;

use crate::access::AccessDenied;
use crate::documents::DocumentError;
use crate::events::EventError;
use crate::file_storage::StorageError;

/// Result type for export operations
pub type ExportResult<T> = Result<T, ExportError>;

/// Export and download file errors
#[derive(Debug, Clone, Error)]
pub enum ExportError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Packaging failed: {0}")]
    Packaging(String),

    /// The worker is gone; tasks can no longer be delivered
    #[error("Export worker unavailable")]
    WorkerUnavailable,

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Events(#[from] EventError),

    #[error("Download file index unavailable")]
    LockPoisoned,
}

impl ExportError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ExportError::NotFound(_) => 404,
            ExportError::Packaging(_) => 500,
            ExportError::WorkerUnavailable => 503,
            ExportError::Document(e) => e.status_code(),
            ExportError::Storage(e) => e.status_code(),
            ExportError::Events(e) => e.status_code(),
            ExportError::LockPoisoned => 503,
        }
    }
}

impl From<AccessDenied> for ExportError {
    fn from(denied: AccessDenied) -> Self {
        ExportError::NotFound(denied.object().to_string())
    }
}

impl From<std::io::Error> for ExportError {
    fn from(e: std::io::Error) -> Self {
        ExportError::Packaging(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ObjectRef;
    use uuid::Uuid;

    #[test]
    fn test_status_codes() {
        let version = ObjectRef::version(Uuid::new_v4());
        assert_eq!(ExportError::from(AccessDenied(version)).status_code(), 404);
        assert_eq!(ExportError::WorkerUnavailable.status_code(), 503);
        let nested: ExportError = DocumentError::NotFound(version.to_string()).into();
        assert_eq!(nested.status_code(), 404);
    }
}
