//! # File Storage Errors

use thiserror::Error;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Physical storage errors
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("File too large: {0} bytes (max: {1})")]
    FileTooLarge(u64, u64),

    #[error("Checksum mismatch: {0}")]
    ChecksumMismatch(String),

    /// The backend cannot serve requests at all
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("I/O error: {0}")]
    IoError(String),
}

impl StorageError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            StorageError::ObjectNotFound(_) => 404,
            StorageError::InvalidPath(_) => 400,
            StorageError::FileTooLarge(_, _) => 413,
            StorageError::ChecksumMismatch(_) => 500,
            StorageError::Unavailable(_) => 503,
            StorageError::IoError(_) => 500,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::IoError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(StorageError::ObjectNotFound("a".into()).status_code(), 404);
        assert_eq!(StorageError::FileTooLarge(100, 50).status_code(), 413);
        assert_eq!(StorageError::Unavailable("down".into()).status_code(), 503);
    }
}
