//! # Storage Backend Trait

use sha2::{Digest, Sha256};

use super::errors::{StorageError, StorageResult};

/// Backend trait for physical file storage
///
/// Paths are relative, `/`-separated and never contain `..` segments.
pub trait StorageBackend: Send + Sync + std::fmt::Debug {
    /// Write data to path, replacing any previous content
    fn write(&self, path: &str, data: &[u8]) -> StorageResult<()>;

    /// Read data from path
    fn read(&self, path: &str) -> StorageResult<Vec<u8>>;

    /// Delete file at path
    fn delete(&self, path: &str) -> StorageResult<()>;
}

/// Reject absolute paths and parent-directory segments
pub fn validate_path(path: &str) -> StorageResult<()> {
    if path.is_empty() || path.starts_with('/') || path.contains('\\') {
        return Err(StorageError::InvalidPath(path.to_string()));
    }
    if path.split('/').any(|segment| segment.is_empty() || segment == "..") {
        return Err(StorageError::InvalidPath(path.to_string()));
    }
    Ok(())
}

/// Hex SHA-256 of `data`, used as the content fingerprint
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("versions/abc/content").is_ok());
        assert!(validate_path("").is_err());
        assert!(validate_path("/etc/passwd").is_err());
        assert!(validate_path("a/../b").is_err());
        assert!(validate_path("a//b").is_err());
    }

    #[test]
    fn test_checksum() {
        let checksum = sha256_hex(b"test");
        assert_eq!(checksum.len(), 64);
        assert_eq!(checksum, sha256_hex(b"test"));
        assert_ne!(checksum, sha256_hex(b"tesT"));
    }
}
