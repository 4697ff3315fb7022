//! # Local Filesystem Backend

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use super::backend::{validate_path, StorageBackend};
use super::errors::{StorageError, StorageResult};

/// Local filesystem storage backend
#[derive(Debug)]
pub struct LocalBackend {
    root: PathBuf,
}

impl LocalBackend {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn full_path(&self, path: &str) -> StorageResult<PathBuf> {
        validate_path(path)?;
        Ok(self.root.join(path))
    }

    fn map_io(path: &str, e: std::io::Error) -> StorageError {
        if e.kind() == ErrorKind::NotFound {
            StorageError::ObjectNotFound(path.to_string())
        } else {
            StorageError::IoError(e.to_string())
        }
    }
}

impl StorageBackend for LocalBackend {
    fn write(&self, path: &str, data: &[u8]) -> StorageResult<()> {
        let full_path = self.full_path(path)?;

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write to a sibling temp file first so readers never see a torn artifact.
        let mut tmp_name = full_path.clone().into_os_string();
        tmp_name.push(".partial");
        let tmp_path = PathBuf::from(tmp_name);
        fs::write(&tmp_path, data)?;
        fs::rename(&tmp_path, &full_path)?;
        Ok(())
    }

    fn read(&self, path: &str) -> StorageResult<Vec<u8>> {
        let full_path = self.full_path(path)?;
        fs::read(&full_path).map_err(|e| Self::map_io(path, e))
    }

    fn delete(&self, path: &str) -> StorageResult<()> {
        let full_path = self.full_path(path)?;
        fs::remove_file(&full_path).map_err(|e| Self::map_io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_read() {
        let temp = TempDir::new().unwrap();
        let backend = LocalBackend::new(temp.path().to_path_buf());

        backend.write("test.txt", b"hello").unwrap();
        assert_eq!(backend.read("test.txt").unwrap(), b"hello");
    }

    #[test]
    fn test_nested_write_replaces_and_leaves_no_partial() {
        let temp = TempDir::new().unwrap();
        let backend = LocalBackend::new(temp.path().to_path_buf());

        backend.write("cache/p1/a", b"1").unwrap();
        backend.write("cache/p1/a", b"2").unwrap();

        assert_eq!(backend.read("cache/p1/a").unwrap(), b"2");
        assert!(!temp.path().join("cache/p1/a.partial").exists());
    }

    #[test]
    fn test_delete_missing_is_not_found() {
        let temp = TempDir::new().unwrap();
        let backend = LocalBackend::new(temp.path().to_path_buf());

        backend.write("gone.txt", b"bye").unwrap();
        backend.delete("gone.txt").unwrap();
        assert!(matches!(
            backend.read("gone.txt"),
            Err(StorageError::ObjectNotFound(_))
        ));
        assert!(matches!(
            backend.delete("gone.txt"),
            Err(StorageError::ObjectNotFound(_))
        ));
    }

    #[test]
    fn test_rejects_traversal() {
        let temp = TempDir::new().unwrap();
        let backend = LocalBackend::new(temp.path().to_path_buf());

        assert!(matches!(
            backend.write("../escape", b"x"),
            Err(StorageError::InvalidPath(_))
        ));
    }
}
