//! # In-Memory Backend
//!
//! Used by tests and by `vellum serve` when no data directory is wanted.
//! Can be switched to an unavailable state to exercise storage failures.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use super::backend::{validate_path, StorageBackend};
use super::errors::{StorageError, StorageResult};

/// Process-local storage backend
#[derive(Debug, Default)]
pub struct MemoryBackend {
    files: RwLock<BTreeMap<String, Vec<u8>>>,
    unavailable: AtomicBool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following call fail with `StorageError::Unavailable`
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.files.read().map(|f| f.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check(&self, path: &str) -> StorageResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("memory backend offline".into()));
        }
        validate_path(path)
    }

    fn poisoned() -> StorageError {
        StorageError::Unavailable("Lock poisoned".into())
    }
}

impl StorageBackend for MemoryBackend {
    fn write(&self, path: &str, data: &[u8]) -> StorageResult<()> {
        self.check(path)?;
        let mut files = self.files.write().map_err(|_| Self::poisoned())?;
        files.insert(path.to_string(), data.to_vec());
        Ok(())
    }

    fn read(&self, path: &str) -> StorageResult<Vec<u8>> {
        self.check(path)?;
        let files = self.files.read().map_err(|_| Self::poisoned())?;
        files
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::ObjectNotFound(path.to_string()))
    }

    fn delete(&self, path: &str) -> StorageResult<()> {
        self.check(path)?;
        let mut files = self.files.write().map_err(|_| Self::poisoned())?;
        files
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| StorageError::ObjectNotFound(path.to_string()))
    }
}
