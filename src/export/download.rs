//! # Download Files
//!
//! Finished export archives. A download file is visible to its creator
//! and to holders of `DownloadFileView`; to everyone else it does not
//! exist.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::access::{AccessGuard, Permission, Principal};
use crate::core::ObjectRef;
use crate::file_storage::{sha256_hex, StorageBackend, StorageError};
use crate::observability::{Event, Logger};

use super::errors::{ExportError, ExportResult};

/// A persisted, downloadable export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadFile {
    pub id: Uuid,
    pub path: String,
    pub filename: String,
    pub label: String,
    pub size: u64,
    pub checksum: String,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl DownloadFile {
    pub fn object(&self) -> ObjectRef {
        ObjectRef::download_file(self.id)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Fields of a download file about to be stored
#[derive(Debug, Clone)]
pub struct NewDownloadFile<'a> {
    pub filename: String,
    pub label: String,
    pub data: &'a [u8],
    pub created_by: Option<Uuid>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Index of download files over a storage backend
#[derive(Debug)]
pub struct DownloadFileStore {
    backend: Arc<dyn StorageBackend>,
    guard: Arc<AccessGuard>,
    files: RwLock<HashMap<Uuid, DownloadFile>>,
}

impl DownloadFileStore {
    pub fn new(backend: Arc<dyn StorageBackend>, guard: Arc<AccessGuard>) -> Self {
        Self {
            backend,
            guard,
            files: RwLock::new(HashMap::new()),
        }
    }

    /// Persist content and index it
    pub fn create(&self, new: NewDownloadFile<'_>) -> ExportResult<DownloadFile> {
        let id = Uuid::new_v4();
        let path = format!("downloads/{}", id);
        self.backend.write(&path, new.data)?;

        let file = DownloadFile {
            id,
            path,
            filename: new.filename,
            label: new.label,
            size: new.data.len() as u64,
            checksum: sha256_hex(new.data),
            created_by: new.created_by,
            created_at: Utc::now(),
            expires_at: new.expires_at,
        };

        match self.files.write() {
            Ok(mut files) => {
                files.insert(id, file.clone());
                Ok(file)
            }
            Err(_) => {
                let _ = self.backend.delete(&file.path);
                Err(ExportError::LockPoisoned)
            }
        }
    }

    /// Remove a file that was never announced
    pub(crate) fn discard(&self, id: Uuid) {
        let removed = self.files.write().ok().and_then(|mut files| files.remove(&id));
        if let Some(file) = removed {
            let _ = self.backend.delete(&file.path);
        }
    }

    /// Fetch a download file the principal may see
    pub fn get(&self, id: Uuid, principal: &Principal) -> ExportResult<DownloadFile> {
        let object = ObjectRef::download_file(id);
        let file = self
            .files
            .read()
            .map_err(|_| ExportError::LockPoisoned)?
            .get(&id)
            .cloned()
            .ok_or_else(|| ExportError::NotFound(object.to_string()))?;

        let is_creator = file.created_by.is_some() && principal.user_id == file.created_by;
        if !is_creator {
            self.guard
                .require(principal, &object, Permission::DownloadFileView)?;
        }
        Ok(file)
    }

    /// Read and verify the archive bytes
    pub fn read(&self, file: &DownloadFile) -> ExportResult<Vec<u8>> {
        let data = self.backend.read(&file.path)?;
        if sha256_hex(&data) != file.checksum {
            return Err(StorageError::ChecksumMismatch(file.path.clone()).into());
        }
        Ok(data)
    }

    pub fn count(&self) -> usize {
        self.files.read().map(|f| f.len()).unwrap_or(0)
    }

    /// Delete every file whose expiry is at or before `now`
    pub fn purge_expired(&self, now: DateTime<Utc>) -> ExportResult<usize> {
        let mut files = self.files.write().map_err(|_| ExportError::LockPoisoned)?;
        let expired: Vec<Uuid> = files
            .values()
            .filter(|f| f.is_expired(now))
            .map(|f| f.id)
            .collect();

        for id in &expired {
            if let Some(file) = files.get(id) {
                match self.backend.delete(&file.path) {
                    Ok(()) | Err(StorageError::ObjectNotFound(_)) => {}
                    Err(e) => return Err(e.into()),
                }
            }
            files.remove(id);
        }

        if !expired.is_empty() {
            Logger::info(
                Event::DownloadFilesExpired.as_str(),
                &[("count", &expired.len().to_string())],
            );
        }
        Ok(expired.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::MemoryAcl;
    use crate::file_storage::MemoryBackend;
    use crate::observability::MetricsRegistry;
    use chrono::Duration;

    fn store() -> (DownloadFileStore, Arc<AccessGuard>, Arc<MemoryBackend>) {
        let backend = Arc::new(MemoryBackend::new());
        let guard = Arc::new(AccessGuard::new(
            Arc::new(MemoryAcl::new()),
            Arc::new(MetricsRegistry::new()),
        ));
        let store = DownloadFileStore::new(Arc::clone(&backend) as Arc<dyn StorageBackend>, Arc::clone(&guard));
        (store, guard, backend)
    }

    fn new_file(data: &[u8], created_by: Option<Uuid>, expires_at: Option<DateTime<Utc>>) -> NewDownloadFile<'_> {
        NewDownloadFile {
            filename: "report-v1.tar".into(),
            label: "report".into(),
            data,
            created_by,
            expires_at,
        }
    }

    #[test]
    fn test_creator_and_grantee_can_read() {
        let (store, guard, _) = store();
        let creator = Uuid::new_v4();
        let file = store.create(new_file(b"tar", Some(creator), None)).unwrap();

        assert_eq!(store.get(file.id, &Principal::user(creator)).unwrap(), file);
        assert_eq!(store.read(&file).unwrap(), b"tar");

        let reader = Uuid::new_v4();
        assert!(store.get(file.id, &Principal::user(reader)).is_err());
        guard.acl().grant(reader, file.object(), Permission::DownloadFileView);
        assert!(store.get(file.id, &Principal::user(reader)).is_ok());
    }

    #[test]
    fn test_hidden_file_matches_missing_file() {
        let (store, _, _) = store();
        let file = store.create(new_file(b"tar", Some(Uuid::new_v4()), None)).unwrap();
        let stranger = Principal::user(Uuid::new_v4());

        let hidden = store.get(file.id, &stranger).unwrap_err();
        assert_eq!(hidden.to_string(), format!("Not found: {}", file.object()));

        let missing_id = Uuid::new_v4();
        let missing = store.get(missing_id, &stranger).unwrap_err();
        assert_eq!(hidden.status_code(), missing.status_code());
    }

    #[test]
    fn test_anonymous_never_matches_creatorless_file() {
        let (store, _, _) = store();
        let file = store.create(new_file(b"tar", None, None)).unwrap();
        assert!(store.get(file.id, &Principal::anonymous()).is_err());
    }

    #[test]
    fn test_purge_expired() {
        let (store, _, backend) = store();
        let now = Utc::now();
        store.create(new_file(b"a", None, Some(now - Duration::seconds(1)))).unwrap();
        store.create(new_file(b"b", None, Some(now + Duration::hours(1)))).unwrap();
        store.create(new_file(b"c", None, None)).unwrap();

        assert_eq!(store.purge_expired(now).unwrap(), 1);
        assert_eq!(store.count(), 2);
        assert_eq!(backend.len(), 2);
        assert_eq!(store.purge_expired(now).unwrap(), 0);
    }

    #[test]
    fn test_discard_removes_file_and_content() {
        let (store, _, backend) = store();
        let file = store.create(new_file(b"tar", None, None)).unwrap();

        store.discard(file.id);
        assert_eq!(store.count(), 0);
        assert!(backend.is_empty());
    }
}
