//! # Cache Partition Store
//!
//! Index of partitions and their files over a `StorageBackend`.
//!
//! `get_or_generate` coalesces concurrent requests for the same
//! `CacheKey`: callers queue on a per-key slot, and whoever gets the slot
//! first re-checks the index before running the generator. The generator
//! therefore runs at most once per key while one generation is in flight
//! or after one has succeeded.
//!
//! Artifact bytes are returned together with the file record. A file
//! purged between the index lookup and the read counts as a miss and is
//! generated again, so callers never see a purge as a missing object.

use std::collections::HashMap;
use std::fmt::Display;
use std::sync::{Arc, Mutex, RwLock};

use chrono::Utc;
use uuid::Uuid;

use crate::access::{AccessGuard, Permission, Principal};
use crate::core::ObjectRef;
use crate::file_storage::{StorageBackend, StorageError};
use crate::observability::{Event, Logger, MetricsRegistry};

use super::errors::{CacheError, CacheResult};
use super::partition::{CacheKey, CachePartition, CachePartitionFile};

/// Default artifact size limit (64 MiB)
pub const DEFAULT_MAX_ARTIFACT_BYTES: u64 = 64 * 1024 * 1024;

type Slot = Arc<Mutex<()>>;

/// A cached file together with its bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedArtifact {
    pub file: CachePartitionFile,
    pub data: Vec<u8>,
}

/// Partitioned artifact cache
#[derive(Debug)]
pub struct CachePartitionStore {
    backend: Arc<dyn StorageBackend>,
    guard: Arc<AccessGuard>,
    metrics: Arc<MetricsRegistry>,
    max_artifact_bytes: u64,
    partitions: RwLock<HashMap<(ObjectRef, String), CachePartition>>,
    files: RwLock<HashMap<CacheKey, CachePartitionFile>>,
    in_flight: Mutex<HashMap<CacheKey, Slot>>,
}

impl CachePartitionStore {
    pub fn new(
        backend: Arc<dyn StorageBackend>,
        guard: Arc<AccessGuard>,
        metrics: Arc<MetricsRegistry>,
    ) -> Self {
        Self {
            backend,
            guard,
            metrics,
            max_artifact_bytes: DEFAULT_MAX_ARTIFACT_BYTES,
            partitions: RwLock::new(HashMap::new()),
            files: RwLock::new(HashMap::new()),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_max_artifact_bytes(mut self, limit: u64) -> Self {
        self.max_artifact_bytes = limit;
        self
    }

    /// Get or create the partition `name` of `owner`
    pub fn partition(&self, owner: ObjectRef, name: &str) -> CacheResult<CachePartition> {
        let mut partitions = self.partitions.write().map_err(|_| CacheError::LockPoisoned)?;
        let partition = partitions
            .entry((owner, name.to_string()))
            .or_insert_with(|| CachePartition::new(owner, name));
        Ok(partition.clone())
    }

    /// All partitions owned by `owner`, ordered by name
    pub fn partitions_for(&self, owner: &ObjectRef) -> CacheResult<Vec<CachePartition>> {
        let partitions = self.partitions.read().map_err(|_| CacheError::LockPoisoned)?;
        let mut owned: Vec<CachePartition> = partitions
            .values()
            .filter(|p| p.owner == *owner)
            .cloned()
            .collect();
        owned.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(owned)
    }

    /// Return the cached artifact, generating and persisting it on a miss
    pub fn get_or_generate<F, E>(
        &self,
        partition: &CachePartition,
        key: &str,
        fingerprint: &str,
        generator: F,
    ) -> CacheResult<CachedArtifact>
    where
        F: FnOnce() -> Result<Vec<u8>, E>,
        E: Display,
    {
        let cache_key = CacheKey::new(partition, key, fingerprint)?;

        if let Some(artifact) = self.load(&cache_key)? {
            self.metrics.increment_cache_hits();
            return Ok(artifact);
        }

        let in_flight = InFlight::acquire(self, cache_key.clone())?;
        let _turn = in_flight.slot.lock().unwrap_or_else(|e| e.into_inner());

        // Another caller may have finished while we queued
        if let Some(artifact) = self.load(&cache_key)? {
            self.metrics.increment_cache_hits();
            Logger::trace(Event::CacheHit.as_str(), &[("key", key)]);
            return Ok(artifact);
        }

        self.metrics.increment_cache_misses();
        let data = generator().map_err(|e| {
            self.metrics.increment_cache_generation_failures();
            Logger::warn(
                Event::CacheGenerationFailed.as_str(),
                &[("key", key), ("error", &e.to_string())],
            );
            CacheError::GenerationFailed(e.to_string())
        })?;

        let size = data.len() as u64;
        if size > self.max_artifact_bytes {
            return Err(CacheError::TooLarge {
                size,
                limit: self.max_artifact_bytes,
            });
        }

        let path = cache_key.path();
        self.backend.write(&path, &data)?;

        let file = CachePartitionFile {
            id: Uuid::new_v4(),
            partition_id: partition.id,
            key: cache_key.key.clone(),
            fingerprint: cache_key.fingerprint.clone(),
            path,
            size,
            created_at: Utc::now(),
        };
        self.files
            .write()
            .map_err(|_| CacheError::LockPoisoned)?
            .insert(cache_key, file.clone());

        self.metrics.increment_cache_generations();
        Logger::trace(
            Event::CacheGenerated.as_str(),
            &[("key", key), ("size", &size.to_string())],
        );
        Ok(CachedArtifact { file, data })
    }

    /// Load the bytes of a cached artifact
    pub fn read(&self, file: &CachePartitionFile) -> CacheResult<Vec<u8>> {
        self.backend.read(&file.path).map_err(|e| match e {
            StorageError::ObjectNotFound(_) => CacheError::NotFound(file.path.clone()),
            other => CacheError::Storage(other),
        })
    }

    /// Delete every file under `partitions`
    ///
    /// The principal needs purge permission on the owner of every
    /// partition. One denial fails the whole call before anything is
    /// deleted. Returns the number of files removed.
    pub fn purge(&self, partitions: &[CachePartition], principal: &Principal) -> CacheResult<usize> {
        for partition in partitions {
            self.guard
                .require(principal, &partition.owner, Permission::CachePartitionPurge)?;
        }

        let mut files = self.files.write().map_err(|_| CacheError::LockPoisoned)?;
        let doomed: Vec<CacheKey> = files
            .keys()
            .filter(|k| partitions.iter().any(|p| p.id == k.partition_id))
            .cloned()
            .collect();

        let mut removed = 0;
        for key in doomed {
            match self.backend.delete(&key.path()) {
                Ok(()) | Err(StorageError::ObjectNotFound(_)) => {}
                Err(e) => return Err(e.into()),
            }
            files.remove(&key);
            removed += 1;
        }
        drop(files);

        self.metrics.add_cache_files_purged(removed as u64);
        Logger::info(
            Event::CachePurged.as_str(),
            &[
                ("partitions", &partitions.len().to_string()),
                ("files", &removed.to_string()),
            ],
        );
        Ok(removed)
    }

    /// Number of files currently held under `partitions`
    pub fn file_count(&self, partitions: &[CachePartition]) -> usize {
        self.files
            .read()
            .map(|files| {
                files
                    .keys()
                    .filter(|k| partitions.iter().any(|p| p.id == k.partition_id))
                    .count()
            })
            .unwrap_or(0)
    }

    /// Indexed file and its bytes, or `None` when absent or purged meanwhile
    fn load(&self, key: &CacheKey) -> CacheResult<Option<CachedArtifact>> {
        let file = {
            let files = self.files.read().map_err(|_| CacheError::LockPoisoned)?;
            match files.get(key) {
                Some(file) => file.clone(),
                None => return Ok(None),
            }
        };

        match self.read(&file) {
            Ok(data) => Ok(Some(CachedArtifact { file, data })),
            Err(CacheError::NotFound(_)) => {
                let mut files = self.files.write().map_err(|_| CacheError::LockPoisoned)?;
                if files.get(key).is_some_and(|indexed| indexed.id == file.id) {
                    files.remove(key);
                }
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

/// Registration in the in-flight map, released on drop
struct InFlight<'a> {
    store: &'a CachePartitionStore,
    key: CacheKey,
    slot: Slot,
}

impl<'a> InFlight<'a> {
    fn acquire(store: &'a CachePartitionStore, key: CacheKey) -> CacheResult<Self> {
        let mut in_flight = store.in_flight.lock().map_err(|_| CacheError::LockPoisoned)?;
        let slot = Arc::clone(in_flight.entry(key.clone()).or_default());
        Ok(Self { store, key, slot })
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let Ok(mut in_flight) = self.store.in_flight.lock() else {
            return;
        };
        // Map entry plus ours: nobody else is queued on this slot
        let last_user = in_flight
            .get(&self.key)
            .is_some_and(|slot| Arc::ptr_eq(slot, &self.slot) && Arc::strong_count(slot) == 2);
        if last_user {
            in_flight.remove(&self.key);
        }
    }
}
