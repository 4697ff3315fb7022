//! # Vellum File Caching Module
//!
//! Partitioned cache of derived artifacts (rendered pages).
//!
//! ## Invariants
//! - At most one file per (partition, derivation key, fingerprint)
//! - Partitions are owned per version; purging one never touches another
//! - A failed generation persists nothing
//! - No eviction beyond explicit purge
//! - A purge racing a read shows up as a miss, never as a missing object

mod errors;
mod partition;
mod store;

pub use errors::{CacheError, CacheResult};
pub use partition::{page_key, CacheKey, CachePartition, CachePartitionFile};
pub use store::{CachePartitionStore, CachedArtifact, DEFAULT_MAX_ARTIFACT_BYTES};
