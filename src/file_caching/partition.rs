//! # Cache Partitions
//!
//! A partition groups the derived artifacts of one owner (a document
//! version). Files inside it are addressed by derivation key plus the
//! fingerprint of the input they were derived from.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::ObjectRef;

use super::errors::{CacheError, CacheResult};

/// Named artifact namespace owned by one object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachePartition {
    pub id: Uuid,
    pub owner: ObjectRef,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl CachePartition {
    pub(crate) fn new(owner: ObjectRef, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner,
            name: name.into(),
            created_at: Utc::now(),
        }
    }

    pub fn object(&self) -> ObjectRef {
        ObjectRef::cache_partition(self.id)
    }
}

/// One persisted artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachePartitionFile {
    pub id: Uuid,
    pub partition_id: Uuid,
    pub key: String,
    pub fingerprint: String,
    pub path: String,
    pub size: u64,
    pub created_at: DateTime<Utc>,
}

/// Identity of an artifact: at most one file exists per key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub partition_id: Uuid,
    pub key: String,
    pub fingerprint: String,
}

impl CacheKey {
    /// Validate both parts and build the key
    pub fn new(partition: &CachePartition, key: &str, fingerprint: &str) -> CacheResult<Self> {
        validate_component(key)?;
        validate_component(fingerprint)?;
        Ok(Self {
            partition_id: partition.id,
            key: key.to_string(),
            fingerprint: fingerprint.to_string(),
        })
    }

    /// Backend path of the artifact
    pub fn path(&self) -> String {
        format!("cache/{}/{}.{}", self.partition_id, self.key, self.fingerprint)
    }
}

/// Derivation key for one rendered page
pub fn page_key(page: u32, width: u32, height: u32) -> String {
    format!("page-{}@{}x{}", page, width, height)
}

fn component_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9._@x-]+$").expect("static pattern"))
}

/// Keys become backend path segments
fn validate_component(value: &str) -> CacheResult<()> {
    if value.contains("..") || !component_pattern().is_match(value) {
        return Err(CacheError::InvalidKey(value.to_string()));
    }
    Ok(())
}
