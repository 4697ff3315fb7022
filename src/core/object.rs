//! Object References
//!
//! Every entity that can hold a permission, appear in an event, or own a
//! cache partition is addressed by an `ObjectRef`. References never own the
//! entity they point at.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of entity an `ObjectRef` points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    User,
    Document,
    DocumentVersion,
    DownloadFile,
    CachePartition,
}

impl ObjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::User => "user",
            ObjectKind::Document => "document",
            ObjectKind::DocumentVersion => "document_version",
            ObjectKind::DownloadFile => "download_file",
            ObjectKind::CachePartition => "cache_partition",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Typed reference to a stored entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectRef {
    pub kind: ObjectKind,
    pub id: Uuid,
}

impl ObjectRef {
    pub fn new(kind: ObjectKind, id: Uuid) -> Self {
        Self { kind, id }
    }

    pub fn user(id: Uuid) -> Self {
        Self::new(ObjectKind::User, id)
    }

    pub fn document(id: Uuid) -> Self {
        Self::new(ObjectKind::Document, id)
    }

    pub fn version(id: Uuid) -> Self {
        Self::new(ObjectKind::DocumentVersion, id)
    }

    pub fn download_file(id: Uuid) -> Self {
        Self::new(ObjectKind::DownloadFile, id)
    }

    pub fn cache_partition(id: Uuid) -> Self {
        Self::new(ObjectKind::CachePartition, id)
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let id = Uuid::nil();
        assert_eq!(
            ObjectRef::version(id).to_string(),
            "document_version:00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn test_serde_shape() {
        let id = Uuid::new_v4();
        let json = serde_json::to_value(ObjectRef::download_file(id)).unwrap();
        assert_eq!(json["kind"], "download_file");
        assert_eq!(json["id"], id.to_string());

        let back: ObjectRef = serde_json::from_value(json).unwrap();
        assert_eq!(back, ObjectRef::download_file(id));
    }
}
