//! # Documents and Versions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::ObjectRef;

/// A document: a label and an ordered set of versions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub label: String,
    pub created_at: DateTime<Utc>,
}

impl Document {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: label.into(),
            created_at: Utc::now(),
        }
    }

    pub fn object(&self) -> ObjectRef {
        ObjectRef::document(self.id)
    }
}

/// Location and identity of a version's immutable content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRef {
    /// Backend path
    pub path: String,
    /// Hex SHA-256, also the cache fingerprint
    pub checksum: String,
    pub size: u64,
    pub page_count: u32,
}

/// One immutable content revision of a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentVersion {
    pub id: Uuid,
    pub document_id: Uuid,
    /// 1-based position within the document, never reused
    pub sequence: u32,
    pub active: bool,
    pub comment: String,
    pub content: ContentRef,
    pub created_at: DateTime<Utc>,
}

impl DocumentVersion {
    pub fn object(&self) -> ObjectRef {
        ObjectRef::version(self.id)
    }

    pub fn document_object(&self) -> ObjectRef {
        ObjectRef::document(self.document_id)
    }

    /// Backend path for a version's content
    pub fn content_path(version_id: Uuid) -> String {
        format!("versions/{}/content", version_id)
    }
}

/// Editable metadata of a version
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionEdit {
    #[serde(default)]
    pub comment: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_objects() {
        let document = Document::new("Invoice");
        assert_eq!(document.object(), ObjectRef::document(document.id));

        let version = DocumentVersion {
            id: Uuid::new_v4(),
            document_id: document.id,
            sequence: 1,
            active: true,
            comment: String::new(),
            content: ContentRef {
                path: "versions/x/content".into(),
                checksum: "00".into(),
                size: 0,
                page_count: 1,
            },
            created_at: Utc::now(),
        };
        assert_eq!(version.document_object(), document.object());
        assert_eq!(version.object().kind.as_str(), "document_version");
    }

    #[test]
    fn test_edit_defaults() {
        let edit: VersionEdit = serde_json::from_str("{}").unwrap();
        assert_eq!(edit.comment, None);
    }
}
