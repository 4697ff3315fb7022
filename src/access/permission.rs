//! # Permissions

use std::fmt;

use serde::{Deserialize, Serialize};

/// Object-level permissions understood by the guard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Create documents (granted on the creating user's own object)
    DocumentCreate,
    /// Add versions to a document
    DocumentVersionCreate,
    /// List versions (on a document) or preview one (on a version)
    DocumentVersionView,
    DocumentVersionPrint,
    DocumentVersionEdit,
    DocumentVersionExport,
    CachePartitionPurge,
    DownloadFileView,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::DocumentCreate => "documents.document_create",
            Permission::DocumentVersionCreate => "documents.document_version_create",
            Permission::DocumentVersionView => "documents.document_version_view",
            Permission::DocumentVersionPrint => "documents.document_version_print",
            Permission::DocumentVersionEdit => "documents.document_version_edit",
            Permission::DocumentVersionExport => "documents.document_version_export",
            Permission::CachePartitionPurge => "file_caching.cache_partition_purge",
            Permission::DownloadFileView => "storage.download_file_view",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_name() {
        let json = serde_json::to_value(Permission::CachePartitionPurge).unwrap();
        assert_eq!(json, "cache_partition_purge");
        assert_eq!(
            Permission::DocumentVersionEdit.to_string(),
            "documents.document_version_edit"
        );
    }
}
