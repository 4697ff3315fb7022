//! # Event Records
//!
//! Immutable causal records. The three object slots keep fixed names but
//! each verb assigns them its own roles (a viewed document is the target
//! while the version is context; an activated version is its own actor).

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::ObjectRef;

/// Enumerated event verbs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verb {
    #[serde(rename = "documents.document_created")]
    DocumentCreated,
    #[serde(rename = "documents.document_version_created")]
    DocumentVersionCreated,
    #[serde(rename = "documents.document_version_edited")]
    DocumentVersionEdited,
    #[serde(rename = "documents.document_viewed")]
    DocumentViewed,
    #[serde(rename = "documents.document_version_exported")]
    DocumentVersionExported,
    #[serde(rename = "storage.download_file_created")]
    DownloadFileCreated,
}

impl Verb {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::DocumentCreated => "documents.document_created",
            Verb::DocumentVersionCreated => "documents.document_version_created",
            Verb::DocumentVersionEdited => "documents.document_version_edited",
            Verb::DocumentViewed => "documents.document_viewed",
            Verb::DocumentVersionExported => "documents.document_version_exported",
            Verb::DownloadFileCreated => "storage.download_file_created",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One appended event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Position in commit order, starting at 1
    pub sequence: u64,
    pub actor: ObjectRef,
    pub action_object: ObjectRef,
    pub target: ObjectRef,
    pub verb: Verb,
    pub timestamp: DateTime<Utc>,
}

impl EventRecord {
    /// Whether `object` fills any of the three slots
    pub fn involves(&self, object: &ObjectRef) -> bool {
        self.actor == *object || self.target == *object || self.action_object == *object
    }
}
