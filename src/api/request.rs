//! API request types
//!
//! One JSON object per request: the caller's `principal` plus an operation
//! selected by the `op` field.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::access::{Permission, Principal};
use crate::core::ObjectRef;

use super::errors::{ApiError, ApiResult};

fn first_page() -> u32 {
    1
}

/// Supported operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    CreateDocument {
        label: String,
    },
    CreateVersion {
        document_id: Uuid,
        /// Base64 content
        content: String,
        #[serde(default)]
        comment: String,
    },
    ListVersions {
        document_id: Uuid,
    },
    GetVersion {
        version_id: Uuid,
    },
    ViewVersion {
        version_id: Uuid,
    },
    PreviewVersion {
        version_id: Uuid,
        #[serde(default = "first_page")]
        page: u32,
    },
    PrintVersion {
        version_id: Uuid,
    },
    EditVersion {
        version_id: Uuid,
        #[serde(default)]
        comment: Option<String>,
    },
    ActivateVersion {
        version_id: Uuid,
    },
    ExportVersion {
        version_id: Uuid,
    },
    PurgeCache {
        version_id: Uuid,
    },
    Grant {
        user_id: Uuid,
        object: ObjectRef,
        permission: Permission,
    },
    Revoke {
        user_id: Uuid,
        object: ObjectRef,
        permission: Permission,
    },
    Events {
        object: ObjectRef,
    },
    GetDownloadFile {
        download_file_id: Uuid,
    },
}

impl Operation {
    /// Operation name as sent on the wire
    pub fn name(&self) -> &'static str {
        match self {
            Operation::CreateDocument { .. } => "create_document",
            Operation::CreateVersion { .. } => "create_version",
            Operation::ListVersions { .. } => "list_versions",
            Operation::GetVersion { .. } => "get_version",
            Operation::ViewVersion { .. } => "view_version",
            Operation::PreviewVersion { .. } => "preview_version",
            Operation::PrintVersion { .. } => "print_version",
            Operation::EditVersion { .. } => "edit_version",
            Operation::ActivateVersion { .. } => "activate_version",
            Operation::ExportVersion { .. } => "export_version",
            Operation::PurgeCache { .. } => "purge_cache",
            Operation::Grant { .. } => "grant",
            Operation::Revoke { .. } => "revoke",
            Operation::Events { .. } => "events",
            Operation::GetDownloadFile { .. } => "get_download_file",
        }
    }
}

/// Unified request envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub principal: Principal,
    #[serde(flatten)]
    pub operation: Operation,
}

impl Request {
    pub fn new(principal: Principal, operation: Operation) -> Self {
        Self {
            principal,
            operation,
        }
    }

    /// Parse a request from a JSON string
    pub fn parse(json: &str) -> ApiResult<Self> {
        serde_json::from_str(json).map_err(|e| ApiError::invalid_request(format!("Invalid request: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_preview_with_default_page() {
        let version = Uuid::new_v4();
        let user = Uuid::new_v4();
        let json = format!(
            r#"{{"op":"preview_version","version_id":"{}","principal":{{"user_id":"{}"}}}}"#,
            version, user
        );

        let request = Request::parse(&json).unwrap();
        assert_eq!(request.principal, Principal::user(user));
        assert_eq!(
            request.operation,
            Operation::PreviewVersion {
                version_id: version,
                page: 1
            }
        );
    }

    #[test]
    fn test_parse_grant() {
        let json = format!(
            r#"{{"op":"grant","user_id":"{}","object":{{"kind":"document","id":"{}"}},"permission":"document_version_view"}}"#,
            Uuid::new_v4(),
            Uuid::new_v4()
        );

        let request = Request::parse(&json).unwrap();
        assert_eq!(request.operation.name(), "grant");
        assert_eq!(request.principal, Principal::anonymous());
    }

    #[test]
    fn test_unknown_op_is_invalid() {
        let err = Request::parse(r#"{"op":"drop_everything"}"#).unwrap_err();
        assert_eq!(err.status(), 400);

        assert!(Request::parse("not json").is_err());
    }
}
