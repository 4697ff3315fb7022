//! API Handler for vellum
//!
//! Every request runs inside one `Transaction`. A successful request
//! commits it, which releases any deferred export; a failed request rolls
//! it back so nothing it scheduled ever runs.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::access::{Permission, Principal};
use crate::core::{ObjectKind, ObjectRef, Transaction};
use crate::documents::{RenderedPage, VersionEdit};
use crate::observability::{Event, Logger};

use super::errors::{ApiError, ApiResult};
use super::request::{Operation, Request};
use super::response::Response;
use super::services::Services;

/// Request dispatcher over the wired services
#[derive(Debug, Clone)]
pub struct ApiHandler {
    services: Arc<Services>,
}

impl ApiHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }

    pub fn services(&self) -> &Arc<Services> {
        &self.services
    }

    /// Handle a raw JSON request string
    pub fn handle_json(&self, json_request: &str) -> Response {
        match Request::parse(json_request) {
            Ok(request) => self.handle(&request),
            Err(e) => {
                Logger::trace(Event::RequestRejected.as_str(), &[("error", e.message())]);
                Response::error(&e)
            }
        }
    }

    /// Handle a parsed request
    pub fn handle(&self, request: &Request) -> Response {
        let mut transaction = Transaction::begin();
        match self.dispatch(&request.principal, &request.operation, &mut transaction) {
            Ok(response) => {
                transaction.commit();
                response
            }
            Err(e) => {
                transaction.rollback();
                Logger::trace(
                    Event::RequestRejected.as_str(),
                    &[
                        ("op", request.operation.name()),
                        ("status", &e.status().to_string()),
                    ],
                );
                Response::error(&e)
            }
        }
    }

    fn dispatch(
        &self,
        principal: &Principal,
        operation: &Operation,
        transaction: &mut Transaction,
    ) -> ApiResult<Response> {
        let s = &self.services;
        match operation {
            Operation::CreateDocument { label } => {
                let document = s.registry.create_document(label, principal)?;
                Ok(Response::created(to_value(&document)?))
            }
            Operation::CreateVersion {
                document_id,
                content,
                comment,
            } => {
                let content = STANDARD
                    .decode(content)
                    .map_err(|e| ApiError::invalid_request(format!("content is not base64: {}", e)))?;
                let version = s
                    .registry
                    .create_version(*document_id, &content, comment, principal)?;
                Ok(Response::created(to_value(&version)?))
            }
            Operation::ListVersions { document_id } => {
                let versions = s.registry.list_versions(*document_id, principal)?;
                Ok(Response::ok(json!({ "versions": to_value(&versions)? })))
            }
            Operation::GetVersion { version_id } => {
                let version = s.registry.get_version(*version_id, principal)?;
                Ok(Response::ok(to_value(&version)?))
            }
            Operation::ViewVersion { version_id } => {
                let version = s.registry.view(*version_id, principal)?;
                Ok(Response::ok(to_value(&version)?))
            }
            Operation::PreviewVersion { version_id, page } => {
                let rendered = s.registry.preview(*version_id, *page, principal)?;
                Ok(Response::ok(page_body(&rendered)?))
            }
            Operation::PrintVersion { version_id } => {
                let pages = s
                    .registry
                    .print(*version_id, principal)?
                    .iter()
                    .map(page_body)
                    .collect::<ApiResult<Vec<Value>>>()?;
                Ok(Response::ok(json!({ "pages": pages })))
            }
            Operation::EditVersion {
                version_id,
                comment,
            } => {
                let edit = VersionEdit {
                    comment: comment.clone(),
                };
                let version = s.registry.edit(*version_id, &edit, principal)?;
                Ok(Response::ok(to_value(&version)?))
            }
            Operation::ActivateVersion { version_id } => {
                let version = s.registry.activate(*version_id, principal)?;
                Ok(Response::ok(to_value(&version)?))
            }
            Operation::ExportVersion { version_id } => {
                let task = s.exports.export(*version_id, principal, transaction)?;
                Ok(Response::accepted(to_value(&task)?))
            }
            Operation::PurgeCache { version_id } => {
                let removed = s.registry.purge_cache(*version_id, principal)?;
                Ok(Response::ok(json!({ "removed": removed })))
            }
            Operation::Grant {
                user_id,
                object,
                permission,
            } => {
                require_superuser(principal, object)?;
                let changed = s.guard.acl().grant(*user_id, *object, *permission);
                log_grant("grant", *user_id, object, *permission);
                Ok(Response::ok(json!({ "changed": changed })))
            }
            Operation::Revoke {
                user_id,
                object,
                permission,
            } => {
                require_superuser(principal, object)?;
                let changed = s.guard.acl().revoke(*user_id, object, *permission);
                log_grant("revoke", *user_id, object, *permission);
                Ok(Response::ok(json!({ "changed": changed })))
            }
            Operation::Events { object } => {
                self.require_event_access(principal, object)?;
                let events: Vec<_> = s.events.query(*object).iter().collect();
                Ok(Response::ok(json!({ "events": to_value(&events)? })))
            }
            Operation::GetDownloadFile { download_file_id } => {
                let file = s.downloads.get(*download_file_id, principal)?;
                Ok(Response::ok(to_value(&file)?))
            }
        }
    }

    /// Reading an object's history needs the same visibility as the object
    fn require_event_access(&self, principal: &Principal, object: &ObjectRef) -> ApiResult<()> {
        let s = &self.services;
        match object.kind {
            ObjectKind::Document => {
                s.guard
                    .require(principal, object, Permission::DocumentVersionView)?;
                s.registry.fetch_document(object.id)?;
            }
            ObjectKind::DocumentVersion => {
                s.registry.get_version(object.id, principal)?;
            }
            ObjectKind::DownloadFile => {
                s.downloads.get(object.id, principal)?;
            }
            ObjectKind::CachePartition => {
                s.guard
                    .require(principal, object, Permission::CachePartitionPurge)?;
            }
            ObjectKind::User => {
                if !principal.is_superuser && principal.user_id != Some(object.id) {
                    return Err(ApiError::not_found(object));
                }
            }
        }
        Ok(())
    }
}

fn require_superuser(principal: &Principal, object: &ObjectRef) -> ApiResult<()> {
    if principal.is_superuser {
        Ok(())
    } else {
        Err(ApiError::not_found(object))
    }
}

fn log_grant(action: &str, user: Uuid, object: &ObjectRef, permission: Permission) {
    Logger::info(
        Event::GrantChanged.as_str(),
        &[
            ("action", action),
            ("user", &user.to_string()),
            ("object", &object.to_string()),
            ("permission", permission.as_str()),
        ],
    );
}

fn page_body(page: &RenderedPage) -> ApiResult<Value> {
    Ok(json!({
        "page": page.page,
        "file": to_value(&page.file)?,
        "data": STANDARD.encode(&page.data),
    }))
}

fn to_value<T: serde::Serialize>(value: &T) -> ApiResult<Value> {
    serde_json::to_value(value).map_err(|e| ApiError::pass_through(500, format!("encode: {}", e)))
}
