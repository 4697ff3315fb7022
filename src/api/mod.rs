//! API Layer for vellum
//!
//! Typed operations over the document services, each mapped to a status.
//!
//! # Design Principles
//!
//! - One transaction per request, committed only on success
//! - Subsystem statuses passed through unchanged
//! - Denied objects answer exactly like missing ones (404)
//!
//! # Supported Operations
//!
//! - create_document, create_version
//! - list_versions, get_version, view_version, preview_version, print_version
//! - edit_version, activate_version
//! - export_version (202), get_download_file
//! - purge_cache
//! - grant, revoke
//! - events

mod errors;
mod handler;
mod request;
mod response;
mod services;

pub use errors::{ApiError, ApiErrorCode, ApiResult};
pub use handler::ApiHandler;
pub use request::{Operation, Request};
pub use response::Response;
pub use services::{ExportRuntime, ServiceOptions, Services};
