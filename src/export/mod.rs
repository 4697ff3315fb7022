//! # Vellum Export Module
//!
//! Asynchronous version export and the download files it produces.
//!
//! ## Guarantees
//! - Nothing becomes visible before the requesting transaction commits
//! - A committed export records `DownloadFileCreated` strictly before
//!   `DocumentVersionExported`
//! - A failed export persists nothing and records nothing

mod download;
mod errors;
mod packer;
mod pipeline;

pub use download::{DownloadFile, DownloadFileStore, NewDownloadFile};
pub use errors::{ExportError, ExportResult};
pub use packer::{archive_filename, package, ExportManifest, CONTENT_ENTRY, MANIFEST_ENTRY};
pub use pipeline::{ExportOutcome, ExportPipeline, ExportTask, ExportWorker};
