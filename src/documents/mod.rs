//! # Vellum Documents Module
//!
//! Documents, their immutable versions and the version lifecycle.
//!
//! ## Invariants
//! - Once a document has versions, exactly one is active
//! - Version sequences start at 1 and are never reused
//! - Version content is immutable and never deleted
//! - Denied operations record no event and read as not found

mod document;
mod errors;
mod registry;
mod renderer;

pub use document::{ContentRef, Document, DocumentVersion, VersionEdit};
pub use errors::{DocumentError, DocumentResult, RenderError};
pub use registry::{RenderedPage, VersionRegistry, PAGES_PARTITION};
pub use renderer::{PageRenderer, RenderSpec, StubRenderer};
