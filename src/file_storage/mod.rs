//! # Vellum File Storage Module
//!
//! Physical storage for version content, cached artifacts and download
//! files. The backend itself is an external collaborator; this module
//! defines its interface and ships a filesystem and an in-memory
//! implementation.

pub mod backend;
pub mod errors;
pub mod local;
pub mod memory;

pub use backend::{sha256_hex, validate_path, StorageBackend};
pub use errors::{StorageError, StorageResult};
pub use local::LocalBackend;
pub use memory::MemoryBackend;
