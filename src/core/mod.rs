//! # Vellum Core Module
//!
//! Shared building blocks used by every subsystem: typed object
//! references and request transactions with after-commit hooks.

pub mod object;
pub mod transaction;

pub use object::{ObjectKind, ObjectRef};
pub use transaction::Transaction;
