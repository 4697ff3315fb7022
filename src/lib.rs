//! vellum - permission-gated versioned document store
//!
//! Documents carry an ordered list of versions, exactly one of them active.
//! Every read and mutation passes an access guard that reports denied
//! objects as missing, every visible action lands in an append-only event
//! log, rendered pages live in per-version cache partitions, and exports
//! run after the requesting transaction commits.

pub mod access;
pub mod api;
pub mod cli;
pub mod core;
pub mod documents;
pub mod events;
pub mod export;
pub mod file_caching;
pub mod file_storage;
pub mod observability;
