//! # Vellum Events Module
//!
//! Append-only causal event log.
//!
//! ## Guarantees
//! - Sequences are dense, start at 1 and match visibility order
//! - Records are immutable once appended
//! - Queries are lazy, finite and restartable
//! - With a journal, every record is synced before `record` returns
//! - A chain from `record_chain` is appended whole or not at all

mod errors;
mod journal;
mod log;
mod record;

pub use errors::{EventError, EventResult};
pub use log::{EventIter, EventLink, EventLog, EventQuery};
pub use record::{EventRecord, Verb};
