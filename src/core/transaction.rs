//! Request Transactions
//!
//! A `Transaction` spans one request. Work that must only become visible
//! after the request's writes are durable is registered with `on_commit`
//! and runs, in registration order, when `commit` is called. A transaction
//! that is rolled back or dropped discards its hooks without running them.

use std::fmt;

use uuid::Uuid;

use crate::observability::{Event, Logger};

type CommitHook = Box<dyn FnOnce() + Send + 'static>;

/// Unit of work with after-commit hooks
pub struct Transaction {
    id: Uuid,
    hooks: Vec<CommitHook>,
}

impl Transaction {
    /// Begin a new transaction
    pub fn begin() -> Self {
        Self {
            id: Uuid::new_v4(),
            hooks: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Defer `hook` until the transaction commits
    pub fn on_commit<F>(&mut self, hook: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.hooks.push(Box::new(hook));
    }

    /// Number of hooks waiting for commit
    pub fn pending(&self) -> usize {
        self.hooks.len()
    }

    /// Commit and run the deferred hooks
    pub fn commit(mut self) {
        let hooks = std::mem::take(&mut self.hooks);
        let id = self.id.to_string();
        let count = hooks.len().to_string();
        Logger::trace(
            Event::TransactionCommitted.as_str(),
            &[("transaction", &id), ("hooks", &count)],
        );
        for hook in hooks {
            hook();
        }
    }

    /// Discard the deferred hooks
    pub fn rollback(mut self) {
        self.discard();
    }

    fn discard(&mut self) {
        if !self.hooks.is_empty() {
            let id = self.id.to_string();
            let count = self.hooks.len().to_string();
            Logger::trace(
                Event::TransactionRolledBack.as_str(),
                &[("transaction", &id), ("hooks", &count)],
            );
            self.hooks.clear();
        }
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        self.discard();
    }
}

impl fmt::Debug for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transaction")
            .field("id", &self.id)
            .field("pending", &self.hooks.len())
            .finish()
    }
}
