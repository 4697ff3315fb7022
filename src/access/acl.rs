//! # Access Control Lists
//!
//! Grants are (user, object, permission) triples. The ACL store is an
//! external collaborator; `MemoryAcl` is the in-process implementation.

use std::collections::HashSet;
use std::sync::RwLock;

use uuid::Uuid;

use crate::core::ObjectRef;

use super::permission::Permission;

/// Storage of explicit grants
pub trait AclStore: Send + Sync + std::fmt::Debug {
    /// Whether `user` holds `permission` directly on `object`
    fn is_granted(&self, user: Uuid, object: &ObjectRef, permission: Permission) -> bool;

    /// Add a grant. Returns false if it already existed.
    fn grant(&self, user: Uuid, object: ObjectRef, permission: Permission) -> bool;

    /// Remove a grant. Returns false if it did not exist.
    fn revoke(&self, user: Uuid, object: &ObjectRef, permission: Permission) -> bool;
}

/// In-memory ACL store
#[derive(Debug, Default)]
pub struct MemoryAcl {
    grants: RwLock<HashSet<(Uuid, ObjectRef, Permission)>>,
}

impl MemoryAcl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.grants.read().map(|g| g.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AclStore for MemoryAcl {
    fn is_granted(&self, user: Uuid, object: &ObjectRef, permission: Permission) -> bool {
        // A poisoned store grants nothing.
        self.grants
            .read()
            .map(|g| g.contains(&(user, *object, permission)))
            .unwrap_or(false)
    }

    fn grant(&self, user: Uuid, object: ObjectRef, permission: Permission) -> bool {
        self.grants
            .write()
            .map(|mut g| g.insert((user, object, permission)))
            .unwrap_or(false)
    }

    fn revoke(&self, user: Uuid, object: &ObjectRef, permission: Permission) -> bool {
        self.grants
            .write()
            .map(|mut g| g.remove(&(user, *object, permission)))
            .unwrap_or(false)
    }
}
