//! # Access Guard
//!
//! Single permission check consumed by every entry point.
//!
//! A denial is reported to callers as `AccessDenied`, which every module
//! error converts into its own `NotFound` variant. An unauthorized object
//! therefore produces exactly the response of a missing one, and callers
//! must not record events before the check passes.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use thiserror::Error;

use crate::core::ObjectRef;
use crate::observability::{Event, Logger, MetricsRegistry};

use super::acl::AclStore;
use super::permission::Permission;
use super::principal::Principal;

/// Outcome of a permission check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allowed,
    Denied,
}

impl Access {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Access::Allowed)
    }

    /// Map `Denied` to the "absent" outcome for `object`
    pub fn or_not_found(self, object: &ObjectRef) -> Result<(), AccessDenied> {
        match self {
            Access::Allowed => Ok(()),
            Access::Denied => Err(AccessDenied(*object)),
        }
    }
}

/// A denied check, reported as the object not existing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Not found: {0}")]
pub struct AccessDenied(pub ObjectRef);

impl AccessDenied {
    pub fn object(&self) -> &ObjectRef {
        &self.0
    }
}

/// Permission evaluator
#[derive(Debug)]
pub struct AccessGuard {
    acl: Arc<dyn AclStore>,
    /// Child -> parent, for one level of grant inheritance
    parents: RwLock<HashMap<ObjectRef, ObjectRef>>,
    metrics: Arc<MetricsRegistry>,
}

impl AccessGuard {
    pub fn new(acl: Arc<dyn AclStore>, metrics: Arc<MetricsRegistry>) -> Self {
        Self {
            acl,
            parents: RwLock::new(HashMap::new()),
            metrics,
        }
    }

    pub fn acl(&self) -> &Arc<dyn AclStore> {
        &self.acl
    }

    /// Let grants on `parent` apply to `child`
    pub fn register_parent(&self, child: ObjectRef, parent: ObjectRef) {
        if let Ok(mut parents) = self.parents.write() {
            parents.insert(child, parent);
        }
    }

    /// Evaluate `permission` for `principal` on `object`
    ///
    /// Pure: no side effects beyond a denial counter and a TRACE line.
    pub fn check(&self, principal: &Principal, object: &ObjectRef, permission: Permission) -> Access {
        let access = self.evaluate(principal, object, permission);
        if access == Access::Denied {
            self.metrics.increment_access_denials();
            Logger::trace(
                Event::AccessDenied.as_str(),
                &[("object_kind", object.kind.as_str()), ("permission", permission.as_str())],
            );
        }
        access
    }

    /// `check` followed by the deny-as-not-found mapping
    pub fn require(
        &self,
        principal: &Principal,
        object: &ObjectRef,
        permission: Permission,
    ) -> Result<(), AccessDenied> {
        self.check(principal, object, permission).or_not_found(object)
    }

    fn evaluate(&self, principal: &Principal, object: &ObjectRef, permission: Permission) -> Access {
        if principal.is_superuser {
            return Access::Allowed;
        }

        let Some(user) = principal.user_id else {
            return Access::Denied;
        };

        if self.acl.is_granted(user, object, permission) {
            return Access::Allowed;
        }

        let parent = self
            .parents
            .read()
            .ok()
            .and_then(|parents| parents.get(object).copied());

        match parent {
            Some(parent) if self.acl.is_granted(user, &parent, permission) => Access::Allowed,
            _ => Access::Denied,
        }
    }
}
