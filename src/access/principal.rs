//! # Principals
//!
//! The authenticated caller of an operation. Authentication happens
//! upstream; this crate only consumes the result.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::ObjectRef;

/// Caller identity carried with each request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// The authenticated user's ID (None if anonymous)
    #[serde(default)]
    pub user_id: Option<Uuid>,

    /// Superusers pass every permission check
    #[serde(default)]
    pub is_superuser: bool,
}

impl Principal {
    pub fn user(user_id: Uuid) -> Self {
        Self {
            user_id: Some(user_id),
            is_superuser: false,
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn superuser(user_id: Uuid) -> Self {
        Self {
            user_id: Some(user_id),
            is_superuser: true,
        }
    }

    /// The principal as an event actor, if authenticated
    pub fn as_object(&self) -> Option<ObjectRef> {
        self.user_id.map(ObjectRef::user)
    }
}
