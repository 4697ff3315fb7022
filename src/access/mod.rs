//! # Vellum Access Module
//!
//! Object-level permission checks with deny-as-not-found semantics.
//!
//! ## Rules
//! - Superusers pass every check
//! - Anonymous principals pass none
//! - A grant on an object, or on its registered parent, allows
//! - A denial is indistinguishable from the object not existing

pub mod acl;
pub mod guard;
pub mod permission;
pub mod principal;

pub use acl::{AclStore, MemoryAcl};
pub use guard::{Access, AccessDenied, AccessGuard};
pub use permission::Permission;
pub use principal::Principal;
