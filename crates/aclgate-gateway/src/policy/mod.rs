//! Policy layer (consumer ACL).
//!
//! Compiles the startup ACL mapping into fast lookup structures for the access
//! gate to consume at runtime.

pub mod acl;
pub mod pattern;

pub use acl::{AccessDecision, AclTable, DenyReason};
pub use pattern::MethodPattern;
