//! Top-level facade crate for aclgate.
//!
//! Re-exports core types and the gateway library so users can depend on a single crate.

pub mod core {
    pub use aclgate_core::*;
}

pub mod gateway {
    pub use aclgate_gateway::*;
}
