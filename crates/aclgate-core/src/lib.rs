//! aclgate core: transport-agnostic protocol primitives and error types.
//!
//! This crate defines the records that cross the gateway boundary (audit
//! events, statistics snapshots, method paths) and the error surface shared by
//! the gateway and its tests. It carries no transport or runtime dependencies.
//!
//! `panic`, `unwrap` and `expect` are denied by clippy in this crate; every
//! fallible path returns `Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;

/// Shared result type.
pub use error::{ClientCode, GatewayError, Result};
