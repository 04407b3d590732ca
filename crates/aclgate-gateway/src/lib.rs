//! aclgate gateway library entry.
//!
//! This crate wires the transport, access pipeline, monitoring hub, dispatcher
//! and built-in services into one gateway stack. It is consumed by the binary
//! (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod lifecycle;
pub mod monitor;
pub mod obs;
pub mod ops;
pub mod pipeline;
pub mod policy;
pub mod router;
pub mod server;
pub mod services;
pub mod transport;
