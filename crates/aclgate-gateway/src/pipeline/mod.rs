//! Call interception pipeline, attachable to any transport.

pub mod gate;

pub use gate::{AccessGate, CallKind, InboundCall};
