//! Transport layer (HTTP unary + WebSocket admin streams).
//!
//! Both handlers translate the request into an `InboundCall` and hand it to
//! the access gate before anything else runs.

pub mod codec;
pub mod http;
pub mod ws;
