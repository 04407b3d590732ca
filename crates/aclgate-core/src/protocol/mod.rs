//! Protocol records shared by every transport.
//!
//! - `event`: audit events and statistics snapshots pushed to admin streams.
//! - `method`: fully-qualified `/Service/Method` paths.

pub mod event;
pub mod method;

pub use event::{AccessEvent, StatSnapshot};
pub use method::MethodPath;
