//! Caller context types shared across layers.
//!
//! Identity and peer are read from transport-neutral metadata so the access
//! pipeline does not couple to HTTP specifics.

pub mod caller;
pub mod metadata;

pub use caller::{Caller, CallerIdentity};
pub use metadata::{CallMetadata, CONSUMER_KEY};
