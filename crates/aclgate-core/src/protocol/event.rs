//! Admin stream payloads (JSON).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Audit record of one attempted call.
///
/// Recorded before authorization, so denied attempts show up as well. A call
/// without a `consumer` header is recorded with an empty consumer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccessEvent {
    /// Caller identity as asserted in metadata.
    pub consumer: String,
    /// Fully-qualified method, e.g. `/Biz/Add`.
    pub method: String,
    /// Transport peer address (`ip:port`).
    pub host_address: String,
}

/// Call counts since the previous flush of one statistics subscription.
///
/// Maps are ordered so encoded snapshots are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatSnapshot {
    #[serde(default)]
    pub by_method: BTreeMap<String, u64>,
    #[serde(default)]
    pub by_consumer: BTreeMap<String, u64>,
}

impl StatSnapshot {
    pub fn is_empty(&self) -> bool {
        self.by_method.is_empty() && self.by_consumer.is_empty()
    }

    /// Total calls counted in this window.
    pub fn total_calls(&self) -> u64 {
        self.by_method.values().sum()
    }
}
