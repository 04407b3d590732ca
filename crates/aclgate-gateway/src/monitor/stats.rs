use std::collections::HashMap;

use aclgate_core::protocol::StatSnapshot;

/// Running call counts for one statistics subscription.
#[derive(Debug, Default)]
pub struct StatsAccumulator {
    by_method: HashMap<String, u64>,
    by_consumer: HashMap<String, u64>,
}

impl StatsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, method: &str, consumer: &str) {
        bump(&mut self.by_method, method);
        bump(&mut self.by_consumer, consumer);
    }

    /// Snapshot the window and reset to empty.
    pub fn take(&mut self) -> StatSnapshot {
        StatSnapshot {
            by_method: std::mem::take(&mut self.by_method).into_iter().collect(),
            by_consumer: std::mem::take(&mut self.by_consumer).into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.by_method.is_empty() && self.by_consumer.is_empty()
    }
}

fn bump(map: &mut HashMap<String, u64>, key: &str) {
    match map.get_mut(key) {
        Some(n) => *n = n.saturating_add(1),
        None => {
            map.insert(key.to_string(), 1);
        }
    }
}
