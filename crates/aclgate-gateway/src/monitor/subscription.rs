//! Registry guards. Dropping a subscription removes its hub entry.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use aclgate_core::protocol::{AccessEvent, StatSnapshot};

use super::hub::{lock_acc, MonitorHub};
use super::stats::StatsAccumulator;

/// One open Logging stream.
pub struct LoggingSubscription {
    id: u64,
    rx: mpsc::Receiver<AccessEvent>,
    hub: Arc<MonitorHub>,
}

impl LoggingSubscription {
    pub(super) fn new(id: u64, rx: mpsc::Receiver<AccessEvent>, hub: Arc<MonitorHub>) -> Self {
        Self { id, rx, hub }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Next event, or `None` once the hub has evicted this subscriber.
    pub async fn recv(&mut self) -> Option<AccessEvent> {
        self.rx.recv().await
    }

    pub fn try_recv(&mut self) -> Option<AccessEvent> {
        self.rx.try_recv().ok()
    }
}

impl Drop for LoggingSubscription {
    fn drop(&mut self) {
        if self.hub.unregister_logging(self.id) {
            tracing::debug!(subscriber = self.id, "logging subscription removed");
        }
    }
}

/// One open Statistics stream.
pub struct StatsSubscription {
    id: u64,
    acc: Arc<Mutex<StatsAccumulator>>,
    hub: Arc<MonitorHub>,
}

impl StatsSubscription {
    pub(super) fn new(id: u64, acc: Arc<Mutex<StatsAccumulator>>, hub: Arc<MonitorHub>) -> Self {
        Self { id, acc, hub }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Snapshot and reset under the accumulator lock, so no increment is lost
    /// or split across windows.
    pub fn flush(&self) -> StatSnapshot {
        lock_acc(&self.acc).take()
    }
}

impl Drop for StatsSubscription {
    fn drop(&mut self) {
        if self.hub.unregister_stats(self.id) {
            tracing::debug!(subscriber = self.id, "statistics subscription removed");
        }
    }
}

impl std::fmt::Debug for StatsSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatsSubscription").field("id", &self.id).finish_non_exhaustive()
    }
}
