use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio::sync::mpsc::{self, error::TrySendError};

use aclgate_core::protocol::AccessEvent;

use super::stats::StatsAccumulator;
use super::subscription::{LoggingSubscription, StatsSubscription};

struct LoggerEntry {
    id: u64,
    tx: mpsc::Sender<AccessEvent>,
}

struct StatsEntry {
    id: u64,
    acc: Arc<Mutex<StatsAccumulator>>,
}

#[derive(Default)]
struct Registries {
    loggers: Vec<LoggerEntry>,
    stats: Vec<StatsEntry>,
}

/// Outcome of one fan-out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FanoutReport {
    pub delivered: usize,
    /// Subscribers dropped because their queue was full.
    pub evicted: usize,
}

/// Gateway monitoring state: audit subscribers + statistics accumulators.
///
/// Both registries sit behind one reader-writer lock. `record` holds the write
/// side for the whole fan-out, so every subscriber sees events in the same
/// order. Nothing awaits while the lock is held.
pub struct MonitorHub {
    registries: RwLock<Registries>,
    seq: AtomicU64,
    queue_depth: usize,
}

impl MonitorHub {
    pub fn new(queue_depth: usize) -> Self {
        Self {
            registries: RwLock::new(Registries::default()),
            seq: AtomicU64::new(1),
            queue_depth: queue_depth.max(1),
        }
    }

    pub fn subscribe_logging(self: &Arc<Self>) -> LoggingSubscription {
        let (tx, rx) = mpsc::channel(self.queue_depth);
        let id = self.next_id();
        self.write().loggers.push(LoggerEntry { id, tx });
        tracing::debug!(subscriber = id, "logging subscription registered");
        LoggingSubscription::new(id, rx, Arc::clone(self))
    }

    pub fn subscribe_stats(self: &Arc<Self>) -> StatsSubscription {
        let acc = Arc::new(Mutex::new(StatsAccumulator::new()));
        let id = self.next_id();
        self.write().stats.push(StatsEntry { id, acc: Arc::clone(&acc) });
        tracing::debug!(subscriber = id, "statistics subscription registered");
        StatsSubscription::new(id, acc, Arc::clone(self))
    }

    /// Broadcast `event` to every logger and count it in every accumulator.
    pub fn record(&self, event: AccessEvent) -> FanoutReport {
        let mut reg = self.write();
        let mut report = FanoutReport::default();

        reg.loggers.retain(|l| match l.tx.try_send(event.clone()) {
            Ok(()) => {
                report.delivered += 1;
                true
            }
            Err(TrySendError::Full(_)) => {
                tracing::warn!(subscriber = l.id, "audit queue full, disconnecting subscriber");
                report.evicted += 1;
                false
            }
            // receiver gone; guard drop will find nothing left to remove
            Err(TrySendError::Closed(_)) => false,
        });

        for s in &reg.stats {
            lock_acc(&s.acc).record(&event.method, &event.consumer);
        }

        report
    }

    pub fn logging_subscribers(&self) -> usize {
        self.read().loggers.len()
    }

    pub fn stats_subscribers(&self) -> usize {
        self.read().stats.len()
    }

    pub(crate) fn unregister_logging(&self, id: u64) -> bool {
        let mut reg = self.write();
        let before = reg.loggers.len();
        reg.loggers.retain(|l| l.id != id);
        before != reg.loggers.len()
    }

    pub(crate) fn unregister_stats(&self, id: u64) -> bool {
        let mut reg = self.write();
        let before = reg.stats.len();
        reg.stats.retain(|s| s.id != id);
        before != reg.stats.len()
    }

    fn next_id(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::Relaxed)
    }

    // Poison is ignored: no registry update can leave a half-written entry.
    fn write(&self) -> RwLockWriteGuard<'_, Registries> {
        self.registries.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn read(&self) -> RwLockReadGuard<'_, Registries> {
        self.registries.read().unwrap_or_else(PoisonError::into_inner)
    }
}

pub(crate) fn lock_acc(acc: &Mutex<StatsAccumulator>) -> MutexGuard<'_, StatsAccumulator> {
    acc.lock().unwrap_or_else(PoisonError::into_inner)
}
