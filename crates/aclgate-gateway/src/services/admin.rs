//! Admin server-push streams: Logging and Statistics.
//!
//! The loops are transport-agnostic. A transport supplies a `PushSink` for
//! outbound items and a `gone` future that resolves when the client goes away.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use aclgate_core::error::{GatewayError, Result};
use aclgate_core::protocol::{AccessEvent, StatSnapshot};

use crate::lifecycle::DrainSignal;
use crate::monitor::{LoggingSubscription, MonitorHub, StatsSubscription};

/// Outbound half of an admin stream.
#[async_trait]
pub trait PushSink<T: Send + 'static>: Send {
    async fn push(&mut self, item: T) -> Result<()>;
}

/// In-process sink over an mpsc channel.
pub struct ChannelSink<T> {
    tx: mpsc::Sender<T>,
}

impl<T: Send + 'static> ChannelSink<T> {
    pub fn new(tx: mpsc::Sender<T>) -> Self {
        Self { tx }
    }

    /// Resolves when the receiving side is dropped.
    pub fn gone(&self) -> impl Future<Output = ()> + Send + 'static {
        let probe = self.tx.clone();
        async move { probe.closed().await }
    }
}

#[async_trait]
impl<T: Send + 'static> PushSink<T> for ChannelSink<T> {
    async fn push(&mut self, item: T) -> Result<()> {
        self.tx
            .send(item)
            .await
            .map_err(|_| GatewayError::Delivery("receiver closed".into()))
    }
}

/// Why a stream ended without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEnd {
    ClientGone,
    Draining,
}

pub struct AdminService {
    hub: Arc<MonitorHub>,
    max_interval_secs: u64,
}

impl AdminService {
    pub fn new(hub: Arc<MonitorHub>, max_interval_secs: u64) -> Self {
        Self { hub, max_interval_secs }
    }

    /// Register a Logging subscription. Events recorded from now on are queued for it.
    pub fn open_logging(&self) -> LoggingSubscription {
        self.hub.subscribe_logging()
    }

    /// Validate the interval and register a Statistics subscription.
    pub fn open_statistics(&self, interval_secs: u64) -> Result<(StatsSubscription, Duration)> {
        if interval_secs == 0 || interval_secs > self.max_interval_secs {
            return Err(GatewayError::BadRequest(format!(
                "interval_seconds must be between 1 and {}",
                self.max_interval_secs
            )));
        }
        Ok((self.hub.subscribe_stats(), Duration::from_secs(interval_secs)))
    }
}

/// Relay audit events until the client leaves, a push fails, the subscriber
/// is evicted, or the gateway drains. The subscription is released on return.
pub async fn stream_logging<S, G>(
    mut sub: LoggingSubscription,
    mut sink: S,
    gone: G,
    mut drain: DrainSignal,
) -> Result<StreamEnd>
where
    S: PushSink<AccessEvent>,
    G: Future<Output = ()> + Send,
{
    tokio::pin!(gone);
    loop {
        tokio::select! {
            ev = sub.recv() => {
                let Some(ev) = ev else {
                    return Err(GatewayError::Delivery("subscriber evicted: queue overflow".into()));
                };
                sink.push(ev).await?;
            }
            _ = &mut gone => return Ok(StreamEnd::ClientGone),
            _ = drain.wait() => return Ok(StreamEnd::Draining),
        }
    }
}

/// Push a snapshot every `period` (first one a full period after opening) and
/// reset the window. Ends like `stream_logging`.
pub async fn stream_statistics<S, G>(
    sub: StatsSubscription,
    period: Duration,
    mut sink: S,
    gone: G,
    mut drain: DrainSignal,
) -> Result<StreamEnd>
where
    S: PushSink<StatSnapshot>,
    G: Future<Output = ()> + Send,
{
    tokio::pin!(gone);
    let mut tick = interval_at(Instant::now() + period, period);
    tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = tick.tick() => {
                let snapshot = sub.flush();
                sink.push(snapshot).await?;
            }
            _ = &mut gone => return Ok(StreamEnd::ClientGone),
            _ = drain.wait() => return Ok(StreamEnd::Draining),
        }
    }
}
