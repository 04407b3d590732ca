//! Monitoring runtime: audit broadcast + windowed statistics.

mod hub;
mod stats;
mod subscription;

pub use hub::{FanoutReport, MonitorHub};
pub use stats::StatsAccumulator;
pub use subscription::{LoggingSubscription, StatsSubscription};
