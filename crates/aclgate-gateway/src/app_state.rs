//! Shared application state for the aclgate gateway.
//!
//! Owns the compiled ACL, the monitoring hub, the dispatcher and metrics.
//! Every handler reaches them through this handle; there are no globals.

use std::sync::Arc;

use aclgate_core::error::Result;

use crate::config::GatewayConfig;
use crate::dispatch::Dispatcher;
use crate::lifecycle::{drain_channel, DrainSignal, DrainTrigger};
use crate::monitor::MonitorHub;
use crate::obs::GatewayMetrics;
use crate::pipeline::AccessGate;
use crate::policy::{AclTable, MethodPattern};
use crate::services::{AdminService, BizService};

/// Methods served by the admin streams; they go through the gate like any other call.
pub const ADMIN_METHODS: [&str; 2] = ["/Admin/Logging", "/Admin/Statistics"];

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    acl: Arc<AclTable>,
    hub: Arc<MonitorHub>,
    gate: Arc<AccessGate>,
    admin: Arc<AdminService>,
    dispatcher: Arc<Dispatcher>,
    metrics: Arc<GatewayMetrics>,
    drain: DrainTrigger,
}

impl AppState {
    /// Build application state from a validated config and a compiled ACL.
    pub fn new(cfg: &GatewayConfig, acl: AclTable) -> Result<Self> {
        let acl = Arc::new(acl);
        let metrics = Arc::new(GatewayMetrics::default());
        let hub = Arc::new(MonitorHub::new(cfg.gateway.subscriber_queue));
        let gate = Arc::new(AccessGate::new(Arc::clone(&acl), Arc::clone(&hub), Arc::clone(&metrics)));
        let admin = Arc::new(AdminService::new(Arc::clone(&hub), cfg.gateway.max_stats_interval_secs));

        let dispatcher = Dispatcher::new();
        dispatcher.register(Arc::new(BizService::new()));

        warn_unreachable_rules(&acl, &dispatcher);

        let (drain, _) = drain_channel();

        Ok(Self {
            inner: Arc::new(AppStateInner {
                acl,
                hub,
                gate,
                admin,
                dispatcher: Arc::new(dispatcher),
                metrics,
                drain,
            }),
        })
    }

    pub fn acl(&self) -> Arc<AclTable> {
        Arc::clone(&self.inner.acl)
    }

    pub fn hub(&self) -> Arc<MonitorHub> {
        Arc::clone(&self.inner.hub)
    }

    pub fn gate(&self) -> Arc<AccessGate> {
        Arc::clone(&self.inner.gate)
    }

    pub fn admin(&self) -> Arc<AdminService> {
        Arc::clone(&self.inner.admin)
    }

    pub fn dispatcher(&self) -> Arc<Dispatcher> {
        Arc::clone(&self.inner.dispatcher)
    }

    pub fn metrics(&self) -> Arc<GatewayMetrics> {
        Arc::clone(&self.inner.metrics)
    }

    pub fn drain_signal(&self) -> DrainSignal {
        self.inner.drain.signal()
    }

    /// Enter draining: admin streams end, readiness reports 503.
    pub fn begin_drain(&self) {
        self.inner.metrics.set_draining();
        self.inner.drain.drain();
    }

    pub fn is_draining(&self) -> bool {
        self.inner.metrics.is_draining()
    }

    /// Extra gauge lines for `/metrics`.
    pub fn metrics_extra(&self) -> Vec<(&'static str, u64)> {
        vec![
            ("aclgate_logging_subscribers", self.inner.hub.logging_subscribers() as u64),
            ("aclgate_stats_subscribers", self.inner.hub.stats_subscribers() as u64),
            ("aclgate_acl_consumers", self.inner.acl.consumer_count() as u64),
        ]
    }
}

// Exact rules naming a method nobody serves are almost always typos.
fn warn_unreachable_rules(acl: &AclTable, dispatcher: &Dispatcher) {
    let mut served = dispatcher.registered_methods();
    served.extend(ADMIN_METHODS.iter().map(|m| m.to_string()));

    for consumer in acl.consumers() {
        let Some(patterns) = acl.patterns(consumer) else { continue };
        for p in patterns {
            if let MethodPattern::Exact(m) = p {
                if !served.iter().any(|s| s == m) {
                    tracing::warn!(consumer = %consumer, rule = %m, "acl rule refers to an unserved method");
                }
            }
        }
    }
}
