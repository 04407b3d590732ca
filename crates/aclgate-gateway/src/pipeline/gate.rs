use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use aclgate_core::error::{GatewayError, Result};

use crate::context::{CallMetadata, Caller, CallerIdentity};
use crate::monitor::MonitorHub;
use crate::obs::GatewayMetrics;
use crate::policy::{AccessDecision, AclTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Unary,
    Stream,
}

impl CallKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CallKind::Unary => "unary",
            CallKind::Stream => "stream",
        }
    }
}

/// One inbound call as seen by the gate, independent of transport.
#[derive(Debug)]
pub struct InboundCall<'a> {
    pub kind: CallKind,
    pub method: &'a str,
    pub metadata: &'a CallMetadata,
    pub peer: Option<SocketAddr>,
}

impl<'a> InboundCall<'a> {
    pub fn unary(method: &'a str, metadata: &'a CallMetadata, peer: Option<SocketAddr>) -> Self {
        Self { kind: CallKind::Unary, method, metadata, peer }
    }

    pub fn stream(method: &'a str, metadata: &'a CallMetadata, peer: Option<SocketAddr>) -> Self {
        Self { kind: CallKind::Stream, method, metadata, peer }
    }
}

/// Access decision point.
///
/// Stages, in order: extract identity -> record audit/stats -> authorize ->
/// dispatch. Recording happens before authorization so refused attempts are
/// audited too.
pub struct AccessGate {
    acl: Arc<AclTable>,
    hub: Arc<MonitorHub>,
    metrics: Arc<GatewayMetrics>,
}

impl AccessGate {
    pub fn new(acl: Arc<AclTable>, hub: Arc<MonitorHub>, metrics: Arc<GatewayMetrics>) -> Self {
        Self { acl, hub, metrics }
    }

    /// Run every stage up to dispatch. `Ok` means the handler may run.
    pub fn admit(&self, call: &InboundCall<'_>) -> Result<Caller> {
        let kind = call.kind.as_str();

        // 1) extract
        let identity = match CallerIdentity::extract(call.method, call.metadata, call.peer) {
            Ok(id) => id,
            Err(e) => {
                let reason = match e {
                    GatewayError::Unauthenticated(_) => "missing_peer",
                    _ => "malformed_method",
                };
                self.refused(kind, reason, &e);
                return Err(e);
            }
        };

        // 2) record
        let report = self.hub.record(identity.to_event());
        if report.evicted > 0 {
            self.metrics.subscriber_evictions.add(&[], report.evicted as u64);
        }

        // 3) authorize
        let caller = match identity.authenticate() {
            Ok(c) => c,
            Err(e) => {
                self.refused(kind, "missing_consumer", &e);
                return Err(e);
            }
        };

        match self.acl.decide(caller.consumer(), caller.method().as_str()) {
            AccessDecision::Allow => {
                self.metrics.calls.inc(&[("kind", kind), ("outcome", "allowed")]);
                Ok(caller)
            }
            AccessDecision::Deny(reason) => {
                let e = GatewayError::NotAllowed(format!(
                    "{reason} (consumer={}, method={})",
                    caller.consumer(),
                    caller.method()
                ));
                self.refused(kind, reason.as_str(), &e);
                Err(e)
            }
        }
    }

    /// Admit, then run `handler` (4: dispatch). The handler's result
    /// propagates unchanged; a refused call never reaches it.
    pub async fn intercept<T, F, Fut>(&self, call: InboundCall<'_>, handler: F) -> Result<T>
    where
        F: FnOnce(Caller) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let caller = self.admit(&call)?;
        let method = caller.method().to_string();

        let started = Instant::now();
        let res = handler(caller).await;
        // caller-chosen unknown names never become label values
        let known = !matches!(res, Err(GatewayError::UnknownMethod(_)));
        if call.kind == CallKind::Unary && known {
            self.metrics
                .dispatch_duration
                .observe(&[("method", method.as_str())], started.elapsed());
        }
        res
    }

    fn refused(&self, kind: &str, reason: &str, e: &GatewayError) {
        let outcome = match e {
            GatewayError::Unauthenticated(_) | GatewayError::NotAllowed(_) => "denied",
            _ => "error",
        };
        self.metrics.calls.inc(&[("kind", kind), ("outcome", outcome)]);
        if outcome == "denied" {
            self.metrics.denials.inc(&[("reason", reason)]);
        }
        tracing::debug!(kind, reason, error = %e, "call refused");
    }
}
