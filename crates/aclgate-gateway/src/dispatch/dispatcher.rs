use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;

use aclgate_core::error::{GatewayError, Result};

use crate::context::Caller;

/// Unary business service. Request and response bodies are opaque bytes; their
/// encoding belongs to the client and the service.
#[async_trait]
pub trait UnaryService: Send + Sync {
    /// Service segment of the method path (`Biz` for `/Biz/Add`).
    fn service(&self) -> &'static str;
    fn methods(&self) -> &'static [&'static str];
    async fn call(&self, caller: Caller, body: Bytes) -> Result<Bytes>;
}

/// Registry and dispatcher for unary services, keyed by service name.
#[derive(Default)]
pub struct Dispatcher {
    unary: DashMap<&'static str, Arc<dyn UnaryService>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self { unary: DashMap::new() }
    }

    pub fn register(&self, svc: Arc<dyn UnaryService>) {
        self.unary.insert(svc.service(), svc);
    }

    /// Every `/Service/Method` reachable through this dispatcher.
    pub fn registered_methods(&self) -> Vec<String> {
        let mut out: Vec<String> = self
            .unary
            .iter()
            .flat_map(|e| {
                let svc = *e.key();
                e.value()
                    .methods()
                    .iter()
                    .map(move |m| format!("/{svc}/{m}"))
                    .collect::<Vec<_>>()
            })
            .collect();
        out.sort();
        out
    }

    pub async fn dispatch(&self, caller: Caller, body: Bytes) -> Result<Bytes> {
        let path = caller.method();
        let handler = self
            .unary
            .get(path.service())
            .ok_or_else(|| GatewayError::UnknownMethod(path.to_string()))?
            .value()
            .clone();

        if !handler.methods().contains(&path.method()) {
            return Err(GatewayError::UnknownMethod(path.to_string()));
        }
        handler.call(caller, body).await
    }
}
