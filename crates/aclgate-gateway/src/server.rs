//! Listener lifecycle.
//!
//! The ACL is compiled before `start` is called, so a malformed ACL never
//! reaches the bind.

use std::future::Future;
use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use aclgate_core::error::{GatewayError, Result};

use crate::app_state::AppState;
use crate::config::GatewayConfig;
use crate::policy::AclTable;
use crate::router;

pub struct ServerHandle {
    local_addr: SocketAddr,
    state: AppState,
    task: JoinHandle<Result<()>>,
}

impl ServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Wait until the server has shut down.
    pub async fn wait(self) -> Result<()> {
        self.task
            .await
            .map_err(|e| GatewayError::Internal(format!("server task failed: {e}")))?
    }
}

/// Bind `cfg.gateway.listen` and serve until `shutdown` resolves.
pub async fn start<F>(cfg: GatewayConfig, acl: AclTable, shutdown: F) -> Result<ServerHandle>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listen = cfg.gateway.listen_addr()?;
    let state = AppState::new(&cfg, acl)?;
    let app = router::build_router(state.clone());

    let listener = TcpListener::bind(listen)
        .await
        .map_err(|e| GatewayError::Internal(format!("bind {listen} failed: {e}")))?;
    let local_addr = listener
        .local_addr()
        .map_err(|e| GatewayError::Internal(format!("local_addr failed: {e}")))?;

    tracing::info!(%local_addr, consumers = state.acl().consumer_count(), "aclgate-gateway listening");

    let drain_state = state.clone();
    let task = tokio::spawn(async move {
        axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
            .with_graceful_shutdown(async move {
                shutdown.await;
                tracing::info!("shutdown requested, draining");
                drain_state.begin_drain();
            })
            .await
            .map_err(|e| GatewayError::Internal(format!("server failed: {e}")))
    });

    Ok(ServerHandle { local_addr, state, task })
}
