//! aclgate gateway binary.
//!
//! - Config: argv[1] (default `aclgate.yaml`), strict YAML + ACL JSON
//! - Unary calls: POST /{Service}/{Method} with a `consumer` header
//! - Admin streams: GET /Admin/Logging, GET /Admin/Statistics?interval_seconds=N (WebSocket)
//! - SIGINT/SIGTERM: drain admin streams, stop accepting, exit

use std::process::ExitCode;

use tracing_subscriber::{fmt, EnvFilter};

use aclgate_core::error::Result;
use aclgate_gateway::{config, server};

#[tokio::main]
async fn main() -> ExitCode {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "aclgate.yaml".to_string());
    match run(&path).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, config = %path, "aclgate-gateway failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(path: &str) -> Result<()> {
    let cfg = config::load_from_file(path)?;
    let acl = config::load_acl(&cfg)?;

    let handle = server::start(cfg, acl, shutdown_signal()).await?;
    handle.wait().await?;

    tracing::info!("aclgate-gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "ctrl-c handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("signal received, starting graceful shutdown");
}
