//! Axum router wiring.
//!
//! Every `/{Service}/{Method}` path is an RPC method: `POST` for unary calls,
//! `GET` + WebSocket upgrade for server-push streams.

use axum::{routing::get, Router};

use crate::{app_state::AppState, ops, transport};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(ops::healthz))
        .route("/readyz", get(ops::readyz))
        .route("/metrics", get(ops::metrics))
        .route(
            "/:service/:method",
            get(transport::ws::stream).post(transport::http::unary),
        )
        .with_state(state)
}
