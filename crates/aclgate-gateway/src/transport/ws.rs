//! Admin streams over WebSocket.
//!
//! Responsibilities:
//! - Run the access gate on the upgrade request (`GET /Admin/...`)
//! - Register the subscription before answering 101, so nothing recorded
//!   after the handshake is missed
//! - Pump items as JSON text frames until the client closes or the gateway drains

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    extract::{
        rejection::QueryRejection, ws::Message, ws::WebSocket, ws::WebSocketUpgrade, ConnectInfo,
        Query, State,
    },
    http::{HeaderMap, Uri},
    response::Response,
};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::Instrument;

use aclgate_core::error::{GatewayError, Result};

use crate::app_state::AppState;
use crate::context::CallMetadata;
use crate::monitor::{LoggingSubscription, StatsSubscription};
use crate::pipeline::InboundCall;
use crate::services::{stream_logging, stream_statistics, PushSink, StreamEnd};
use crate::transport::{codec, http::error_response};

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub interval_seconds: u64,
}

/// Outbound half of an upgraded socket.
pub struct WsPushSink {
    tx: SplitSink<WebSocket, Message>,
}

#[async_trait]
impl<T: Serialize + Send + 'static> PushSink<T> for WsPushSink {
    async fn push(&mut self, item: T) -> Result<()> {
        let msg = codec::encode(&item)?;
        self.tx
            .send(msg)
            .await
            .map_err(|e| GatewayError::Delivery(format!("websocket send failed: {e}")))
    }
}

/// Resolves when the client closes or the socket errors. Inbound frames are
/// otherwise ignored; admin streams are push-only.
fn client_gone(mut rx: SplitStream<WebSocket>) -> impl Future<Output = ()> + Send + 'static {
    async move {
        while let Some(Ok(msg)) = rx.next().await {
            if let Message::Close(_) = msg {
                break;
            }
        }
    }
}

enum Opened {
    Logging(LoggingSubscription),
    Statistics(StatsSubscription, Duration),
}

impl Opened {
    fn stream_name(&self) -> &'static str {
        match self {
            Opened::Logging(_) => "logging",
            Opened::Statistics(..) => "statistics",
        }
    }
}

pub async fn stream(
    State(app): State<AppState>,
    uri: Uri,
    peer: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    query: std::result::Result<Query<StatsQuery>, QueryRejection>,
    ws: Option<WebSocketUpgrade>,
) -> Response {
    let metadata = CallMetadata::from_headers(&headers);
    let call = InboundCall::stream(uri.path(), &metadata, peer.map(|ConnectInfo(addr)| addr));

    let gate = app.gate();
    let res = gate
        .intercept(call, move |caller| async move {
            let opened = match caller.method().as_str() {
                "/Admin/Logging" => Opened::Logging(app.admin().open_logging()),
                "/Admin/Statistics" => {
                    let Query(q) = query.map_err(|e| GatewayError::BadRequest(e.body_text()))?;
                    let (sub, period) = app.admin().open_statistics(q.interval_seconds)?;
                    Opened::Statistics(sub, period)
                }
                other => return Err(GatewayError::UnknownMethod(other.to_string())),
            };
            let ws = ws.ok_or_else(|| GatewayError::BadRequest("websocket upgrade required".into()))?;

            let span = tracing::info_span!(
                "admin_stream",
                stream = opened.stream_name(),
                consumer = %caller.consumer(),
                peer = %caller.peer(),
            );
            Ok(ws.on_upgrade(move |socket| run(app, opened, socket).instrument(span)))
        })
        .await;

    res.unwrap_or_else(|e| error_response(&e))
}

async fn run(app: AppState, opened: Opened, socket: WebSocket) {
    let name = opened.stream_name();
    let metrics = app.metrics();
    metrics.admin_streams.inc(&[("stream", name)]);
    tracing::info!("admin stream opened");

    let (tx, rx) = socket.split();
    let sink = WsPushSink { tx };
    let gone = client_gone(rx);
    let drain = app.drain_signal();

    let res = match opened {
        Opened::Logging(sub) => stream_logging(sub, sink, gone, drain).await,
        Opened::Statistics(sub, period) => stream_statistics(sub, period, sink, gone, drain).await,
    };

    metrics.admin_streams.dec(&[("stream", name)]);
    match res {
        Ok(StreamEnd::ClientGone) => tracing::info!("admin stream closed by client"),
        Ok(StreamEnd::Draining) => tracing::info!("admin stream closed: draining"),
        Err(e) => tracing::info!(error = %e, "admin stream ended"),
    }
}
