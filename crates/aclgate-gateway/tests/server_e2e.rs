#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use aclgate_core::protocol::{AccessEvent, StatSnapshot};
use aclgate_gateway::app_state::AppState;
use aclgate_gateway::server::ServerHandle;
use aclgate_gateway::{config, server};

type Ws = WebSocketStream<MaybeTlsStream<TcpStream>>;

const CONFIG: &str = r#"
version: 1
gateway:
  listen: "127.0.0.1:0"
  subscriber_queue: 64
acl:
  rules:
    c1: ["/Biz/*"]
    c2: ["/Biz/Check"]
    ops: ["/Admin/*"]
"#;

struct Reply {
    status: u16,
    body: String,
}

async fn request(addr: SocketAddr, method: &str, path: &str, consumer: Option<&str>) -> Reply {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let mut req = format!("{method} {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n");
    if let Some(c) = consumer {
        req.push_str(&format!("consumer: {c}\r\n"));
    }
    req.push_str("Content-Length: 0\r\n\r\n");
    stream.write_all(req.as_bytes()).await.unwrap();

    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).await.unwrap();
    let text = String::from_utf8_lossy(&raw).into_owned();

    let status = text
        .split_whitespace()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap();
    let body = text.split_once("\r\n\r\n").map(|(_, b)| b.to_string()).unwrap_or_default();
    Reply { status, body }
}

#[tokio::test]
async fn gateway_enforces_acl_and_audits_every_attempt() {
    let cfg = config::load_from_str(CONFIG).unwrap();
    let acl = config::load_acl(&cfg).unwrap();

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let handle = server::start(cfg, acl, async move {
        let _ = stop_rx.await;
    })
    .await
    .unwrap();
    let addr = handle.local_addr();
    let mut audit = handle.state().hub().subscribe_logging();

    assert_eq!(request(addr, "POST", "/Biz/Add", Some("c1")).await.status, 200);
    assert_eq!(request(addr, "POST", "/Biz/Check", Some("c2")).await.status, 200);

    let denied = request(addr, "POST", "/Biz/Add", Some("c2")).await;
    assert_eq!(denied.status, 403);
    assert!(denied.body.contains("ACCESS_DENIED"));

    assert_eq!(request(addr, "POST", "/Biz/Add", None).await.status, 403);
    assert_eq!(request(addr, "POST", "/Biz/Nope", Some("c1")).await.status, 404);
    assert_eq!(request(addr, "GET", "/Admin/Logging", Some("c1")).await.status, 403);
    // allowed, but not a websocket upgrade
    assert_eq!(request(addr, "GET", "/Admin/Logging", Some("ops")).await.status, 400);

    let expected = [
        ("c1", "/Biz/Add"),
        ("c2", "/Biz/Check"),
        ("c2", "/Biz/Add"),
        ("", "/Biz/Add"),
        ("c1", "/Biz/Nope"),
        ("c1", "/Admin/Logging"),
        ("ops", "/Admin/Logging"),
    ];
    for (consumer, method) in expected {
        let ev = audit.try_recv().unwrap();
        assert_eq!(ev.consumer, consumer);
        assert_eq!(ev.method, method);
        assert!(ev.host_address.starts_with("127.0.0.1:"));
    }
    assert!(audit.try_recv().is_none());

    // ops endpoints are not audited
    assert_eq!(request(addr, "GET", "/healthz", None).await.status, 200);
    assert_eq!(request(addr, "GET", "/readyz", None).await.status, 200);
    let metrics = request(addr, "GET", "/metrics", None).await;
    assert_eq!(metrics.status, 200);
    assert!(metrics.body.contains("aclgate_calls_total"));
    assert!(metrics.body.contains("aclgate_denials_total"));
    assert!(audit.try_recv().is_none());

    stop_tx.send(()).unwrap();
    handle.wait().await.unwrap();
}

async fn start_gateway() -> (ServerHandle, oneshot::Sender<()>) {
    let cfg = config::load_from_str(CONFIG).unwrap();
    let acl = config::load_acl(&cfg).unwrap();
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let handle = server::start(cfg, acl, async move {
        let _ = stop_rx.await;
    })
    .await
    .unwrap();
    (handle, stop_tx)
}

async fn open_stream(addr: SocketAddr, path: &str, consumer: &str) -> Ws {
    let mut req = format!("ws://{addr}{path}").into_client_request().unwrap();
    req.headers_mut()
        .insert("consumer", HeaderValue::from_str(consumer).unwrap());
    let (ws, resp) = connect_async(req).await.unwrap();
    assert_eq!(resp.status().as_u16(), 101);
    ws
}

async fn next_json<T: serde::de::DeserializeOwned>(ws: &mut Ws) -> T {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("no frame within 5s")
            .expect("stream ended")
            .unwrap();
        match msg {
            Message::Text(_) => return serde_json::from_str(&msg.into_text().unwrap()).unwrap(),
            Message::Ping(_) | Message::Pong(_) => continue,
            other => panic!("unexpected frame: {other:?}"),
        }
    }
}

async fn eventually(what: &str, cond: impl Fn() -> bool) {
    for _ in 0..200 {
        if cond() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("timed out waiting for {what}");
}

fn streams_active(state: &AppState, stream: &str) -> i64 {
    state.metrics().admin_streams.get(&[("stream", stream)])
}

#[tokio::test]
async fn logging_streams_receive_identical_events_over_websocket() {
    let (handle, stop) = start_gateway().await;
    let addr = handle.local_addr();
    let state = handle.state().clone();

    let mut first = open_stream(addr, "/Admin/Logging", "ops").await;
    let mut second = open_stream(addr, "/Admin/Logging", "ops").await;
    eventually("two logging streams", || streams_active(&state, "logging") == 2).await;

    assert_eq!(request(addr, "POST", "/Biz/Add", Some("c1")).await.status, 200);

    // the first stream was already registered when the second one was opened
    let opened: AccessEvent = next_json(&mut first).await;
    assert_eq!((opened.consumer.as_str(), opened.method.as_str()), ("ops", "/Admin/Logging"));

    let a: AccessEvent = next_json(&mut first).await;
    let b: AccessEvent = next_json(&mut second).await;
    assert_eq!(a, b);
    assert_eq!(a.consumer, "c1");
    assert_eq!(a.method, "/Biz/Add");
    assert!(a.host_address.starts_with("127.0.0.1:"));

    first.close(None).await.unwrap();
    second.close(None).await.unwrap();
    let hub = state.hub();
    eventually("logging subscribers released", || hub.logging_subscribers() == 0).await;
    eventually("logging gauge back to zero", || streams_active(&state, "logging") == 0).await;

    stop.send(()).unwrap();
    handle.wait().await.unwrap();
}

#[tokio::test]
async fn statistics_stream_pushes_windowed_counts_over_websocket() {
    let (handle, stop) = start_gateway().await;
    let addr = handle.local_addr();
    let state = handle.state().clone();

    let mut stats = open_stream(addr, "/Admin/Statistics?interval_seconds=1", "ops").await;
    eventually("statistics stream", || streams_active(&state, "statistics") == 1).await;

    for _ in 0..3 {
        assert_eq!(request(addr, "POST", "/Biz/Add", Some("c1")).await.status, 200);
    }

    let window: StatSnapshot = next_json(&mut stats).await;
    assert_eq!(window.by_method["/Biz/Add"], 3);
    assert_eq!(window.by_consumer["c1"], 3);
    assert_eq!(window.total_calls(), 3);

    let quiet: StatSnapshot = next_json(&mut stats).await;
    assert!(quiet.is_empty());

    drop(stats);
    let hub = state.hub();
    eventually("stats subscribers released", || hub.stats_subscribers() == 0).await;

    stop.send(()).unwrap();
    handle.wait().await.unwrap();
}

#[tokio::test]
async fn statistics_interval_errors_are_bad_requests() {
    let (handle, stop) = start_gateway().await;
    let addr = handle.local_addr();

    let garbled = request(addr, "GET", "/Admin/Statistics?interval_seconds=abc", Some("ops")).await;
    assert_eq!(garbled.status, 400);
    assert!(garbled.body.contains("BAD_REQUEST"));
    assert!(garbled.body.contains("deserialize query string"));

    let missing = request(addr, "GET", "/Admin/Statistics", Some("ops")).await;
    assert_eq!(missing.status, 400);
    assert!(missing.body.contains("interval_seconds"));

    let zero = request(addr, "GET", "/Admin/Statistics?interval_seconds=0", Some("ops")).await;
    assert_eq!(zero.status, 400);

    assert_eq!(handle.state().hub().stats_subscribers(), 0);

    stop.send(()).unwrap();
    handle.wait().await.unwrap();
}

#[tokio::test]
async fn drain_closes_open_admin_streams() {
    let (handle, stop) = start_gateway().await;
    let addr = handle.local_addr();
    let state = handle.state().clone();

    let mut logs = open_stream(addr, "/Admin/Logging", "ops").await;
    eventually("logging stream", || streams_active(&state, "logging") == 1).await;

    stop.send(()).unwrap();
    let end = tokio::time::timeout(Duration::from_secs(5), async {
        while let Some(Ok(msg)) = logs.next().await {
            if let Message::Close(_) = msg {
                break;
            }
        }
    })
    .await;
    assert!(end.is_ok(), "stream stayed open after drain");
    assert!(state.is_draining());
    let hub = state.hub();
    eventually("logging subscribers released", || hub.logging_subscribers() == 0).await;

    handle.wait().await.unwrap();
}
