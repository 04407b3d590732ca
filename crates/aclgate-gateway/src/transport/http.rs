//! Unary calls over HTTP: `POST /{Service}/{Method}`.
//!
//! Headers are the call metadata; the body is passed to the service untouched.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, State},
    http::{header, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde_json::json;

use aclgate_core::error::{ClientCode, GatewayError};

use crate::app_state::AppState;
use crate::context::CallMetadata;
use crate::pipeline::InboundCall;

pub async fn unary(
    State(app): State<AppState>,
    uri: Uri,
    peer: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let metadata = CallMetadata::from_headers(&headers);
    let call = InboundCall::unary(uri.path(), &metadata, peer.map(|ConnectInfo(addr)| addr));

    let gate = app.gate();
    let dispatcher = app.dispatcher();
    let res = gate
        .intercept(call, move |caller| async move { dispatcher.dispatch(caller, body).await })
        .await;

    match res {
        Ok(out) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/octet-stream")],
            out,
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}

pub fn status_for(code: ClientCode) -> StatusCode {
    match code {
        ClientCode::BadRequest => StatusCode::BAD_REQUEST,
        ClientCode::AccessDenied => StatusCode::FORBIDDEN,
        ClientCode::NotFound => StatusCode::NOT_FOUND,
        ClientCode::UnsupportedVersion | ClientCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn error_response(e: &GatewayError) -> Response {
    let code = e.client_code();
    let body = Json(json!({
        "error": code.as_str(),
        "message": e.client_message(),
    }));
    (status_for(code), body).into_response()
}
