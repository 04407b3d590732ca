//! Admin stream encoding: one JSON text frame per item.

use axum::extract::ws::Message;
use serde::Serialize;

use aclgate_core::error::{GatewayError, Result};

pub fn encode<T: Serialize>(item: &T) -> Result<Message> {
    let s = serde_json::to_string(item)
        .map_err(|e| GatewayError::Internal(format!("json encode failed: {e}")))?;
    Ok(Message::Text(s))
}
