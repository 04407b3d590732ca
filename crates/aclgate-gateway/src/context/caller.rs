use std::net::SocketAddr;

use aclgate_core::error::{GatewayError, Result};
use aclgate_core::protocol::{AccessEvent, MethodPath};

use super::metadata::{CallMetadata, CONSUMER_KEY};

/// What the extractor could read from one inbound call.
///
/// `consumer` stays optional here: an anonymous call is still audited before
/// it is refused.
#[derive(Debug, Clone)]
pub struct CallerIdentity {
    consumer: Option<String>,
    peer: SocketAddr,
    method: MethodPath,
}

impl CallerIdentity {
    /// Fails on a malformed method (internal) or missing peer info (unauthenticated).
    pub fn extract(method: &str, metadata: &CallMetadata, peer: Option<SocketAddr>) -> Result<Self> {
        let method = MethodPath::parse(method)?;
        let peer = peer.ok_or_else(|| {
            GatewayError::Unauthenticated("missing peer info".into())
        })?;
        let consumer = metadata.get(CONSUMER_KEY).map(str::to_string);

        Ok(Self { consumer, peer, method })
    }

    pub fn consumer(&self) -> Option<&str> {
        self.consumer.as_deref()
    }
    pub fn peer(&self) -> SocketAddr {
        self.peer
    }
    pub fn method(&self) -> &MethodPath {
        &self.method
    }

    pub fn to_event(&self) -> AccessEvent {
        AccessEvent {
            consumer: self.consumer.clone().unwrap_or_default(),
            method: self.method.as_str().to_string(),
            host_address: self.peer.to_string(),
        }
    }

    /// Promote to an authenticated caller, or fail when no consumer was asserted.
    pub fn authenticate(self) -> Result<Caller> {
        let consumer = self.consumer.ok_or_else(|| {
            GatewayError::Unauthenticated("no consumer in metadata".into())
        })?;
        Ok(Caller {
            consumer,
            peer: self.peer,
            method: self.method,
        })
    }
}

/// Admitted caller handed to the handler.
#[derive(Debug, Clone)]
pub struct Caller {
    consumer: String,
    peer: SocketAddr,
    method: MethodPath,
}

impl Caller {
    pub fn consumer(&self) -> &str {
        &self.consumer
    }
    pub fn peer(&self) -> SocketAddr {
        self.peer
    }
    pub fn method(&self) -> &MethodPath {
        &self.method
    }
}
