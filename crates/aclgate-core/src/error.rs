//! Shared error type across aclgate crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input / malformed arguments.
    BadRequest,
    /// Identity missing or method not permitted. The two are never told apart.
    AccessDenied,
    /// No handler registered for an allowed method.
    NotFound,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::AccessDenied => "ACCESS_DENIED",
            ClientCode::NotFound => "NOT_FOUND",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("config: {0}")]
    Config(String),
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),
    #[error("not allowed: {0}")]
    NotAllowed(String),
    #[error("delivery failed: {0}")]
    Delivery(String),
    #[error("unknown method: {0}")]
    UnknownMethod(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            GatewayError::BadRequest(_) | GatewayError::Config(_) => ClientCode::BadRequest,
            GatewayError::Unauthenticated(_) | GatewayError::NotAllowed(_) => {
                ClientCode::AccessDenied
            }
            GatewayError::UnknownMethod(_) => ClientCode::NotFound,
            GatewayError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            GatewayError::Delivery(_) | GatewayError::Internal(_) => ClientCode::Internal,
        }
    }

    /// Message safe to show a remote caller.
    ///
    /// Access failures collapse into one fixed text so a caller cannot probe
    /// whether an identity is known.
    pub fn client_message(&self) -> String {
        match self.client_code() {
            ClientCode::AccessDenied => "access denied".to_string(),
            _ => self.to_string(),
        }
    }
}
