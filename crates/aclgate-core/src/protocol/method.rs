//! Fully-qualified method paths (`/Service/Method`).
//!
//! Parsing is panic-free: a malformed path is an internal error, because the
//! transport is expected to hand over a well-formed name for every call.

use std::fmt;

use crate::error::{GatewayError, Result};

/// Parsed `/Service/Method`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodPath {
    full: String,
    split: usize,
}

impl MethodPath {
    pub fn parse(raw: &str) -> Result<Self> {
        let rest = raw
            .strip_prefix('/')
            .ok_or_else(|| GatewayError::Internal(format!("method path must start with '/': {raw:?}")))?;

        let (svc, method) = rest
            .split_once('/')
            .ok_or_else(|| GatewayError::Internal(format!("method path missing method segment: {raw:?}")))?;

        if svc.is_empty() || method.is_empty() || method.contains('/') {
            return Err(GatewayError::Internal(format!(
                "malformed method path: {raw:?} (expected /Service/Method)"
            )));
        }
        if raw.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(GatewayError::Internal(format!(
                "method path contains whitespace: {raw:?}"
            )));
        }

        Ok(Self {
            full: raw.to_string(),
            split: 1 + svc.len(),
        })
    }

    /// The whole path, as matched against ACL patterns.
    pub fn as_str(&self) -> &str {
        &self.full
    }

    pub fn service(&self) -> &str {
        &self.full[1..self.split]
    }

    pub fn method(&self) -> &str {
        &self.full[self.split + 1..]
    }
}

impl fmt::Display for MethodPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full)
    }
}
