//! Method pattern compilation and matching.
//!
//! A pattern is either an exact method path (`/Biz/Check`) or a prefix rule
//! ending in `*` (`/Biz/*`). A bare `*` matches every method.

use aclgate_core::error::{GatewayError, Result};

pub const WILDCARD: char = '*';

/// Compiled ACL rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodPattern {
    Exact(String),
    /// Everything before the trailing `*`.
    Prefix(String),
}

impl MethodPattern {
    pub fn compile(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(GatewayError::Config("empty method pattern".into()));
        }

        match raw.find(WILDCARD) {
            None => Ok(MethodPattern::Exact(raw.to_string())),
            Some(pos) if pos + WILDCARD.len_utf8() == raw.len() => {
                Ok(MethodPattern::Prefix(raw[..pos].to_string()))
            }
            Some(_) => Err(GatewayError::Config(format!(
                "invalid method pattern: {raw} (wildcard must be the last character)"
            ))),
        }
    }

    pub fn matches(&self, method: &str) -> bool {
        match self {
            MethodPattern::Exact(m) => m == method,
            MethodPattern::Prefix(p) => method.starts_with(p.as_str()),
        }
    }
}

pub fn compile_patterns(raw: &[String]) -> Result<Vec<MethodPattern>> {
    let mut out: Vec<MethodPattern> = Vec::with_capacity(raw.len());
    for s in raw {
        let p = MethodPattern::compile(s)?;
        // ordered set: keep first occurrence
        if !out.contains(&p) {
            out.push(p);
        }
    }
    Ok(out)
}

pub fn any_match(patterns: &[MethodPattern], method: &str) -> bool {
    patterns.iter().any(|p| p.matches(method))
}
