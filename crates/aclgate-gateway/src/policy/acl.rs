use std::collections::{BTreeMap, HashMap};

use thiserror::Error;
use aclgate_core::error::{GatewayError, Result};

use super::pattern::{any_match, compile_patterns, MethodPattern};

/// Why a call was refused. Internal diagnostics only; callers see one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DenyReason {
    #[error("consumer not in acl")]
    UnknownConsumer,
    #[error("method not permitted for consumer")]
    MethodNotPermitted,
}

impl DenyReason {
    /// Metrics label.
    pub fn as_str(self) -> &'static str {
        match self {
            DenyReason::UnknownConsumer => "unknown_consumer",
            DenyReason::MethodNotPermitted => "method_not_permitted",
        }
    }
}

/// Decision from ACL evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Deny(DenyReason),
}

impl AccessDecision {
    pub fn is_allowed(self) -> bool {
        matches!(self, AccessDecision::Allow)
    }
}

/// Consumer -> allowed method patterns.
/// Construct once at startup, then share via Arc. There is no mutation API.
#[derive(Debug, Clone, Default)]
pub struct AclTable {
    rules: HashMap<String, Vec<MethodPattern>>,
}

impl AclTable {
    /// Parse the serialized startup mapping `{"consumer": ["pattern", ...]}`.
    pub fn from_json(raw: &str) -> Result<Self> {
        let rules: BTreeMap<String, Vec<String>> = serde_json::from_str(raw)
            .map_err(|e| GatewayError::Config(format!("invalid acl json: {e}")))?;
        Self::from_rules(&rules)
    }

    pub fn from_rules(raw: &BTreeMap<String, Vec<String>>) -> Result<Self> {
        let mut rules = HashMap::with_capacity(raw.len());
        for (consumer, patterns) in raw {
            let compiled = compile_patterns(patterns).map_err(|e| {
                GatewayError::Config(format!("acl compile failed (consumer={consumer}): {e}"))
            })?;
            rules.insert(consumer.clone(), compiled);
        }
        Ok(Self { rules })
    }

    pub fn decide(&self, consumer: &str, method: &str) -> AccessDecision {
        let Some(patterns) = self.rules.get(consumer) else {
            return AccessDecision::Deny(DenyReason::UnknownConsumer);
        };
        if any_match(patterns, method) {
            AccessDecision::Allow
        } else {
            AccessDecision::Deny(DenyReason::MethodNotPermitted)
        }
    }

    pub fn is_allowed(&self, consumer: &str, method: &str) -> bool {
        self.decide(consumer, method).is_allowed()
    }

    pub fn patterns(&self, consumer: &str) -> Option<&[MethodPattern]> {
        self.rules.get(consumer).map(Vec::as_slice)
    }

    pub fn consumers(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub fn consumer_count(&self) -> usize {
        self.rules.len()
    }
}
