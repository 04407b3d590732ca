use std::collections::BTreeMap;
use std::net::SocketAddr;

use serde::Deserialize;
use aclgate_core::error::{GatewayError, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    pub version: u32,

    #[serde(default)]
    pub gateway: GatewaySection,

    pub acl: AclSection,
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(GatewayError::UnsupportedVersion);
        }

        self.gateway.validate()?;
        self.acl.validate()?;

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Per-subscriber audit queue depth. A full queue disconnects the subscriber.
    #[serde(default = "default_subscriber_queue")]
    pub subscriber_queue: usize,

    #[serde(default = "default_max_stats_interval_secs")]
    pub max_stats_interval_secs: u64,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            subscriber_queue: default_subscriber_queue(),
            max_stats_interval_secs: default_max_stats_interval_secs(),
        }
    }
}

impl GatewaySection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        if !(1..=65536).contains(&self.subscriber_queue) {
            return Err(GatewayError::Config(
                "gateway.subscriber_queue must be between 1 and 65536".into(),
            ));
        }
        if !(1..=86400).contains(&self.max_stats_interval_secs) {
            return Err(GatewayError::Config(
                "gateway.max_stats_interval_secs must be between 1 and 86400".into(),
            ));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            GatewayError::Config(format!("gateway.listen must be a valid SocketAddr: {e}"))
        })
    }
}

fn default_listen() -> String {
    "127.0.0.1:8082".into()
}
fn default_subscriber_queue() -> usize {
    256
}
fn default_max_stats_interval_secs() -> u64 {
    3600
}

/// Where the consumer -> method patterns mapping comes from.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AclSection {
    /// JSON file holding `{"consumer": ["pattern", ...]}`.
    #[serde(default)]
    pub path: Option<String>,

    /// Same mapping written inline.
    #[serde(default)]
    pub rules: Option<BTreeMap<String, Vec<String>>>,
}

impl AclSection {
    pub fn validate(&self) -> Result<()> {
        match (&self.path, &self.rules) {
            (Some(_), Some(_)) => Err(GatewayError::Config(
                "acl.path and acl.rules are mutually exclusive".into(),
            )),
            (None, None) => Err(GatewayError::Config(
                "acl requires either path or rules".into(),
            )),
            _ => Ok(()),
        }
    }
}
