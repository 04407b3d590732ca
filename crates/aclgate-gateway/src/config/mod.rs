//! Gateway config loader (strict parsing).

pub mod schema;

use std::fs;

use aclgate_core::error::{GatewayError, Result};

use crate::policy::AclTable;

pub use schema::{AclSection, GatewayConfig, GatewaySection};

pub fn load_from_file(path: &str) -> Result<GatewayConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| GatewayError::Config(format!("read config {path} failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<GatewayConfig> {
    let cfg: GatewayConfig = serde_yaml::from_str(s)
        .map_err(|e| GatewayError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Compile the ACL named by the config. Any failure here is fatal at startup.
pub fn load_acl(cfg: &GatewayConfig) -> Result<AclTable> {
    cfg.acl.validate()?;
    match (&cfg.acl.path, &cfg.acl.rules) {
        (Some(path), None) => {
            let raw = fs::read_to_string(path)
                .map_err(|e| GatewayError::Config(format!("read acl {path} failed: {e}")))?;
            AclTable::from_json(&raw)
        }
        (None, Some(rules)) => AclTable::from_rules(rules),
        _ => Err(GatewayError::Config("acl requires exactly one of path or rules".into())),
    }
}
