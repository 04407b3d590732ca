use std::collections::HashMap;

use axum::http::HeaderMap;

/// Metadata key carrying the caller identity.
pub const CONSUMER_KEY: &str = "consumer";

/// Transport-neutral call metadata: lowercase key -> values in arrival order.
#[derive(Debug, Clone, Default)]
pub struct CallMetadata {
    entries: HashMap<String, Vec<String>>,
}

impl CallMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Non-UTF-8 header values are skipped.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut md = Self::new();
        for (name, value) in headers {
            if let Ok(v) = value.to_str() {
                md.append(name.as_str(), v);
            }
        }
        md
    }

    pub fn append(&mut self, key: &str, value: impl Into<String>) {
        self.entries
            .entry(key.to_ascii_lowercase())
            .or_default()
            .push(value.into());
    }

    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.append(key, value);
        self
    }

    /// First value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(&key.to_ascii_lowercase())
            .and_then(|vs| vs.first())
            .map(String::as_str)
    }

    pub fn get_all(&self, key: &str) -> &[String] {
        self.entries
            .get(&key.to_ascii_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
