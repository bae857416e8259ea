//! Server configuration: a TOML file with CLI overrides.

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;

/// Runtime configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Address the HTTP server binds to.
    pub bind: SocketAddr,
    /// Log filter when RUST_LOG is unset.
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".parse().expect("valid default bind"),
            log_filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load from a TOML file, falling back to defaults for absent keys.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config = toml::from_str(&raw)?;
        Ok(config)
    }
}
