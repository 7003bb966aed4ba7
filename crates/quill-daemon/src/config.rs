// crates/quill-daemon/src/config.rs
//
// Runtime configuration for the Quill daemon.
// Loaded from a TOML file or populated with sensible defaults.

use serde::Deserialize;
use std::fs;

/// Runtime configuration for the daemon.
#[derive(Debug, Clone, Deserialize)]
pub struct DaemonConfig {
    /// Host address for the RPC server.
    #[serde(default = "default_rpc_host")]
    pub rpc_host: String,

    /// Port for the RPC server.
    #[serde(default = "default_rpc_port")]
    pub rpc_port: u16,

    /// Log level used when RUST_LOG is unset: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log every domain event (post created/updated/deleted, user registered).
    #[serde(default = "default_log_events")]
    pub log_events: bool,
}

fn default_rpc_host() -> String {
    "127.0.0.1".to_string()
}

fn default_rpc_port() -> u16 {
    50051
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_events() -> bool {
    true
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            rpc_host: default_rpc_host(),
            rpc_port: default_rpc_port(),
            log_level: default_log_level(),
            log_events: default_log_events(),
        }
    }
}

impl DaemonConfig {
    /// Load configuration from a TOML file at the given path.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from TOML text. Missing keys take their defaults.
    pub fn from_toml(contents: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: DaemonConfig = toml::from_str(contents)?;
        Ok(config)
    }
}
