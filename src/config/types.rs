//! Core configuration types and loading.

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use super::defaults::*;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Relay configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server identity.
    pub server: ServerConfig,
    /// Network listen configuration.
    pub listen: ListenConfig,
    /// User directory service.
    #[serde(default)]
    pub directory: DirectoryConfig,
    /// Server-initiated keepalive.
    #[serde(default)]
    pub keepalive: KeepaliveConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Server identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server name, used as the origin of server-initiated PINGs.
    pub name: String,
    /// Version string reported in logs.
    #[serde(default = "default_version")]
    pub version: String,
}

/// Network listener configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ListenConfig {
    /// Address to bind to (e.g., "0.0.0.0:6667").
    pub address: SocketAddr,
    /// Longest accepted line in bytes, terminator included.
    #[serde(default = "default_max_line_length")]
    pub max_line_length: usize,
    /// Capacity of each connection's outbound queue.
    #[serde(default = "default_outbound_queue")]
    pub outbound_queue: usize,
}

/// User directory (`POST /api/store/create-user`) configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryConfig {
    #[serde(default = "default_directory_url")]
    pub base_url: String,
    #[serde(default = "default_directory_timeout")]
    pub timeout_secs: u64,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            base_url: default_directory_url(),
            timeout_secs: default_directory_timeout(),
        }
    }
}

impl DirectoryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Delay before the PING that follows every client PONG.
#[derive(Debug, Clone, Deserialize)]
pub struct KeepaliveConfig {
    #[serde(default = "default_ping_after_pong")]
    pub ping_after_pong_secs: u64,
    /// How long the deferred PING may wait for room in the outbound queue
    /// before it is dropped.
    #[serde(default = "default_ping_tolerance")]
    pub tolerance_secs: u64,
}

impl Default for KeepaliveConfig {
    fn default() -> Self {
        Self {
            ping_after_pong_secs: default_ping_after_pong(),
            tolerance_secs: default_ping_tolerance(),
        }
    }
}

impl KeepaliveConfig {
    pub fn ping_after_pong(&self) -> Duration {
        Duration::from_secs(self.ping_after_pong_secs)
    }

    pub fn tolerance(&self) -> Duration {
        Duration::from_secs(self.tolerance_secs)
    }
}
