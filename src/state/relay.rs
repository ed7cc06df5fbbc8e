//! Shared relay state.
//!
//! One [`Relay`] is built by the composition root and handed to every
//! connection as an `Arc`. It is the only state shared between sessions.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::broadcast;

use super::{ChannelCache, SessionManager};
use crate::config::{Config, KeepaliveConfig};
use crate::directory::UserDirectory;

#[derive(Debug, Clone)]
pub struct ServerInfo {
    /// Origin of server-initiated messages.
    pub name: String,
    pub version: String,
    pub created: DateTime<Utc>,
}

pub struct Relay {
    pub server: ServerInfo,
    pub sessions: SessionManager,
    pub channels: ChannelCache,
    pub directory: Arc<dyn UserDirectory>,
    pub keepalive: KeepaliveConfig,
    /// Fired once to stop the gateway and every connection.
    pub shutdown_tx: broadcast::Sender<()>,
}

impl Relay {
    pub fn new(config: &Config, directory: Arc<dyn UserDirectory>) -> Arc<Self> {
        let (shutdown_tx, _) = broadcast::channel(16);
        Arc::new(Self {
            server: ServerInfo {
                name: config.server.name.clone(),
                version: config.server.version.clone(),
                created: Utc::now(),
            },
            sessions: SessionManager::new(),
            channels: ChannelCache::new(),
            directory,
            keepalive: config.keepalive.clone(),
            shutdown_tx,
        })
    }

    pub fn origin(&self) -> &str {
        &self.server.name
    }

    /// Signal shutdown to every subscriber. Safe to call more than once.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }
}
