//! Test server management.
//!
//! Runs a relay in-process on an ephemeral port, backed by an in-memory
//! user directory.

use async_trait::async_trait;
use parking_lot::Mutex;
use solace_relayd::config::Config;
use solace_relayd::directory::{DirectoryError, UserDirectory};
use solace_relayd::network::Gateway;
use solace_relayd::protocol::User;
use solace_relayd::state::Relay;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::task::JoinHandle;

/// User directory that keeps created users in memory.
#[derive(Default)]
pub struct MemoryDirectory {
    users: Mutex<Vec<User>>,
    reject: AtomicBool,
}

#[allow(dead_code)]
impl MemoryDirectory {
    pub fn users(&self) -> Vec<User> {
        self.users.lock().clone()
    }

    /// Make every following `create_user` fail.
    pub fn reject_all(&self) {
        self.reject.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl UserDirectory for MemoryDirectory {
    async fn create_user(&self, user: &User) -> Result<(), DirectoryError> {
        if self.reject.load(Ordering::SeqCst) {
            return Err(DirectoryError::Rejected(500));
        }
        self.users.lock().push(user.clone());
        Ok(())
    }
}

/// A test server instance.
pub struct TestServer {
    addr: SocketAddr,
    relay: Arc<Relay>,
    directory: Arc<MemoryDirectory>,
    task: JoinHandle<anyhow::Result<()>>,
}

#[allow(dead_code)]
impl TestServer {
    /// Spawn a relay with default test settings.
    pub async fn spawn() -> anyhow::Result<Self> {
        Self::spawn_with(1).await
    }

    /// Spawn a relay that answers PONG after `ping_after_pong_secs`.
    pub async fn spawn_with(ping_after_pong_secs: u64) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(&format!(
            r#"
[server]
name = "relay.test"

[listen]
address = "127.0.0.1:0"

[keepalive]
ping_after_pong_secs = {ping_after_pong_secs}
"#
        ))?;

        let directory = Arc::new(MemoryDirectory::default());
        let relay = Relay::new(&config, directory.clone());
        let gateway = Gateway::bind(&config.listen, Arc::clone(&relay)).await?;
        let addr = gateway.local_addr()?;
        let task = tokio::spawn(gateway.run());

        Ok(Self {
            addr,
            relay,
            directory,
            task,
        })
    }

    pub fn address(&self) -> String {
        self.addr.to_string()
    }

    pub fn relay(&self) -> &Arc<Relay> {
        &self.relay
    }

    pub fn directory(&self) -> &Arc<MemoryDirectory> {
        &self.directory
    }

    /// Signal shutdown and wait for the gateway to stop.
    pub async fn shutdown(&mut self) -> anyhow::Result<()> {
        self.relay.shutdown();
        (&mut self.task).await?
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.relay.shutdown();
    }
}
