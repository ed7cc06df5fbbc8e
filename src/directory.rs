//! User directory client.
//!
//! The directory stores published key material so other clients can fetch
//! it over HTTP. The relay only ever creates users, on behalf of a client
//! that sent a `publishUserConfiguration` packet.

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::DirectoryConfig;
use crate::protocol::User;

const CREATE_USER_PATH: &str = "/api/store/create-user";

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("directory rejected request with status {0}")]
    Rejected(u16),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Where published user configurations go.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn create_user(&self, user: &User) -> Result<(), DirectoryError>;
}

/// [`UserDirectory`] backed by the HTTP store service. No retries.
pub struct HttpUserDirectory {
    endpoint: String,
    http_client: reqwest::Client,
}

impl HttpUserDirectory {
    pub fn new(config: &DirectoryConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("solace-relayd/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        let endpoint = format!(
            "{}{}",
            config.base_url.trim_end_matches('/'),
            CREATE_USER_PATH
        );
        info!(endpoint = %endpoint, timeout_secs = config.timeout_secs, "User directory configured");

        Self {
            endpoint,
            http_client,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl UserDirectory for HttpUserDirectory {
    async fn create_user(&self, user: &User) -> Result<(), DirectoryError> {
        let response = self
            .http_client
            .post(&self.endpoint)
            .json(user)
            .send()
            .await?;

        let status = response.status();
        debug!(username = %user.username, status = status.as_u16(), "create-user response");
        if status == reqwest::StatusCode::OK {
            Ok(())
        } else {
            Err(DirectoryError::Rejected(status.as_u16()))
        }
    }
}
