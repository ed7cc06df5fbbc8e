//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("server.name is required")]
    MissingServerName,
    #[error("listen.max_line_length must be greater than zero")]
    ZeroLineLength,
    #[error("listen.outbound_queue must be greater than zero")]
    ZeroOutboundQueue,
    #[error("directory.base_url is not a valid URL: {0}")]
    InvalidDirectoryUrl(String),
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.name.trim().is_empty() {
        errors.push(ValidationError::MissingServerName);
    }
    if config.listen.max_line_length == 0 {
        errors.push(ValidationError::ZeroLineLength);
    }
    if config.listen.outbound_queue == 0 {
        errors.push(ValidationError::ZeroOutboundQueue);
    }
    if reqwest::Url::parse(&config.directory.base_url).is_err() {
        errors.push(ValidationError::InvalidDirectoryUrl(
            config.directory.base_url.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

impl Config {
    /// See [`validate`].
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        validate(self)
    }
}
