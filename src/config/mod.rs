//! Configuration loading and management.
//!
//! - [`types`]: config struct definitions and [`Config::load`]
//! - [`defaults`]: serde default values
//! - [`validation`]: startup checks

mod defaults;
mod types;
mod validation;

pub use types::{Config, ConfigError, DirectoryConfig, KeepaliveConfig, ListenConfig, ServerConfig};
pub use validation::{ValidationError, validate};
