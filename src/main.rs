//! solace-relayd - relay daemon entry point.

use solace_relayd::config::Config;
use solace_relayd::directory::HttpUserDirectory;
use solace_relayd::network::Gateway;
use solace_relayd::state::Relay;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    if let Err(errors) = config.validate() {
        for e in &errors {
            error!(error = %e, "Invalid configuration");
        }
        anyhow::bail!("{} configuration error(s) in {}", errors.len(), config_path);
    }

    info!(
        server = %config.server.name,
        version = %config.server.version,
        directory = %config.directory.base_url,
        "Starting solace-relayd"
    );

    let directory = Arc::new(HttpUserDirectory::new(&config.directory));
    let relay = Relay::new(&config, directory);

    let gateway = Gateway::bind(&config.listen, Arc::clone(&relay)).await?;

    let signal_relay = Arc::clone(&relay);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Interrupt received, shutting down");
                signal_relay.shutdown();
            }
            Err(e) => warn!(error = %e, "Failed to listen for shutdown signal"),
        }
    });

    gateway.run().await?;

    info!("Relay stopped");
    Ok(())
}
