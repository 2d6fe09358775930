//! Bastion server binary
//!
//! Loads configuration, initializes logging, and serves the API.

use anyhow::Context;
use bastion_api::AppState;
use bastion_core::AppConfig;

/// Load config from the file named by BASTION_CONFIG, or fall back to defaults
fn load_config() -> anyhow::Result<AppConfig> {
    match std::env::var("BASTION_CONFIG") {
        Ok(path) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config file {}", path))?;
            serde_json::from_str(&raw).with_context(|| format!("parsing config file {}", path))
        }
        Err(_) => {
            tracing::info!("BASTION_CONFIG not set, using default configuration");
            Ok(AppConfig::default())
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bastion=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .init();

    tracing::info!("Starting Bastion");

    let config = load_config()?;
    let port = config.api_port;
    tracing::info!(
        chain = %config.chain,
        port,
        "Configuration loaded"
    );

    let state = AppState::with_config(config);
    bastion_api::start_server(state, port)
        .await
        .context("API server failed")?;

    Ok(())
}
