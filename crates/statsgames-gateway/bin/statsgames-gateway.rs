//! StatsGames gateway binary entry point.
//!
//! This is a thin wrapper around the statsgames-gateway library that:
//! 1. Loads a `.env` file if present
//! 2. Initializes logging
//! 3. Parses configuration
//! 4. Starts the server
//!
//! For library usage, see the statsgames-gateway crate documentation.

use anyhow::Result;
use statsgames_gateway::{GatewayConfig, Server};

#[tokio::main]
async fn main() -> Result<()> {
    // Environment from .env; a missing file is not an error
    let dotenv = dotenvy::dotenv();

    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match dotenv {
        Ok(path) => tracing::info!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => tracing::debug!("No .env file found"),
        Err(e) => tracing::warn!("Failed to load .env file: {e}"),
    }

    tracing::info!("StatsGames gateway starting...");

    // Parse configuration from CLI args and environment
    let config = GatewayConfig::from_args();

    tracing::info!("Configuration loaded: {:?}", config);

    // Create and run server
    let server = Server::new(config)?;
    server.run().await?;

    Ok(())
}
