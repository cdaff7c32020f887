//! Server state management and orchestration.
//!
//! Owns the shared player cache, its background sweeper and the HTTP
//! listener.

use crate::config::GatewayConfig;
use crate::credential::StaticCredential;
use crate::diag::IpLookup;
use crate::error::ServerError;
use crate::gateway::{Gateway, PlayerCache};
use crate::upstream::HttpUpstream;
use std::sync::Arc;
use std::time::Instant;

/// Shared application state for HTTP handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Player lookup gateway
    gateway: Arc<Gateway>,

    /// Outbound address lookup
    ip_lookup: Arc<IpLookup>,

    /// Server start time
    started_at: Instant,
}

impl AppState {
    /// Assemble state from already-built parts.
    pub fn new(gateway: Arc<Gateway>, ip_lookup: Arc<IpLookup>) -> Self {
        Self {
            gateway,
            ip_lookup,
            started_at: Instant::now(),
        }
    }

    /// Create application state from configuration.
    ///
    /// # Errors
    ///
    /// Returns `ServerError` if configuration is invalid or an HTTP client
    /// cannot be built.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, ServerError> {
        let upstream_config = config.upstream_config();

        let cache = Arc::new(PlayerCache::new(config.cache_config())?);
        let upstream = Arc::new(HttpUpstream::new(&upstream_config)?);
        let credentials = Arc::new(StaticCredential::new(config.api_key.clone()));
        let gateway = Gateway::new(cache, upstream, credentials, config.endpoints()?);

        let ip_lookup = IpLookup::new(config.ip_lookup_url()?, &upstream_config)?;

        Ok(Self::new(Arc::new(gateway), Arc::new(ip_lookup)))
    }

    /// Get reference to the player lookup gateway.
    pub const fn gateway(&self) -> &Arc<Gateway> {
        &self.gateway
    }

    /// Get reference to the outbound address lookup.
    pub const fn ip_lookup(&self) -> &Arc<IpLookup> {
        &self.ip_lookup
    }

    /// Get server uptime in seconds.
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

/// Server orchestration.
pub struct Server {
    /// Shared application state
    state: Arc<AppState>,
    /// Server configuration
    config: GatewayConfig,
}

impl Server {
    /// Create new server with configuration.
    ///
    /// # Errors
    ///
    /// Returns `ServerError` if the configuration is invalid or state cannot
    /// be created.
    pub fn new(config: GatewayConfig) -> Result<Self, ServerError> {
        config.validate()?;
        let state = AppState::from_config(&config)?;

        if config.has_api_key() {
            tracing::info!("Upstream API key configured");
        } else {
            tracing::warn!(
                "SUPERCELL_API_KEY is not set; player lookups will fail until it is configured"
            );
        }

        Ok(Self {
            state: Arc::new(state),
            config,
        })
    }

    /// Get shared application state.
    pub const fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// Run the server until interrupted.
    ///
    /// Starts the cache sweeper and the HTTP listener. Both stop when a
    /// shutdown signal arrives or the listener fails.
    ///
    /// # Errors
    ///
    /// Returns `ServerError` if the listener fails or the shutdown signal
    /// cannot be installed.
    pub async fn run(self) -> Result<(), ServerError> {
        tracing::info!("Starting StatsGames gateway");
        tracing::info!("HTTP server binding to: {}", self.config.bind);

        let cache_config = self.state.gateway().cache().config();
        tracing::info!(
            "Cache TTL {}s, sweep every {}s",
            cache_config.ttl.as_secs(),
            cache_config.sweep_interval.as_secs()
        );

        let _sweeper = self.state.gateway().cache().spawn_sweeper();

        let bind = self.config.bind;
        let http_state = self.state.clone();
        let mut http_server =
            tokio::spawn(async move { crate::http::start_server(bind, http_state).await });

        tokio::select! {
            result = &mut http_server => {
                return match result {
                    Ok(inner) => inner,
                    Err(e) => Err(ServerError::Shutdown(format!("HTTP server task failed: {e}"))),
                };
            }
            signal = tokio::signal::ctrl_c() => {
                signal.map_err(|e| {
                    ServerError::Shutdown(format!("Failed to listen for shutdown signal: {e}"))
                })?;
            }
        }

        tracing::info!(
            "Shutdown signal received after {}s, stopping server",
            self.state.uptime_seconds()
        );
        http_server.abort();

        Ok(())
    }
}
