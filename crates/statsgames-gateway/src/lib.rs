//! Caching gateway for the Supercell player APIs.
//!
//! This crate sits between game-statistics clients and the Clash of Clans and
//! Clash Royale developer APIs. It holds the API key on the server side,
//! forwards player lookups with that key as bearer token, and caches each
//! successful payload for a fixed time so repeated lookups never reach the
//! upstream.
//!
//! # Architecture
//!
//! - `kind`: resource kinds, player tags and namespaced cache keys
//! - `credential`: the server-held upstream credential
//! - `upstream`: authenticated outbound calls
//! - `gateway`: the validate, credential, cache, fetch sequence
//! - `diag`: outbound IP reporting for the upstream allow-list
//! - `http`: axum router and handlers
//! - `config` / `server`: configuration and process orchestration
//!
//! # Example
//!
//! ```no_run
//! use statsgames_gateway::{GatewayConfig, Server};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Initialize logging
//!     tracing_subscriber::fmt::init();
//!
//!     // Load configuration from CLI args and environment
//!     let config = GatewayConfig::from_args();
//!
//!     // Create and run server
//!     let server = Server::new(config)?;
//!     server.run().await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Driving the core directly
//!
//! [`Gateway::respond`] returns a transport-neutral [`GatewayReply`], so a
//! serverless adapter can call it without the listener in [`Server::run`].

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

// Module declarations
pub mod config;
pub mod credential;
pub mod diag;
pub mod error;
pub mod gateway;
pub mod http;
pub mod kind;
pub mod server;
pub mod upstream;

// Re-exports for public API
pub use config::GatewayConfig;
pub use credential::{Credential, CredentialProvider, StaticCredential};
pub use diag::{IpLookup, OutboundIp};
pub use error::{ConfigError, DiagnosticsError, GatewayError, ServerError, UpstreamError};
pub use gateway::{CacheStatus, Gateway, GatewayReply, PlayerCache, PlayerPayload};
pub use kind::{CacheKey, PlayerTag, ResourceKind, UpstreamEndpoints};
pub use server::{AppState, Server};
pub use upstream::{HttpUpstream, UpstreamClient, UpstreamConfig, ensure_crypto_provider};
