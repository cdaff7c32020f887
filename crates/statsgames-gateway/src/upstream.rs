//! Outbound calls to the upstream game-data APIs.
//!
//! The gateway talks to upstreams through the [`UpstreamClient`] trait so the
//! handler logic can be exercised against scripted fakes. [`HttpUpstream`] is
//! the production implementation on top of a pooled `reqwest` client.

use crate::credential::Credential;
use crate::error::UpstreamError;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, ClientBuilder, header};
use std::sync::OnceLock;
use std::time::Duration;
use url::Url;

/// Default user agent for upstream requests
pub const DEFAULT_USER_AGENT: &str = concat!("statsgames-gateway/", env!("CARGO_PKG_VERSION"));

static CRYPTO_PROVIDER: OnceLock<()> = OnceLock::new();

/// Install the ring crypto provider for rustls.
///
/// Safe to call repeatedly; only the first call installs.
pub fn ensure_crypto_provider() {
    CRYPTO_PROVIDER.get_or_init(|| {
        // Err means another provider is already installed, which is fine
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}

/// Authenticated fetch of one upstream resource.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    /// Fetch `segments` below `base_url` with `credential` as bearer token.
    ///
    /// Segments are unencoded; implementations percent-encode each one.
    /// A 2xx response yields the raw body. Any other status yields
    /// [`UpstreamError::Rejected`] carrying the status and the body verbatim,
    /// or an empty body if it could not be read.
    async fn fetch(
        &self,
        base_url: &Url,
        segments: &[&str],
        credential: &Credential,
    ) -> Result<Bytes, UpstreamError>;
}

/// Append percent-encoded path segments to a base URL.
///
/// Each segment is encoded on its own, so reserved characters such as `#`
/// or `/` inside a segment stay part of it.
pub fn resource_url(base_url: &Url, segments: &[&str]) -> Result<Url, UpstreamError> {
    let mut url = base_url.clone();
    url.path_segments_mut()
        .map_err(|()| UpstreamError::InvalidUrl(base_url.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// HTTP client tuning for upstream calls
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Whole-request timeout; elapsing counts as unreachable
    pub request_timeout: Duration,

    /// TCP/TLS connect timeout
    pub connect_timeout: Duration,

    /// Connection pool idle timeout
    pub pool_idle_timeout: Duration,

    /// Maximum idle connections per host
    pub pool_max_idle_per_host: usize,

    /// User agent header value
    pub user_agent: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            pool_idle_timeout: Duration::from_secs(90),
            pool_max_idle_per_host: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl UpstreamConfig {
    /// Build a pooled `reqwest` client from this configuration.
    pub fn build_client(&self) -> Result<Client, UpstreamError> {
        ensure_crypto_provider();

        ClientBuilder::new()
            .timeout(self.request_timeout)
            .connect_timeout(self.connect_timeout)
            .pool_idle_timeout(self.pool_idle_timeout)
            .pool_max_idle_per_host(self.pool_max_idle_per_host)
            .tcp_nodelay(true)
            .user_agent(self.user_agent.as_str())
            .build()
            .map_err(|e| UpstreamError::ClientBuild(e.to_string()))
    }
}

/// Production upstream client.
#[derive(Debug, Clone)]
pub struct HttpUpstream {
    client: Client,
}

impl HttpUpstream {
    /// Create a client with the given tuning.
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        Ok(Self {
            client: config.build_client()?,
        })
    }

    /// Reuse an existing `reqwest` client.
    pub const fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UpstreamClient for HttpUpstream {
    async fn fetch(
        &self,
        base_url: &Url,
        segments: &[&str],
        credential: &Credential,
    ) -> Result<Bytes, UpstreamError> {
        let url = resource_url(base_url, segments)?;
        tracing::debug!("Fetching upstream resource: {}", url);

        let response = self
            .client
            .get(url)
            .bearer_auth(credential.expose())
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.bytes().await?);
        }

        // The status alone is enough to report a rejection
        let body = response.bytes().await.unwrap_or_else(|e| {
            tracing::warn!("Failed to read upstream error body for status {}: {}", status, e);
            Bytes::new()
        });
        Err(UpstreamError::Rejected { status, body })
    }
}
