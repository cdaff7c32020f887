//! Player lookup gateway.
//!
//! [`Gateway::handle`] runs the same fixed sequence for every resource kind:
//!
//! 1. validate the tag
//! 2. check that a credential is configured
//! 3. look up the cache
//! 4. on a miss, fetch from the upstream and cache the payload on success
//!
//! Upstream payloads are opaque bytes; they are stored and returned without
//! being parsed.

use crate::credential::CredentialProvider;
use crate::error::GatewayError;
use crate::kind::{CacheKey, PlayerTag, ResourceKind, UpstreamEndpoints};
use crate::upstream::UpstreamClient;
use axum::http::{HeaderName, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use statsgames_cache::TtlCache;
use std::sync::Arc;

/// Cache of raw upstream payloads
pub type PlayerCache = TtlCache<CacheKey, Bytes>;

/// Response header reporting whether the payload came from the cache
pub static X_CACHE: HeaderName = HeaderName::from_static("x-cache");

/// Whether a payload was served from the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// Served from the cache
    Hit,
    /// Fetched from the upstream
    Miss,
}

impl CacheStatus {
    /// Header value for this status.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hit => "HIT",
            Self::Miss => "MISS",
        }
    }
}

/// Successful player lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerPayload {
    /// Upstream JSON document, byte for byte
    pub body: Bytes,
    /// Where the payload came from
    pub cache_status: CacheStatus,
}

impl PlayerPayload {
    /// Transport-neutral 200 reply.
    pub fn into_reply(self) -> GatewayReply {
        GatewayReply {
            cache_status: Some(self.cache_status),
            ..GatewayReply::json(StatusCode::OK, self.body)
        }
    }
}

impl IntoResponse for PlayerPayload {
    fn into_response(self) -> Response {
        self.into_reply().into_response()
    }
}

/// `(status, body)` pair produced by the gateway for any request.
///
/// Any entry adapter can transmit this; the axum conversion is one of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayReply {
    /// HTTP status code
    pub status: StatusCode,
    /// Content type of `body`
    pub content_type: &'static str,
    /// Response body
    pub body: Bytes,
    /// Cache status, set on successful lookups only
    pub cache_status: Option<CacheStatus>,
}

impl GatewayReply {
    /// JSON reply without cache information.
    pub const fn json(status: StatusCode, body: Bytes) -> Self {
        Self {
            status,
            content_type: "application/json",
            body,
            cache_status: None,
        }
    }
}

impl IntoResponse for GatewayReply {
    fn into_response(self) -> Response {
        let mut response = (
            self.status,
            [(header::CONTENT_TYPE, HeaderValue::from_static(self.content_type))],
            self.body,
        )
            .into_response();

        if let Some(cache_status) = self.cache_status {
            response.headers_mut().insert(
                X_CACHE.clone(),
                HeaderValue::from_static(cache_status.as_str()),
            );
        }

        response
    }
}

/// Caching, credential-injecting front for the upstream APIs.
pub struct Gateway {
    cache: Arc<PlayerCache>,
    upstream: Arc<dyn UpstreamClient>,
    credentials: Arc<dyn CredentialProvider>,
    endpoints: UpstreamEndpoints,
}

impl Gateway {
    /// Assemble a gateway from its collaborators.
    pub fn new(
        cache: Arc<PlayerCache>,
        upstream: Arc<dyn UpstreamClient>,
        credentials: Arc<dyn CredentialProvider>,
        endpoints: UpstreamEndpoints,
    ) -> Self {
        Self {
            cache,
            upstream,
            credentials,
            endpoints,
        }
    }

    /// Shared payload cache.
    pub const fn cache(&self) -> &Arc<PlayerCache> {
        &self.cache
    }

    /// Upstream base URLs.
    pub const fn endpoints(&self) -> &UpstreamEndpoints {
        &self.endpoints
    }

    /// Look up a player of `kind` by the raw `tag` query value.
    pub async fn handle(
        &self,
        kind: ResourceKind,
        tag: Option<&str>,
    ) -> Result<PlayerPayload, GatewayError> {
        let tag = PlayerTag::parse(tag)?;

        let Some(credential) = self.credentials.credential() else {
            tracing::error!(
                "Upstream API key is not configured; rejecting {} lookup",
                kind
            );
            return Err(GatewayError::MissingCredential);
        };

        let key = CacheKey::new(kind, &tag);
        if let Some(body) = self.cache.get(&key) {
            tracing::info!("Cache hit for {} player: {}", kind, tag);
            return Ok(PlayerPayload {
                body,
                cache_status: CacheStatus::Hit,
            });
        }

        let base_url = self.endpoints.base_url(kind);
        let body = self
            .upstream
            .fetch(base_url, &kind.resource_segments(&tag), &credential)
            .await
            .map_err(|err| {
                let err = GatewayError::from_upstream(kind, err);
                match &err {
                    GatewayError::UpstreamRejected { status, .. } => {
                        tracing::warn!(
                            "{} API rejected lookup for {} with status {}",
                            kind,
                            tag,
                            status
                        );
                    }
                    other => tracing::error!("{} lookup for {} failed: {}", kind, tag, other),
                }
                err
            })?;

        self.cache.set(key, body.clone());
        tracing::info!("Cache miss - stored {} player data for: {}", kind, tag);

        Ok(PlayerPayload {
            body,
            cache_status: CacheStatus::Miss,
        })
    }

    /// Run [`Gateway::handle`] and fold both outcomes into one reply.
    pub async fn respond(&self, kind: ResourceKind, tag: Option<&str>) -> GatewayReply {
        match self.handle(kind, tag).await {
            Ok(payload) => payload.into_reply(),
            Err(err) => err.into_reply(),
        }
    }
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("cache", &self.cache)
            .field("credentials", &self.credentials)
            .field("endpoints", &self.endpoints)
            .finish_non_exhaustive()
    }
}
