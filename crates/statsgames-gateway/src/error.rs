//! Error types for the gateway.
//!
//! All errors use thiserror for consistent error handling across the codebase.
//! [`GatewayError`] is the only type that reaches callers; it always renders as
//! a JSON error body with the status code chosen by the error taxonomy.

use crate::gateway::GatewayReply;
use crate::kind::ResourceKind;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use serde_json::{Value, json};
use statsgames_cache::CacheError;
use thiserror::Error;

/// Message returned when the `tag` query parameter is absent or empty.
pub const MISSING_TAG_MESSAGE: &str = "Player tag is required.";

/// Message returned when no upstream credential is configured.
pub const MISSING_CREDENTIAL_MESSAGE: &str = "Internal server error: API key missing.";

/// Detail returned when the upstream produced no response at all.
pub const UNREACHABLE_DETAIL: &str = "Upstream service unreachable.";

/// Message returned when the outbound address cannot be determined.
pub const IP_LOOKUP_FAILED_MESSAGE: &str = "Could not fetch IP address.";

/// Failures of a single outbound upstream call.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Upstream answered with a non-success status
    #[error("Upstream responded with status {status}")]
    Rejected {
        /// Status code as sent by the upstream
        status: StatusCode,
        /// Response body, verbatim
        body: Bytes,
    },

    /// No response within the configured request timeout
    #[error("Upstream request timed out")]
    Timeout,

    /// Connection refused, DNS failure, reset, or body read failure
    #[error("Upstream unreachable: {0}")]
    Unreachable(String),

    /// Base URL cannot carry a resource path
    #[error("Invalid upstream URL: {0}")]
    InvalidUrl(String),

    /// HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_builder() {
            Self::ClientBuild(err.to_string())
        } else {
            Self::Unreachable(err.to_string())
        }
    }
}

/// Request-scoped gateway failures, each mapped to one HTTP response.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Tag missing or empty (400)
    #[error("Player tag is required.")]
    MissingTag,

    /// No credential configured (500, operator fix required)
    #[error("Internal server error: API key missing.")]
    MissingCredential,

    /// Upstream answered with a non-success status (status propagated)
    #[error("{kind} API rejected the request with status {status}")]
    UpstreamRejected {
        /// Service that rejected the request
        kind: ResourceKind,
        /// Upstream status code
        status: StatusCode,
        /// Upstream body, forwarded as `details`
        body: Bytes,
    },

    /// Upstream produced no response (500)
    #[error("{kind} API unreachable: {reason}")]
    UpstreamUnreachable {
        /// Service that could not be reached
        kind: ResourceKind,
        /// Transport-level reason, logged but not returned to callers
        reason: String,
    },
}

impl GatewayError {
    /// Translate an upstream failure for the given resource kind.
    pub fn from_upstream(kind: ResourceKind, err: UpstreamError) -> Self {
        match err {
            UpstreamError::Rejected { status, body } => Self::UpstreamRejected { kind, status, body },
            other => Self::UpstreamUnreachable {
                kind,
                reason: other.to_string(),
            },
        }
    }

    /// HTTP status for this error.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MissingTag => StatusCode::BAD_REQUEST,
            Self::MissingCredential | Self::UpstreamUnreachable { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::UpstreamRejected { status, .. } => *status,
        }
    }

    /// JSON body for this error.
    pub fn body(&self) -> Value {
        match self {
            Self::MissingTag => json!({ "error": MISSING_TAG_MESSAGE }),
            Self::MissingCredential => json!({ "error": MISSING_CREDENTIAL_MESSAGE }),
            Self::UpstreamRejected { kind, body, .. } => json!({
                "error": kind.failure_message(),
                "details": upstream_details(body),
            }),
            Self::UpstreamUnreachable { kind, .. } => json!({
                "error": kind.failure_message(),
                "details": UNREACHABLE_DETAIL,
            }),
        }
    }

    /// Transport-neutral `(status, body)` pair.
    pub fn into_reply(self) -> GatewayReply {
        GatewayReply::json(self.status(), Bytes::from(self.body().to_string()))
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        self.into_reply().into_response()
    }
}

/// Upstream error bodies are JSON documents in practice; anything else is
/// forwarded as text.
fn upstream_details(body: &Bytes) -> Value {
    serde_json::from_slice(body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
}

/// Failures of the `/diag/ip` lookup.
#[derive(Debug, Error)]
pub enum DiagnosticsError {
    /// Request to the IP echo service failed
    #[error("IP lookup request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// IP echo service answered with a non-success status
    #[error("IP lookup service responded with status {0}")]
    Status(StatusCode),
}

impl IntoResponse for DiagnosticsError {
    fn into_response(self) -> Response {
        tracing::error!("Could not determine outbound IP: {}", self);
        GatewayReply::json(
            StatusCode::INTERNAL_SERVER_ERROR,
            Bytes::from(json!({ "error": IP_LOOKUP_FAILED_MESSAGE }).to_string()),
        )
        .into_response()
    }
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A URL option could not be parsed
    #[error("Invalid URL for {field} '{value}': {reason}")]
    InvalidUrl {
        /// Option name
        field: &'static str,
        /// The rejected value
        value: String,
        /// Parser message
        reason: String,
    },

    /// A duration option was zero
    #[error("{0} must be greater than 0")]
    ZeroDuration(&'static str),
}

/// Server runtime errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to bind HTTP server
    #[error("Failed to bind HTTP server to {addr}: {source}")]
    HttpBindFailed {
        /// Address that failed to bind
        addr: std::net::SocketAddr,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Cache could not be created
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// Outbound HTTP client could not be created
    #[error("Upstream client error: {0}")]
    Upstream(#[from] UpstreamError),

    /// Server shutdown error
    #[error("Server shutdown error: {0}")]
    Shutdown(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_tag_reply() {
        let err = GatewayError::MissingTag;
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.body(), json!({ "error": "Player tag is required." }));
    }

    #[test]
    fn test_missing_credential_reply() {
        let err = GatewayError::MissingCredential;
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.body(),
            json!({ "error": "Internal server error: API key missing." })
        );
    }

    #[test]
    fn test_rejection_propagates_status_and_json_detail() {
        let err = GatewayError::from_upstream(
            ResourceKind::ClashOfClans,
            UpstreamError::Rejected {
                status: StatusCode::NOT_FOUND,
                body: Bytes::from_static(br#"{"reason":"notFound"}"#),
            },
        );

        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            err.body(),
            json!({
                "error": "Failed to fetch player data from Supercell.",
                "details": { "reason": "notFound" },
            })
        );
    }

    #[test]
    fn test_rejection_with_text_body() {
        let err = GatewayError::from_upstream(
            ResourceKind::ClashRoyale,
            UpstreamError::Rejected {
                status: StatusCode::FORBIDDEN,
                body: Bytes::from_static(b"Invalid authorization"),
            },
        );

        assert_eq!(err.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            err.body(),
            json!({
                "error": "Failed to fetch Clash Royale player data.",
                "details": "Invalid authorization",
            })
        );
    }

    #[test]
    fn test_unreachable_hides_transport_reason() {
        let err = GatewayError::from_upstream(
            ResourceKind::ClashOfClans,
            UpstreamError::Unreachable("connection refused (os error 111)".to_string()),
        );

        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = err.body().to_string();
        assert!(!body.contains("os error"));
        assert!(body.contains(UNREACHABLE_DETAIL));
    }

    #[test]
    fn test_timeout_is_unreachable() {
        let err = GatewayError::from_upstream(ResourceKind::ClashRoyale, UpstreamError::Timeout);
        assert!(matches!(err, GatewayError::UpstreamUnreachable { .. }));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_server_error_conversion() {
        let config_err = ConfigError::ZeroDuration("cache_ttl_secs");
        let server_err: ServerError = config_err.into();
        assert!(server_err.to_string().contains("cache_ttl_secs must be greater than 0"));
    }
}
