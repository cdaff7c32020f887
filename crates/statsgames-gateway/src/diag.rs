//! Outbound address diagnostics.
//!
//! Supercell API keys are bound to an allow-list of caller addresses. The
//! gateway reports its own egress address so operators can register it.

use crate::error::{DiagnosticsError, UpstreamError};
use crate::upstream::UpstreamConfig;
use axum::Json;
use axum::response::{IntoResponse, Response};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

/// Default IP echo service
pub const DEFAULT_IP_LOOKUP_URL: &str = "https://api.ipify.org?format=json";

/// Instruction returned alongside the address
pub const ALLOW_LIST_MESSAGE: &str = "Add this IP to the Supercell developer portal.";

/// `/diag/ip` response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundIp {
    /// Public egress address as seen by the echo service
    pub outbound_ip: String,
    /// Operator instruction
    pub message: String,
}

impl IntoResponse for OutboundIp {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct EchoResponse {
    ip: String,
}

/// Client for the IP echo service.
#[derive(Debug, Clone)]
pub struct IpLookup {
    client: Client,
    url: Url,
}

impl IpLookup {
    /// Create a lookup against `url`.
    pub fn new(url: Url, config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        Ok(Self {
            client: config.build_client()?,
            url,
        })
    }

    /// Echo service URL.
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Ask the echo service for the gateway's public address.
    pub async fn outbound_ip(&self) -> Result<OutboundIp, DiagnosticsError> {
        let response = self.client.get(self.url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DiagnosticsError::Status(status));
        }

        let echo: EchoResponse = response.json().await?;
        tracing::info!("Outbound IP reported as {}", echo.ip);

        Ok(OutboundIp {
            outbound_ip: echo.ip,
            message: ALLOW_LIST_MESSAGE.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn lookup_for(server: &MockServer) -> IpLookup {
        let url = Url::parse(&format!("{}/?format=json", server.uri())).unwrap();
        IpLookup::new(url, &UpstreamConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_outbound_ip_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .and(query_param("format", "json"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "ip": "203.0.113.7" })),
            )
            .mount(&server)
            .await;

        let ip = lookup_for(&server).await.outbound_ip().await.unwrap();
        assert_eq!(
            ip,
            OutboundIp {
                outbound_ip: "203.0.113.7".to_string(),
                message: "Add this IP to the Supercell developer portal.".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_outbound_ip_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = lookup_for(&server).await.outbound_ip().await.unwrap_err();
        assert!(matches!(err, DiagnosticsError::Status(s) if s.as_u16() == 503));
    }

    #[tokio::test]
    async fn test_outbound_ip_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = lookup_for(&server).await.outbound_ip().await.unwrap_err();
        assert!(matches!(err, DiagnosticsError::Request(_)));
    }

    #[test]
    fn test_diagnostics_error_response() {
        let response = DiagnosticsError::Status(reqwest::StatusCode::BAD_GATEWAY).into_response();
        assert_eq!(response.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
    }
}
