//! HTTP request handlers for the player lookup and diagnostics endpoints.

use crate::error::{DiagnosticsError, GatewayError};
use crate::diag::OutboundIp;
use crate::gateway::PlayerPayload;
use crate::kind::ResourceKind;
use crate::server::AppState;
use axum::extract::{RawQuery, State};
use std::sync::Arc;

/// Liveness text served on `/`
pub const ROOT_MESSAGE: &str =
    "StatsGames API Backend is running. Supports Clash of Clans and Clash Royale APIs.";

/// Query string of the player endpoints.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PlayerQuery {
    /// Player tag, including the leading `#`
    pub tag: Option<String>,
}

impl PlayerQuery {
    /// Read the query string leniently.
    ///
    /// Parsing never fails, so every query shape reaches the gateway and gets
    /// a JSON reply. Unknown parameters are ignored and the first `tag` wins.
    pub fn from_raw(raw: Option<&str>) -> Self {
        let tag = raw.and_then(|query| {
            url::form_urlencoded::parse(query.as_bytes())
                .find(|(name, _)| name == "tag")
                .map(|(_, value)| value.into_owned())
        });
        Self { tag }
    }
}

/// Handle GET /player endpoint.
///
/// Returns the Clash of Clans player document for `tag`.
///
/// # Errors
///
/// Returns `GatewayError` if the tag is missing, no API key is configured or
/// the upstream call fails.
pub async fn handle_clash_of_clans_player(
    RawQuery(raw): RawQuery,
    State(state): State<Arc<AppState>>,
) -> Result<PlayerPayload, GatewayError> {
    let query = PlayerQuery::from_raw(raw.as_deref());
    tracing::debug!("Handling Clash of Clans player request: {:?}", query.tag);
    state
        .gateway()
        .handle(ResourceKind::ClashOfClans, query.tag.as_deref())
        .await
}

/// Handle GET /clashroyale/player endpoint.
///
/// # Errors
///
/// Same as [`handle_clash_of_clans_player`].
pub async fn handle_clash_royale_player(
    RawQuery(raw): RawQuery,
    State(state): State<Arc<AppState>>,
) -> Result<PlayerPayload, GatewayError> {
    let query = PlayerQuery::from_raw(raw.as_deref());
    tracing::debug!("Handling Clash Royale player request: {:?}", query.tag);
    state
        .gateway()
        .handle(ResourceKind::ClashRoyale, query.tag.as_deref())
        .await
}

/// Handle GET /diag/ip endpoint.
///
/// # Errors
///
/// Returns `DiagnosticsError` if the IP echo service cannot be reached.
pub async fn handle_outbound_ip(
    State(state): State<Arc<AppState>>,
) -> Result<OutboundIp, DiagnosticsError> {
    state.ip_lookup().outbound_ip().await
}

/// Handle GET / endpoint.
pub async fn handle_root() -> &'static str {
    ROOT_MESSAGE
}
