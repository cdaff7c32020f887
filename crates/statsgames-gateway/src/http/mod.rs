//! HTTP server implementation using axum.

use crate::error::ServerError;
use crate::kind::ResourceKind;
use crate::server::AppState;
use axum::Router;
use axum::routing::get;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod handlers;

/// Create HTTP router with all endpoints.
///
/// The router is a plain `tower::Service`, so it can be driven by the
/// listener in [`start_server`] or by any per-request adapter.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::handle_root))
        .route("/diag/ip", get(handlers::handle_outbound_ip))
        .route(
            ResourceKind::ClashOfClans.route(),
            get(handlers::handle_clash_of_clans_player),
        )
        .route(
            ResourceKind::ClashRoyale.route(),
            get(handlers::handle_clash_royale_player),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start HTTP server.
///
/// # Errors
///
/// Returns `ServerError` if the server fails to bind or encounters a runtime error.
pub async fn start_server(bind_addr: SocketAddr, state: Arc<AppState>) -> Result<(), ServerError> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .map_err(|source| ServerError::HttpBindFailed {
            addr: bind_addr,
            source,
        })?;

    let local_addr = listener.local_addr().unwrap_or(bind_addr);
    tracing::info!("HTTP server listening on {}", local_addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Shutdown(format!("HTTP server error: {e}")))?;

    Ok(())
}
