// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tokio_util::sync::CancellationToken;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use huddle_config::model::GatewayConfig;
use huddle_core::{AuthVerifier, HistoryStore, HuddleError};
use huddle_dispatch::Dispatcher;
use huddle_rooms::ScopeResolver;
use huddle_summary::SummaryStore;

use crate::auth::auth_middleware;
use crate::handlers;
use crate::registry::ConnectionRegistry;
use crate::suggest::{self, TagSuggesters};
use crate::ws;

/// Shared state for axum request handlers and socket tasks.
#[derive(Clone)]
pub struct GatewayState {
    /// Live connection table; also the dispatcher's frame sink.
    pub registry: Arc<ConnectionRegistry>,
    /// Per-room serialized dispatch entry point.
    pub dispatcher: Arc<Dispatcher>,
    /// Membership admission for room-open and acknowledge requests.
    pub resolver: Arc<ScopeResolver>,
    /// Room summaries and presence flags.
    pub summaries: Arc<SummaryStore>,
    /// External history store for room-open backfill.
    pub history: Arc<dyn HistoryStore>,
    /// External session verification.
    pub auth: Arc<dyn AuthVerifier>,
    /// Per-user debounced tag autocompleters.
    pub suggesters: Arc<TagSuggesters>,
    /// Outbound frame buffer per connection.
    pub outbound_buffer: usize,
    /// Process start time for uptime reporting.
    pub start_time: std::time::Instant,
}

/// Builds the gateway router:
/// - `GET /health` (unauthenticated liveness)
/// - `GET /rooms/summary` and `POST /rooms/{roomId}/acknowledge` (bearer auth)
/// - `GET /ws` (auth during the websocket handshake, not via middleware)
pub fn build_router(state: GatewayState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .with_state(state.clone());

    let api_routes = Router::new()
        .route("/rooms/summary", get(handlers::get_summaries))
        .route("/rooms/{room_id}/acknowledge", post(handlers::post_acknowledge))
        .route("/archive/tags/suggest", get(suggest::get_suggestions))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state.clone());

    let ws_routes = Router::new()
        .route("/ws", get(ws::ws_handler))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .merge(ws_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Starts the gateway server and serves until `shutdown` is cancelled.
pub async fn start_server(
    config: &GatewayConfig,
    state: GatewayState,
    shutdown: CancellationToken,
) -> Result<(), HuddleError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| HuddleError::Transport(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| HuddleError::Transport(format!("gateway server error: {e}")))?;

    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use huddle_test_utils::{MockArchiveStore, MockDirectory, MockHistory, MockTagIndex, StaticAuth};

    pub(crate) fn test_state() -> GatewayState {
        let registry = Arc::new(ConnectionRegistry::new());
        let summaries = Arc::new(SummaryStore::new());
        let resolver = Arc::new(ScopeResolver::new(Arc::new(MockDirectory::new())));
        let dispatcher = Arc::new(Dispatcher::new(
            resolver.clone(),
            Arc::new(MockArchiveStore::new()),
            summaries.clone(),
            registry.clone(),
        ));
        GatewayState {
            registry,
            dispatcher,
            resolver,
            summaries,
            history: Arc::new(MockHistory::new()),
            auth: Arc::new(StaticAuth::new().with_token("tok-1", "alice")),
            suggesters: Arc::new(TagSuggesters::new(
                Arc::new(MockTagIndex::new()),
                std::time::Duration::from_millis(5),
                10,
            )),
            outbound_buffer: 8,
            start_time: std::time::Instant::now(),
        }
    }

    #[test]
    fn gateway_state_is_clone() {
        let state = test_state();
        let _cloned = state.clone();
    }

    #[tokio::test]
    async fn health_route_is_public() {
        use axum::body::Body;
        use axum::http::{Request, StatusCode};
        use http_body_util::BodyExt;
        use tower::ServiceExt;

        let app = build_router(test_state());
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed["status"], "ok");
    }

    #[tokio::test]
    async fn summary_route_requires_auth() {
        use axum::body::Body;
        use axum::http::{Request, StatusCode};
        use tower::ServiceExt;

        let app = build_router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/rooms/summary")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
