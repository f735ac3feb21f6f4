//! HTTP service wrapping the conversation engine.
//!
//! Inbound platform events arrive as JSON on `POST /events` and replies
//! leave through the configured [`Transport`](session::Transport).
//! Liveness, readiness, session counts, and Prometheus metrics round out
//! the surface.

pub mod config;
pub mod error;
pub mod routes;
pub mod transport;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use metrics_exporter_prometheus::PrometheusHandle;
use session::{Engine, EngineSettings, Transport};
use store::Store;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::events::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S, T>(state: Arc<AppState<S, T>>, metrics_handle: PrometheusHandle) -> Router
where
    S: Store + Clone + 'static,
    T: Transport + 'static,
{
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::render))
        .with_state(metrics_handle);

    Router::new()
        .route("/events", post(routes::events::ingest::<S, T>))
        .route("/health", get(routes::health::check))
        .route("/ready", get(routes::health::ready::<S, T>))
        .route("/sessions", get(routes::sessions::count::<S, T>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Builds the shared state: one engine over the given store and transport.
pub fn create_state<S, T>(store: S, transport: T, settings: EngineSettings) -> Arc<AppState<S, T>>
where
    S: Store + Clone + 'static,
    T: Transport + 'static,
{
    let engine = Engine::new(store.clone(), transport, settings);
    Arc::new(AppState { engine, store })
}
