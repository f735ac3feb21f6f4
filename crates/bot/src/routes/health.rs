//! Liveness and readiness endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::Serialize;
use session::Transport;
use store::Store;

use crate::error::ApiError;
use crate::routes::events::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// GET /health — process liveness.
pub async fn check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// GET /ready — readiness, probing the store with a cheap query.
pub async fn ready<S, T>(
    State(state): State<Arc<AppState<S, T>>>,
) -> Result<Json<HealthResponse>, ApiError>
where
    S: Store + Clone + 'static,
    T: Transport + 'static,
{
    state
        .store
        .list_categories()
        .await
        .map_err(|e| ApiError::Unavailable(e.to_string()))?;

    Ok(Json(HealthResponse { status: "ready" }))
}
