//! Session registry visibility.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::Serialize;
use session::Transport;
use store::Store;

use crate::routes::events::AppState;

#[derive(Serialize)]
pub struct SessionsResponse {
    pub active_sessions: usize,
}

/// GET /sessions — number of chats currently holding a session slot.
pub async fn count<S, T>(State(state): State<Arc<AppState<S, T>>>) -> Json<SessionsResponse>
where
    S: Store + Clone + 'static,
    T: Transport + 'static,
{
    Json(SessionsResponse {
        active_sessions: state.engine.registry().len().await,
    })
}
