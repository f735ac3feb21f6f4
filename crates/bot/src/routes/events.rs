//! Inbound event ingestion.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use common::InboundEvent;
use serde::Serialize;
use session::{Engine, Transport};
use store::Store;

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<S: Store, T: Transport> {
    pub engine: Engine<S, T>,
    pub store: S,
}

#[derive(Serialize)]
pub struct IngestResponse {
    pub status: &'static str,
}

/// POST /events — hand one inbound event to the engine.
///
/// Domain and store failures never surface here: the engine answers the
/// user with a failure notice and the request still succeeds. Only a
/// payload that does not parse as an inbound event is rejected.
#[tracing::instrument(skip(state, payload))]
pub async fn ingest<S, T>(
    State(state): State<Arc<AppState<S, T>>>,
    payload: Result<Json<InboundEvent>, JsonRejection>,
) -> Result<Json<IngestResponse>, ApiError>
where
    S: Store + Clone + 'static,
    T: Transport + 'static,
{
    let Json(event) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    state.engine.handle(event).await;
    Ok(Json(IngestResponse { status: "handled" }))
}
