//! HTTP error mapping for the service surface.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Errors a route handler can answer with.
///
/// Conversation-level failures never reach this type: the engine turns
/// them into chat notices and the ingestion request still succeeds. What
/// remains is malformed input and an unreachable store.
#[derive(Debug)]
pub enum ApiError {
    /// The request payload did not parse as an inbound event.
    BadRequest(String),
    /// The store cannot be reached; the service should not take traffic.
    Unavailable(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unavailable(msg) => {
                tracing::error!(error = %msg, "store probe failed");
                (StatusCode::SERVICE_UNAVAILABLE, msg)
            }
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}
