//! Health check endpoint handler.

use axum::{Json, extract::State};
use devcamper_persistence::DocumentStore;
use serde_json::{Value, json};
use tracing::debug;

use crate::state::AppState;

/// Handler for the health check endpoint.
///
/// # HTTP Request
///
/// `GET /health`
///
/// # Response
///
/// `200 OK` with `{"status": "ok", "backend": "<storage backend>"}`
pub async fn health_handler<S>(State(state): State<AppState<S>>) -> Json<Value>
where
    S: DocumentStore + Send + Sync,
{
    debug!("Processing health check request");
    Json(json!({
        "status": "ok",
        "backend": state.storage().backend_name(),
    }))
}
