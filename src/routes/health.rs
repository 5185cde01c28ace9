use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{Value, json};

use crate::server::AppState;

/// Liveness probe.
///
/// # Route
/// - **Method**: GET
/// - **Path**: `/ping`
/// - **Response**: `{"status": "pong"}`
pub async fn ping() -> Json<Value> {
    Json(json!({ "status": "pong" }))
}

/// Readiness probe that round-trips the credential store.
///
/// # Route
/// - **Method**: GET
/// - **Path**: `/health`
///
/// # HTTP Status Codes
/// - **200 OK**: database reachable
/// - **503 Service Unavailable**: database unreachable; the cause is logged,
///   not returned
pub async fn health(State(app_state): State<AppState>) -> (StatusCode, Json<Value>) {
    let now = chrono::Utc::now();

    match app_state.verifier.store().ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "database": "ok", "timestamp": now })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded", "database": "unavailable", "timestamp": now })),
            )
        }
    }
}
