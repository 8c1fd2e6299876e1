use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};
use crate::state::AppState;

pub async fn healthz() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Liveness plus a storage round trip.
pub async fn readyz(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let service = json!({
        "name": state.config.service.name,
        "version": state.config.service.version,
    });

    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "service": service, "storage": "ok" })),
        ),
        Err(e) => {
            tracing::error!("Storage ping failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded", "service": service, "storage": "unavailable" })),
            )
        }
    }
}
