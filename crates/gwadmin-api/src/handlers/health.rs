//! Health check handler.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{ApiResponse, HealthResponse};
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let database = match &state.database {
        Some(db) => status(db.health_check().await.unwrap_or(false)),
        None => "memory".to_string(),
    };
    let cache = status(state.cache.health_check().await.unwrap_or(false));

    Json(ApiResponse::ok(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database,
        cache,
    }))
}

fn status(healthy: bool) -> String {
    if healthy { "connected" } else { "unavailable" }.to_string()
}
