use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

use crate::db;
use crate::AppState;

/// Root endpoint - basic status
pub async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": "Songlib Server",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running"
    }))
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: String,
    uptime: u64,
    postgres: bool,
}

/// GET /health - Liveness plus a database ping
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let uptime = state.start_time.elapsed().as_secs();

    let postgres_ok = db::health_check(&state.pool).await;

    let status = if postgres_ok { "ok" } else { "unhealthy" };

    Json(HealthResponse {
        status: status.to_string(),
        uptime,
        postgres: postgres_ok,
    })
}
