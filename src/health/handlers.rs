use axum::{extract::State, Json};
use chrono::Utc;

use crate::http::response::{HealthResponse, ReadyResponse};
use crate::http::server::AppState;

/// Liveness probe: the process is up.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Process is alive", body = HealthResponse))
)]
pub async fn liveness() -> Json<HealthResponse> {
    Json(HealthResponse::healthy(Utc::now()))
}

/// Readiness probe: dependencies are usable.
///
/// Always 200; the body says whether the service is ready, so a probe can
/// tell "reachable but not ready" from "unreachable".
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "health",
    responses((status = 200, description = "Readiness with per-dependency checks", body = ReadyResponse))
)]
pub async fn readiness(State(state): State<AppState>) -> Json<ReadyResponse> {
    Json(state.readiness.evaluate())
}
