//! Health endpoint.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

/// Health report body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status.
    pub status: String,
    /// Database connectivity.
    pub database: bool,
    /// Live WebSocket connections.
    pub connections: usize,
}

/// GET /api/health — liveness and dependency status.
pub async fn health(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, ApiError> {
    let database = state.db.health_check().await.is_ok();
    let status = if database { "ok" } else { "degraded" };
    Ok(Json(HealthResponse {
        status: status.to_string(),
        database,
        connections: state.hub.connection_count(),
    }))
}
