use axum::{extract::State, http::StatusCode, response::Json};
use chrono::Utc;

use crate::models::{HealthResponse, ServiceStatus};
use crate::AppState;

/// Liveness probe; unhealthy once the store root disappears
///
/// GET /health
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let available = state.store.is_available().await;

    let (status_code, status) = if available {
        (StatusCode::OK, ServiceStatus::Healthy)
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, ServiceStatus::Unhealthy)
    };

    let response = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        store_root: state.store.root().display().to_string(),
    };

    (status_code, Json(response))
}
