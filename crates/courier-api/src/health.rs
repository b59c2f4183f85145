use axum::{Json, extract::State, http::StatusCode};
use tracing::warn;

use courier_types::api::{HealthResponse, HealthStatus};

use crate::auth::AppState;
use crate::blocking;

/// GET /healthz: 200 while the store answers, 503 otherwise.
pub async fn healthz(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    match blocking::run(&state, |db| db.ping()).await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: HealthStatus::Ok,
            }),
        ),
        Err(e) => {
            warn!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: HealthStatus::Unhealthy,
                }),
            )
        }
    }
}
