//! Health check endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use domain::HealthReport;

use crate::state::{AppState, ClinicStore};

/// GET /api/v1/health: 200 when every component is UP, 503 otherwise.
#[tracing::instrument(skip(state))]
pub async fn check<S: ClinicStore>(
    State(state): State<Arc<AppState<S>>>,
) -> (StatusCode, Json<HealthReport>) {
    let report = state.health.health().await;
    let status = if report.is_up() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(report))
}
