//! Prometheus metrics endpoint.

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use metrics_exporter_prometheus::PrometheusHandle;

const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Registers help text for the counters the controllers emit.
pub fn describe() {
    metrics::describe_counter!("owners_created_total", "Owners created through the new-owner form");
    metrics::describe_counter!("owners_updated_total", "Owners saved through the edit form");
    metrics::describe_counter!("owner_searches_total", "Owner searches run by last name");
    metrics::describe_counter!("health_checks_total", "Health reports served, by status");
}

/// GET /metrics: Prometheus text exposition of every recorded metric.
pub async fn get(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)],
        handle.render(),
    )
}
