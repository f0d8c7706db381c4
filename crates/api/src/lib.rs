//! HTTP server for the clinic owner pages.
//!
//! Serves the owner forms and search under `/owners`, a JSON health report
//! under `/api/v1/health`, and Prometheus metrics under `/metrics`.

pub mod config;
pub mod error;
pub mod render;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use render::HtmlRenderer;
use state::{AppState, ClinicStore};

/// Creates the Axum application router with all routes and shared state.
///
/// Only the health endpoint is open to cross-origin callers.
pub fn create_app<S: ClinicStore>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    let health_router = Router::new()
        .route("/api/v1/health", get(routes::health::check::<S>))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    let owner_router = Router::new()
        .route(
            "/owners/new",
            get(routes::owners::init_creation_form::<S>)
                .post(routes::owners::process_creation_form::<S>),
        )
        .route("/owners/find", get(routes::owners::init_find_form::<S>))
        .route("/owners", get(routes::owners::process_find_form::<S>))
        .route("/owners/{owner_id}", get(routes::owners::show_owner::<S>))
        .route(
            "/owners/{owner_id}/edit",
            get(routes::owners::init_update_owner_form::<S>)
                .post(routes::owners::process_update_owner_form::<S>),
        );

    owner_router
        .merge(health_router)
        .with_state(state)
        .merge(metrics_router)
        .layer(TraceLayer::new_for_http())
}

/// Creates application state over `store`, rendering views as HTML.
pub fn create_state<S: ClinicStore>(store: S) -> Arc<AppState<S>> {
    Arc::new(AppState::new(store, Arc::new(HtmlRenderer)))
}
