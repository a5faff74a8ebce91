//! HTTP route handlers and router assembly.
//!
//! - `analyze`: the directory analysis endpoint
//! - `health`: liveness, metrics and version endpoints

use std::path::PathBuf;

use axum::extract::DefaultBodyLimit;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::{routing::get, Router};
use tower_http::{
    compression::CompressionLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::middleware;
use crate::state::AppState;

pub mod analyze;
pub mod health;

/// Builds the full application router: API routes, static UI fallback and the
/// middleware stack.
pub fn build_router(state: AppState, static_root: PathBuf) -> Router {
    let static_index = static_root.join("index.html");
    let static_ui_service = ServeDir::new(static_root)
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new(static_index));

    let cfg_arc = state.config.clone();

    Router::new()
        .route("/api/analyze", get(analyze::analyze))
        .route("/healthz", get(health::healthz))
        .route("/metrics", get(health::metrics))
        .route("/metrics/prometheus", get(health::metrics_prometheus))
        .route("/version", get(health::version))
        .fallback_service(static_ui_service)
        .with_state(state)
        // Only GET endpoints; keep request bodies small
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(from_fn(middleware::validation::validate_request_middleware))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(from_fn_with_state(cfg_arc, middleware::security_headers::security_headers_middleware))
}
