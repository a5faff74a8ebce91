use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

// Liveness check - no dependencies to check
pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

// Metrics endpoint: returns JSON snapshot
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.metrics.get_snapshot())
}

// Prometheus-compatible text exposition format
pub async fn metrics_prometheus(State(state): State<AppState>) -> impl IntoResponse {
    let m = state.metrics.get_snapshot();
    let body = format!(
        "# HELP diskview_analyses_started Total analyses started\n# TYPE diskview_analyses_started counter\ndiskview_analyses_started {}\n\
# HELP diskview_analyses_completed Total analyses completed\n# TYPE diskview_analyses_completed counter\ndiskview_analyses_completed {}\n\
# HELP diskview_analyses_failed Total analyses failed\n# TYPE diskview_analyses_failed counter\ndiskview_analyses_failed {}\n\
# HELP diskview_files_processed Non-empty files recorded\n# TYPE diskview_files_processed counter\ndiskview_files_processed {}\n\
# HELP diskview_bytes_scanned Bytes scanned\n# TYPE diskview_bytes_scanned counter\ndiskview_bytes_scanned {}\n\
# HELP diskview_warnings_count Skipped entries\n# TYPE diskview_warnings_count counter\ndiskview_warnings_count {}\n\
# HELP diskview_uptime_seconds Uptime seconds\n# TYPE diskview_uptime_seconds gauge\ndiskview_uptime_seconds {}\n",
        m.analyses_started,
        m.analyses_completed,
        m.analyses_failed,
        m.files_processed,
        m.bytes_scanned,
        m.warnings_count,
        m.uptime_seconds,
    );
    ([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body)
}

// Version/Build info endpoint (JSON)
pub async fn version() -> impl IntoResponse {
    let body = serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "package": {
            "description": env!("CARGO_PKG_DESCRIPTION"),
            "authors": env!("CARGO_PKG_AUTHORS"),
            "license": env!("CARGO_PKG_LICENSE"),
        },
        "build": {
            "profile": if cfg!(debug_assertions) { "debug" } else { "release" },
            "os": std::env::consts::OS,
            "arch": std::env::consts::ARCH,
        }
    });
    (StatusCode::OK, Json(body))
}
