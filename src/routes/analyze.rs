use std::time::Instant;

use axum::{
    extract::{Query, State},
    Json,
};
use tokio::task;
use tracing::{info, warn};

use crate::{
    analyzer::{format_size, Analyzer, AnalyzerOptions},
    error::{
        validation::{require_param, validate_path},
        AppError, AppResult,
    },
    middleware::validation::{is_valid_scan_path, sanitize_for_logging},
    state::AppState,
    types::{AnalysisResult, AnalyzeQuery},
};

/// `GET /api/analyze?dir=<absolute path>`
///
/// Validates `dir`, walks it on the blocking pool and returns the full
/// [`AnalysisResult`] as JSON. A walk that cannot start yields a 500 with an
/// error id; the cause is only logged.
pub async fn analyze(
    State(state): State<AppState>,
    Query(query): Query<AnalyzeQuery>,
) -> AppResult<Json<AnalysisResult>> {
    let dir = match require_param(query.dir.as_deref(), "dir") {
        Ok(dir) => dir,
        Err(e) => {
            warn!("Request error: Missing 'dir' query parameter");
            return Err(e);
        }
    };
    validate_path(dir)?;
    if !is_valid_scan_path(dir) {
        warn!("Security Alert: Invalid or disallowed path requested: {}", sanitize_for_logging(dir));
        return Err(AppError::InvalidInput(format!("Invalid or disallowed path: {}", dir)));
    }

    info!("Received request to analyze validated directory: {}", sanitize_for_logging(dir));
    state.metrics.inc_analyses_started();

    let options = AnalyzerOptions { initial_capacity: state.config.analyzer.initial_capacity };
    let root = dir.to_string();
    let started = Instant::now();
    let joined = task::spawn_blocking(move || {
        let mut analyzer = Analyzer::new(options);
        let result = analyzer.analyze(&root);
        (result, analyzer.observer().warnings())
    })
    .await;
    info!("Analysis for {} completed in {:?}", sanitize_for_logging(dir), started.elapsed());

    let (outcome, warnings) = match joined {
        Ok(v) => v,
        Err(e) => {
            state.metrics.inc_analyses_failed();
            return Err(e.into());
        }
    };
    state.metrics.add_warnings(warnings);

    match outcome {
        Ok(result) => {
            state.metrics.record_completed(&result);
            info!(
                "Analysis successful for {}. Files: {}, Total Size: {}, Warnings: {}",
                sanitize_for_logging(dir),
                result.file_count,
                format_size(result.total_size),
                warnings
            );
            Ok(Json(result))
        }
        Err(e) => {
            state.metrics.inc_analyses_failed();
            Err(e.into())
        }
    }
}
