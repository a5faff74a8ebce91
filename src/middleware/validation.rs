use std::path::Path;

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// An Axum middleware that rejects traversal sequences in the request URI path.
///
/// Only the path component is checked; the `dir` query parameter is validated
/// separately by [`is_valid_scan_path`].
pub async fn validate_request_middleware(req: Request, next: Next) -> Response {
    let uri_path = req.uri().path();
    if contains_path_traversal(uri_path) {
        tracing::warn!("Rejected request with traversal in URI path: {}", sanitize_for_logging(uri_path));
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": {
                    "code": "INVALID_PATH",
                    "message": "Path traversal detected in request",
                },
                "status": 400,
            })),
        )
            .into_response();
    }

    next.run(req).await
}

/// Check if a URI path contains traversal attempts, including encoded forms.
fn contains_path_traversal(path: &str) -> bool {
    let lower = path.to_lowercase();

    // Direct traversal patterns
    if path.contains("/..") || path.contains("\\..") || path.starts_with("..") {
        return true;
    }

    // Current directory references that could be dangerous
    if path.contains("/./") || path.contains("\\.\\") {
        return true;
    }

    // URL-encoded variants (single and double encoding)
    let encoded_patterns = [
        "%2e%2e",
        "%252e%252e", // .. and double-encoded ..
        "%2e/",
        "%252e%2f", // ./
        "/%2e",
        "%2f%2e", // /.
        "%2e\\",
        "%2e%5c", // .\\
        "%5c%2e",
        "%5c%5c", // \\.
        "%00",    // Null byte
    ];

    for pattern in &encoded_patterns {
        if lower.contains(pattern) {
            return true;
        }
    }

    path.contains('\0')
}

/// Checks whether `path` may be handed to the directory analyzer.
///
/// The path must be absolute on this platform and must not contain the
/// substring `..` anywhere. The check is purely lexical and performs no
/// filesystem access: it also rejects names such as `notes..txt`, and it does
/// not resolve `.` segments or symlinks, so a symlink inside an allowed tree
/// can still lead elsewhere. Treat it as advisory, not as a security boundary.
pub fn is_valid_scan_path(path: &str) -> bool {
    if path.contains("..") {
        tracing::warn!("Validation failed: Path contains '..': {}", sanitize_for_logging(path));
        return false;
    }

    if !Path::new(path).is_absolute() {
        tracing::warn!("Validation failed: Path is not absolute: {}", sanitize_for_logging(path));
        return false;
    }

    true
}

/// Sanitizes user input for logging purposes.
///
/// Removes control characters (whitespace excepted), limits the length to 200
/// characters and escapes backslashes and quotes.
pub fn sanitize_for_logging(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_control() || c.is_whitespace())
        .take(200)
        .collect::<String>()
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\'', "\\\'")
}
