use std::fs;
use std::path::Path;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use diskview::config::AppConfig;
use diskview::routes::build_router;
use diskview::state::AppState;
use http_body_util::BodyExt; // for .collect()
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

fn setup_test_app(static_dir: &Path) -> (Router, AppState) {
    let state = AppState::new(AppConfig::default());
    let app = build_router(state.clone(), static_dir.to_path_buf());
    (app, state)
}

fn static_fixture() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("index.html"), "<html>diskview</html>").unwrap();
    fs::write(dir.path().join("script.js"), "console.log('hi');").unwrap();
    dir
}

fn write_sized(path: &Path, size: u64) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::File::create(path).unwrap().set_len(size).unwrap();
}

fn encode(value: &str) -> String {
    let mut out = String::new();
    for b in value.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => out.push(b as char),
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    out
}

async fn get(app: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let response = app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap()).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes().to_vec();
    (status, headers, body)
}

#[tokio::test]
async fn test_healthz_endpoint() {
    let static_dir = static_fixture();
    let (app, _) = setup_test_app(static_dir.path());

    let (status, headers, body) = get(app, "/healthz").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(&body[..], b"ok");
    assert!(headers.contains_key("x-content-type-options"));
    assert!(headers.contains_key("x-frame-options"));
    assert!(headers.contains_key("referrer-policy"));
}

#[tokio::test]
async fn test_version_endpoint() {
    let static_dir = static_fixture();
    let (app, _) = setup_test_app(static_dir.path());

    let (status, _, body) = get(app, "/version").await;

    assert_eq!(status, StatusCode::OK);
    let v: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(v["name"], "diskview");
    assert!(!v["version"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_analyze_returns_full_result() {
    let static_dir = static_fixture();
    let data = TempDir::new().unwrap();
    write_sized(&data.path().join("small.txt"), 500);
    write_sized(&data.path().join("sub/medium.DAT"), 2048);
    write_sized(&data.path().join("sub/deeper/large.bin"), 2_097_152);
    write_sized(&data.path().join("empty.txt"), 0);
    let root = data.path().to_string_lossy().to_string();
    let (app, state) = setup_test_app(static_dir.path());

    let (status, headers, body) = get(app, &format!("/api/analyze?dir={}", encode(&root))).await;

    assert_eq!(status, StatusCode::OK);
    assert!(headers.get("content-type").unwrap().to_str().unwrap().starts_with("application/json"));
    assert_eq!(headers.get("cache-control").unwrap(), "no-store");
    let v: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(v["fileCount"], 3);
    assert_eq!(v["totalSize"], 2_099_700);
    assert_eq!(v["scannedPath"], root.as_str());
    assert_eq!(v["sizeCounts"]["countLess1KB"], 1);
    assert_eq!(v["sizeCounts"]["countMore1KB"], 1);
    assert_eq!(v["sizeCounts"]["countMore1MB"], 1);
    assert_eq!(v["sizeCounts"]["countMore5MB"], 0);
    assert_eq!(v["sizeCounts"]["countMore100MB"], 0);
    assert_eq!(v["sizeCounts"]["countMore512MB"], 0);
    assert_eq!(v["sizeCounts"]["countMore1GB"], 0);

    let files = v["files"].as_array().unwrap();
    assert_eq!(files.len(), 3);
    let medium = files.iter().find(|f| f["name"].as_str().unwrap().ends_with("/sub/medium.DAT")).unwrap();
    assert_eq!(medium["size"], 2048);
    assert_eq!(medium["ext"], ".dat");

    let snapshot = state.metrics.get_snapshot();
    assert_eq!(snapshot.analyses_started, 1);
    assert_eq!(snapshot.analyses_completed, 1);
    assert_eq!(snapshot.files_processed, 3);
    assert_eq!(snapshot.bytes_scanned, 2_099_700);
}

#[tokio::test]
async fn test_analyze_missing_dir_parameter() {
    let static_dir = static_fixture();
    let (app, _) = setup_test_app(static_dir.path());

    let (status, _, body) = get(app, "/api/analyze").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let v: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(v["error"]["code"], "BAD_REQUEST");
    assert_eq!(v["error"]["message"], "Missing 'dir' query parameter");
}

#[tokio::test]
async fn test_analyze_empty_dir_parameter() {
    let static_dir = static_fixture();
    let (app, _) = setup_test_app(static_dir.path());

    let (status, _, _) = get(app, "/api/analyze?dir=").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_analyze_blank_dir_is_invalid_not_missing() {
    let static_dir = static_fixture();
    let (app, state) = setup_test_app(static_dir.path());

    let (status, _, body) = get(app, "/api/analyze?dir=%20%20").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let v: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(v["error"]["code"], "INVALID_INPUT");
    assert!(v["error"]["message"].as_str().unwrap().contains("Invalid or disallowed path"));
    assert_eq!(state.metrics.get_snapshot().analyses_started, 0);
}

#[tokio::test]
async fn test_analyze_rejects_relative_path() {
    let static_dir = static_fixture();
    let (app, state) = setup_test_app(static_dir.path());

    let (status, _, body) = get(app, "/api/analyze?dir=relative/path").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let v: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(v["error"]["code"], "INVALID_INPUT");
    assert!(v["error"]["message"].as_str().unwrap().contains("Invalid or disallowed path"));
    assert_eq!(state.metrics.get_snapshot().analyses_started, 0);
}

#[tokio::test]
async fn test_analyze_rejects_double_dot() {
    let static_dir = static_fixture();
    let data = TempDir::new().unwrap();
    let sneaky = format!("{}/../etc", data.path().to_string_lossy());
    let (app, _) = setup_test_app(static_dir.path());

    let (status, _, _) = get(app, &format!("/api/analyze?dir={}", encode(&sneaky))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_analyze_missing_root_is_server_error() {
    let static_dir = static_fixture();
    let data = TempDir::new().unwrap();
    let missing = data.path().join("gone").to_string_lossy().to_string();
    let (app, state) = setup_test_app(static_dir.path());

    let (status, _, body) = get(app, &format!("/api/analyze?dir={}", encode(&missing))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let v: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(v["error"]["code"], "INTERNAL_ERROR");
    assert!(v["error"]["details"]["error_id"].is_string());
    // No filesystem detail leaks to the client
    assert!(!String::from_utf8_lossy(&body).contains("gone"));
    assert_eq!(state.metrics.get_snapshot().analyses_failed, 1);
}

#[tokio::test]
async fn test_static_files_served() {
    let static_dir = static_fixture();
    let (app, _) = setup_test_app(static_dir.path());

    let (status, _, body) = get(app.clone(), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8_lossy(&body).contains("diskview"));

    let (status, _, body) = get(app, "/script.js").await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8_lossy(&body).contains("console.log"));
}

#[tokio::test]
async fn test_bundled_ui_is_served() {
    let bundled = Path::new(env!("CARGO_MANIFEST_DIR")).join("static");
    let (app, _) = setup_test_app(&bundled);

    let (status, _, body) = get(app.clone(), "/").await;
    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8_lossy(&body);
    for needle in ["script.js", "style.css", "id=\"distribution\"", "id=\"fileRows\"", "id=\"minSize\""] {
        assert!(html.contains(needle), "index.html lacks {}", needle);
    }

    let (status, headers, body) = get(app.clone(), "/script.js").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers.get("cache-control").unwrap(), "public, max-age=3600");
    let js = String::from_utf8_lossy(&body);
    assert!(js.contains("/api/analyze?dir="));
    assert!(js.contains("sizeCounts"));

    let (status, _, _) = get(app, "/style.css").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_traversal_in_uri_rejected() {
    let static_dir = static_fixture();
    let (app, _) = setup_test_app(static_dir.path());

    let (status, _, _) = get(app, "/%2e%2e/secret").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_metrics_endpoints() {
    let static_dir = static_fixture();
    let (app, _) = setup_test_app(static_dir.path());

    let (status, _, body) = get(app.clone(), "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    let v: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(v["analyses_started"], 0);
    assert_eq!(v["bytes_scanned"], 0);

    let (status, _, body) = get(app, "/metrics/prometheus").await;
    assert_eq!(status, StatusCode::OK);
    let text = String::from_utf8(body).unwrap();
    assert!(text.contains("diskview_analyses_started 0"));
    assert!(text.contains("# TYPE diskview_uptime_seconds gauge"));
}
