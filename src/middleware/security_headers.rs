//! Security headers and caching policy for every response.

use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE, PRAGMA};
use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::config::{AppConfig, SecurityConfig};

/// Adds security headers to every response and sets the cache policy.
///
/// Always applied: `X-Content-Type-Options`, `X-Frame-Options`,
/// `Referrer-Policy`, `Permissions-Policy`, `Cross-Origin-Opener-Policy` and
/// `Cross-Origin-Resource-Policy`. HSTS and CSP are added when configured.
///
/// Analysis results (JSON) are never cached; they describe the filesystem at
/// request time. Static scripts and stylesheets may be cached by the browser.
pub async fn security_headers_middleware(
    State(cfg): State<Arc<AppConfig>>,
    req: Request,
    next: Next,
) -> Response {
    let mut res = next.run(req).await;
    let headers = res.headers_mut();

    headers.insert(HeaderName::from_static("x-content-type-options"), HeaderValue::from_static("nosniff"));
    headers.insert(HeaderName::from_static("x-frame-options"), HeaderValue::from_static("SAMEORIGIN"));
    headers.insert(HeaderName::from_static("referrer-policy"), HeaderValue::from_static("no-referrer"));
    headers.insert(
        HeaderName::from_static("permissions-policy"),
        HeaderValue::from_static("geolocation=(), microphone=(), camera=()"),
    );
    headers.insert(
        HeaderName::from_static("cross-origin-opener-policy"),
        HeaderValue::from_static("same-origin"),
    );
    headers.insert(
        HeaderName::from_static("cross-origin-resource-policy"),
        HeaderValue::from_static("same-origin"),
    );

    if let Some(sec) = cfg.security.as_ref() {
        apply_optional_headers(headers, sec);
    }

    apply_cache_policy(headers);
    res
}

fn apply_optional_headers(headers: &mut HeaderMap, sec: &SecurityConfig) {
    if sec.enable_hsts.unwrap_or(false) {
        let max_age = sec.hsts_max_age.unwrap_or(31536000); // 1 year
        let include_sub = if sec.hsts_include_subdomains.unwrap_or(false) { "; includeSubDomains" } else { "" };
        let value = format!("max-age={}{}", max_age, include_sub);
        headers.insert(
            HeaderName::from_static("strict-transport-security"),
            HeaderValue::from_str(&value).unwrap_or(HeaderValue::from_static("max-age=31536000")),
        );
    }
    if let Some(csp) = sec.csp.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        if let Ok(val) = HeaderValue::from_str(csp) {
            headers.insert(HeaderName::from_static("content-security-policy"), val);
        }
    }
}

fn apply_cache_policy(headers: &mut HeaderMap) {
    let content_type = match headers.get(CONTENT_TYPE).map(|ct| ct.to_str()) {
        Some(Ok(s)) => s.to_string(),
        Some(Err(e)) => {
            tracing::warn!("Invalid UTF-8 in Content-Type header: {}", e);
            return;
        }
        None => return,
    };

    if content_type.starts_with("application/json") {
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    } else if content_type.starts_with("text/css")
        || content_type.starts_with("application/javascript")
        || content_type.starts_with("text/javascript")
    {
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("public, max-age=3600"));
        headers.remove(PRAGMA);
    }
}
