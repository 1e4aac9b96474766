//! Security headers middleware for HTTP responses.

use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE, PRAGMA};
use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};

/// Adds standard security-related HTTP headers to all responses and a
/// conservative caching policy: JSON answers are never cached, static assets
/// get long-lived caching.
pub async fn security_headers_middleware(req: Request, next: Next) -> Response {
    let mut res = next.run(req).await;
    let headers = res.headers_mut();

    headers.insert(HeaderName::from_static("x-content-type-options"), HeaderValue::from_static("nosniff"));
    headers.insert(HeaderName::from_static("x-frame-options"), HeaderValue::from_static("SAMEORIGIN"));
    headers.insert(HeaderName::from_static("referrer-policy"), HeaderValue::from_static("no-referrer"));
    headers.insert(
        HeaderName::from_static("permissions-policy"),
        HeaderValue::from_static("geolocation=(), microphone=(), camera=()"),
    );

    let ct_val: Option<String> =
        headers.get(CONTENT_TYPE).and_then(|ct| ct.to_str().ok().map(|s| s.to_string()));
    if let Some(s) = ct_val.as_deref() {
        if s.starts_with("application/json") || s.starts_with("text/csv") {
            headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
            headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
        } else if s.starts_with("text/css")
            || s.starts_with("application/javascript")
            || s.starts_with("text/javascript")
        {
            headers.insert(CACHE_CONTROL, HeaderValue::from_static("public, max-age=31536000, immutable"));
            headers.remove(PRAGMA);
        }
    }

    res
}
