//! HTTP middleware shared by the workspace's APIs.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};

/// Attach defensive response headers to every response.
pub async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    headers.insert("x-content-type-options", HeaderValue::from_static("nosniff"));
    headers.insert("x-frame-options", HeaderValue::from_static("DENY"));
    headers.insert("referrer-policy", HeaderValue::from_static("no-referrer"));

    response
}
