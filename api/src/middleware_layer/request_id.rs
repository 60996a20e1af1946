use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

pub const REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

fn new_request_id() -> String {
    let nanos = Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_else(|| Utc::now().timestamp_micros() * 1000);
    format!("req-{nanos}")
}

/// Reuses the caller's `X-Request-Id` or mints one, exposes it to handlers
/// through the request headers, and echoes it on the response.
pub async fn request_id(mut req: Request<Body>, next: Next) -> Response {
    let incoming = req
        .headers()
        .get(&REQUEST_ID)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| HeaderValue::from_str(v).ok());

    let id = match incoming {
        Some(v) => v,
        None => match HeaderValue::from_str(&new_request_id()) {
            Ok(v) => v,
            Err(_) => return next.run(req).await,
        },
    };

    req.headers_mut().insert(REQUEST_ID, id.clone());
    let mut res = next.run(req).await;
    res.headers_mut().insert(REQUEST_ID, id);
    res
}

/// Request id as seen by a handler (`-` when absent).
pub fn request_id_of(headers: &axum::http::HeaderMap) -> &str {
    headers
        .get(&REQUEST_ID)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("-")
}
