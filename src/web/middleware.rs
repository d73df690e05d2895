//! HTTP middleware

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{info, info_span, warn, Instrument};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Reuse a caller supplied id when it is short and printable
fn incoming_request_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty() && id.len() <= 64)
        .map(str::to_string)
}

/// Wraps each request in a span carrying its id
///
/// Login, relay and scrape logs emitted while handling the request inherit
/// the span, and the id is echoed back in `x-request-id`. Query strings are
/// left out of the log line since search terms can be personal.
pub async fn request_logging_middleware(request: Request, next: Next) -> Response {
    let request_id = incoming_request_id(request.headers())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let span = info_span!("request", id = %request_id, method = %method, path = %path);
    let started = Instant::now();

    let mut response = next.run(request).instrument(span.clone()).await;

    let elapsed_ms = started.elapsed().as_millis();
    let status = response.status();
    span.in_scope(|| {
        if status.is_server_error() || status.is_client_error() {
            warn!(status = status.as_u16(), elapsed_ms, "request failed");
        } else {
            info!(status = status.as_u16(), elapsed_ms, "request served");
        }
    });

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
