//! Logging middleware

use axum::{
    body::Body,
    extract::Request,
    http::{HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

/// Response header carrying the request correlation id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request logging middleware.
///
/// Tags every request with a correlation id (taken from `x-request-id` when the
/// client sends one) and logs its outcome with the elapsed time.
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let span = info_span!("request", request_id = %request_id);
    let mut response = next.run(request).instrument(span.clone()).await;

    let status = response.status();
    let duration_ms = start.elapsed().as_secs_f64() * 1000.0;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    span.in_scope(|| {
        if status.is_server_error() {
            warn!(
                method = %method,
                path = %path,
                status = status.as_u16(),
                duration_ms = %format!("{:.2}", duration_ms),
                "Request completed with server error"
            );
        } else if status.is_client_error() && status != StatusCode::NOT_FOUND {
            warn!(
                method = %method,
                path = %path,
                status = status.as_u16(),
                duration_ms = %format!("{:.2}", duration_ms),
                "Request completed with client error"
            );
        } else {
            info!(
                method = %method,
                path = %path,
                status = status.as_u16(),
                duration_ms = %format!("{:.2}", duration_ms),
                "Request completed"
            );
        }
    });

    response
}
