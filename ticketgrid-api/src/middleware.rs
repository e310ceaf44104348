//! Axum Middleware for HTTP Request Tracing
//!
//! Wraps every request in a tracing span and logs completion with latency
//! and status.

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{info_span, Instrument};

/// Observability middleware for Axum.
pub async fn observability_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();

    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let tracing_span = info_span!(
        "http_request",
        http.method = %method,
        http.target = %path,
    );

    let response = next.run(request).instrument(tracing_span).await;

    let status = response.status();
    tracing::info!(
        method = %method,
        path = %path,
        status = status.as_u16(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Request completed"
    );

    response
}
