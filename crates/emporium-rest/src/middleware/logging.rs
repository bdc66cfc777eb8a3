//! Request logging middleware.

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use metrics::counter;
use std::time::Instant;
use tracing::info;

/// Requests served, labelled by method and status.
pub const HTTP_REQUESTS_TOTAL: &str = "emporium_http_requests_total";

/// Request logging middleware.
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let start = Instant::now();

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    counter!(
        HTTP_REQUESTS_TOTAL,
        "method" => method.to_string(),
        "status" => status.as_u16().to_string()
    )
    .increment(1);

    info!(
        target: "http",
        method = %method,
        path = %path,
        status = %status.as_u16(),
        duration_ms = %duration.as_millis(),
        "HTTP request completed"
    );

    response
}
