//! Request metrics middleware.

use std::time::Instant;

use axum::{body::Body, extract::Request, middleware::Next, response::Response};

/// Record `http_requests_total` and `http_request_duration_seconds`.
pub async fn track_metrics(req: Request<Body>, next: Next) -> Response {
    let method = req.method().to_string();
    let start = Instant::now();

    let response = next.run(req).await;

    let status = response.status().as_u16().to_string();
    metrics::counter!("http_requests_total", "method" => method.clone(), "status" => status)
        .increment(1);
    metrics::histogram!("http_request_duration_seconds", "method" => method)
        .record(start.elapsed().as_secs_f64());

    response
}
