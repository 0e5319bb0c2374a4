//! # Request Metrics
//!
//! Counts every request and records its latency, labelled by method, matched
//! route and status. Rendered by the Prometheus exporter at `/metrics`.

use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;

pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;

    let status = response.status().as_u16().to_string();
    let labels = [("method", method), ("route", route), ("status", status)];
    metrics::counter!("medid_http_requests_total", &labels).increment(1);
    metrics::histogram!("medid_http_request_duration_seconds", &labels)
        .record(start.elapsed().as_secs_f64());

    response
}
