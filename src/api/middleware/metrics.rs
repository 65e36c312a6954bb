use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

/// One structured line per request under the `metrics` target, so operators
/// can filter latency data out of the general log stream.
pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(req).await;

    tracing::info!(
        target: "metrics",
        %method,
        path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "handled"
    );

    response
}
