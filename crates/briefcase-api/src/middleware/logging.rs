use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

use crate::handlers::chat::TRACE_ID_HEADER;

/// Request logging middleware
///
/// Streaming responses are logged when their headers are ready, so
/// `duration_ms` covers time to first byte for `/api/chat`.
pub async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let start = Instant::now();

    let response = next.run(req).await;

    let duration = start.elapsed();
    let status = response.status();
    let trace_id = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");

    tracing::info!(
        method = %method,
        uri = %uri,
        status = %status,
        trace_id = %trace_id,
        duration_ms = %duration.as_millis(),
        "Request processed"
    );

    response
}
