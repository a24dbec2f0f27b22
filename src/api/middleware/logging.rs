//! Logging middleware for request/response tracing.
//!
//! This middleware logs incoming requests and outgoing responses with
//! timing information and request correlation via request IDs.

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{Instrument, Level, info, span, warn};

use super::RequestId;

/// Middleware that logs request and response information.
///
/// # Logged Information
/// - Request: HTTP method, path, query string, request ID
/// - Response: status code, duration in milliseconds, request ID
///
/// Server errors are logged at `warn`.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map(|r| r.0.clone())
        .unwrap_or_else(|| "unknown".to_string());

    let span = span!(
        Level::INFO,
        "http_request",
        method = %method,
        uri = %uri,
        request_id = %request_id
    );

    async move {
        info!(
            method = %method,
            path = %uri.path(),
            query = uri.query().unwrap_or(""),
            request_id = %request_id,
            "Request received"
        );

        let start = Instant::now();
        let response = next.run(request).await;
        let duration = start.elapsed();
        let status = response.status();

        if status.is_server_error() {
            warn!(
                status = %status.as_u16(),
                duration_ms = %duration.as_millis(),
                request_id = %request_id,
                "Response sent"
            );
        } else {
            info!(
                status = %status.as_u16(),
                duration_ms = %duration.as_millis(),
                request_id = %request_id,
                "Response sent"
            );
        }

        response
    }
    .instrument(span)
    .await
}
