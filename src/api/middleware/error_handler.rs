//! Error handler for converting AppError to HTTP responses.
//!
//! Provides status code mapping, client-safe messages for server errors and
//! request ID correlation.

use axum::{
    Json,
    extract::Request,
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{error, warn};

use crate::api::dto::ErrorResponse;
use crate::api::middleware::RequestId;
use crate::error::AppError;

/// Maps an AppError variant to its corresponding HTTP status code.
pub fn error_to_status_code(error: &AppError) -> StatusCode {
    match error {
        AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        AppError::ValidationErrors { .. }
        | AppError::BadRequest { .. }
        | AppError::InvalidPagination { .. }
        | AppError::InvalidCursor { .. } => StatusCode::BAD_REQUEST,
        AppError::Pagination { .. }
        | AppError::Query { .. }
        | AppError::Configuration { .. }
        | AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Maps an AppError variant to its error code string.
pub fn error_to_code(error: &AppError) -> &'static str {
    match error {
        AppError::NotFound { .. } => "NOT_FOUND",
        AppError::ValidationErrors { .. } => "VALIDATION_ERROR",
        AppError::BadRequest { .. } => "BAD_REQUEST",
        AppError::InvalidPagination { .. } => "INVALID_PAGINATION",
        AppError::InvalidCursor { .. } => "INVALID_CURSOR",
        AppError::Pagination { .. } => "PAGINATION_ERROR",
        AppError::Query { .. } => "QUERY_ERROR",
        AppError::Configuration { .. } => "CONFIGURATION_ERROR",
        AppError::Internal { .. } => "INTERNAL_ERROR",
    }
}

/// Builds the response body. Server error sources never reach the client.
fn error_body(error: &AppError) -> ErrorResponse {
    let code = error_to_code(error);
    match error {
        AppError::NotFound {
            entity,
            field,
            value,
        } => ErrorResponse::not_found_error(entity, field, value),
        AppError::ValidationErrors { errors } => ErrorResponse::validation_errors(errors),
        AppError::BadRequest { message }
        | AppError::InvalidPagination { message }
        | AppError::InvalidCursor { message } => ErrorResponse::new(code, message),
        AppError::Pagination { .. } => {
            ErrorResponse::new(code, "Failed to process pagination parameters")
        }
        AppError::Query { operation, .. } => {
            ErrorResponse::new(code, &format!("Query failed: {}", operation))
                .with_details(json!({ "operation": operation }))
        }
        AppError::Configuration { key, .. } => {
            ErrorResponse::new(code, &format!("Configuration error: {}", key))
                .with_details(json!({ "key": key }))
        }
        AppError::Internal { .. } => ErrorResponse::new(code, "An internal error occurred"),
    }
}

/// Logs errors that have not been logged where they were raised.
///
/// `Pagination` and `InvalidPagination` are logged by the pagination
/// middleware itself.
fn log_error(error: &AppError) {
    match error {
        AppError::Query { .. } | AppError::Configuration { .. } | AppError::Internal { .. } => {
            error!(code = error_to_code(error), error = ?error, "Request failed");
        }
        AppError::InvalidCursor { message } => {
            warn!(code = error_to_code(error), %message, "Rejected cursor boundary");
        }
        _ => {}
    }
}

/// Converts an AppError into a response, attaching the request ID when known.
pub fn error_to_response_with_request_id(error: AppError, request_id: Option<String>) -> Response {
    log_error(&error);

    let status = error_to_status_code(&error);
    let mut body = error_body(&error);
    if let Some(id) = request_id {
        body = body.with_request_id(&id);
    }

    (status, Json(body)).into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error_to_response_with_request_id(self, None)
    }
}

/// Fills in the request ID on JSON error bodies and converts bare error
/// responses (unmatched routes, wrong methods) to [`ErrorResponse`].
pub async fn global_error_handler(request: Request, next: Next) -> Response {
    let request_id = request.extensions().get::<RequestId>().map(|r| r.0.clone());
    let response = next.run(request).await;

    let status = response.status();
    if !status.is_client_error() && !status.is_server_error() {
        return response;
    }

    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"));

    let (parts, body) = response.into_parts();
    let bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(_) => axum::body::Bytes::new(),
    };

    if is_json {
        let Ok(mut value) = serde_json::from_slice::<serde_json::Value>(&bytes) else {
            return Response::from_parts(parts, axum::body::Body::from(bytes));
        };
        if let (Some(id), Some(object)) = (&request_id, value.as_object_mut()) {
            object
                .entry("request_id")
                .or_insert_with(|| json!(id));
        }
        return (status, Json(value)).into_response();
    }

    let original = String::from_utf8_lossy(&bytes).trim().to_string();
    let (code, fallback) = match status {
        StatusCode::BAD_REQUEST => ("BAD_REQUEST", "Bad request - invalid or malformed request"),
        StatusCode::NOT_FOUND => ("NOT_FOUND", "The requested resource was not found"),
        StatusCode::METHOD_NOT_ALLOWED => {
            ("METHOD_NOT_ALLOWED", "HTTP method not allowed for this endpoint")
        }
        StatusCode::UNSUPPORTED_MEDIA_TYPE => ("UNSUPPORTED_MEDIA_TYPE", "Unsupported media type"),
        StatusCode::PAYLOAD_TOO_LARGE => ("PAYLOAD_TOO_LARGE", "Request payload too large"),
        s if s.is_server_error() => ("INTERNAL_ERROR", "An internal server error occurred"),
        _ => ("UNKNOWN_ERROR", "An unknown error occurred"),
    };
    // server error bodies may carry internals
    let message = if original.is_empty() || status.is_server_error() {
        fallback.to_string()
    } else {
        original
    };

    let mut body = ErrorResponse::new(code, &message);
    if let Some(id) = &request_id {
        body = body.with_request_id(id);
    }
    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationFieldError;
    use axum::body::Body;
    use axum::{Router, middleware, routing::get};
    use tower::ServiceExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_client_error_mapping() {
        let cases = [
            (
                AppError::NotFound {
                    entity: "item".to_string(),
                    field: "id".to_string(),
                    value: "1".to_string(),
                },
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
            ),
            (
                AppError::ValidationErrors { errors: vec![] },
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
            ),
            (
                AppError::BadRequest {
                    message: "bad".to_string(),
                },
                StatusCode::BAD_REQUEST,
                "BAD_REQUEST",
            ),
            (
                AppError::InvalidPagination {
                    message: "bad".to_string(),
                },
                StatusCode::BAD_REQUEST,
                "INVALID_PAGINATION",
            ),
            (
                AppError::InvalidCursor {
                    message: "bad".to_string(),
                },
                StatusCode::BAD_REQUEST,
                "INVALID_CURSOR",
            ),
        ];
        for (error, status, code) in cases {
            assert_eq!(error_to_status_code(&error), status);
            assert_eq!(error_to_code(&error), code);
        }
    }

    #[test]
    fn test_server_error_mapping() {
        let cases = [
            (
                AppError::Pagination {
                    source: anyhow::anyhow!("boom"),
                },
                "PAGINATION_ERROR",
            ),
            (AppError::query("find items", anyhow::anyhow!("boom")), "QUERY_ERROR"),
            (
                AppError::Configuration {
                    key: "pagination.max_limit".to_string(),
                    source: anyhow::anyhow!("boom"),
                },
                "CONFIGURATION_ERROR",
            ),
            (
                AppError::Internal {
                    source: anyhow::anyhow!("boom"),
                },
                "INTERNAL_ERROR",
            ),
        ];
        for (error, code) in cases {
            assert_eq!(error_to_status_code(&error), StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(error_to_code(&error), code);
        }
    }

    #[tokio::test]
    async fn test_internal_error_is_sanitized() {
        let error = AppError::Internal {
            source: anyhow::anyhow!("secret connection string"),
        };
        let response = error_to_response_with_request_id(error, Some("req-9".to_string()));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["code"], "INTERNAL_ERROR");
        assert_eq!(body["request_id"], "req-9");
        assert!(!body.to_string().contains("secret"));
    }

    #[tokio::test]
    async fn test_validation_errors_body() {
        let error = AppError::ValidationErrors {
            errors: vec![ValidationFieldError {
                field: "title".to_string(),
                message: "too short".to_string(),
            }],
        };
        let body = body_json(error.into_response()).await;
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["details"]["errors"][0]["message"], "too short");
    }

    fn router() -> Router {
        Router::new()
            .route("/boom", get(|| async { AppError::BadRequest { message: "nope".to_string() } }))
            .layer(middleware::from_fn(global_error_handler))
            .layer(middleware::from_fn(crate::api::middleware::request_id_middleware))
    }

    #[tokio::test]
    async fn test_global_handler_converts_unmatched_route() {
        let response = router()
            .oneshot(Request::builder().uri("/missing").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["code"], "NOT_FOUND");
        assert!(body["request_id"].is_string());
    }

    #[tokio::test]
    async fn test_global_handler_adds_request_id_to_json_errors() {
        let response = router()
            .oneshot(
                Request::builder()
                    .uri("/boom")
                    .header("x-request-id", "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["code"], "BAD_REQUEST");
        assert_eq!(body["message"], "nope");
        assert_eq!(body["request_id"], "abc-123");
    }
}
