//! Pagination middleware.
//!
//! Parses pagination parameters once per request and hands handlers a
//! [`Pagination`] through the request extensions.

use std::sync::Arc;

use anyhow::anyhow;
use axum::{
    extract::{FromRequestParts, Query, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use tracing::{error, warn};

use crate::api::middleware::RequestId;
use crate::api::middleware::error_handler::error_to_response_with_request_id;
use crate::error::AppError;
use crate::pagination::{Pagination, PaginationOptions, RawPaginationQuery, parse_pagination_params};

/// Middleware that attaches a [`Pagination`] to every request.
///
/// # Behavior
/// - An unreadable query string is answered with 500 `PAGINATION_ERROR`
/// - A descriptor that fails its validity check is answered with 400
///   `INVALID_PAGINATION`
/// - Otherwise the request continues with the descriptor in its extensions
///
/// Both rejections are logged with the raw query string.
pub async fn pagination_middleware(
    State(options): State<Arc<PaginationOptions>>,
    mut request: Request,
    next: Next,
) -> Response {
    let request_id = request.extensions().get::<RequestId>().map(|r| r.0.clone());
    let raw_query = request.uri().query().unwrap_or_default().to_string();

    // String pairs decode lossily (bad escapes become U+FFFD), so the error
    // arm cannot fire for this target type.
    let raw = match Query::<Vec<(String, String)>>::try_from_uri(request.uri()) {
        Ok(Query(pairs)) => pairs.into_iter().collect::<RawPaginationQuery>(),
        Err(rejection) => {
            let reason = rejection.body_text();
            error!(
                query = %raw_query,
                error = %reason,
                request_id = request_id.as_deref().unwrap_or("unknown"),
                "Failed to read pagination parameters"
            );
            return error_to_response_with_request_id(
                AppError::Pagination {
                    source: anyhow!(reason),
                },
                request_id,
            );
        }
    };

    let descriptor = parse_pagination_params(&raw, &options);
    if !descriptor.is_valid {
        warn!(
            query = %raw_query,
            page = descriptor.page,
            limit = descriptor.limit,
            min_limit = options.min_limit,
            max_limit = options.max_limit,
            request_id = request_id.as_deref().unwrap_or("unknown"),
            "Rejected pagination parameters"
        );
        let message = format!(
            "page and limit must be positive (page={}, limit={})",
            descriptor.page, descriptor.limit
        );
        return error_to_response_with_request_id(AppError::InvalidPagination { message }, request_id);
    }

    request.extensions_mut().insert(Pagination::new(descriptor));
    next.run(request).await
}

impl<S> FromRequestParts<S> for Pagination
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Pagination>().cloned().ok_or_else(|| {
            error!(path = %parts.uri.path(), "Route is not behind the pagination middleware");
            AppError::Pagination {
                source: anyhow!("pagination middleware is not installed for {}", parts.uri.path()),
            }
        })
    }
}
