//! Success envelope for paginated listings.

use axum::Json;
use jiff::Timestamp;
use serde::Serialize;
use serde_json::{Map, Value};
use utoipa::ToSchema;

pub const DEFAULT_MESSAGE: &str = "Data retrieved successfully";

/// `meta` block of the envelope: the response time plus caller fields.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ResponseMeta {
    /// Response time, unless the caller supplied its own
    #[schema(value_type = String, format = DateTime, example = "2024-01-01T12:00:00Z")]
    pub timestamp: Value,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: Map<String, Value>,
}

/// `{ success, message, data, pagination, meta }`
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PaginatedResponse<T, M> {
    #[schema(example = true)]
    pub success: bool,
    #[schema(example = "Data retrieved successfully")]
    pub message: String,
    pub data: Vec<T>,
    pub pagination: M,
    pub meta: ResponseMeta,
}

/// Wraps a page of data and its metadata in the response envelope.
///
/// `extra_meta` keys are merged into `meta` after `timestamp`, so a caller
/// `timestamp` replaces the generated one.
pub fn send_paginated_response<T, M>(
    data: Vec<T>,
    metadata: M,
    message: Option<&str>,
    extra_meta: Map<String, Value>,
) -> Json<PaginatedResponse<T, M>>
where
    T: Serialize,
    M: Serialize,
{
    let mut extra = extra_meta;
    let timestamp = extra
        .remove("timestamp")
        .unwrap_or_else(|| Value::String(Timestamp::now().to_string()));

    Json(PaginatedResponse {
        success: true,
        message: message.unwrap_or(DEFAULT_MESSAGE).to_string(),
        data,
        pagination: metadata,
        meta: ResponseMeta {
            timestamp,
            extra,
        },
    })
}
