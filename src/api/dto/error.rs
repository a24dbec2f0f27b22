//! Error response DTOs.

use serde::Serialize;
use serde_json::{Value, json};
use utoipa::ToSchema;

use crate::error::ValidationFieldError;

/// Standard error response format.
#[derive(Debug, Serialize, ToSchema)]
#[schema(example = json!({
    "code": "INVALID_CURSOR",
    "message": "Invalid cursor boundary 'yesterday': expected an ISO-8601 timestamp",
    "request_id": "5f0c7a7e-2b8f-4e0a-9a57-3c1f4b2d9e10"
}))]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl ErrorResponse {
    /// Creates a new error response with code and message.
    pub fn new(code: &str, message: &str) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            details: None,
            request_id: None,
        }
    }

    /// Adds structured details to the error response.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Adds request ID to the error response for correlation.
    pub fn with_request_id(mut self, request_id: &str) -> Self {
        self.request_id = Some(request_id.to_string());
        self
    }

    pub fn not_found_error(entity: &str, field: &str, value: &str) -> Self {
        Self::new("NOT_FOUND", &format!("{} with {} '{}' not found", entity, field, value))
            .with_details(json!({
                "entity": entity,
                "field": field,
                "value": value
            }))
    }

    pub fn validation_errors(errors: &[ValidationFieldError]) -> Self {
        Self::new("VALIDATION_ERROR", "Request validation failed")
            .with_details(json!({ "errors": errors }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_fields_are_skipped() {
        let value = serde_json::to_value(ErrorResponse::new("BAD_REQUEST", "nope")).unwrap();
        assert_eq!(value, json!({"code": "BAD_REQUEST", "message": "nope"}));
    }

    #[test]
    fn test_validation_errors_details() {
        let errors = vec![ValidationFieldError {
            field: "title".to_string(),
            message: "too short".to_string(),
        }];
        let value = serde_json::to_value(
            ErrorResponse::validation_errors(&errors).with_request_id("req-1"),
        )
        .unwrap();
        assert_eq!(value["code"], "VALIDATION_ERROR");
        assert_eq!(value["details"]["errors"][0]["field"], "title");
        assert_eq!(value["request_id"], "req-1");
    }
}
