use serde::Serialize;
use thiserror::Error;

use crate::config::error::ConfigError;
use crate::pagination::PaginationError;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationFieldError {
    pub field: String,
    pub message: String,
}

/// Application-wide error type that represents all possible errors in the system.
///
/// Handlers return `AppResult<T>`; the error is turned into a JSON
/// [`ErrorResponse`](crate::api::dto::ErrorResponse) by the error handler.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found error with entity, field, and value information
    #[error("Resource not found: {entity} with {field}={value}")]
    NotFound {
        entity: String,
        field: String,
        value: String,
    },

    /// Several validation failures collected from a request body
    #[error("Validation failed: {} field error(s)", errors.len())]
    ValidationErrors { errors: Vec<ValidationFieldError> },

    /// Bad request error with descriptive message
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    /// Parsed pagination parameters failed the validity check
    #[error("Invalid pagination parameters: {message}")]
    InvalidPagination { message: String },

    /// A cursor boundary could not be read as a timestamp
    #[error("Invalid cursor: {message}")]
    InvalidCursor { message: String },

    /// Reading the pagination parameters failed outright
    #[error("Pagination processing failed")]
    Pagination {
        #[source]
        source: anyhow::Error,
    },

    /// Query executor failure with operation context
    #[error("Query failed: {operation}")]
    Query {
        operation: String,
        #[source]
        source: anyhow::Error,
    },

    /// Configuration error with key information
    #[error("Configuration error: {key}")]
    Configuration {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// Internal error for unexpected failures
    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    pub fn query(operation: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        AppError::Query {
            operation: operation.into(),
            source: source.into(),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

impl From<PaginationError> for AppError {
    fn from(error: PaginationError) -> Self {
        match error {
            PaginationError::InvalidCursor { .. } => AppError::InvalidCursor {
                message: error.to_string(),
            },
            PaginationError::InvalidOptions { ref field, .. } => {
                let key = format!("pagination.{}", field);
                AppError::Configuration {
                    key,
                    source: error.into(),
                }
            }
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        let key = match &error {
            ConfigError::ValidationError { field, .. } => field.clone(),
            _ => "settings".to_string(),
        };
        AppError::Configuration {
            key,
            source: error.into(),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut collected: Vec<ValidationFieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| ValidationFieldError {
                    field: field.to_string(),
                    message: err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string()),
                })
            })
            .collect();
        collected.sort_by(|a, b| a.field.cmp(&b.field));
        AppError::ValidationErrors { errors: collected }
    }
}

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        AppError::BadRequest {
            message: rejection.body_text(),
        }
    }
}

impl From<axum::extract::rejection::QueryRejection> for AppError {
    fn from(rejection: axum::extract::rejection::QueryRejection) -> Self {
        AppError::BadRequest {
            message: rejection.body_text(),
        }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;
