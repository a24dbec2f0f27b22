//! Error types for the pagination engine

use thiserror::Error;

/// Errors raised while building or configuring pagination.
///
/// Malformed `page`/`limit`/`sortOrder` input is never an error; those values
/// are silently replaced with defaults during parsing.
#[derive(Debug, Error)]
pub enum PaginationError {
    /// A cursor boundary could not be read as a timestamp
    #[error("Invalid {param} boundary '{value}': expected an ISO-8601 timestamp")]
    InvalidCursor { param: &'static str, value: String },

    /// Pagination options are inconsistent
    #[error("Invalid pagination option {field}: {message}")]
    InvalidOptions { field: String, message: String },
}

impl PaginationError {
    pub fn invalid_cursor(param: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidCursor {
            param,
            value: value.into(),
        }
    }

    pub fn options(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidOptions {
            field: field.into(),
            message: message.into(),
        }
    }
}
