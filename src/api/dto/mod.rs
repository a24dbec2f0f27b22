//! Data Transfer Objects for API requests and responses.
//!
//! DTOs are organized by domain:
//! - `item` - Catalog item request/response DTOs
//! - `response` - Paginated success envelope
//! - `error` - Common error response DTOs
//! - `health` - Health check DTOs

mod error;
mod health;
mod item;
mod response;

pub use error::ErrorResponse;
pub use health::{HealthResponse, HealthStatus};
pub use item::{CreateItemRequest, ItemListQuery, ItemResponse};
pub use response::{DEFAULT_MESSAGE, PaginatedResponse, ResponseMeta, send_paginated_response};
