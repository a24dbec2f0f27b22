//! Item-related DTOs for API requests and responses.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::{Item, NewItem};

// ============================================================================
// Request DTOs
// ============================================================================

/// Request body for creating an item.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    #[validate(length(min = 1, max = 120, message = "Title must be between 1 and 120 characters"))]
    #[schema(min_length = 1, max_length = 120, example = "Mechanical keyboard")]
    pub title: String,
    #[validate(length(min = 1, max = 40, message = "Category must be between 1 and 40 characters"))]
    #[schema(min_length = 1, max_length = 40, example = "tools")]
    pub category: String,
    #[validate(range(min = 0, message = "Price cannot be negative"))]
    #[schema(minimum = 0, example = 4999)]
    pub price_cents: i64,
}

impl CreateItemRequest {
    pub fn into_new_item(self) -> NewItem {
        NewItem {
            title: self.title,
            category: self.category,
            price_cents: self.price_cents,
        }
    }
}

/// Listing filters accepted next to the pagination parameters.
///
/// `page`, `limit`, `cursor`, `before`, `after`, `sortBy` and `sortOrder`
/// are read by the pagination middleware and documented here for OpenAPI.
#[derive(Debug, Deserialize, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct ItemListQuery {
    /// Only return items in this category
    #[validate(length(min = 1, max = 40, message = "Category must be between 1 and 40 characters"))]
    pub category: Option<String>,
    /// Page number, offset listings only
    #[param(minimum = 1, example = 1)]
    pub page: Option<String>,
    /// Page size, clamped to the configured bounds
    #[param(example = 20)]
    pub limit: Option<String>,
    /// Boundary from a previous `nextCursor`, cursor listings only
    #[param(example = "2023-06-01T00:00:00Z")]
    pub cursor: Option<String>,
    /// Explicit upper boundary, always exclusive `<`
    pub before: Option<String>,
    /// Explicit lower boundary, always exclusive `>`
    pub after: Option<String>,
    #[param(example = "createdAt")]
    pub sort_by: Option<String>,
    #[param(example = "desc")]
    pub sort_order: Option<String>,
}

// ============================================================================
// Response DTOs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    pub id: Uuid,
    #[schema(example = "Item 1")]
    pub title: String,
    #[schema(example = "books")]
    pub category: String,
    #[schema(example = 500)]
    pub price_cents: i64,
    #[schema(value_type = String, format = DateTime, example = "2023-06-02T00:00:00Z")]
    pub created_at: jiff::Timestamp,
}

impl From<Item> for ItemResponse {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            title: item.title,
            category: item.category,
            price_cents: item.price_cents,
            created_at: item.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_validation() {
        let valid = CreateItemRequest {
            title: "Lamp".to_string(),
            category: "home".to_string(),
            price_cents: 1200,
        };
        assert!(valid.validate().is_ok());

        let invalid = CreateItemRequest {
            title: String::new(),
            category: "home".to_string(),
            price_cents: -1,
        };
        let errors = invalid.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));
        assert!(errors.field_errors().contains_key("price_cents"));
    }

    #[test]
    fn test_create_request_reads_camel_case() {
        let request: CreateItemRequest =
            serde_json::from_str(r#"{"title":"Lamp","category":"home","priceCents":1200}"#)
                .unwrap();
        assert_eq!(request.into_new_item().price_cents, 1200);
    }

    #[test]
    fn test_item_response_keeps_cursor_field_name() {
        let item = Item {
            id: Uuid::nil(),
            title: "Lamp".to_string(),
            category: "home".to_string(),
            price_cents: 1200,
            created_at: "2023-06-01T00:00:00Z".parse().unwrap(),
        };
        let value = serde_json::to_value(ItemResponse::from(item)).unwrap();
        assert_eq!(value["createdAt"], "2023-06-01T00:00:00Z");
        assert_eq!(value["priceCents"], 1200);
    }
}
