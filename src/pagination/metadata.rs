//! Response-facing pagination metadata.

use serde::Serialize;
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::pagination::descriptor::PaginationDescriptor;

/// Caller-supplied extra fields merged into metadata (e.g. `queryTime`).
pub type Extensions = Map<String, Value>;

/// Metadata for page-number pagination.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OffsetMetadata {
    #[schema(example = 2)]
    pub page: u32,
    #[schema(example = 20)]
    pub limit: u32,
    #[schema(example = 50)]
    pub total: u64,
    #[schema(example = 3)]
    pub total_pages: u64,
    /// Number of items in this page
    #[schema(example = 20)]
    pub count: u64,
    pub has_next: bool,
    pub has_prev: bool,
    pub next_page: Option<u32>,
    pub prev_page: Option<u32>,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extensions: Extensions,
}

/// Metadata for boundary-based pagination.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CursorMetadata {
    #[schema(example = 20)]
    pub limit: u32,
    /// Number of items in this page, never counting the look-ahead row
    #[schema(example = 20)]
    pub count: u64,
    pub has_more: bool,
    /// The cursor the client sent
    pub cursor: Option<String>,
    #[schema(value_type = Option<String>)]
    pub next_cursor: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub prev_cursor: Option<Value>,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extensions: Extensions,
}

/// A cursor page with the look-ahead row already dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct CursorPage<T> {
    pub items: Vec<T>,
    pub metadata: CursorMetadata,
}

/// Reads `field` from the serialized form of `item`.
fn field_value<T: Serialize>(item: &T, field: &str) -> Option<Value> {
    match serde_json::to_value(item).ok()? {
        Value::Object(mut map) => map.remove(field).filter(|v| !v.is_null()),
        _ => None,
    }
}

impl PaginationDescriptor {
    /// Builds page-number metadata from a total and the size of the current page.
    pub fn create_offset_metadata(
        &self,
        total: u64,
        count: u64,
        extensions: Extensions,
    ) -> OffsetMetadata {
        let total_pages = if self.limit == 0 {
            0
        } else {
            total.div_ceil(u64::from(self.limit))
        };
        let has_next = u64::from(self.page) < total_pages;
        let has_prev = self.page > 1;

        OffsetMetadata {
            page: self.page,
            limit: self.limit,
            total,
            total_pages,
            count,
            has_next,
            has_prev,
            next_page: has_next.then(|| self.page.saturating_add(1)),
            prev_page: has_prev.then(|| self.page - 1),
            extensions,
        }
    }

    /// Truncates an over-fetched result set and builds cursor metadata.
    ///
    /// `results` is expected to come from a query built by
    /// [`create_cursor_query`](Self::create_cursor_query), i.e. up to
    /// `limit + 1` rows. The extra row only signals `has_more`; it is dropped
    /// before either cursor is read.
    pub fn create_cursor_metadata<T: Serialize>(
        &self,
        mut results: Vec<T>,
        cursor_field: &str,
        extensions: Extensions,
    ) -> CursorPage<T> {
        let limit = self.limit as usize;
        let has_more = results.len() > limit;
        if has_more {
            results.truncate(limit);
        }

        let next_cursor = if has_more {
            results.last().and_then(|item| field_value(item, cursor_field))
        } else {
            None
        };
        let prev_cursor = results.first().and_then(|item| field_value(item, cursor_field));

        let metadata = CursorMetadata {
            limit: self.limit,
            count: results.len() as u64,
            has_more,
            cursor: self.cursor.clone(),
            next_cursor,
            prev_cursor,
            extensions,
        };

        CursorPage {
            items: results,
            metadata,
        }
    }
}
