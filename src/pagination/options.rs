//! Pagination options and sort direction.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::pagination::error::PaginationError;

fn default_limit() -> u32 {
    20
}

fn default_max_limit() -> u32 {
    100
}

fn default_min_limit() -> u32 {
    1
}

fn default_page() -> u32 {
    1
}

fn default_min_page() -> u32 {
    1
}

fn default_field() -> String {
    "createdAt".to_string()
}

/// Sort direction for single-field sorts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Accepts exactly `"asc"` or `"desc"`. Case variants are rejected.
    pub fn parse_strict(value: &str) -> Option<Self> {
        match value {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    /// Document-store direction: `1` ascending, `-1` descending.
    pub fn direction(&self) -> i8 {
        match self {
            SortOrder::Asc => 1,
            SortOrder::Desc => -1,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Knobs controlling how raw request parameters become a descriptor.
///
/// Loaded from the `[pagination]` configuration section; every field falls
/// back to its default when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationOptions {
    /// Limit used when the request omits `limit` or sends garbage
    #[serde(default = "default_limit")]
    pub default_limit: u32,

    /// Upper clamp for `limit`
    #[serde(default = "default_max_limit")]
    pub max_limit: u32,

    /// Lower clamp for `limit`
    #[serde(default = "default_min_limit")]
    pub min_limit: u32,

    /// Page used when the request omits `page` or sends garbage
    #[serde(default = "default_page")]
    pub default_page: u32,

    /// Lower clamp for `page`
    #[serde(default = "default_min_page")]
    pub min_page: u32,

    /// Field compared against cursor boundaries
    #[serde(default = "default_field")]
    pub cursor_field: String,

    /// Sort key used when the request omits `sortBy`
    #[serde(default = "default_field")]
    pub sort_field: String,

    /// Sort direction used when the request omits or garbles `sortOrder`
    #[serde(default)]
    pub sort_order: SortOrder,
}

impl Default for PaginationOptions {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
            min_limit: default_min_limit(),
            default_page: default_page(),
            min_page: default_min_page(),
            cursor_field: default_field(),
            sort_field: default_field(),
            sort_order: SortOrder::default(),
        }
    }
}

impl PaginationOptions {
    /// Checks the options are internally consistent.
    ///
    /// The parser never rejects request input, so a bad option set is the only
    /// way to produce a descriptor with `is_valid == false`. Catch it at startup.
    pub fn validate(&self) -> Result<(), PaginationError> {
        if self.min_limit == 0 {
            return Err(PaginationError::options("min_limit", "must be at least 1"));
        }
        if self.min_limit > self.max_limit {
            return Err(PaginationError::options(
                "min_limit",
                format!(
                    "min_limit ({}) cannot exceed max_limit ({})",
                    self.min_limit, self.max_limit
                ),
            ));
        }
        if self.min_page == 0 {
            return Err(PaginationError::options("min_page", "must be at least 1"));
        }
        if self.cursor_field.trim().is_empty() {
            return Err(PaginationError::options("cursor_field", "cannot be empty"));
        }
        if self.sort_field.trim().is_empty() {
            return Err(PaginationError::options("sort_field", "cannot be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = PaginationOptions::default();
        assert_eq!(options.default_limit, 20);
        assert_eq!(options.max_limit, 100);
        assert_eq!(options.min_limit, 1);
        assert_eq!(options.default_page, 1);
        assert_eq!(options.min_page, 1);
        assert_eq!(options.cursor_field, "createdAt");
        assert_eq!(options.sort_field, "createdAt");
        assert_eq!(options.sort_order, SortOrder::Desc);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_sort_order_parse_strict() {
        assert_eq!(SortOrder::parse_strict("asc"), Some(SortOrder::Asc));
        assert_eq!(SortOrder::parse_strict("desc"), Some(SortOrder::Desc));
        assert_eq!(SortOrder::parse_strict("ASC"), None);
        assert_eq!(SortOrder::parse_strict("Desc"), None);
        assert_eq!(SortOrder::parse_strict(""), None);
    }

    #[test]
    fn test_sort_order_direction() {
        assert_eq!(SortOrder::Asc.direction(), 1);
        assert_eq!(SortOrder::Desc.direction(), -1);
    }

    #[test]
    fn test_validate_rejects_zero_min_limit() {
        let options = PaginationOptions {
            min_limit: 0,
            ..Default::default()
        };
        assert!(matches!(
            options.validate(),
            Err(PaginationError::InvalidOptions { ref field, .. }) if field == "min_limit"
        ));
    }

    #[test]
    fn test_validate_rejects_inverted_limits() {
        let options = PaginationOptions {
            min_limit: 50,
            max_limit: 10,
            ..Default::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_cursor_field() {
        let options = PaginationOptions {
            cursor_field: "  ".to_string(),
            ..Default::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_deserialize_partial() {
        let options: PaginationOptions =
            serde_json::from_str(r#"{"max_limit": 50, "sort_order": "asc"}"#).unwrap();
        assert_eq!(options.max_limit, 50);
        assert_eq!(options.default_limit, 20);
        assert_eq!(options.sort_order, SortOrder::Asc);
    }
}
