//! Request parameter parsing into a [`PaginationDescriptor`].

use std::collections::HashMap;

use serde::Serialize;

use crate::pagination::options::{PaginationOptions, SortOrder};

/// Untyped pagination parameters as they arrive on the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawPaginationQuery {
    params: HashMap<String, String>,
}

impl RawPaginationQuery {
    pub fn new(params: HashMap<String, String>) -> Self {
        Self { params }
    }

    /// Returns the parameter value, treating an empty string as absent.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl From<HashMap<String, String>> for RawPaginationQuery {
    fn from(params: HashMap<String, String>) -> Self {
        Self::new(params)
    }
}

/// A key repeated in the input keeps its first value.
impl<K, V> FromIterator<(K, V)> for RawPaginationQuery
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = HashMap::new();
        for (key, value) in iter {
            params.entry(key.into()).or_insert_with(|| value.into());
        }
        Self::new(params)
    }
}

/// Normalized pagination request. Built once per request and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationDescriptor {
    pub page: u32,
    pub limit: u32,
    pub skip: u64,
    pub cursor: Option<String>,
    pub before: Option<String>,
    pub after: Option<String>,
    pub cursor_field: String,
    pub sort_by: String,
    pub sort_order: SortOrder,
    pub is_valid: bool,
}

/// Reads the leading integer of `value`, ignoring surrounding junk.
///
/// `"10abc"` reads as 10 and `"3.7"` as 3. Returns `None` when no digits lead
/// the string. Out-of-range values saturate.
fn leading_integer(value: &str) -> Option<i64> {
    let trimmed = value.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits: &str = &digits[..digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len())];
    if digits.is_empty() {
        return None;
    }

    let magnitude = digits.bytes().fold(0i64, |acc, b| {
        acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
    });
    Some(if negative { -magnitude } else { magnitude })
}

/// Zero and unparseable input take the default; negatives are left to the clamp.
fn number_or_default(value: Option<&str>, default: u32) -> i64 {
    match value.and_then(leading_integer) {
        Some(0) | None => i64::from(default),
        Some(n) => n,
    }
}

fn clamp_to_u32(value: i64, min: u32, max: u32) -> u32 {
    // with max < min (unvalidated options) the lower bound wins
    let upper = value.min(i64::from(max));
    upper.max(i64::from(min)) as u32
}

/// Parses raw request parameters into a descriptor.
///
/// Never fails: malformed numbers and unknown sort directions fall back to
/// the configured defaults, and out-of-range values are clamped.
pub fn parse_pagination_params(
    raw: &RawPaginationQuery,
    options: &PaginationOptions,
) -> PaginationDescriptor {
    let page_value = number_or_default(raw.get("page"), options.default_page);
    let page = clamp_to_u32(page_value, options.min_page, u32::MAX);

    let limit_value = number_or_default(raw.get("limit"), options.default_limit);
    let limit = clamp_to_u32(limit_value, options.min_limit, options.max_limit);

    let skip = u64::from(page.saturating_sub(1)) * u64::from(limit);

    let sort_by = raw
        .get("sortBy")
        .map(str::to_string)
        .unwrap_or_else(|| options.sort_field.clone());
    let sort_order = raw
        .get("sortOrder")
        .and_then(SortOrder::parse_strict)
        .unwrap_or(options.sort_order);

    PaginationDescriptor {
        page,
        limit,
        skip,
        cursor: raw.get("cursor").map(str::to_string),
        before: raw.get("before").map(str::to_string),
        after: raw.get("after").map(str::to_string),
        cursor_field: options.cursor_field.clone(),
        sort_by,
        sort_order,
        is_valid: page > 0 && limit > 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn query(pairs: &[(&str, &str)]) -> RawPaginationQuery {
        pairs.iter().map(|(k, v)| (*k, *v)).collect()
    }

    fn parse(pairs: &[(&str, &str)]) -> PaginationDescriptor {
        parse_pagination_params(&query(pairs), &PaginationOptions::default())
    }

    #[test]
    fn test_repeated_key_keeps_first_value() {
        let raw = query(&[("limit", "5"), ("page", "2"), ("limit", "500")]);
        assert_eq!(raw.get("limit"), Some("5"));
        assert_eq!(raw.len(), 2);
        assert_eq!(parse_pagination_params(&raw, &PaginationOptions::default()).limit, 5);
    }

    #[test]
    fn test_empty_query_uses_defaults() {
        let d = parse(&[]);
        assert_eq!(d.page, 1);
        assert_eq!(d.limit, 20);
        assert_eq!(d.skip, 0);
        assert_eq!(d.cursor, None);
        assert_eq!(d.before, None);
        assert_eq!(d.after, None);
        assert_eq!(d.cursor_field, "createdAt");
        assert_eq!(d.sort_by, "createdAt");
        assert_eq!(d.sort_order, SortOrder::Desc);
        assert!(d.is_valid);
    }

    #[test]
    fn test_limit_above_max_clamps_to_max() {
        assert_eq!(parse(&[("limit", "200")]).limit, 100);
    }

    #[test]
    fn test_negative_limit_clamps_to_min() {
        assert_eq!(parse(&[("limit", "-5")]).limit, 1);
    }

    #[test]
    fn test_zero_limit_falls_back_to_default() {
        assert_eq!(parse(&[("limit", "0")]).limit, 20);
    }

    #[test]
    fn test_zero_limit_with_default_below_min_clamps_up() {
        let options = PaginationOptions {
            default_limit: 0,
            min_limit: 5,
            ..Default::default()
        };
        let d = parse_pagination_params(&query(&[("limit", "0")]), &options);
        assert_eq!(d.limit, 5);
    }

    #[test]
    fn test_non_numeric_values_fall_back() {
        let d = parse(&[("page", "abc"), ("limit", "lots")]);
        assert_eq!(d.page, 1);
        assert_eq!(d.limit, 20);
    }

    #[test]
    fn test_leading_integer_is_lenient() {
        let d = parse(&[("page", "3.7"), ("limit", "10abc")]);
        assert_eq!(d.page, 3);
        assert_eq!(d.limit, 10);
        assert_eq!(d.skip, 20);
    }

    #[test]
    fn test_negative_page_clamps_to_min_page() {
        assert_eq!(parse(&[("page", "-3")]).page, 1);
        assert_eq!(parse(&[("page", "0")]).page, 1);
    }

    #[test]
    fn test_skip_derivation() {
        let d = parse(&[("page", "3"), ("limit", "10")]);
        assert_eq!(d.skip, 20);
    }

    #[test]
    fn test_huge_page_saturates() {
        let d = parse(&[("page", "99999999999999999999999")]);
        assert_eq!(d.page, u32::MAX);
        assert_eq!(d.skip, u64::from(u32::MAX - 1) * 20);
    }

    #[test]
    fn test_boundaries_pass_through_verbatim() {
        let d = parse(&[
            ("cursor", "2023-06-01T00:00:00Z"),
            ("before", "not-a-date"),
            ("after", "2023-01-01"),
        ]);
        assert_eq!(d.cursor.as_deref(), Some("2023-06-01T00:00:00Z"));
        assert_eq!(d.before.as_deref(), Some("not-a-date"));
        assert_eq!(d.after.as_deref(), Some("2023-01-01"));
    }

    #[test]
    fn test_empty_boundary_is_absent() {
        assert_eq!(parse(&[("cursor", "")]).cursor, None);
    }

    #[test]
    fn test_sort_by_passes_through() {
        assert_eq!(parse(&[("sortBy", "price")]).sort_by, "price");
    }

    #[test]
    fn test_sort_order_rejects_case_variants() {
        assert_eq!(parse(&[("sortOrder", "asc")]).sort_order, SortOrder::Asc);
        assert_eq!(parse(&[("sortOrder", "ASC")]).sort_order, SortOrder::Desc);
        assert_eq!(parse(&[("sortOrder", "sideways")]).sort_order, SortOrder::Desc);
    }

    #[test]
    fn test_sort_order_falls_back_to_configured_default() {
        let options = PaginationOptions {
            sort_order: SortOrder::Asc,
            ..Default::default()
        };
        let d = parse_pagination_params(&query(&[("sortOrder", "up")]), &options);
        assert_eq!(d.sort_order, SortOrder::Asc);
    }

    #[test]
    fn test_unvalidated_zero_limit_options_yield_invalid_descriptor() {
        let options = PaginationOptions {
            default_limit: 0,
            min_limit: 0,
            max_limit: 0,
            ..Default::default()
        };
        let d = parse_pagination_params(&query(&[]), &options);
        assert_eq!(d.limit, 0);
        assert!(!d.is_valid);
    }

    #[test]
    fn test_leading_integer() {
        assert_eq!(leading_integer("42"), Some(42));
        assert_eq!(leading_integer("  7"), Some(7));
        assert_eq!(leading_integer("+8"), Some(8));
        assert_eq!(leading_integer("-12x"), Some(-12));
        assert_eq!(leading_integer("x12"), None);
        assert_eq!(leading_integer("-"), None);
        assert_eq!(leading_integer(""), None);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_limit_always_within_bounds(limit in any::<i64>()) {
            let d = parse(&[("limit", limit.to_string().as_str())]);
            prop_assert!((1..=100).contains(&d.limit));
            prop_assert!(d.is_valid);
        }

        #[test]
        fn prop_skip_matches_page_and_limit(page in 1u32..10_000, limit in 1u32..=100) {
            let d = parse(&[
                ("page", page.to_string().as_str()),
                ("limit", limit.to_string().as_str()),
            ]);
            prop_assert_eq!(d.skip, u64::from(d.page - 1) * u64::from(d.limit));
            prop_assert_eq!(d.page, page);
            prop_assert_eq!(d.limit, limit);
        }

        #[test]
        fn prop_parsing_is_idempotent(page in ".{0,8}", limit in ".{0,8}", order in ".{0,5}") {
            let raw = query(&[
                ("page", page.as_str()),
                ("limit", limit.as_str()),
                ("sortOrder", order.as_str()),
            ]);
            let options = PaginationOptions::default();
            prop_assert_eq!(
                parse_pagination_params(&raw, &options),
                parse_pagination_params(&raw, &options)
            );
        }
    }
}
