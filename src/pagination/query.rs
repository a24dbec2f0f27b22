//! Query construction for offset and cursor pagination.
//!
//! Builders are pure: they describe the read a query executor should run but
//! never execute it.

use std::collections::BTreeMap;

use jiff::Timestamp;
use jiff::civil::Date;
use jiff::tz::TimeZone;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::Value;

use crate::pagination::descriptor::PaginationDescriptor;
use crate::pagination::error::PaginationError;
use crate::pagination::options::SortOrder;

/// A single condition on one document field.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// Field equals the value
    Eq(Value),
    /// Field is strictly earlier than the timestamp
    Lt(Timestamp),
    /// Field is strictly later than the timestamp
    Gt(Timestamp),
}

impl Serialize for Clause {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Clause::Eq(value) => value.serialize(serializer),
            Clause::Lt(ts) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("$lt", ts)?;
                map.end()
            }
            Clause::Gt(ts) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("$gt", ts)?;
                map.end()
            }
        }
    }
}

/// Document-style filter: one clause per field, all clauses must hold.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Filter {
    clauses: BTreeMap<String, Clause>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an equality clause, builder style.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses.insert(field.into(), Clause::Eq(value.into()));
        self
    }

    /// Sets the clause for `field`, replacing any existing one.
    pub fn insert(&mut self, field: impl Into<String>, clause: Clause) {
        self.clauses.insert(field.into(), clause);
    }

    pub fn get(&self, field: &str) -> Option<&Clause> {
        self.clauses.get(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Clause)> {
        self.clauses.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

/// Single-field sort, serialized as `{field: 1}` or `{field: -1}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, order: SortOrder) -> Self {
        Self {
            field: field.into(),
            order,
        }
    }
}

impl Serialize for SortSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.field, &self.order.direction())?;
        map.end()
    }
}

/// Read options handed to a query executor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FindOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u64>,
    pub limit: u64,
    pub sort: SortSpec,
}

/// A filter plus read options, ready for a query executor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PagedQuery {
    pub filter: Filter,
    pub options: FindOptions,
}

/// Reads a boundary value as a point in time.
///
/// Accepts an RFC 3339 timestamp, a bare calendar date (midnight UTC) or
/// integer epoch milliseconds.
pub fn parse_boundary(param: &'static str, value: &str) -> Result<Timestamp, PaginationError> {
    let value = value.trim();

    if let Ok(ts) = value.parse::<Timestamp>() {
        return Ok(ts);
    }

    if let Ok(date) = value.parse::<Date>() {
        if let Ok(zoned) = date.to_zoned(TimeZone::UTC) {
            return Ok(zoned.timestamp());
        }
    }

    if let Ok(millis) = value.parse::<i64>() {
        if let Ok(ts) = Timestamp::from_millisecond(millis) {
            return Ok(ts);
        }
    }

    Err(PaginationError::invalid_cursor(param, value))
}

impl PaginationDescriptor {
    fn sort_spec(&self) -> SortSpec {
        SortSpec::new(self.sort_by.clone(), self.sort_order)
    }

    /// Builds a skip/limit read. The base filter is passed through unchanged.
    pub fn create_offset_query(&self, base_filter: &Filter) -> PagedQuery {
        PagedQuery {
            filter: base_filter.clone(),
            options: FindOptions {
                skip: Some(self.skip),
                limit: u64::from(self.limit),
                sort: self.sort_spec(),
            },
        }
    }

    /// Builds a boundary-filtered read that over-fetches by one row.
    ///
    /// Only one boundary applies, in priority `cursor`, `before`, `after`.
    /// `cursor` compares in the sort direction (`$lt` for desc, `$gt` for asc);
    /// `before` is always `$lt` and `after` always `$gt` whatever the sort.
    pub fn create_cursor_query(&self, base_filter: &Filter) -> Result<PagedQuery, PaginationError> {
        let boundary = if let Some(cursor) = &self.cursor {
            let ts = parse_boundary("cursor", cursor)?;
            Some(match self.sort_order {
                SortOrder::Desc => Clause::Lt(ts),
                SortOrder::Asc => Clause::Gt(ts),
            })
        } else if let Some(before) = &self.before {
            Some(Clause::Lt(parse_boundary("before", before)?))
        } else if let Some(after) = &self.after {
            Some(Clause::Gt(parse_boundary("after", after)?))
        } else {
            None
        };

        let mut filter = base_filter.clone();
        if let Some(clause) = boundary {
            filter.insert(self.cursor_field.clone(), clause);
        }

        Ok(PagedQuery {
            filter,
            options: FindOptions {
                skip: None,
                limit: u64::from(self.limit) + 1,
                sort: self.sort_spec(),
            },
        })
    }
}
