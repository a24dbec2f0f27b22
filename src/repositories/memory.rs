//! In-process document collection.
//!
//! Items are kept next to their JSON projection so filters and sorts run on
//! the same field names clients see.

use std::cmp::Ordering;

use anyhow::anyhow;
use async_trait::async_trait;
use jiff::Timestamp;
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use crate::error::{AppError, AppResult};
use crate::pagination::{Clause, Filter, FindOptions, SortOrder};
use crate::repositories::executor::{QueryExecutor, QueryResult};

struct Document<T> {
    item: T,
    projection: Map<String, Value>,
}

/// A collection of serializable items supporting paginated reads.
///
/// Constructed explicitly and shared through application state.
pub struct MemoryCollection<T> {
    name: String,
    documents: RwLock<Vec<Document<T>>>,
}

impl<T> MemoryCollection<T>
where
    T: Serialize + Clone + Send + Sync,
{
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            documents: RwLock::new(Vec::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stores `item`. Fails if it does not serialize to a JSON object.
    pub async fn insert(&self, item: T) -> AppResult<()> {
        let projection = self.project(&item)?;
        self.documents
            .write()
            .await
            .push(Document { item, projection });
        Ok(())
    }

    pub async fn insert_many(&self, items: impl IntoIterator<Item = T>) -> AppResult<usize> {
        let documents = items
            .into_iter()
            .map(|item| {
                let projection = self.project(&item)?;
                Ok(Document { item, projection })
            })
            .collect::<AppResult<Vec<_>>>()?;

        let inserted = documents.len();
        self.documents.write().await.extend(documents);
        Ok(inserted)
    }

    fn project(&self, item: &T) -> AppResult<Map<String, Value>> {
        match serde_json::to_value(item) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(AppError::query(
                format!("insert into {}", self.name),
                anyhow!("documents must serialize to a JSON object, got {}", other),
            )),
            Err(e) => Err(AppError::query(format!("insert into {}", self.name), e)),
        }
    }
}

/// Reads a field as a point in time: RFC 3339 strings or epoch milliseconds.
fn field_timestamp(value: Option<&Value>) -> Option<Timestamp> {
    match value? {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => Timestamp::from_millisecond(n.as_i64()?).ok(),
        _ => None,
    }
}

fn matches(projection: &Map<String, Value>, filter: &Filter) -> bool {
    filter.iter().all(|(field, clause)| match clause {
        Clause::Eq(expected) => projection.get(field) == Some(expected),
        Clause::Lt(bound) => field_timestamp(projection.get(field)).is_some_and(|ts| ts < *bound),
        Clause::Gt(bound) => field_timestamp(projection.get(field)).is_some_and(|ts| ts > *bound),
    })
}

/// Ordering key for one field value. Variant order ranks mixed types.
#[derive(PartialEq, PartialOrd)]
enum SortKey<'a> {
    Missing,
    Number(f64),
    Time(Timestamp),
    Text(&'a str),
    Other,
}

impl<'a> SortKey<'a> {
    fn of(value: Option<&'a Value>) -> Self {
        match value {
            None | Some(Value::Null) => SortKey::Missing,
            Some(Value::Number(n)) => n.as_f64().map_or(SortKey::Other, SortKey::Number),
            Some(Value::String(s)) => match s.parse::<Timestamp>() {
                Ok(ts) => SortKey::Time(ts),
                Err(_) => SortKey::Text(s),
            },
            Some(_) => SortKey::Other,
        }
    }
}

fn compare_field(a: &Map<String, Value>, b: &Map<String, Value>, field: &str) -> Ordering {
    SortKey::of(a.get(field))
        .partial_cmp(&SortKey::of(b.get(field)))
        .unwrap_or(Ordering::Equal)
}

fn to_usize(value: u64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

#[async_trait]
impl<T> QueryExecutor<T> for MemoryCollection<T>
where
    T: Serialize + Clone + Send + Sync,
{
    async fn find(&self, filter: &Filter, options: &FindOptions) -> AppResult<QueryResult<T>> {
        let documents = self.documents.read().await;

        let mut matched: Vec<&Document<T>> = documents
            .iter()
            .filter(|doc| matches(&doc.projection, filter))
            .collect();

        // stable, so equal keys keep insertion order
        let field = options.sort.field.as_str();
        matched.sort_by(|a, b| {
            let ordering = compare_field(&a.projection, &b.projection, field);
            match options.sort.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        let total = options.skip.map(|_| matched.len() as u64);
        let results = matched
            .into_iter()
            .skip(to_usize(options.skip.unwrap_or(0)))
            .take(to_usize(options.limit))
            .map(|doc| doc.item.clone())
            .collect();

        Ok(QueryResult { results, total })
    }

    async fn count(&self, filter: &Filter) -> AppResult<u64> {
        let documents = self.documents.read().await;
        Ok(documents
            .iter()
            .filter(|doc| matches(&doc.projection, filter))
            .count() as u64)
    }
}
