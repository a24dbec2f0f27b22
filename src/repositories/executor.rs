//! Storage-agnostic read contract used by paginated listings.

use async_trait::async_trait;

use crate::error::AppResult;
use crate::pagination::{Filter, FindOptions};

/// Rows returned by a read.
///
/// `total` counts every row matching the filter, ignoring skip and limit.
/// Executors fill it for offset reads and may leave it out for cursor reads.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult<T> {
    pub results: Vec<T>,
    pub total: Option<u64>,
}

/// Runs filter/option reads against a document store.
#[async_trait]
pub trait QueryExecutor<T>: Send + Sync {
    async fn find(&self, filter: &Filter, options: &FindOptions) -> AppResult<QueryResult<T>>;

    async fn count(&self, filter: &Filter) -> AppResult<u64>;
}
