//! Item repository backed by an in-process collection.

use std::sync::Arc;

use uuid::Uuid;

use crate::error::AppResult;
use crate::models::Item;
use crate::pagination::{Filter, FindOptions, PagedQuery, SortOrder, SortSpec};
use crate::repositories::executor::{QueryExecutor, QueryResult};
use crate::repositories::memory::MemoryCollection;

/// Item repository.
///
/// Clones share the same collection.
#[derive(Clone)]
pub struct ItemRepository {
    collection: Arc<MemoryCollection<Item>>,
}

impl ItemRepository {
    pub fn new(collection: Arc<MemoryCollection<Item>>) -> Self {
        Self { collection }
    }

    pub async fn insert(&self, item: Item) -> AppResult<Item> {
        self.collection.insert(item.clone()).await?;
        Ok(item)
    }

    pub async fn insert_many(&self, items: Vec<Item>) -> AppResult<usize> {
        self.collection.insert_many(items).await
    }

    /// Runs a query built by the pagination engine.
    pub async fn find_page(&self, query: &PagedQuery) -> AppResult<QueryResult<Item>> {
        self.collection.find(&query.filter, &query.options).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Item>> {
        let filter = Filter::new().eq("id", id.to_string());
        let options = FindOptions {
            skip: None,
            limit: 1,
            sort: SortSpec::new("id", SortOrder::Asc),
        };
        let result = self.collection.find(&filter, &options).await?;
        Ok(result.results.into_iter().next())
    }

    pub async fn count(&self, filter: &Filter) -> AppResult<u64> {
        self.collection.count(filter).await
    }
}
