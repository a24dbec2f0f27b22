//! Catalog item service.
//!
//! Runs offset and cursor listings through the pagination engine and the
//! item repository.

use std::time::Instant;

use jiff::{SignedDuration, Timestamp};
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{Item, NewItem};
use crate::pagination::{CursorPage, Extensions, Filter, OffsetMetadata, Pagination};
use crate::repositories::{ItemRepository, QueryResult};

/// Newest seeded item is created at 2023-06-02T00:00:00Z
const SEED_ANCHOR: Timestamp = Timestamp::constant(1_685_664_000, 0);

const SEED_CATEGORIES: [&str; 3] = ["books", "games", "tools"];

/// One offset page of items plus its metadata
#[derive(Debug, Clone, PartialEq)]
pub struct OffsetListing {
    pub items: Vec<Item>,
    pub metadata: OffsetMetadata,
}

#[derive(Clone)]
pub struct ItemService {
    repo: ItemRepository,
}

fn category_filter(category: Option<&str>) -> Filter {
    match category {
        Some(category) => Filter::new().eq("category", category),
        None => Filter::new(),
    }
}

/// Elapsed time as a `queryTime` metadata extension, in milliseconds.
fn query_time(started: Instant) -> Extensions {
    let mut extensions = Extensions::new();
    extensions.insert(
        "queryTime".to_string(),
        json!(started.elapsed().as_millis() as u64),
    );
    extensions
}

impl ItemService {
    pub fn new(repo: ItemRepository) -> Self {
        Self { repo }
    }

    /// Lists one page of items by page number.
    ///
    /// Uses the total reported by the read when present, otherwise counts
    /// the filtered collection separately.
    pub async fn list_offset(
        &self,
        pagination: &Pagination,
        category: Option<&str>,
    ) -> AppResult<OffsetListing> {
        let started = Instant::now();
        let filter = category_filter(category);
        let query = pagination.offset_query(&filter);

        let QueryResult { results, total } = self.repo.find_page(&query).await?;
        let total = match total {
            Some(total) => total,
            None => self.repo.count(&filter).await?,
        };

        let metadata = pagination.offset_metadata(total, results.len() as u64, query_time(started));
        debug!(
            page = metadata.page,
            limit = metadata.limit,
            total = metadata.total,
            "Offset page loaded"
        );

        Ok(OffsetListing {
            items: results,
            metadata,
        })
    }

    /// Lists items after a cursor boundary.
    ///
    /// # Errors
    /// `InvalidCursor` when the cursor, before or after value is not a timestamp.
    pub async fn list_cursor(
        &self,
        pagination: &Pagination,
        category: Option<&str>,
    ) -> AppResult<CursorPage<Item>> {
        let started = Instant::now();
        let query = pagination.cursor_query(&category_filter(category))?;

        let QueryResult { results, .. } = self.repo.find_page(&query).await?;
        let page = pagination.cursor_metadata(results, query_time(started));
        debug!(
            limit = page.metadata.limit,
            count = page.metadata.count,
            has_more = page.metadata.has_more,
            "Cursor page loaded"
        );

        Ok(page)
    }

    pub async fn create_item(&self, new_item: NewItem) -> AppResult<Item> {
        let item = Item::from_new(new_item, Uuid::new_v4(), Timestamp::now());
        self.repo.insert(item).await
    }

    /// Gets an item by id, or `NotFound`.
    pub async fn get_item(&self, id: Uuid) -> AppResult<Item> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound {
                entity: "item".to_string(),
                field: "id".to_string(),
                value: id.to_string(),
            })
    }

    pub async fn count_items(&self) -> AppResult<u64> {
        self.repo.count(&Filter::new()).await
    }

    /// Inserts `count` demo items, one per hour walking back from a fixed anchor.
    ///
    /// Ids, titles and timestamps depend only on the position, so two seeded
    /// catalogs are identical.
    pub async fn seed(&self, count: usize) -> AppResult<usize> {
        let items = (0..count)
            .map(|i| {
                let created_at = SEED_ANCHOR
                    .checked_sub(SignedDuration::from_hours(i as i64))
                    .map_err(|e| AppError::from(anyhow::Error::from(e)))?;
                Ok(Item {
                    id: Uuid::from_u128(i as u128 + 1),
                    title: format!("Item {}", i + 1),
                    category: SEED_CATEGORIES[i % SEED_CATEGORIES.len()].to_string(),
                    price_cents: 500 + (i as i64 % 10) * 250,
                    created_at,
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        self.repo.insert_many(items).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::{PaginationOptions, RawPaginationQuery, parse_pagination_params};
    use crate::repositories::Repositories;

    async fn seeded(count: usize) -> ItemService {
        let service = ItemService::new(Repositories::new().items);
        service.seed(count).await.unwrap();
        service
    }

    fn pagination(pairs: &[(&str, &str)]) -> Pagination {
        let raw: RawPaginationQuery = pairs.iter().map(|(k, v)| (*k, *v)).collect();
        parse_pagination_params(&raw, &PaginationOptions::default()).into()
    }

    #[tokio::test]
    async fn test_seed_is_deterministic() {
        let a = seeded(5).await;
        let b = seeded(5).await;
        let p = pagination(&[("limit", "5")]);
        let left = a.list_offset(&p, None).await.unwrap().items;
        let right = b.list_offset(&p, None).await.unwrap().items;
        assert_eq!(left, right);
        assert_eq!(left[0].created_at, SEED_ANCHOR);
        assert_eq!(
            left[1].created_at.to_string(),
            "2023-06-01T23:00:00Z"
        );
    }

    #[tokio::test]
    async fn test_list_offset_second_page_of_25() {
        let service = seeded(25).await;
        let listing = service
            .list_offset(&pagination(&[("page", "2"), ("limit", "10")]), None)
            .await
            .unwrap();

        assert_eq!(listing.items.len(), 10);
        assert_eq!(listing.items[0].title, "Item 11");
        let meta = listing.metadata;
        assert_eq!((meta.page, meta.limit, meta.total), (2, 10, 25));
        assert_eq!(meta.total_pages, 3);
        assert_eq!(meta.count, 10);
        assert!(meta.has_next && meta.has_prev);
        assert!(meta.extensions.contains_key("queryTime"));
    }

    #[tokio::test]
    async fn test_list_offset_filters_by_category() {
        let service = seeded(9).await;
        let listing = service
            .list_offset(&pagination(&[]), Some("games"))
            .await
            .unwrap();
        assert_eq!(listing.metadata.total, 3);
        assert!(listing.items.iter().all(|item| item.category == "games"));
    }

    #[tokio::test]
    async fn test_list_cursor_walks_pages_without_overlap() {
        let service = seeded(12).await;
        let first = service
            .list_cursor(&pagination(&[("limit", "5")]), None)
            .await
            .unwrap();
        assert!(first.metadata.has_more);
        assert_eq!(first.items.len(), 5);

        let next = first.metadata.next_cursor.clone().unwrap();
        let next = next.as_str().unwrap();
        let second = service
            .list_cursor(&pagination(&[("limit", "5"), ("cursor", next)]), None)
            .await
            .unwrap();
        assert_eq!(second.items[0].title, "Item 6");
        assert_eq!(second.metadata.cursor.as_deref(), Some(next));

        let last_cursor = second.metadata.next_cursor.clone().unwrap();
        let third = service
            .list_cursor(
                &pagination(&[("limit", "5"), ("cursor", last_cursor.as_str().unwrap())]),
                None,
            )
            .await
            .unwrap();
        assert_eq!(third.items.len(), 2);
        assert!(!third.metadata.has_more);
        assert_eq!(third.metadata.next_cursor, None);
    }

    #[tokio::test]
    async fn test_get_item_by_id() {
        let service = seeded(3).await;
        let item = service.get_item(Uuid::from_u128(2)).await.unwrap();
        assert_eq!(item.title, "Item 2");

        let err = service.get_item(Uuid::nil()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_cursor_rejects_bad_cursor() {
        let service = seeded(3).await;
        let err = service
            .list_cursor(&pagination(&[("cursor", "yesterday")]), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidCursor { .. }));
    }

    #[tokio::test]
    async fn test_create_item_is_listed_first() {
        let service = seeded(3).await;
        let created = service
            .create_item(NewItem {
                title: "Fresh".to_string(),
                category: "tools".to_string(),
                price_cents: 999,
            })
            .await
            .unwrap();
        assert_eq!(service.count_items().await.unwrap(), 4);

        let listing = service.list_offset(&pagination(&[]), None).await.unwrap();
        assert_eq!(listing.items[0], created);
    }
}
