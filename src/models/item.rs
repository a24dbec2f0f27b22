use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Catalog item as stored and returned to clients.
///
/// Serialized camelCase, so `createdAt` is the cursor field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: Uuid,
    pub title: String,
    pub category: String,
    pub price_cents: i64,
    pub created_at: Timestamp,
}

/// Fields supplied when creating an item
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    pub title: String,
    pub category: String,
    pub price_cents: i64,
}

impl Item {
    pub fn from_new(new_item: NewItem, id: Uuid, created_at: Timestamp) -> Self {
        Self {
            id,
            title: new_item.title,
            category: new_item.category,
            price_cents: new_item.price_cents,
            created_at,
        }
    }
}
