//! Repository layer for data access operations.
//!
//! Repositories run reads produced by the pagination engine through a
//! [`QueryExecutor`].

mod executor;
mod item_repo;
mod memory;

pub use executor::{QueryExecutor, QueryResult};
pub use item_repo::ItemRepository;
pub use memory::MemoryCollection;

use std::sync::Arc;

/// Aggregates all repositories for convenient access.
///
/// Cloning is cheap since each repository holds its store behind an `Arc`.
#[derive(Clone)]
pub struct Repositories {
    pub items: ItemRepository,
}

impl Repositories {
    /// Creates repositories over fresh, empty collections.
    pub fn new() -> Self {
        Self {
            items: ItemRepository::new(Arc::new(MemoryCollection::new("items"))),
        }
    }
}

impl Default for Repositories {
    fn default() -> Self {
        Self::new()
    }
}
