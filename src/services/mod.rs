//! Service layer for business logic operations.
//!
//! Services encapsulate business logic and coordinate between
//! repositories and handlers.

mod item_service;

pub use item_service::{ItemService, OffsetListing};

use crate::repositories::Repositories;

/// Aggregates all services for convenient access.
///
/// Cloning is cheap since repositories share their stores through `Arc`.
#[derive(Clone)]
pub struct Services {
    pub items: ItemService,
}

impl Services {
    /// Creates a new Services instance from Repositories.
    pub fn new(repos: Repositories) -> Self {
        Self {
            items: ItemService::new(repos.items),
        }
    }
}
