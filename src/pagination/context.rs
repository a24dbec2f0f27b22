//! Per-request pagination handle.

use std::sync::Arc;

use serde::Serialize;

use crate::pagination::descriptor::PaginationDescriptor;
use crate::pagination::error::PaginationError;
use crate::pagination::metadata::{CursorPage, Extensions, OffsetMetadata};
use crate::pagination::query::{Filter, PagedQuery};

/// A parsed descriptor with the query and metadata builders bound to it.
///
/// Cheap to clone; handlers receive it from the request extensions.
#[derive(Debug, Clone, PartialEq)]
pub struct Pagination {
    descriptor: Arc<PaginationDescriptor>,
}

impl Pagination {
    pub fn new(descriptor: PaginationDescriptor) -> Self {
        Self {
            descriptor: Arc::new(descriptor),
        }
    }

    pub fn descriptor(&self) -> &PaginationDescriptor {
        &self.descriptor
    }

    pub fn offset_query(&self, base_filter: &Filter) -> PagedQuery {
        self.descriptor.create_offset_query(base_filter)
    }

    pub fn cursor_query(&self, base_filter: &Filter) -> Result<PagedQuery, PaginationError> {
        self.descriptor.create_cursor_query(base_filter)
    }

    pub fn offset_metadata(&self, total: u64, count: u64, extensions: Extensions) -> OffsetMetadata {
        self.descriptor.create_offset_metadata(total, count, extensions)
    }

    /// Cursor metadata keyed on the descriptor's own cursor field.
    pub fn cursor_metadata<T: Serialize>(
        &self,
        results: Vec<T>,
        extensions: Extensions,
    ) -> CursorPage<T> {
        self.descriptor
            .create_cursor_metadata(results, &self.descriptor.cursor_field, extensions)
    }
}

impl From<PaginationDescriptor> for Pagination {
    fn from(descriptor: PaginationDescriptor) -> Self {
        Self::new(descriptor)
    }
}
