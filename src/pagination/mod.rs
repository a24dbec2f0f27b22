//! Pagination engine
//!
//! Turns raw request parameters into a validated [`PaginationDescriptor`],
//! builds offset or cursor reads from it, and derives response metadata from
//! the rows those reads return.
//!
//! - [`parse_pagination_params`] - lenient parameter parsing with clamping
//! - [`PaginationDescriptor::create_offset_query`] / [`create_cursor_query`](PaginationDescriptor::create_cursor_query)
//! - [`PaginationDescriptor::create_offset_metadata`] / [`create_cursor_metadata`](PaginationDescriptor::create_cursor_metadata)
//!
//! Everything here is synchronous and free of shared state.

pub mod context;
pub mod descriptor;
pub mod error;
pub mod metadata;
pub mod options;
pub mod query;

pub use context::Pagination;
pub use descriptor::{PaginationDescriptor, RawPaginationQuery, parse_pagination_params};
pub use error::PaginationError;
pub use metadata::{CursorMetadata, CursorPage, Extensions, OffsetMetadata};
pub use options::{PaginationOptions, SortOrder};
pub use query::{Clause, Filter, FindOptions, PagedQuery, SortSpec, parse_boundary};
