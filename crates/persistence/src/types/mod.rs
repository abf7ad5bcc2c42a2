//! Core types for the persistence layer.
//!
//! - [`filter`] - Typed filter trees produced by the query compiler
//! - [`options`] - Sort, select and paging options
//! - [`pagination`] - Previous/next page descriptors
//! - [`document`] - Documents with persistence metadata
//! - [`unique`] - Uniqueness constraints on document fields

mod document;
mod filter;
mod options;
mod pagination;
mod unique;

pub use document::StoredDocument;
pub use filter::{Filter, FilterValue, ScalarValue};
pub use options::{FindOptions, QueryOptions, SortDirective};
pub use pagination::{PageLink, Pagination};
pub use unique::UniqueField;
