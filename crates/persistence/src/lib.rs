//! # devcamper-persistence - Document storage and advanced queries
//!
//! This crate provides the persistence layer for the DevCamper API. It owns two
//! concerns:
//!
//! - **Advanced query compilation**: translating bracketed URL query parameters
//!   such as `averageCost[lte]=10000&careers[in]=Business` into a typed
//!   [`Filter`], sort/select options and [`Pagination`] metadata.
//! - **Document storage**: the [`DocumentStore`] trait and its SQLite backend,
//!   which executes compiled filters against schema-flexible JSON documents with
//!   soft-delete semantics.
//!
//! ## Query syntax
//!
//! | Query string | Compiled filter |
//! |--------------|-----------------|
//! | `housing=true` | `{"housing": true, "deleted": false}` |
//! | `averageCost[gt]=5000` | `{"averageCost": {"$gt": 5000}, "deleted": false}` |
//! | `careers[in]=UI/UX&careers[in]=Business` | `{"careers": {"$in": ["UI/UX", "Business"]}, "deleted": false}` |
//! | `location[state]=MA` | `{"location": {"state": "MA"}, "deleted": false}` |
//!
//! The reserved keys `select`, `sort`, `page` and `limit` never reach the filter.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use devcamper_persistence::backends::sqlite::SqliteBackend;
//! use devcamper_persistence::query::{QueryCompiler, RawParameters};
//! use devcamper_persistence::DocumentStore;
//!
//! let backend = SqliteBackend::in_memory()?;
//! backend.init_schema()?;
//!
//! let params: RawParameters = [("averageCost[lt]", "10000"), ("page", "2")]
//!     .into_iter()
//!     .collect();
//! let compiled = QueryCompiler::new().compile(&params)?;
//!
//! let total = backend.count("bootcamps", &compiled.count_filter(Default::default())).await?;
//! let docs = backend.find("bootcamps", &compiled.filter, &compiled.find_options()).await?;
//! let pagination = compiled.paginate(total);
//! ```
//!
//! ## Feature Flags
//!
//! - `sqlite` (default) - SQLite backend using rusqlite and r2d2

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod backends;
pub mod core;
pub mod error;
pub mod query;
pub mod types;

// Re-export commonly used types at crate root
pub use core::DocumentStore;
pub use error::{StorageError, StorageResult};
pub use types::{
    Filter, FilterValue, FindOptions, PageLink, Pagination, QueryOptions, ScalarValue,
    SortDirective, StoredDocument, UniqueField,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
