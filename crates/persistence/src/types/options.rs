//! Sort, select and paging options.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single sort key.
///
/// Parsed from the `sort` query parameter, where a leading `-` marks
/// descending order (`-createdAt`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortDirective {
    /// Field path, dot separated for nested fields.
    pub field: String,
    /// Descending if true.
    pub descending: bool,
}

impl SortDirective {
    /// Creates an ascending sort on `field`.
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: false,
        }
    }

    /// Creates a descending sort on `field`.
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: true,
        }
    }

    /// Parses a single sort item. Returns `None` for an empty item.
    pub fn parse(item: &str) -> Option<Self> {
        let item = item.trim();
        let directive = match item.strip_prefix('-') {
            Some(field) => Self::desc(field),
            None => Self::asc(item),
        };
        (!directive.field.is_empty()).then_some(directive)
    }

    /// Parses a comma-separated sort list, skipping empty items.
    pub fn parse_list(list: &str) -> Vec<Self> {
        list.split(',').filter_map(Self::parse).collect()
    }
}

impl fmt::Display for SortDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.descending {
            write!(f, "-{}", self.field)
        } else {
            f.write_str(&self.field)
        }
    }
}

/// The reserved meta-parameters of an advanced query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryOptions {
    /// Fields to return; empty means all fields.
    pub select: Vec<String>,
    /// Sort keys in priority order.
    pub sort: Vec<SortDirective>,
    /// 1-based page number.
    pub page: u64,
    /// Page size.
    pub limit: u64,
}

impl QueryOptions {
    /// Default page number.
    pub const DEFAULT_PAGE: u64 = 1;
    /// Default page size.
    pub const DEFAULT_LIMIT: u64 = 100;
    /// Sort applied when none is requested.
    pub const DEFAULT_SORT: &'static str = "-createdAt";
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            select: Vec::new(),
            sort: SortDirective::parse_list(Self::DEFAULT_SORT),
            page: Self::DEFAULT_PAGE,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

/// Options for a `find` call against a document store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindOptions {
    /// Sort keys in priority order; insertion order breaks ties.
    pub sort: Vec<SortDirective>,
    /// Number of matching documents to skip.
    pub skip: u64,
    /// Maximum number of documents to return.
    pub limit: Option<u64>,
    /// Top-level fields to keep (`id` is always kept).
    pub projection: Option<Vec<String>>,
}

impl FindOptions {
    /// Creates options with no sort, skip, limit or projection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sort keys.
    pub fn sort(mut self, sort: Vec<SortDirective>) -> Self {
        self.sort = sort;
        self
    }

    /// Sets the number of documents to skip.
    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = skip;
        self
    }

    /// Sets the maximum number of documents.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Restricts returned documents to the given fields.
    pub fn projection(mut self, fields: Vec<String>) -> Self {
        self.projection = Some(fields);
        self
    }
}
