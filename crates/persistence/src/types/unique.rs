//! Uniqueness constraints on document fields.

use std::fmt;

/// A top-level field whose value may appear on at most one document of a
/// collection.
///
/// Documents without the field, or with `null`, never conflict. A
/// `live_only` constraint ignores soft-deleted documents.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UniqueField {
    /// Collection the constraint applies to.
    pub collection: String,
    /// Top-level field name.
    pub field: String,
    /// Whether soft-deleted documents are exempt.
    pub live_only: bool,
}

impl UniqueField {
    /// Unique across every document, deleted or not.
    pub fn new(collection: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            field: field.into(),
            live_only: false,
        }
    }

    /// Unique among documents that are not soft-deleted.
    pub fn live(collection: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            live_only: true,
            ..Self::new(collection, field)
        }
    }

    /// Returns true if both names are plain identifiers (ASCII letters,
    /// digits and `_`).
    pub fn is_well_formed(&self) -> bool {
        let plain = |s: &str| {
            !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        };
        plain(&self.collection) && plain(&self.field)
    }
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.collection, self.field)?;
        if self.live_only {
            f.write_str(" (live)")?;
        }
        Ok(())
    }
}
