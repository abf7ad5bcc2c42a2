//! Field projection for typed records.
//!
//! Each record type exposes a [`FieldRegistry`]: a table from lowercase field
//! name to an accessor, built once per type. [`project`] uses it to reduce a
//! result set to the fields a caller selected.

use std::collections::HashMap;

use serde_json::{Map, Value};

/// Reads one field of a record as JSON.
pub type FieldAccessor<T> = fn(&T) -> Value;

/// Name-to-accessor table for one record type.
pub struct FieldRegistry<T> {
    fields: HashMap<String, FieldAccessor<T>>,
}

impl<T> Default for FieldRegistry<T> {
    fn default() -> Self {
        Self {
            fields: HashMap::new(),
        }
    }
}

impl<T> std::fmt::Debug for FieldRegistry<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.fields.keys().collect();
        names.sort();
        f.debug_struct("FieldRegistry").field("fields", &names).finish()
    }
}

impl<T> FieldRegistry<T> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a field under its case-insensitive name.
    pub fn field(mut self, name: &str, accessor: FieldAccessor<T>) -> Self {
        self.fields.insert(name.to_lowercase(), accessor);
        self
    }

    /// Looks up a field, ignoring case.
    pub fn get(&self, name: &str) -> Option<FieldAccessor<T>> {
        self.fields.get(&name.to_lowercase()).copied()
    }

    /// Returns true if the record type exposes the field.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of registered fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no fields are registered.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A record type that supports field projection.
pub trait Projectable: Sized + 'static {
    /// The registry for this type, built once.
    fn field_registry() -> &'static FieldRegistry<Self>;
}

/// Reduces each record to the requested fields.
///
/// Matching is case-insensitive and the output key is the name as requested.
/// Fields the record type does not expose are omitted. Output order follows
/// input order.
pub fn project<T: Projectable>(records: &[T], fields: &[String]) -> Vec<Map<String, Value>> {
    let registry = T::field_registry();
    let accessors: Vec<(&String, FieldAccessor<T>)> = fields
        .iter()
        .filter_map(|name| registry.get(name).map(|accessor| (name, accessor)))
        .collect();

    records
        .iter()
        .map(|record| {
            accessors
                .iter()
                .map(|(name, accessor)| ((*name).clone(), accessor(record)))
                .collect()
        })
        .collect()
}
