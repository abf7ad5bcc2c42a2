//! Typed filter trees.
//!
//! A [`Filter`] maps a field name (or a `$`-prefixed operator inside a nested
//! mapping) to a [`FilterValue`]. The shape mirrors a Mongo-style query
//! document, but every node is a closed sum type so backends translate it with
//! exhaustive matches instead of probing loosely typed JSON.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::{Map, Number, Value};

/// A single typed scalar.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ScalarValue {
    /// A 64-bit signed integer.
    Integer(i64),
    /// A finite 64-bit float.
    Float(f64),
    /// A boolean.
    Boolean(bool),
    /// Anything else, kept verbatim.
    String(String),
}

impl ScalarValue {
    /// Returns the string content if this is a string scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ScalarValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer content if this is an integer scalar.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ScalarValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the JSON representation of this scalar.
    pub fn to_json(&self) -> Value {
        match self {
            ScalarValue::Integer(i) => Value::from(*i),
            ScalarValue::Float(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
            ScalarValue::Boolean(b) => Value::Bool(*b),
            ScalarValue::String(s) => Value::String(s.clone()),
        }
    }

    /// Returns a short name for the scalar's type.
    pub fn type_name(&self) -> &'static str {
        match self {
            ScalarValue::Integer(_) => "integer",
            ScalarValue::Float(_) => "float",
            ScalarValue::Boolean(_) => "boolean",
            ScalarValue::String(_) => "string",
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Integer(i) => write!(f, "{}", i),
            ScalarValue::Float(v) => write!(f, "{}", v),
            ScalarValue::Boolean(b) => write!(f, "{}", b),
            ScalarValue::String(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        ScalarValue::Integer(value)
    }
}

impl From<f64> for ScalarValue {
    fn from(value: f64) -> Self {
        ScalarValue::Float(value)
    }
}

impl From<bool> for ScalarValue {
    fn from(value: bool) -> Self {
        ScalarValue::Boolean(value)
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::String(value.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        ScalarValue::String(value)
    }
}

/// A node in a filter tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// A single value; equality against a field, or the operand of an operator.
    Scalar(ScalarValue),
    /// Several values, in first-seen order.
    List(Vec<ScalarValue>),
    /// Operators (`$gt`, `$in`, ...) and/or nested field names.
    Nested(BTreeMap<String, FilterValue>),
}

impl FilterValue {
    /// Returns the nested mapping if this node is one.
    pub fn as_nested(&self) -> Option<&BTreeMap<String, FilterValue>> {
        match self {
            FilterValue::Nested(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the scalar if this node is one.
    pub fn as_scalar(&self) -> Option<&ScalarValue> {
        match self {
            FilterValue::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the JSON representation of this node.
    pub fn to_json(&self) -> Value {
        match self {
            FilterValue::Scalar(s) => s.to_json(),
            FilterValue::List(items) => Value::Array(items.iter().map(ScalarValue::to_json).collect()),
            FilterValue::Nested(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect::<Map<String, Value>>(),
            ),
        }
    }
}

impl From<ScalarValue> for FilterValue {
    fn from(value: ScalarValue) -> Self {
        FilterValue::Scalar(value)
    }
}

macro_rules! scalar_filter_value {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for FilterValue {
                fn from(value: $ty) -> Self {
                    FilterValue::Scalar(value.into())
                }
            }
        )*
    };
}

scalar_filter_value!(i64, f64, bool, &str, String);

/// A top-level filter: field name to [`FilterValue`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Filter {
    fields: BTreeMap<String, FilterValue>,
}

impl Filter {
    /// The soft-delete flag every document carries.
    pub const DELETED_FIELD: &'static str = "deleted";

    /// Creates an empty filter that matches every document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a filter matching only documents that are not soft-deleted.
    pub fn live() -> Self {
        Self::new().with(Self::DELETED_FIELD, false)
    }

    /// Adds a clause, replacing any existing clause on the same field.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.insert(field, value);
        self
    }

    /// Inserts a clause, returning the previous clause on that field.
    pub fn insert(
        &mut self,
        field: impl Into<String>,
        value: impl Into<FilterValue>,
    ) -> Option<FilterValue> {
        self.fields.insert(field.into(), value.into())
    }

    /// Removes the clause on a field.
    pub fn remove(&mut self, field: &str) -> Option<FilterValue> {
        self.fields.remove(field)
    }

    /// Returns the clause on a field.
    pub fn get(&self, field: &str) -> Option<&FilterValue> {
        self.fields.get(field)
    }

    /// Returns true if the filter has a clause on the field.
    pub fn contains_key(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Iterates over clauses in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FilterValue)> {
        self.fields.iter()
    }

    /// Number of clauses.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the filter has no clauses.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the Mongo-style JSON query document for this filter.
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.fields
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }
}

impl From<BTreeMap<String, FilterValue>> for Filter {
    fn from(fields: BTreeMap<String, FilterValue>) -> Self {
        Self { fields }
    }
}

impl IntoIterator for Filter {
    type Item = (String, FilterValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, FilterValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}
