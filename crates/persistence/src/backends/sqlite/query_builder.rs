//! Translates document filters into SQL over the JSON1 functions.
//!
//! Every value is bound as a positional parameter; field paths are bound too,
//! so no caller input is ever spliced into SQL text.

use rusqlite::ToSql;
use rusqlite::types::{Null, ToSqlOutput};

use crate::query::ComparisonOperator;
use crate::types::{Filter, FilterValue, ScalarValue, SortDirective};

/// A bound SQL parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    /// Text value.
    String(String),
    /// Integer value (booleans bind as 0/1).
    Integer(i64),
    /// Floating point value.
    Float(f64),
    /// SQL NULL.
    Null,
}

impl ToSql for SqlParam {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            SqlParam::String(s) => ToSqlOutput::from(s.as_str()),
            SqlParam::Integer(i) => ToSqlOutput::from(*i),
            SqlParam::Float(f) => ToSqlOutput::from(*f),
            SqlParam::Null => ToSqlOutput::from(Null),
        })
    }
}

impl From<&ScalarValue> for SqlParam {
    fn from(value: &ScalarValue) -> Self {
        match value {
            ScalarValue::Integer(i) => SqlParam::Integer(*i),
            ScalarValue::Float(f) => SqlParam::Float(*f),
            ScalarValue::Boolean(b) => SqlParam::Integer(i64::from(*b)),
            ScalarValue::String(s) => SqlParam::String(s.clone()),
        }
    }
}

/// Accumulates SQL fragments and their parameters.
#[derive(Debug, Default)]
pub struct QueryBuilder {
    params: Vec<SqlParam>,
}

const MATCH_NOTHING: &str = "0";
const MATCH_ALL: &str = "1";

impl QueryBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a parameter and returns its placeholder.
    pub fn bind(&mut self, param: SqlParam) -> String {
        self.params.push(param);
        format!("?{}", self.params.len())
    }

    /// The parameters bound so far, in placeholder order.
    pub fn params(&self) -> &[SqlParam] {
        &self.params
    }

    /// Builds the WHERE condition restricting rows to a collection and filter.
    pub fn where_clause(&mut self, collection: &str, filter: &Filter) -> String {
        let collection = self.bind(SqlParam::String(collection.to_string()));
        let mut clauses = vec![format!("collection = {}", collection)];

        for (field, value) in filter.iter() {
            if field == Filter::DELETED_FIELD {
                if let FilterValue::Scalar(ScalarValue::Boolean(deleted)) = value {
                    let p = self.bind(SqlParam::Integer(i64::from(*deleted)));
                    clauses.push(format!("deleted = {}", p));
                    continue;
                }
            }
            let path: Vec<String> = field.split('.').map(String::from).collect();
            clauses.push(self.field_clause(&path, value));
        }

        clauses.join(" AND ")
    }

    /// Builds an ORDER BY list; insertion order breaks ties.
    pub fn order_by(&mut self, sort: &[SortDirective]) -> String {
        let mut keys = Vec::with_capacity(sort.len() + 1);
        for directive in sort {
            let components: Vec<String> =
                directive.field.split('.').map(String::from).collect();
            let Some(path) = json_path(&components) else {
                continue;
            };
            let p = self.bind(SqlParam::String(path));
            keys.push(format!(
                "json_extract(data, {}) {}",
                p,
                direction(directive.descending)
            ));
        }
        let tie_break = sort.first().is_some_and(|d| d.descending);
        keys.push(format!("rowid {}", direction(tie_break)));
        keys.join(", ")
    }

    fn field_clause(&mut self, path: &[String], value: &FilterValue) -> String {
        match value {
            FilterValue::Scalar(scalar) => self.any_element(path, &[(scalar, "=")]),
            FilterValue::List(items) => self.any_of(path, items),
            FilterValue::Nested(map) => {
                let mut clauses = Vec::with_capacity(map.len());
                for (key, inner) in map {
                    match ComparisonOperator::from_storage_key(key) {
                        Some(op) => clauses.push(self.operator_clause(path, op, inner)),
                        None => {
                            let mut child = path.to_vec();
                            child.push(key.clone());
                            clauses.push(self.field_clause(&child, inner));
                        }
                    }
                }
                if clauses.is_empty() {
                    MATCH_ALL.to_string()
                } else {
                    format!("({})", clauses.join(" AND "))
                }
            }
        }
    }

    fn operator_clause(
        &mut self,
        path: &[String],
        op: ComparisonOperator,
        operand: &FilterValue,
    ) -> String {
        match (op.sql_operator(), operand) {
            (None, FilterValue::Scalar(scalar)) => {
                self.any_of(path, std::slice::from_ref(scalar))
            }
            (None, FilterValue::List(items)) => self.any_of(path, items),
            (Some(sql_op), FilterValue::Scalar(scalar)) => {
                self.any_element(path, &[(scalar, sql_op)])
            }
            (Some(sql_op), FilterValue::List(items)) => {
                if items.is_empty() {
                    return MATCH_NOTHING.to_string();
                }
                let clauses: Vec<String> = items
                    .iter()
                    .map(|item| self.any_element(path, &[(item, sql_op)]))
                    .collect();
                format!("({})", clauses.join(" AND "))
            }
            (_, FilterValue::Nested(_)) => MATCH_NOTHING.to_string(),
        }
    }

    fn any_of(&mut self, path: &[String], items: &[ScalarValue]) -> String {
        if items.is_empty() {
            return MATCH_NOTHING.to_string();
        }
        let conditions: Vec<(&ScalarValue, &str)> =
            items.iter().map(|item| (item, "=")).collect();
        self.any_element(path, &conditions)
    }

    /// Matches when some value at `path` (or some element of an array there)
    /// satisfies any one of the conditions.
    fn any_element(&mut self, path: &[String], conditions: &[(&ScalarValue, &str)]) -> String {
        let Some(json_path) = json_path(path) else {
            return MATCH_NOTHING.to_string();
        };
        let p = self.bind(SqlParam::String(json_path));
        let alternatives: Vec<String> = conditions
            .iter()
            .map(|(value, op)| {
                let v = self.bind(SqlParam::from(*value));
                format!("({} AND je.value {} {})", type_guard(value), op, v)
            })
            .collect();
        // Only a scalar or array elements are candidates, never object members.
        format!(
            "EXISTS (SELECT 1 FROM json_each(documents.data, {p}) AS je \
             WHERE json_type(documents.data, {p}) <> 'object' AND ({}))",
            alternatives.join(" OR ")
        )
    }
}

fn direction(descending: bool) -> &'static str {
    if descending { "DESC" } else { "ASC" }
}

fn type_guard(value: &ScalarValue) -> &'static str {
    match value {
        ScalarValue::Integer(_) | ScalarValue::Float(_) => "je.type IN ('integer', 'real')",
        ScalarValue::Boolean(_) => "je.type IN ('true', 'false')",
        ScalarValue::String(_) => "je.type = 'text'",
    }
}

/// Builds a JSON path such as `$."location"."city"`.
///
/// Returns `None` for components that cannot be quoted.
pub(crate) fn json_path(components: &[String]) -> Option<String> {
    let mut path = String::from("$");
    for component in components {
        if component.is_empty() || component.contains('"') {
            return None;
        }
        path.push_str(".\"");
        path.push_str(component);
        path.push('"');
    }
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_json_path() {
        let path = json_path(&["location".to_string(), "city".to_string()]);
        assert_eq!(path.as_deref(), Some("$.\"location\".\"city\""));
        assert_eq!(json_path(&["a\"b".to_string()]), None);
    }

    #[test]
    fn test_deleted_uses_column() {
        let mut builder = QueryBuilder::new();
        let sql = builder.where_clause("bootcamps", &Filter::live());
        assert_eq!(sql, "collection = ?1 AND deleted = ?2");
        assert_eq!(
            builder.params(),
            &[SqlParam::String("bootcamps".to_string()), SqlParam::Integer(0)]
        );
    }

    #[test]
    fn test_scalar_equality_binds_path_and_value() {
        let mut builder = QueryBuilder::new();
        let sql = builder.where_clause("bootcamps", &Filter::new().with("housing", true));
        assert!(sql.contains("json_each(documents.data, ?2)"));
        assert!(sql.contains("je.value = ?3"));
        assert_eq!(builder.params()[1], SqlParam::String("$.\"housing\"".to_string()));
        assert_eq!(builder.params()[2], SqlParam::Integer(1));
    }

    #[test]
    fn test_object_members_are_not_elements() {
        let mut builder = QueryBuilder::new();
        let sql = builder.where_clause("bootcamps", &Filter::new().with("location", "Boston"));
        assert!(sql.contains("json_type(documents.data, ?2) <> 'object'"));
    }

    #[test]
    fn test_range_operator() {
        let mut nested = BTreeMap::new();
        nested.insert("$lte".to_string(), FilterValue::from(1000_i64));
        let filter = Filter::new().with("averageCost", FilterValue::Nested(nested));

        let mut builder = QueryBuilder::new();
        let sql = builder.where_clause("bootcamps", &filter);
        assert!(sql.contains("je.value <= ?3"));
        assert!(sql.contains("'integer', 'real'"));
    }

    #[test]
    fn test_empty_in_matches_nothing() {
        let mut nested = BTreeMap::new();
        nested.insert("$in".to_string(), FilterValue::List(Vec::new()));
        let filter = Filter::new().with("careers", FilterValue::Nested(nested));

        let mut builder = QueryBuilder::new();
        let sql = builder.where_clause("bootcamps", &filter);
        assert!(sql.ends_with(&format!("({})", MATCH_NOTHING)));
    }

    #[test]
    fn test_order_by_tie_break_follows_first_key() {
        let mut builder = QueryBuilder::new();
        let sql = builder.order_by(&[SortDirective::desc("createdAt")]);
        assert_eq!(sql, "json_extract(data, ?1) DESC, rowid DESC");

        let mut builder = QueryBuilder::new();
        assert_eq!(builder.order_by(&[]), "rowid ASC");
    }
}
