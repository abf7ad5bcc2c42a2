//! The advanced query compiler.
//!
//! [`QueryCompiler::compile`] runs raw query parameters through nested-key
//! parsing, operator mapping and type coercion, then separates the reserved
//! meta keys (`select`, `sort`, `page`, `limit`) from the filter proper and
//! injects the soft-delete clause.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::QueryError;
use crate::types::{
    Filter, FilterValue, FindOptions, Pagination, QueryOptions, ScalarValue, SortDirective,
};

use super::coerce::coerce;
use super::operators::ComparisonOperator;
use super::parser::{self, ParsedTree, ParsedValue, RawParameters};

/// Top-level keys that configure the query instead of filtering it.
pub const RESERVED_KEYS: [&str; 4] = ["select", "sort", "page", "limit"];

/// Which documents the pagination total counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CountMode {
    /// Every document that is not soft-deleted, ignoring the other clauses.
    #[default]
    LiveOnly,
    /// Only documents matching the whole compiled filter.
    Filtered,
}

/// The result of compiling one set of query parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    /// Filter to hand to the document store; always has a `deleted` clause.
    pub filter: Filter,
    /// Select, sort and paging options.
    pub options: QueryOptions,
    /// Index of the first document on the requested page.
    pub start_index: u64,
    /// Index one past the last document on the requested page.
    pub end_index: u64,
}

impl CompiledQuery {
    /// Restricts the filter to documents whose `field` equals `value`.
    pub fn scoped(mut self, field: &str, value: impl Into<FilterValue>) -> Self {
        self.filter.insert(field, value);
        self
    }

    /// Options for fetching the requested page.
    pub fn find_options(&self) -> FindOptions {
        let options = FindOptions::new()
            .sort(self.options.sort.clone())
            .skip(self.start_index)
            .limit(self.options.limit);
        match self.selected_fields() {
            Some(fields) => options.projection(fields.to_vec()),
            None => options,
        }
    }

    /// The filter whose match count feeds [`CompiledQuery::paginate`].
    pub fn count_filter(&self, mode: CountMode) -> Filter {
        match mode {
            CountMode::LiveOnly => Filter::live(),
            CountMode::Filtered => self.filter.clone(),
        }
    }

    /// Builds the pagination links for a result set of `total` documents.
    pub fn paginate(&self, total: u64) -> Pagination {
        Pagination::paginate(
            self.options.page,
            self.options.limit,
            self.start_index,
            self.end_index,
            total,
        )
    }

    /// The requested field list, if the caller asked for a projection.
    pub fn selected_fields(&self) -> Option<&[String]> {
        (!self.options.select.is_empty()).then_some(self.options.select.as_slice())
    }
}

/// Compiles raw query parameters into a [`CompiledQuery`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryCompiler {
    default_limit: u64,
}

impl Default for QueryCompiler {
    fn default() -> Self {
        Self {
            default_limit: QueryOptions::DEFAULT_LIMIT,
        }
    }
}

impl QueryCompiler {
    /// Creates a compiler with the standard page size of 100.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a compiler with a different default page size.
    pub fn with_default_limit(limit: u64) -> Self {
        Self {
            default_limit: limit.max(1),
        }
    }

    /// Returns the page size used when `limit` is absent or zero.
    pub fn default_limit(&self) -> u64 {
        self.default_limit
    }

    /// Compiles the parameters.
    ///
    /// Unknown fields and operators become literal filter clauses. Only a
    /// malformed reserved key is an error: `page` or `limit` that is not a
    /// single non-negative integer, or `select` or `sort` that is not a single
    /// string.
    pub fn compile(&self, params: &RawParameters) -> Result<CompiledQuery, QueryError> {
        let mut tree = parser::parse(params);

        let select = take_text(&mut tree, "select")?;
        let sort = take_text(&mut tree, "sort")?;
        let page = take_count(&mut tree, "page")?;
        let limit = take_count(&mut tree, "limit")?;

        let mut filter: Filter = tree
            .into_iter()
            .map(|(key, node)| {
                let value = coerce_node(&key, node);
                (key, value)
            })
            .collect::<BTreeMap<_, _>>()
            .into();
        filter.insert(Filter::DELETED_FIELD, false);

        let page = match page {
            Some(0) | None => QueryOptions::DEFAULT_PAGE,
            Some(p) => p,
        };
        let limit = match limit {
            Some(0) | None => self.default_limit,
            Some(l) => l,
        };

        let select = select
            .map(|s| {
                s.split(',')
                    .map(str::trim)
                    .filter(|f| !f.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();
        let sort = match sort.map(|s| SortDirective::parse_list(&s)) {
            Some(list) if !list.is_empty() => list,
            _ => SortDirective::parse_list(QueryOptions::DEFAULT_SORT),
        };

        let start_index = (page - 1).saturating_mul(limit);
        let end_index = page.saturating_mul(limit);

        debug!(
            filter = %filter.to_json(),
            page,
            limit,
            "Compiled advanced query"
        );

        Ok(CompiledQuery {
            filter,
            options: QueryOptions {
                select,
                sort,
                page,
                limit,
            },
            start_index,
            end_index,
        })
    }
}

/// Coerces every leaf under `key`.
///
/// Single values collapse to a scalar, except under `$in`, whose operand is
/// always a list.
fn coerce_node(key: &str, node: ParsedValue) -> FilterValue {
    match node {
        ParsedValue::Values(values) => {
            let mut scalars: Vec<ScalarValue> = values.iter().map(|v| coerce(v)).collect();
            let always_list = ComparisonOperator::from_storage_key(key)
                .is_some_and(|op| op.is_multi_valued());
            if scalars.len() == 1 && !always_list {
                FilterValue::Scalar(scalars.remove(0))
            } else {
                FilterValue::List(scalars)
            }
        }
        ParsedValue::Nested(children) => FilterValue::Nested(
            children
                .into_iter()
                .map(|(k, v)| {
                    let value = coerce_node(&k, v);
                    (k, value)
                })
                .collect(),
        ),
    }
}

/// Removes a reserved key and returns its single coerced value.
fn take_single(tree: &mut ParsedTree, key: &str) -> Result<Option<ScalarValue>, QueryError> {
    match tree.remove(key) {
        None => Ok(None),
        Some(ParsedValue::Values(values)) if values.len() == 1 => Ok(Some(coerce(&values[0]))),
        Some(ParsedValue::Values(_)) => Err(QueryError::invalid(key, "expected a single value")),
        Some(ParsedValue::Nested(_)) => Err(QueryError::invalid(key, "unexpected bracketed key")),
    }
}

fn take_text(tree: &mut ParsedTree, key: &str) -> Result<Option<String>, QueryError> {
    match take_single(tree, key)? {
        None => Ok(None),
        Some(ScalarValue::String(s)) => Ok(Some(s)),
        Some(other) => Err(QueryError::invalid(
            key,
            format!("expected a field list, got {} '{}'", other.type_name(), other),
        )),
    }
}

fn take_count(tree: &mut ParsedTree, key: &str) -> Result<Option<u64>, QueryError> {
    match take_single(tree, key)? {
        None => Ok(None),
        Some(ScalarValue::Integer(i)) => u64::try_from(i)
            .map(Some)
            .map_err(|_| QueryError::invalid(key, "expected a non-negative integer")),
        Some(other) => Err(QueryError::invalid(
            key,
            format!("expected a non-negative integer, got {} '{}'", other.type_name(), other),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(pairs: &[(&str, &str)]) -> RawParameters {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_empty_parameters() {
        let compiled = QueryCompiler::new().compile(&RawParameters::new()).unwrap();
        assert_eq!(compiled.filter.to_json(), json!({"deleted": false}));
        assert_eq!(compiled.options.page, 1);
        assert_eq!(compiled.options.limit, 100);
        assert_eq!(compiled.options.sort, vec![SortDirective::desc("createdAt")]);
        assert_eq!(compiled.start_index, 0);
        assert_eq!(compiled.end_index, 100);
        assert!(compiled.selected_fields().is_none());
    }

    #[test]
    fn test_plain_keys_are_coerced() {
        let compiled = QueryCompiler::new()
            .compile(&params(&[("housing", "true"), ("averageCost", "8000"), ("name", "ModernTech")]))
            .unwrap();
        assert_eq!(
            compiled.filter.to_json(),
            json!({"housing": true, "averageCost": 8000, "name": "ModernTech", "deleted": false})
        );
    }

    #[test]
    fn test_multi_valued_plain_key_is_list() {
        let compiled = QueryCompiler::new()
            .compile(&params(&[("weeks", "6"), ("weeks", "8")]))
            .unwrap();
        assert_eq!(compiled.filter.get("weeks"), Some(&FilterValue::List(vec![6i64.into(), 8i64.into()])));
    }

    #[test]
    fn test_range_operators_merge() {
        let compiled = QueryCompiler::new()
            .compile(&params(&[("price[gt]", "1000"), ("price[lt]", "2000")]))
            .unwrap();
        assert_eq!(
            compiled.filter.to_json(),
            json!({"price": {"$gt": 1000, "$lt": 2000}, "deleted": false})
        );
    }

    #[test]
    fn test_in_concatenates_in_order() {
        let compiled = QueryCompiler::new()
            .compile(&params(&[("role[in]", "user"), ("role[in]", "admin")]))
            .unwrap();
        assert_eq!(compiled.filter.to_json()["role"], json!({"$in": ["user", "admin"]}));
    }

    #[test]
    fn test_single_in_value_is_still_a_list() {
        let compiled = QueryCompiler::new()
            .compile(&params(&[("careers[in]", "Business")]))
            .unwrap();
        assert_eq!(compiled.filter.to_json()["careers"], json!({"$in": ["Business"]}));
    }

    #[test]
    fn test_documented_scenario() {
        let compiled = QueryCompiler::new()
            .compile(&params(&[
                ("name", "DevAcademy"),
                ("careers[in]", "Web Development"),
                ("careers[in]", "UI/UX"),
                ("page", "2"),
                ("limit", "10"),
            ]))
            .unwrap();

        assert_eq!(
            compiled.filter.to_json(),
            json!({
                "name": "DevAcademy",
                "careers": {"$in": ["Web Development", "UI/UX"]},
                "deleted": false
            })
        );
        assert_eq!(compiled.options.page, 2);
        assert_eq!(compiled.options.limit, 10);

        let pagination = compiled.paginate(25);
        assert_eq!(
            serde_json::to_value(pagination).unwrap(),
            json!({"next": {"page": 3, "limit": 10}, "prev": {"page": 1, "limit": 10}})
        );
    }

    #[test]
    fn test_reserved_keys_never_reach_filter() {
        let compiled = QueryCompiler::new()
            .compile(&params(&[
                ("select", "name,description"),
                ("sort", "-averageCost,name"),
                ("page", "3"),
                ("limit", "5"),
            ]))
            .unwrap();
        for key in RESERVED_KEYS {
            assert!(!compiled.filter.contains_key(key));
        }
        assert_eq!(compiled.options.select, vec!["name", "description"]);
        assert_eq!(
            compiled.options.sort,
            vec![SortDirective::desc("averageCost"), SortDirective::asc("name")]
        );
        assert_eq!(compiled.start_index, 10);
        assert_eq!(compiled.end_index, 15);
    }

    #[test]
    fn test_zero_page_and_limit_use_defaults() {
        let compiled = QueryCompiler::with_default_limit(25)
            .compile(&params(&[("page", "0"), ("limit", "0")]))
            .unwrap();
        assert_eq!(compiled.options.page, 1);
        assert_eq!(compiled.options.limit, 25);
    }

    #[test]
    fn test_deleted_clause_is_forced() {
        let compiled = QueryCompiler::new()
            .compile(&params(&[("deleted", "true")]))
            .unwrap();
        assert_eq!(compiled.filter.get("deleted"), Some(&FilterValue::from(false)));
    }

    #[test]
    fn test_invalid_reserved_values() {
        let compiler = QueryCompiler::new();
        for bad in [
            vec![("page", "two")],
            vec![("page", "-1")],
            vec![("limit", "2.5")],
            vec![("page", "1"), ("page", "2")],
            vec![("limit[gt]", "5")],
            vec![("select", "5")],
            vec![("sort", "true")],
        ] {
            let result = compiler.compile(&bad.into_iter().collect());
            assert!(matches!(result, Err(QueryError::InvalidParameter { .. })));
        }
    }

    #[test]
    fn test_unknown_operator_is_literal_field() {
        let compiled = QueryCompiler::new()
            .compile(&params(&[("location[state]", "MA"), ("rating[ne]", "3")]))
            .unwrap();
        assert_eq!(
            compiled.filter.to_json(),
            json!({"location": {"state": "MA"}, "rating": {"ne": 3}, "deleted": false})
        );
    }

    #[test]
    fn test_find_options() {
        let compiled = QueryCompiler::new()
            .compile(&params(&[("select", "name"), ("page", "2"), ("limit", "20")]))
            .unwrap();
        let options = compiled.find_options();
        assert_eq!(options.skip, 20);
        assert_eq!(options.limit, Some(20));
        assert_eq!(options.projection, Some(vec!["name".to_string()]));
    }

    #[test]
    fn test_count_filter_modes() {
        let compiled = QueryCompiler::new()
            .compile(&params(&[("housing", "true")]))
            .unwrap();
        assert_eq!(compiled.count_filter(CountMode::LiveOnly), Filter::live());
        assert_eq!(compiled.count_filter(CountMode::Filtered), compiled.filter);
    }

    #[test]
    fn test_scoped() {
        let compiled = QueryCompiler::new()
            .compile(&RawParameters::new())
            .unwrap()
            .scoped("bootcamp", "b-1");
        assert_eq!(
            compiled.filter.to_json(),
            json!({"bootcamp": "b-1", "deleted": false})
        );
    }
}
