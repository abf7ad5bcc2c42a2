//! Nested-key parsing.
//!
//! Query keys may carry bracketed suffixes: `averageCost[lte]` addresses the
//! `lte` operator on `averageCost`, `location[city]` the `city` sub-field of
//! `location`. This module splits such keys into paths and folds every
//! parameter into one tree of still-uncoerced strings, merging keys that share
//! an outer field.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use super::operators::map_inner_key;

/// The raw parameters of a query string.
///
/// Keys keep their first-seen order and each key owns every value supplied
/// for it, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawParameters {
    entries: Vec<(String, Vec<String>)>,
}

impl RawParameters {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value, grouping it with earlier values of the same key.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((key, vec![value])),
        }
    }

    /// Returns every value supplied for a key.
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_slice())
    }

    /// Returns the first value supplied for a key.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|v| v.first()).map(String::as_str)
    }

    /// Iterates over keys and their values in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for RawParameters {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.append(key, value);
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawParameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        params.extend(iter);
        params
    }
}

/// A node of the parsed, not yet coerced, parameter tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedValue {
    /// Raw values for a leaf, in first-seen order.
    Values(Vec<String>),
    /// Bracketed children keyed by mapped inner key.
    Nested(BTreeMap<String, ParsedValue>),
}

/// The parsed parameter tree, keyed by outer field name.
pub type ParsedTree = BTreeMap<String, ParsedValue>;

/// Splits a key into its outer field and bracketed inner keys.
///
/// The outer field is everything before the first `[`; each inner key runs to
/// the next `]`. A missing `]` makes the rest of the key the inner key. Text
/// after a `]` that does not open another bracket is ignored. Inner keys that
/// name a comparison operator are mapped to their `$` form.
pub fn split_key(key: &str) -> Vec<String> {
    let Some(open) = key.find('[') else {
        return vec![key.to_string()];
    };

    let mut segments = vec![key[..open].to_string()];
    let mut rest = &key[open + 1..];
    loop {
        match rest.find(']') {
            Some(close) => {
                segments.push(map_inner_key(&rest[..close]));
                match rest[close + 1..].strip_prefix('[') {
                    Some(next) => rest = next,
                    None => break,
                }
            }
            None => {
                segments.push(map_inner_key(rest));
                break;
            }
        }
    }
    segments
}

/// Parses every parameter into one tree.
///
/// Keys sharing an outer field merge into one nested mapping
/// (`averageCost[gt]` and `averageCost[lt]`); values landing on the same leaf
/// concatenate in first-seen order. When a leaf and a nested mapping collide
/// on one field, the later parameter wins.
pub fn parse(params: &RawParameters) -> ParsedTree {
    let mut tree = ParsedTree::new();
    for (key, values) in params.iter() {
        insert_path(&mut tree, &split_key(key), values);
    }
    tree
}

fn insert_path(tree: &mut ParsedTree, segments: &[String], values: &[String]) {
    let Some((head, rest)) = segments.split_first() else {
        return;
    };

    if rest.is_empty() {
        match tree.entry(head.clone()) {
            Entry::Occupied(mut slot) => match slot.get_mut() {
                ParsedValue::Values(existing) => existing.extend_from_slice(values),
                nested => *nested = ParsedValue::Values(values.to_vec()),
            },
            Entry::Vacant(slot) => {
                slot.insert(ParsedValue::Values(values.to_vec()));
            }
        }
        return;
    }

    let node = tree
        .entry(head.clone())
        .or_insert_with(|| ParsedValue::Nested(ParsedTree::new()));
    if let ParsedValue::Values(_) = node {
        *node = ParsedValue::Nested(ParsedTree::new());
    }
    if let ParsedValue::Nested(children) = node {
        insert_path(children, rest, values);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(v: &[&str]) -> ParsedValue {
        ParsedValue::Values(v.iter().map(|s| s.to_string()).collect())
    }

    fn nested(entries: Vec<(&str, ParsedValue)>) -> ParsedValue {
        ParsedValue::Nested(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }

    #[test]
    fn test_raw_parameters_group_by_key() {
        let params: RawParameters = [("role", "user"), ("name", "x"), ("role", "admin")]
            .into_iter()
            .collect();
        assert_eq!(params.len(), 2);
        assert_eq!(params.get("role").unwrap(), &["user", "admin"]);
        assert_eq!(params.first("name"), Some("x"));
        let keys: Vec<_> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["role", "name"]);
    }

    #[test]
    fn test_split_plain_key() {
        assert_eq!(split_key("name"), vec!["name"]);
    }

    #[test]
    fn test_split_operator_key() {
        assert_eq!(split_key("averageCost[lte]"), vec!["averageCost", "$lte"]);
        assert_eq!(split_key("location[city]"), vec!["location", "city"]);
    }

    #[test]
    fn test_split_missing_close_bracket() {
        assert_eq!(split_key("price[gt"), vec!["price", "$gt"]);
        assert_eq!(split_key("price["), vec!["price", ""]);
    }

    #[test]
    fn test_split_deep_nesting() {
        assert_eq!(
            split_key("location[zipcode][in]"),
            vec!["location", "zipcode", "$in"]
        );
        assert_eq!(split_key("a[b]junk[c]"), vec!["a", "b"]);
    }

    #[test]
    fn test_top_level_operator_name_stays_literal() {
        assert_eq!(split_key("in"), vec!["in"]);
    }

    #[test]
    fn test_parse_merges_operators() {
        let params: RawParameters = [("price[gt]", "1000"), ("price[lt]", "2000")]
            .into_iter()
            .collect();
        let tree = parse(&params);
        assert_eq!(
            tree["price"],
            nested(vec![("$gt", values(&["1000"])), ("$lt", values(&["2000"]))])
        );
    }

    #[test]
    fn test_parse_concatenates_same_inner_key() {
        let params: RawParameters = [("role[in]", "user"), ("role[in", "publisher"), ("role[in]", "admin")]
            .into_iter()
            .collect();
        let tree = parse(&params);
        assert_eq!(
            tree["role"],
            nested(vec![("$in", values(&["user", "admin", "publisher"]))])
        );
    }

    #[test]
    fn test_parse_later_shape_wins() {
        let params: RawParameters = [("price", "5"), ("price[gt]", "1")].into_iter().collect();
        assert_eq!(parse(&params)["price"], nested(vec![("$gt", values(&["1"]))]));

        let params: RawParameters = [("price[gt]", "1"), ("price", "5")].into_iter().collect();
        assert_eq!(parse(&params)["price"], values(&["5"]));
    }
}
