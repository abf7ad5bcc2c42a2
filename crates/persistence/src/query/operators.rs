//! Comparison operators recognized inside brackets.

use std::fmt;

/// A comparison operator written as `field[op]=value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOperator {
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,
    /// Member of a set of values.
    In,
}

impl ComparisonOperator {
    /// Every recognized operator.
    pub const ALL: [ComparisonOperator; 5] = [
        ComparisonOperator::Gt,
        ComparisonOperator::Gte,
        ComparisonOperator::Lt,
        ComparisonOperator::Lte,
        ComparisonOperator::In,
    ];

    /// Marker prepended to operator names in compiled filters.
    pub const PREFIX: char = '$';

    /// Parses the bare name used in query strings (`gt`, `in`, ...).
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }

    /// Parses the `$`-prefixed key used in compiled filters.
    pub fn from_storage_key(key: &str) -> Option<Self> {
        key.strip_prefix(Self::PREFIX).and_then(Self::parse)
    }

    /// The bare query-string name.
    pub fn name(&self) -> &'static str {
        match self {
            ComparisonOperator::Gt => "gt",
            ComparisonOperator::Gte => "gte",
            ComparisonOperator::Lt => "lt",
            ComparisonOperator::Lte => "lte",
            ComparisonOperator::In => "in",
        }
    }

    /// The key this operator takes in a compiled filter.
    pub fn storage_key(&self) -> &'static str {
        match self {
            ComparisonOperator::Gt => "$gt",
            ComparisonOperator::Gte => "$gte",
            ComparisonOperator::Lt => "$lt",
            ComparisonOperator::Lte => "$lte",
            ComparisonOperator::In => "$in",
        }
    }

    /// The SQL comparison for ordering operators; `None` for `In`.
    pub fn sql_operator(&self) -> Option<&'static str> {
        match self {
            ComparisonOperator::Gt => Some(">"),
            ComparisonOperator::Gte => Some(">="),
            ComparisonOperator::Lt => Some("<"),
            ComparisonOperator::Lte => Some("<="),
            ComparisonOperator::In => None,
        }
    }

    /// Whether the operand is always a list.
    pub fn is_multi_valued(&self) -> bool {
        matches!(self, ComparisonOperator::In)
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Maps a bracketed key to its compiled form.
///
/// Recognized operator names gain the `$` marker; anything else is a nested
/// field name and passes through unchanged.
pub fn map_inner_key(key: &str) -> String {
    match ComparisonOperator::parse(key) {
        Some(op) => op.storage_key().to_string(),
        None => key.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_operators() {
        assert_eq!(map_inner_key("gt"), "$gt");
        assert_eq!(map_inner_key("gte"), "$gte");
        assert_eq!(map_inner_key("lt"), "$lt");
        assert_eq!(map_inner_key("lte"), "$lte");
        assert_eq!(map_inner_key("in"), "$in");
    }

    #[test]
    fn test_unknown_passes_through() {
        assert_eq!(map_inner_key("city"), "city");
        assert_eq!(map_inner_key("ne"), "ne");
        assert_eq!(map_inner_key("GT"), "GT");
    }

    #[test]
    fn test_storage_key_round_trip() {
        for op in ComparisonOperator::ALL {
            assert_eq!(ComparisonOperator::from_storage_key(op.storage_key()), Some(op));
        }
        assert_eq!(ComparisonOperator::from_storage_key("gt"), None);
    }
}
