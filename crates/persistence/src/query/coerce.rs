//! Type coercion for query values.
//!
//! Query strings carry only text, but stored documents hold numbers and
//! booleans. A value is coerced by trying, in order: integer (with `0x`, `0o`,
//! `0b` and legacy leading-zero octal prefixes), float, boolean, and finally
//! the string itself. Coercion never fails.

use crate::types::ScalarValue;

/// Coerces a raw token to the most specific scalar it represents.
pub fn coerce(token: &str) -> ScalarValue {
    if let Some(i) = parse_integer(token) {
        ScalarValue::Integer(i)
    } else if let Some(f) = parse_float(token) {
        ScalarValue::Float(f)
    } else if let Some(b) = parse_bool(token) {
        ScalarValue::Boolean(b)
    } else {
        ScalarValue::String(token.to_string())
    }
}

/// Parses an integer literal whose base is given by its prefix.
fn parse_integer(token: &str) -> Option<i64> {
    let (negative, unsigned) = match token.as_bytes().first()? {
        b'-' => (true, &token[1..]),
        b'+' => (false, &token[1..]),
        _ => (false, token),
    };

    let (radix, digits, prefixed) = split_radix(unsigned);
    let digits = strip_underscores(digits, prefixed)?;
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return None;
    }

    // Parse with the sign attached so i64::MIN stays representable.
    let signed = if negative {
        format!("-{}", digits)
    } else {
        digits
    };
    i64::from_str_radix(&signed, radix).ok()
}

/// Splits a base prefix from an unsigned literal.
fn split_radix(unsigned: &str) -> (u32, &str, bool) {
    let lower = unsigned.get(..2).map(str::to_ascii_lowercase);
    match lower.as_deref() {
        Some("0x") => (16, &unsigned[2..], true),
        Some("0o") => (8, &unsigned[2..], true),
        Some("0b") => (2, &unsigned[2..], true),
        _ if unsigned.len() > 1 && unsigned.starts_with('0') => (8, &unsigned[1..], true),
        _ => (10, unsigned, false),
    }
}

/// Removes digit-separating underscores.
///
/// An underscore must sit between two digits, where a base prefix counts as a
/// digit.
fn strip_underscores(digits: &str, prefixed: bool) -> Option<String> {
    if !digits.contains('_') {
        return Some(digits.to_string());
    }
    if (!prefixed && digits.starts_with('_')) || digits.ends_with('_') || digits.contains("__") {
        return None;
    }
    Some(digits.replace('_', ""))
}

/// Parses a finite float. `inf` and `nan` stay strings since stored JSON
/// documents cannot hold them.
fn parse_float(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|f| f.is_finite())
}

fn parse_bool(token: &str) -> Option<bool> {
    match token {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}
