//! Field validation helpers shared by the models.

use std::sync::LazyLock;

use regex::Regex;

static URL_PATTERN: LazyLock<Result<Regex, regex::Error>> = LazyLock::new(|| {
    Regex::new(
        r"https?://(www\.)?[-a-zA-Z0-9@:%._\+~#=]{1,256}\.[a-zA-Z0-9()]{1,6}\b([-a-zA-Z0-9()@:%_\+.~#?&/=]*)",
    )
});

static EMAIL_PATTERN: LazyLock<Result<Regex, regex::Error>> = LazyLock::new(|| {
    Regex::new(
        r#"^(([^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*)|(".+"))@((\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\])|(([a-zA-Z\-0-9]+\.)+[a-zA-Z]{2,}))$"#,
    )
});

fn matches(pattern: &LazyLock<Result<Regex, regex::Error>>, value: &str) -> bool {
    pattern.as_ref().is_ok_and(|re| re.is_match(value))
}

/// Returns true if `value` contains an http(s) URL.
pub fn is_valid_url(value: &str) -> bool {
    matches(&URL_PATTERN, value)
}

/// Returns true if `value` is an email address.
pub fn is_valid_email(value: &str) -> bool {
    matches(&EMAIL_PATTERN, value)
}

/// Records `required` when the value is blank, `too_long` when it exceeds
/// `max` characters.
pub fn check_text(
    errors: &mut Vec<String>,
    value: &str,
    max: Option<usize>,
    required: &str,
    too_long: &str,
) {
    if value.trim().is_empty() {
        errors.push(required.to_string());
    } else if max.is_some_and(|max| value.chars().count() > max) {
        errors.push(too_long.to_string());
    }
}

/// Lowercase, dash-separated form of a name.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}
