//! Built-in rules for common string and scalar checks.
//!
//! Every built-in carries a stable error code from [`codes`], so callers
//! can test for a failure kind via `has_error_code` instead of matching on
//! message text.

use std::fmt::Display;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::RuleError;
use crate::rule::{Rule, RuleSet};

/// Stable error codes attached by the built-in rules.
pub mod codes {
    pub const STRING_NOT_EMPTY: &str = "string_not_empty";
    pub const STRING_MAX_LENGTH: &str = "string_max_length";
    pub const STRING_MATCHES: &str = "string_matches";
    pub const STRING_DNS_SUBDOMAIN: &str = "string_is_dns_subdomain";
    pub const ONE_OF: &str = "one_of";
    pub const EQUAL_TO: &str = "equal_to";
}

// RFC-1123 DNS label. The pattern is a compile-time constant.
#[allow(clippy::unwrap_used)]
static DNS_RFC1123_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?$").unwrap()
});

/// The string must not be empty.
#[must_use]
pub fn string_not_empty() -> Rule<String> {
    Rule::new(|value: &String| {
        if value.is_empty() {
            Some(RuleError::new("string must not be empty").with_code(codes::STRING_NOT_EMPTY))
        } else {
            None
        }
    })
}

/// The string must be at most `max` characters long.
#[must_use]
pub fn string_max_length(max: usize) -> Rule<String> {
    Rule::new(move |value: &String| {
        if value.chars().count() > max {
            Some(
                RuleError::new(format!("string length must be no more than {max} characters"))
                    .with_code(codes::STRING_MAX_LENGTH),
            )
        } else {
            None
        }
    })
}

/// The string must match the given regular expression.
#[must_use]
pub fn string_matches(regex: Regex) -> Rule<String> {
    Rule::new(move |value: &String| {
        if regex.is_match(value) {
            None
        } else {
            Some(
                RuleError::new(format!(
                    "string must match regular expression: '{}'",
                    regex.as_str()
                ))
                .with_code(codes::STRING_MATCHES),
            )
        }
    })
}

/// The string must be a valid RFC-1123 DNS label usable as a subdomain:
/// lowercase alphanumeric characters or '-', starting and ending with an
/// alphanumeric character, at most 63 characters.
///
/// Every collected error is tagged with
/// [`codes::STRING_DNS_SUBDOMAIN`].
#[must_use]
pub fn string_dns_subdomain() -> RuleSet<String> {
    RuleSet::new(vec![
        string_not_empty(),
        string_max_length(63),
        Rule::new(|value: &String| {
            if DNS_RFC1123_REGEX.is_match(value) {
                None
            } else {
                Some(
                    RuleError::new(
                        "string must match the RFC-1123 DNS subdomain format: \
                         lowercase alphanumeric characters or '-', starting and ending \
                         with an alphanumeric character (e.g. 'my-name', '123-abc')",
                    )
                    .with_code(codes::STRING_MATCHES),
                )
            }
        }),
    ])
    .with_code(codes::STRING_DNS_SUBDOMAIN)
}

/// The value must equal one of the allowed values.
#[must_use]
pub fn one_of<T>(allowed: Vec<T>) -> Rule<T>
where
    T: PartialEq + Display + Send + Sync + 'static,
{
    Rule::new(move |value: &T| {
        if allowed.contains(value) {
            None
        } else {
            let rendered: Vec<String> = allowed.iter().map(ToString::to_string).collect();
            Some(
                RuleError::new(format!("must be one of: {}", rendered.join(", ")))
                    .with_code(codes::ONE_OF),
            )
        }
    })
}

/// The value must equal `expected`.
#[must_use]
pub fn equal_to<T>(expected: T) -> Rule<T>
where
    T: PartialEq + Display + Send + Sync + 'static,
{
    Rule::new(move |value: &T| {
        if *value == expected {
            None
        } else {
            Some(
                RuleError::new(format!("must be equal to '{expected}'"))
                    .with_code(codes::EQUAL_TO),
            )
        }
    })
}
