//! Shared label and annotation types plus their validation rules.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use n9_validate::{Rule, RuleError};
use regex::Regex;

/// Labels: a key mapped to zero or more values.
pub type Labels = BTreeMap<String, Vec<String>>;

/// Annotations: free-form key/value metadata.
pub type Annotations = BTreeMap<String, String>;

/// Error code for an invalid label key.
pub const CODE_LABEL_KEY: &str = "label_key";
/// Error code for an overlong label value.
pub const CODE_LABEL_VALUE: &str = "label_value";

const LABEL_VALUE_MAX_LENGTH: usize = 200;

// The pattern is a compile-time constant.
#[allow(clippy::unwrap_used)]
static LABEL_KEY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]([a-z0-9._-]{0,61}[a-z0-9])?$").unwrap());

/// Every label key must be a lowercase alphanumeric token (dots, dashes
/// and underscores allowed inside), at most 63 characters.
#[must_use]
pub fn label_keys_valid() -> Rule<Labels> {
    Rule::new(|labels: &Labels| {
        labels
            .keys()
            .find(|key| !LABEL_KEY_REGEX.is_match(key))
            .map(|key| {
                RuleError::new(format!(
                    "label key '{key}' must start and end with a lowercase alphanumeric \
                     character, may contain '.', '-' and '_', and must be no longer \
                     than 63 characters"
                ))
                .with_code(CODE_LABEL_KEY)
            })
    })
}

/// Every label value must be at most 200 characters.
#[must_use]
pub fn label_values_valid() -> Rule<Labels> {
    Rule::new(|labels: &Labels| {
        for (key, values) in labels {
            if let Some(value) = values
                .iter()
                .find(|v| v.chars().count() > LABEL_VALUE_MAX_LENGTH)
            {
                return Some(
                    RuleError::new(format!(
                        "label '{key}' value '{}' must be no longer than \
                         {LABEL_VALUE_MAX_LENGTH} characters",
                        n9_validate::value_preview(value)
                    ))
                    .with_code(CODE_LABEL_VALUE),
                );
            }
        }
        None
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(entries: &[(&str, &[&str])]) -> Labels {
        entries
            .iter()
            .map(|(k, vs)| ((*k).to_owned(), vs.iter().map(|v| (*v).to_owned()).collect()))
            .collect()
    }

    #[test]
    fn test_valid_label_keys_pass() {
        let l = labels(&[("team", &["green"]), ("cost.center-1", &["x"])]);
        assert!(label_keys_valid().check(&l).is_none());
    }

    #[test]
    fn test_invalid_label_key_is_named_in_the_error() {
        let l = labels(&[("Team", &["green"])]);
        let err = label_keys_valid().check(&l).unwrap();
        assert!(err.has_code(CODE_LABEL_KEY));
        assert!(err.message.contains("'Team'"));
    }

    #[test]
    fn test_overlong_label_value_fails() {
        let long = "v".repeat(201);
        let l: Labels = [("team".to_owned(), vec![long])].into_iter().collect();
        let err = label_values_valid().check(&l).unwrap();
        assert!(err.has_code(CODE_LABEL_VALUE));
    }
}
