//! Single rules and rule sets.

use crate::error::RuleError;

type CheckFn<T> = Box<dyn Fn(&T) -> Option<RuleError> + Send + Sync>;

/// A pure check over a value of type `T`: passes, or produces one
/// [`RuleError`].
pub struct Rule<T> {
    check: CheckFn<T>,
}

impl<T> Rule<T> {
    /// Create a rule from a check function.
    #[must_use]
    pub fn new(check: impl Fn(&T) -> Option<RuleError> + Send + Sync + 'static) -> Self {
        Self {
            check: Box::new(check),
        }
    }

    /// Append `code` to the stack of any error this rule produces.
    #[must_use]
    pub fn with_code(self, code: &str) -> Self
    where
        T: 'static,
    {
        let code = code.to_owned();
        Self::new(move |value| (self.check)(value).map(|err| err.add_code(&code)))
    }

    /// Evaluate the rule.
    #[must_use]
    pub fn check(&self, value: &T) -> Option<RuleError> {
        (self.check)(value)
    }
}

/// An ordered aggregate of rules over the same value.
///
/// Evaluation never short-circuits: every rule runs and every failure is
/// collected. The set may re-tag all collected errors with one additional,
/// broader error code.
pub struct RuleSet<T> {
    rules: Vec<Rule<T>>,
    code: Option<String>,
}

impl<T> RuleSet<T> {
    /// Create a rule set.
    #[must_use]
    pub fn new(rules: Vec<Rule<T>>) -> Self {
        Self { rules, code: None }
    }

    /// Tag every error this set collects with `code`.
    #[must_use]
    pub fn with_code(mut self, code: &str) -> Self {
        self.code = Some(code.to_owned());
        self
    }

    /// Evaluate all rules, collecting every failure.
    #[must_use]
    pub fn check(&self, value: &T) -> Vec<RuleError> {
        let mut errors: Vec<RuleError> = self
            .rules
            .iter()
            .filter_map(|rule| rule.check(value))
            .collect();
        if let Some(code) = &self.code {
            errors = errors.into_iter().map(|e| e.add_code(code)).collect();
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failing(msg: &'static str) -> Rule<i32> {
        Rule::new(move |_| Some(RuleError::new(msg)))
    }

    fn passing() -> Rule<i32> {
        Rule::new(|_| None)
    }

    #[test]
    fn test_rule_with_code_tags_errors() {
        let rule = failing("nope").with_code("code_a");
        let err = rule.check(&0).unwrap();
        assert!(err.has_code("code_a"));
    }

    #[test]
    fn test_with_code_wraps_owned_value_rules() {
        let rule = Rule::new(|s: &String| {
            if s.is_empty() {
                Some(RuleError::new("must not be empty"))
            } else {
                None
            }
        })
        .with_code("code_b");

        assert!(rule.check(&"ok".to_owned()).is_none());
        assert!(rule.check(&String::new()).unwrap().has_code("code_b"));
    }

    #[test]
    fn test_rule_set_collects_all_failures() {
        let set = RuleSet::new(vec![failing("one"), passing(), failing("two")]);
        let errors = set.check(&0);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].message, "one");
        assert_eq!(errors[1].message, "two");
    }

    #[test]
    fn test_rule_set_code_is_appended_after_rule_codes() {
        let set = RuleSet::new(vec![failing("one").with_code("inner")]).with_code("outer");
        let errors = set.check(&0);
        assert_eq!(errors[0].code.as_deref(), Some("inner:outer"));
    }
}
