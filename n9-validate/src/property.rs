//! Property rules: named accessors bound to ordered rule pipelines.
//!
//! Pipelines are modeled as explicit step enums evaluated by exhaustive
//! match. A step never aborts the validator as a whole; every property rule
//! of a [`Validator`] runs to completion and all failures are aggregated
//! into one error tree per call.

use serde::Serialize;

use crate::error::{PropertyError, RuleError, ValidatorError, value_preview};
use crate::rule::{Rule, RuleSet};

type GetterFn<S, T> = Box<dyn Fn(&S) -> T + Send + Sync>;
type PredicateFn<S> = Box<dyn Fn(&S) -> bool + Send + Sync>;

/// One named check contributing property errors to a [`Validator`].
pub trait PropertyCheck<S>: Send + Sync {
    /// Evaluate against the subject, returning every failure found.
    fn check(&self, subject: &S) -> Vec<PropertyError>;
}

/// A pipeline step over a scalar property of type `T`.
enum Step<S, T> {
    /// Gates all later steps: a `false` result ends the property's
    /// evaluation without producing an error.
    Predicate(PredicateFn<S>),
    /// A rule over the property value.
    Rule(Rule<T>),
    /// A rule set over the property value.
    RuleSet(RuleSet<T>),
    /// A nested validator; its property paths are re-rooted under this
    /// property's path.
    Include(Validator<T>),
    /// Halts the remaining pipeline only if the immediately preceding step
    /// produced at least one failure.
    StopOnError,
}

/// Rules for one scalar property of `S`, addressed by a dot-qualified name.
pub struct PropertyRules<S, T> {
    name: String,
    getter: GetterFn<S, T>,
    steps: Vec<Step<S, T>>,
}

impl<S, T: Serialize> PropertyRules<S, T> {
    /// Bind a property name to its accessor.
    #[must_use]
    pub fn for_property(
        name: impl Into<String>,
        getter: impl Fn(&S) -> T + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            getter: Box::new(getter),
            steps: Vec::new(),
        }
    }

    /// Gate all later steps on a predicate over the whole subject.
    #[must_use]
    pub fn when(mut self, predicate: impl Fn(&S) -> bool + Send + Sync + 'static) -> Self {
        self.steps.push(Step::Predicate(Box::new(predicate)));
        self
    }

    /// Append a rule over the property value.
    #[must_use]
    pub fn rule(mut self, rule: Rule<T>) -> Self {
        self.steps.push(Step::Rule(rule));
        self
    }

    /// Append a rule set over the property value.
    #[must_use]
    pub fn rule_set(mut self, set: RuleSet<T>) -> Self {
        self.steps.push(Step::RuleSet(set));
        self
    }

    /// Recurse into a nested validator for the property value.
    #[must_use]
    pub fn include(mut self, validator: Validator<T>) -> Self {
        self.steps.push(Step::Include(validator));
        self
    }

    /// Halt the remaining pipeline if the previous step failed.
    #[must_use]
    pub fn stop_on_error(mut self) -> Self {
        self.steps.push(Step::StopOnError);
        self
    }
}

impl<S, T: Serialize> PropertyCheck<S> for PropertyRules<S, T> {
    fn check(&self, subject: &S) -> Vec<PropertyError> {
        let value = (self.getter)(subject);
        let mut rule_errors: Vec<RuleError> = Vec::new();
        let mut nested: Vec<PropertyError> = Vec::new();
        let mut prev_failed = false;

        for step in &self.steps {
            match step {
                Step::Predicate(predicate) => {
                    if !predicate(subject) {
                        break;
                    }
                    prev_failed = false;
                }
                Step::Rule(rule) => {
                    let err = rule.check(&value);
                    prev_failed = err.is_some();
                    rule_errors.extend(err);
                }
                Step::RuleSet(set) => {
                    let errs = set.check(&value);
                    prev_failed = !errs.is_empty();
                    rule_errors.extend(errs);
                }
                Step::Include(validator) => match validator.validate(&value) {
                    Ok(()) => prev_failed = false,
                    Err(sub) => {
                        prev_failed = true;
                        for mut prop_err in sub.errors {
                            prop_err.prepend_path(&self.name);
                            nested.push(prop_err);
                        }
                    }
                },
                Step::StopOnError => {
                    if prev_failed {
                        break;
                    }
                }
            }
        }

        let mut out = Vec::new();
        if !rule_errors.is_empty() {
            out.push(PropertyError::new(
                &self.name,
                value_preview(&value),
                rule_errors,
            ));
        }
        out.extend(nested);
        out
    }
}

/// A pipeline step over a list-typed property with elements of type `E`.
enum SliceStep<S, E> {
    Predicate(PredicateFn<S>),
    /// A rule evaluated once against the whole sequence.
    SliceRule(Rule<Vec<E>>),
    /// A rule applied to each element, producing `name[i]` paths.
    ElementRule(Rule<E>),
    /// A nested validator recursed per element, producing `name[i].sub`
    /// paths.
    IncludeForEach(Validator<E>),
    StopOnError,
}

/// Rules for one list-typed property of `S`.
pub struct SlicePropertyRules<S, E> {
    name: String,
    getter: GetterFn<S, Vec<E>>,
    steps: Vec<SliceStep<S, E>>,
}

impl<S, E: Serialize> SlicePropertyRules<S, E> {
    /// Bind a list property name to its accessor.
    #[must_use]
    pub fn for_slice(
        name: impl Into<String>,
        getter: impl Fn(&S) -> Vec<E> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            getter: Box::new(getter),
            steps: Vec::new(),
        }
    }

    /// Gate all later steps on a predicate over the whole subject.
    #[must_use]
    pub fn when(mut self, predicate: impl Fn(&S) -> bool + Send + Sync + 'static) -> Self {
        self.steps.push(SliceStep::Predicate(Box::new(predicate)));
        self
    }

    /// Append a rule evaluated once against the whole sequence.
    #[must_use]
    pub fn rule(mut self, rule: Rule<Vec<E>>) -> Self {
        self.steps.push(SliceStep::SliceRule(rule));
        self
    }

    /// Append a rule applied to each element independently.
    #[must_use]
    pub fn rule_for_each(mut self, rule: Rule<E>) -> Self {
        self.steps.push(SliceStep::ElementRule(rule));
        self
    }

    /// Recurse into a nested validator for each element.
    #[must_use]
    pub fn include_for_each(mut self, validator: Validator<E>) -> Self {
        self.steps.push(SliceStep::IncludeForEach(validator));
        self
    }

    /// Halt the remaining pipeline if the previous step failed.
    #[must_use]
    pub fn stop_on_error(mut self) -> Self {
        self.steps.push(SliceStep::StopOnError);
        self
    }
}

impl<S, E: Serialize> PropertyCheck<S> for SlicePropertyRules<S, E> {
    fn check(&self, subject: &S) -> Vec<PropertyError> {
        let items = (self.getter)(subject);
        let mut slice_errors: Vec<RuleError> = Vec::new();
        // One PropertyError per failing index, in index order.
        let mut element_errors: Vec<(usize, Vec<RuleError>)> = Vec::new();
        let mut nested: Vec<PropertyError> = Vec::new();
        let mut prev_failed = false;

        for step in &self.steps {
            match step {
                SliceStep::Predicate(predicate) => {
                    if !predicate(subject) {
                        break;
                    }
                    prev_failed = false;
                }
                SliceStep::SliceRule(rule) => {
                    let err = rule.check(&items);
                    prev_failed = err.is_some();
                    slice_errors.extend(err);
                }
                SliceStep::ElementRule(rule) => {
                    prev_failed = false;
                    for (idx, item) in items.iter().enumerate() {
                        if let Some(err) = rule.check(item) {
                            prev_failed = true;
                            push_element_error(&mut element_errors, idx, err);
                        }
                    }
                }
                SliceStep::IncludeForEach(validator) => {
                    prev_failed = false;
                    for (idx, item) in items.iter().enumerate() {
                        if let Err(sub) = validator.validate(item) {
                            prev_failed = true;
                            let root = format!("{}[{idx}]", self.name);
                            for mut prop_err in sub.errors {
                                prop_err.prepend_path(&root);
                                nested.push(prop_err);
                            }
                        }
                    }
                }
                SliceStep::StopOnError => {
                    if prev_failed {
                        break;
                    }
                }
            }
        }

        let mut out = Vec::new();
        if !slice_errors.is_empty() {
            out.push(PropertyError::new(
                &self.name,
                value_preview(&items),
                slice_errors,
            ));
        }
        for (idx, errors) in element_errors {
            out.push(PropertyError::new(
                format!("{}[{idx}]", self.name),
                value_preview(&items[idx]),
                errors,
            ));
        }
        out.extend(nested);
        out
    }
}

fn push_element_error(
    element_errors: &mut Vec<(usize, Vec<RuleError>)>,
    idx: usize,
    err: RuleError,
) {
    if let Some((_, errs)) = element_errors.iter_mut().find(|(i, _)| *i == idx) {
        errs.push(err);
    } else {
        let pos = element_errors.partition_point(|(i, _)| *i < idx);
        element_errors.insert(pos, (idx, vec![err]));
    }
}

/// An ordered collection of property rules over a record type `S`.
pub struct Validator<S> {
    name: Option<String>,
    checks: Vec<Box<dyn PropertyCheck<S>>>,
}

impl<S> Validator<S> {
    /// Create an empty validator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: None,
            checks: Vec::new(),
        }
    }

    /// Set the subject name used for top-level error framing.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Append a property check.
    #[must_use]
    pub fn append(mut self, check: impl PropertyCheck<S> + 'static) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    /// Run every property rule to completion and aggregate all failures.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidatorError`] wrapping every [`PropertyError`] the
    /// property rules produced; `Ok(())` only when none did.
    pub fn validate(&self, subject: &S) -> Result<(), ValidatorError> {
        let mut errors = Vec::new();
        for check in &self.checks {
            errors.extend(check.check(subject));
        }
        if errors.is_empty() {
            return Ok(());
        }
        let mut validator_error = ValidatorError::new(errors);
        if let Some(name) = &self.name {
            validator_error = validator_error.with_name(name.clone());
        }
        Err(validator_error)
    }
}

impl<S> Default for Validator<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Serialize)]
    struct Record {
        name: String,
        tags: Vec<String>,
        inner: Inner,
        optional: Option<String>,
    }

    #[derive(Clone, Serialize)]
    struct Inner {
        label: String,
    }

    fn sample() -> Record {
        Record {
            name: String::new(),
            tags: vec![
                "ok".to_owned(),
                "bad one".to_owned(),
                "fine".to_owned(),
                "bad two".to_owned(),
            ],
            inner: Inner {
                label: String::new(),
            },
            optional: None,
        }
    }

    fn no_spaces() -> Rule<String> {
        Rule::new(|s: &String| {
            if s.contains(' ') {
                Some(RuleError::new("must not contain spaces").with_code("no_spaces"))
            } else {
                None
            }
        })
    }

    fn not_empty() -> Rule<String> {
        Rule::new(|s: &String| {
            if s.is_empty() {
                Some(RuleError::new("must not be empty").with_code("not_empty"))
            } else {
                None
            }
        })
    }

    #[test]
    fn test_per_element_rule_produces_index_qualified_paths() {
        let validator = Validator::new().append(
            SlicePropertyRules::for_slice("tags", |r: &Record| r.tags.clone())
                .rule_for_each(no_spaces()),
        );

        let err = validator.validate(&sample()).unwrap_err();
        let paths: Vec<&str> = err
            .errors
            .iter()
            .map(|e| e.property_name.as_str())
            .collect();
        assert_eq!(paths, vec!["tags[1]", "tags[3]"]);
        assert_eq!(err.errors[0].property_value, "bad one");
    }

    #[test]
    fn test_all_property_rules_run_and_aggregate() {
        let validator = Validator::new()
            .append(PropertyRules::for_property("name", |r: &Record| r.name.clone()).rule(not_empty()))
            .append(
                SlicePropertyRules::for_slice("tags", |r: &Record| r.tags.clone())
                    .rule_for_each(no_spaces()),
            );

        let err = validator.validate(&sample()).unwrap_err();
        assert_eq!(err.errors.len(), 3);
        assert_eq!(err.errors[0].property_name, "name");
    }

    #[test]
    fn test_false_predicate_suppresses_later_steps() {
        let validator = Validator::new().append(
            PropertyRules::for_property("optional", |r: &Record| {
                r.optional.clone().unwrap_or_default()
            })
            .when(|r: &Record| r.optional.is_some())
            .rule(not_empty()),
        );

        assert!(validator.validate(&sample()).is_ok());
    }

    #[test]
    fn test_stop_on_error_halts_after_failed_step() {
        let validator = Validator::new().append(
            PropertyRules::for_property("name", |r: &Record| r.name.clone())
                .rule(not_empty())
                .stop_on_error()
                .rule(no_spaces()),
        );

        let record = Record {
            name: String::new(),
            ..sample()
        };
        let err = validator.validate(&record).unwrap_err();
        assert_eq!(err.errors[0].errors.len(), 1);
        assert!(err.errors[0].errors[0].has_code("not_empty"));
    }

    #[test]
    fn test_stop_on_error_passes_through_after_clean_step() {
        let validator = Validator::new().append(
            PropertyRules::for_property("name", |r: &Record| r.name.clone())
                .rule(no_spaces())
                .stop_on_error()
                .rule(not_empty()),
        );

        let record = Record {
            name: String::new(),
            ..sample()
        };
        let err = validator.validate(&record).unwrap_err();
        assert!(err.errors[0].errors[0].has_code("not_empty"));
    }

    #[test]
    fn test_include_re_roots_nested_paths() {
        let inner_validator = Validator::new().append(
            PropertyRules::for_property("label", |i: &Inner| i.label.clone()).rule(not_empty()),
        );
        let validator = Validator::new().append(
            PropertyRules::for_property("inner", |r: &Record| r.inner.clone())
                .include(inner_validator),
        );

        let err = validator.validate(&sample()).unwrap_err();
        assert_eq!(err.errors[0].property_name, "inner.label");
    }

    #[test]
    fn test_include_for_each_re_roots_under_index() {
        let element_validator = Validator::new().append(
            PropertyRules::for_property("label", |i: &Inner| i.label.clone()).rule(not_empty()),
        );
        let validator = Validator::new().append(
            SlicePropertyRules::for_slice("items", |_: &Record| {
                vec![
                    Inner {
                        label: "ok".to_owned(),
                    },
                    Inner {
                        label: String::new(),
                    },
                ]
            })
            .include_for_each(element_validator),
        );

        let err = validator.validate(&sample()).unwrap_err();
        assert_eq!(err.errors[0].property_name, "items[1].label");
    }

    #[test]
    fn test_validator_name_frames_the_error() {
        let validator = Validator::new()
            .with_name("Record 'sample'")
            .append(PropertyRules::for_property("name", |r: &Record| r.name.clone()).rule(not_empty()));

        let err = validator.validate(&sample()).unwrap_err();
        assert_eq!(err.name.as_deref(), Some("Record 'sample'"));
    }
}
