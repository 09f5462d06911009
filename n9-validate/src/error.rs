//! Structured validation errors.
//!
//! The error tree mirrors the shape of the validated record:
//! `ValidatorError` → `PropertyError` (one per property path) → `RuleError`
//! (one per failed rule). Machine consumers must use [`RuleError::has_code`]
//! and friends instead of matching on message text.

use std::fmt;

use serde::Serialize;

/// Maximum number of characters kept in a property value preview.
pub const PREVIEW_LIMIT: usize = 100;

/// A leaf validation failure: a message plus an optional error-code stack.
///
/// The code stack is colon-joined, most-specific-first. A rule contributes
/// its own code; wrapping layers ([`crate::RuleSet`] tagging, for example)
/// append broader codes with [`RuleError::add_code`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleError {
    /// Human-readable description of the failure.
    pub message: String,
    /// Colon-joined error-code stack, most-specific-first.
    pub code: Option<String>,
}

impl RuleError {
    /// Create a rule error with no code.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }

    /// Set the most-specific code on this error.
    #[must_use]
    pub fn with_code(mut self, code: &str) -> Self {
        self.code = Some(code.to_owned());
        self
    }

    /// Append a broader code to the stack.
    #[must_use]
    pub fn add_code(mut self, code: &str) -> Self {
        self.code = match self.code.take() {
            Some(existing) => Some(format!("{existing}:{code}")),
            None => Some(code.to_owned()),
        };
        self
    }

    /// Test whether `code` appears anywhere in the code stack.
    #[must_use]
    pub fn has_code(&self, code: &str) -> bool {
        self.code
            .as_deref()
            .is_some_and(|stack| stack.split(':').any(|c| c == code))
    }
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// All rule failures for a single, possibly index-qualified property path
/// (`a.b`, `a[2]`, `a[2].b`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyError {
    /// Dot/index-qualified property path.
    pub property_name: String,
    /// Truncated preview of the offending value; may be redacted.
    pub property_value: String,
    /// Failed rules for this property, in evaluation order.
    pub errors: Vec<RuleError>,
}

impl PropertyError {
    /// Create a property error.
    #[must_use]
    pub fn new(
        property_name: impl Into<String>,
        property_value: impl Into<String>,
        errors: Vec<RuleError>,
    ) -> Self {
        Self {
            property_name: property_name.into(),
            property_value: property_value.into(),
            errors,
        }
    }

    /// Re-root this error under `parent`, producing `parent.child` paths.
    /// An empty child path collapses to `parent` alone.
    pub fn prepend_path(&mut self, parent: &str) {
        if self.property_name.is_empty() {
            self.property_name = parent.to_owned();
        } else {
            self.property_name = format!("{parent}.{}", self.property_name);
        }
    }

    /// Test whether `code` appears in any of this property's rule errors.
    #[must_use]
    pub fn has_code(&self, code: &str) -> bool {
        self.errors.iter().any(|e| e.has_code(code))
    }

    /// Replace every literal occurrence of the previewed value inside the
    /// rule-error messages with an equal-length `*` mask, then clear the
    /// preview. Used to avoid echoing sensitive values while preserving
    /// message shape.
    pub fn hide_value(&mut self) {
        if self.property_value.is_empty() {
            return;
        }
        let mask = "*".repeat(self.property_value.chars().count());
        for error in &mut self.errors {
            error.message = error.message.replace(&self.property_value, &mask);
        }
        self.property_value = String::new();
    }
}

impl fmt::Display for PropertyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.property_value.is_empty() {
            write!(f, "'{}':", self.property_name)?;
        } else {
            write!(
                f,
                "'{}' with value '{}':",
                self.property_name, self.property_value
            )?;
        }
        for error in &self.errors {
            write!(f, "\n    - {error}")?;
        }
        Ok(())
    }
}

/// The aggregate result of one validation call: every property failure the
/// validated record produced, plus an optional subject name used for
/// top-level framing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatorError {
    /// Subject name, e.g. `Project 'default'`.
    pub name: Option<String>,
    /// All property failures, in property-rule declaration order.
    pub errors: Vec<PropertyError>,
}

impl ValidatorError {
    /// Create a validator error from collected property failures.
    #[must_use]
    pub fn new(errors: Vec<PropertyError>) -> Self {
        Self { name: None, errors }
    }

    /// Set the subject name used in the rendered header.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Test whether `code` appears anywhere in the error tree.
    #[must_use]
    pub fn has_error_code(&self, code: &str) -> bool {
        self.errors.iter().any(|e| e.has_code(code))
    }
}

impl fmt::Display for ValidatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(
                f,
                "Validation for {name} has failed for the following properties:"
            )?,
            None => write!(f, "Validation has failed for the following properties:")?,
        }
        for error in &self.errors {
            // PropertyError indents its own rule errors one level deeper.
            write!(f, "\n  - {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidatorError {}

/// Render a truncated preview of a property value.
///
/// Strings are previewed without surrounding quotes; nulls preview as
/// empty; everything else uses its compact JSON rendering. Previews longer
/// than [`PREVIEW_LIMIT`] characters are cut and suffixed with `...`.
#[must_use]
pub fn value_preview<T: Serialize>(value: &T) -> String {
    let rendered = match serde_json::to_value(value) {
        Ok(serde_json::Value::String(s)) => s,
        Ok(serde_json::Value::Null) => String::new(),
        Ok(other) => other.to_string(),
        Err(_) => String::new(),
    };
    if rendered.chars().count() <= PREVIEW_LIMIT {
        return rendered;
    }
    let cut: String = rendered.chars().take(PREVIEW_LIMIT - 3).collect();
    format!("{cut}...")
}
