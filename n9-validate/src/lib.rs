//! # n9-validate
//!
//! A composable rule-evaluation engine producing structured,
//! path-qualified error trees for arbitrary record types.
//!
//! Validation never short-circuits at the engine level: every property
//! rule of a [`Validator`] runs to completion and all failures are
//! aggregated into one [`ValidatorError`] per call, so a single call
//! surfaces every violation at once.
//!
//! ## Quick Start
//!
//! ```rust
//! use n9_validate::{PropertyRules, Validator, rules};
//!
//! #[derive(serde::Serialize)]
//! struct Service { name: String }
//!
//! let validator = Validator::new()
//!     .with_name("Service")
//!     .append(
//!         PropertyRules::for_property("name", |s: &Service| s.name.clone())
//!             .rule_set(rules::string_dns_subdomain()),
//!     );
//!
//! let err = validator.validate(&Service { name: "BAD NAME".to_owned() }).unwrap_err();
//! assert_eq!(err.errors[0].property_name, "name");
//! assert!(err.has_error_code(rules::codes::STRING_DNS_SUBDOMAIN));
//! ```

mod error;
mod property;
mod rule;
pub mod rules;

pub use error::{PREVIEW_LIMIT, PropertyError, RuleError, ValidatorError, value_preview};
pub use property::{PropertyCheck, PropertyRules, SlicePropertyRules, Validator};
pub use rule::{Rule, RuleSet};
