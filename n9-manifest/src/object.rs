//! The shared capability set every decoded object exposes, the dynamic
//! object representation used in generic mode, and the `AnyObject` sum of
//! all decodable kinds.

use std::sync::LazyLock;

use n9_validate::{PropertyRules, Validator, ValidatorError, rules};
use serde_json::{Map, Value};

use crate::kind::Kind;
use crate::project::Project;
use crate::service::Service;
use crate::version::Version;

/// Capabilities every decoded manifest object provides, so downstream
/// transport and tooling code can treat all kinds uniformly.
pub trait ManifestObject {
    /// The declared schema generation.
    fn api_version(&self) -> Version;
    /// The declared object kind.
    fn kind(&self) -> Kind;
    /// The object name from its metadata.
    fn name(&self) -> &str;
    /// Run the kind's validator against this object.
    ///
    /// # Errors
    ///
    /// Returns the aggregated [`ValidatorError`] tree when any property
    /// rule fails.
    fn validate(&self) -> Result<(), ValidatorError>;
    /// Provenance label, if stamped or declared.
    fn source(&self) -> Option<&str>;
    /// Set the provenance label unconditionally.
    fn set_source(&mut self, source: &str);
    /// Organization the object belongs to, if set.
    fn organization(&self) -> Option<&str>;
    /// Set the organization unconditionally.
    fn set_organization(&mut self, organization: &str);
}

/// An untyped name→value rendition of a manifest object, produced when
/// decoding in generic mode. The raw mapping is preserved as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct GenericObject {
    api_version: Version,
    kind: Kind,
    fields: Map<String, Value>,
}

static GENERIC_VALIDATOR: LazyLock<Validator<GenericObject>> = LazyLock::new(|| {
    Validator::new().append(
        PropertyRules::for_property("metadata.name", |g: &GenericObject| g.name().to_owned())
            .rule_set(rules::string_dns_subdomain()),
    )
});

impl GenericObject {
    /// Build a generic object from its parsed envelope and raw mapping.
    #[must_use]
    pub fn new(api_version: Version, kind: Kind, fields: Map<String, Value>) -> Self {
        Self {
            api_version,
            kind,
            fields,
        }
    }

    /// The preserved raw mapping.
    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }
}

impl ManifestObject for GenericObject {
    fn api_version(&self) -> Version {
        self.api_version
    }

    fn kind(&self) -> Kind {
        self.kind
    }

    fn name(&self) -> &str {
        self.fields
            .get("metadata")
            .and_then(|m| m.get("name"))
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    fn validate(&self) -> Result<(), ValidatorError> {
        GENERIC_VALIDATOR
            .validate(self)
            .map_err(|err| err.with_name(format!("{} '{}'", self.kind, self.name())))
    }

    fn source(&self) -> Option<&str> {
        self.str_field("manifestSrc")
    }

    fn set_source(&mut self, source: &str) {
        self.fields
            .insert("manifestSrc".to_owned(), Value::String(source.to_owned()));
    }

    fn organization(&self) -> Option<&str> {
        self.str_field("organization")
    }

    fn set_organization(&mut self, organization: &str) {
        self.fields.insert(
            "organization".to_owned(),
            Value::String(organization.to_owned()),
        );
    }
}

/// A decoded object of any supported kind.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum AnyObject {
    Project(Project),
    Service(Service),
    Generic(GenericObject),
}

impl AnyObject {
    fn inner(&self) -> &dyn ManifestObject {
        match self {
            Self::Project(p) => p,
            Self::Service(s) => s,
            Self::Generic(g) => g,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn ManifestObject {
        match self {
            Self::Project(p) => p,
            Self::Service(s) => s,
            Self::Generic(g) => g,
        }
    }
}

impl ManifestObject for AnyObject {
    fn api_version(&self) -> Version {
        self.inner().api_version()
    }

    fn kind(&self) -> Kind {
        self.inner().kind()
    }

    fn name(&self) -> &str {
        self.inner().name()
    }

    fn validate(&self) -> Result<(), ValidatorError> {
        self.inner().validate()
    }

    fn source(&self) -> Option<&str> {
        self.inner().source()
    }

    fn set_source(&mut self, source: &str) {
        self.inner_mut().set_source(source);
    }

    fn organization(&self) -> Option<&str> {
        self.inner().organization()
    }

    fn set_organization(&mut self, organization: &str) {
        self.inner_mut().set_organization(organization);
    }
}

/// Stamp the provenance label on a decoded object, only if not already
/// set — a source declared in the document itself wins.
pub fn annotate_source(object: &mut AnyObject, source: &str) {
    if object.source().is_none() {
        object.set_source(source);
    }
}

/// Stamp the organization on a decoded object, only if not already set.
pub fn annotate_organization(object: &mut AnyObject, organization: &str) {
    if object.organization().is_none() {
        object.set_organization(organization);
    }
}
