//! The `Service` kind.

use std::sync::LazyLock;

use n9_validate::{PropertyRules, Validator, ValidatorError, rules};
use serde::{Deserialize, Serialize};

use crate::kind::Kind;
use crate::labels::{Annotations, Labels, label_keys_valid, label_values_valid};
use crate::object::ManifestObject;
use crate::version::Version;

/// A service: the unit of ownership inside a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub api_version: Version,
    pub kind: Kind,
    pub metadata: ServiceMetadata,
    #[serde(default)]
    pub spec: ServiceSpec,
    #[serde(default)]
    pub manifest_src: Option<String>,
    #[serde(default)]
    pub organization: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceMetadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    /// The project owning this service.
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub labels: Option<Labels>,
    #[serde(default)]
    pub annotations: Option<Annotations>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSpec {
    #[serde(default)]
    pub description: String,
}

static SERVICE_VALIDATOR: LazyLock<Validator<Service>> = LazyLock::new(|| {
    Validator::new()
        .append(
            PropertyRules::for_property("metadata.name", |s: &Service| s.metadata.name.clone())
                .rule_set(rules::string_dns_subdomain()),
        )
        .append(
            PropertyRules::for_property("metadata.displayName", |s: &Service| {
                s.metadata.display_name.clone().unwrap_or_default()
            })
            .when(|s: &Service| s.metadata.display_name.is_some())
            .rule(rules::string_max_length(63)),
        )
        .append(
            PropertyRules::for_property("metadata.project", |s: &Service| {
                s.metadata.project.clone().unwrap_or_default()
            })
            .when(|s: &Service| s.metadata.project.is_some())
            .rule_set(rules::string_dns_subdomain()),
        )
        .append(
            PropertyRules::for_property("metadata.labels", |s: &Service| {
                s.metadata.labels.clone().unwrap_or_default()
            })
            .when(|s: &Service| s.metadata.labels.is_some())
            .rule(label_keys_valid())
            .rule(label_values_valid()),
        )
        .append(
            PropertyRules::for_property("spec.description", |s: &Service| {
                s.spec.description.clone()
            })
            .rule(rules::string_max_length(1050)),
        )
});

impl ManifestObject for Service {
    fn api_version(&self) -> Version {
        self.api_version
    }

    fn kind(&self) -> Kind {
        self.kind
    }

    fn name(&self) -> &str {
        &self.metadata.name
    }

    fn validate(&self) -> Result<(), ValidatorError> {
        SERVICE_VALIDATOR
            .validate(self)
            .map_err(|err| err.with_name(format!("Service '{}'", self.metadata.name)))
    }

    fn source(&self) -> Option<&str> {
        self.manifest_src.as_deref()
    }

    fn set_source(&mut self, source: &str) {
        self.manifest_src = Some(source.to_owned());
    }

    fn organization(&self) -> Option<&str> {
        self.organization.as_deref()
    }

    fn set_organization(&mut self, organization: &str) {
        self.organization = Some(organization.to_owned());
    }
}
