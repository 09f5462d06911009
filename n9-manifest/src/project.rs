//! The `Project` kind.

use std::sync::LazyLock;

use n9_validate::{PropertyRules, Validator, ValidatorError, rules};
use serde::{Deserialize, Serialize};

use crate::kind::Kind;
use crate::labels::{Annotations, Labels, label_keys_valid, label_values_valid};
use crate::object::ManifestObject;
use crate::version::Version;

/// A project: the top-level grouping for services.
///
/// All declared fields serialize unconditionally (optionals as `null`) so
/// the serialized form describes the complete known shape of the kind;
/// strict decoding relies on this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub api_version: Version,
    pub kind: Kind,
    pub metadata: ProjectMetadata,
    #[serde(default)]
    pub spec: ProjectSpec,
    /// Provenance label stamped after decode; may also be set in the
    /// document itself, in which case it is preserved.
    #[serde(default)]
    pub manifest_src: Option<String>,
    #[serde(default)]
    pub organization: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMetadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub labels: Option<Labels>,
    #[serde(default)]
    pub annotations: Option<Annotations>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSpec {
    #[serde(default)]
    pub description: String,
}

static PROJECT_VALIDATOR: LazyLock<Validator<Project>> = LazyLock::new(|| {
    Validator::new()
        .append(
            PropertyRules::for_property("metadata.name", |p: &Project| p.metadata.name.clone())
                .rule_set(rules::string_dns_subdomain()),
        )
        .append(
            PropertyRules::for_property("metadata.displayName", |p: &Project| {
                p.metadata.display_name.clone().unwrap_or_default()
            })
            .when(|p: &Project| p.metadata.display_name.is_some())
            .rule(rules::string_max_length(63)),
        )
        .append(
            PropertyRules::for_property("metadata.labels", |p: &Project| {
                p.metadata.labels.clone().unwrap_or_default()
            })
            .when(|p: &Project| p.metadata.labels.is_some())
            .rule(label_keys_valid())
            .rule(label_values_valid()),
        )
        .append(
            PropertyRules::for_property("spec.description", |p: &Project| {
                p.spec.description.clone()
            })
            .rule(rules::string_max_length(1050)),
        )
});

impl ManifestObject for Project {
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
        PROJECT_VALIDATOR
            .validate(self)
            .map_err(|err| err.with_name(format!("Project '{}'", self.metadata.name)))
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

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_project() -> Project {
        Project {
            api_version: Version::V1alpha,
            kind: Kind::Project,
            metadata: ProjectMetadata {
                name: "default".to_owned(),
                display_name: Some("Default".to_owned()),
                labels: None,
                annotations: None,
            },
            spec: ProjectSpec {
                description: "the default project".to_owned(),
            },
            manifest_src: None,
            organization: None,
        }
    }

    #[test]
    fn test_valid_project_passes() {
        assert!(valid_project().validate().is_ok());
    }

    #[test]
    fn test_bad_name_fails_at_metadata_name() {
        let mut project = valid_project();
        project.metadata.name = "BAD NAME".to_owned();

        let err = project.validate().unwrap_err();
        assert_eq!(err.name.as_deref(), Some("Project 'BAD NAME'"));
        let prop = &err.errors[0];
        assert_eq!(prop.property_name, "metadata.name");
        assert!(
            prop.errors
                .iter()
                .any(|e| e.message.contains("RFC-1123 DNS subdomain")),
            "expected a DNS-subdomain message, got: {:?}",
            prop.errors
        );
        assert!(err.has_error_code(rules::codes::STRING_DNS_SUBDOMAIN));
    }

    #[test]
    fn test_overlong_description_fails() {
        let mut project = valid_project();
        project.spec.description = "d".repeat(1051);

        let err = project.validate().unwrap_err();
        assert_eq!(err.errors[0].property_name, "spec.description");
    }

    #[test]
    fn test_missing_labels_are_not_validated() {
        let mut project = valid_project();
        project.metadata.labels = None;
        assert!(project.validate().is_ok());
    }
}
