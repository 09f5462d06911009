//! # n9-manifest
//!
//! Typed N9 manifest objects, the version+kind envelope dispatch, and the
//! per-kind validators.
//!
//! Documents enter as `serde_json::Value` (JSON and YAML alike) and leave
//! as [`AnyObject`]: a concrete, strongly-typed kind or — in generic
//! mode — an untyped name→value mapping. Decode behavior is controlled
//! per call through [`DecodeOptions`]; there is no process-wide state.
//!
//! ```rust
//! use n9_manifest::{DecodeOptions, DecodeRegistry, ManifestObject};
//!
//! let registry = DecodeRegistry::default();
//! let doc = serde_json::json!({
//!     "apiVersion": "n9/v1alpha",
//!     "kind": "Project",
//!     "metadata": { "name": "default" },
//! });
//! let object = registry.decode(&doc, &DecodeOptions::default()).unwrap();
//! assert_eq!(object.name(), "default");
//! assert!(object.validate().is_ok());
//! ```

mod decode;
mod error;
mod kind;
pub mod labels;
mod object;
mod project;
mod service;
mod version;

pub use decode::{DecodeOptions, DecodeRegistry, Envelope, parse_envelope};
pub use error::DecodeError;
pub use kind::Kind;
pub use object::{
    AnyObject, GenericObject, ManifestObject, annotate_organization, annotate_source,
};
pub use project::{Project, ProjectMetadata, ProjectSpec};
pub use service::{Service, ServiceMetadata, ServiceSpec};
pub use version::Version;
