//! Decode-layer errors.

use thiserror::Error;

/// Errors produced while dispatching and decoding a manifest document.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DecodeError {
    /// The document could not be deserialized into the target shape.
    #[error("malformed document: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The document envelope is missing a required discriminator field.
    #[error("document is missing the '{field}' envelope field")]
    MissingEnvelopeField {
        /// The absent envelope field (`apiVersion` or `kind`).
        field: &'static str,
    },

    /// The declared `apiVersion` is not in the supported registry.
    #[error("unsupported apiVersion: '{version}'")]
    UnsupportedVersion {
        /// The declared version string.
        version: String,
    },

    /// The declared `kind` is not in the supported registry.
    #[error("unsupported kind: '{kind}'")]
    UnsupportedKind {
        /// The declared kind string.
        kind: String,
    },

    /// Strict mode rejected a field not declared on the target type.
    #[error("unknown field '{field}' in {kind} object")]
    UnknownField {
        /// The kind being decoded.
        kind: String,
        /// Dot-qualified path of the offending field.
        field: String,
    },
}
