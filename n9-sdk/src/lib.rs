//! # n9-sdk
//!
//! Turns heterogeneous raw sources (files, directories, glob patterns,
//! URLs, in-memory streams) into typed, validated N9 manifest objects.
//!
//! Flow: raw source strings → resolved sources → deduplicated byte
//! definitions → split documents → decoded objects. Validation is
//! caller-invoked per object via
//! [`ManifestObject::validate`](n9_manifest::ManifestObject::validate).
//!
//! All processing is synchronous and single-threaded; sources are read
//! one path at a time in a deterministic order. URL bytes come from an
//! externally supplied [`Fetch`] implementation, which owns timeouts,
//! cancellation and retries.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use n9_manifest::{DecodeOptions, DecodeRegistry, ManifestObject};
//! use n9_sdk::{NoFetch, read_and_decode};
//!
//! let registry = DecodeRegistry::default();
//! let objects = read_and_decode(
//!     &["./manifests".to_owned(), "./extra/project.yaml".to_owned()],
//!     &NoFetch,
//!     &registry,
//!     &DecodeOptions::default(),
//! ).unwrap();
//! for object in &objects {
//!     object.validate().unwrap();
//! }
//! ```

mod error;
mod reader;
mod resolver;
mod splitter;

pub use error::{ReadError, SdkError, SourceError};
pub use reader::{Fetch, FetchResponse, NoFetch, RawDefinition, read_sources};
pub use resolver::{
    STDIN_SENTINEL, SUPPORTED_EXTENSIONS, Source, SourceType, resolve_sources,
};
pub use splitter::{Format, RawDocument, Shape, split_documents};

use n9_manifest::{AnyObject, DecodeOptions, DecodeRegistry, annotate_source};
use serde_json::Value;
use tracing::debug;

/// Decode every document of every definition, stamping provenance on
/// each decoded object. Definition and document order is preserved.
///
/// # Errors
///
/// Fails on non-UTF-8 content, malformed documents, and envelope or
/// decode failures; the offending definition and document index are
/// named in the error.
pub fn decode_definitions(
    definitions: &[RawDefinition],
    registry: &DecodeRegistry,
    options: &DecodeOptions,
) -> Result<Vec<AnyObject>, SdkError> {
    let mut objects = Vec::new();
    for definition in definitions {
        let text =
            std::str::from_utf8(&definition.content).map_err(|_| SdkError::InvalidEncoding {
                definition: definition.source.clone(),
            })?;
        let documents = split_documents(text);
        debug!(
            source = %definition.source,
            documents = documents.len(),
            "decoding definition"
        );
        for (index, document) in documents.iter().enumerate() {
            for value in parse_document(document, &definition.source, index)? {
                let mut object =
                    registry
                        .decode(&value, options)
                        .map_err(|source| SdkError::Decode {
                            definition: definition.source.clone(),
                            index,
                            source,
                        })?;
                annotate_source(&mut object, &definition.source);
                objects.push(object);
            }
        }
    }
    Ok(objects)
}

/// Resolve, read and decode raw source strings in one call.
///
/// # Errors
///
/// Propagates resolution, read and decode failures; see
/// [`decode_definitions`].
pub fn read_and_decode(
    raw_sources: &[String],
    fetch: &dyn Fetch,
    registry: &DecodeRegistry,
    options: &DecodeOptions,
) -> Result<Vec<AnyObject>, SdkError> {
    let sources = resolve_sources(raw_sources)?;
    let definitions = read_sources(sources, fetch)?;
    decode_definitions(&definitions, registry, options)
}

// Parse one document into its records, honoring the splitter's
// array-vs-single classification.
fn parse_document(
    document: &RawDocument,
    definition: &str,
    index: usize,
) -> Result<Vec<Value>, SdkError> {
    let parse_err = |message: String| SdkError::Parse {
        definition: definition.to_owned(),
        index,
        message,
    };

    let value: Value = match document.format {
        Format::Json => {
            serde_json::from_str(&document.content).map_err(|e| parse_err(e.to_string()))?
        }
        Format::Yaml => {
            serde_saphyr::from_str(&document.content).map_err(|e| parse_err(e.to_string()))?
        }
    };

    match document.shape {
        Shape::Array => match value {
            Value::Array(items) => Ok(items),
            other => Err(parse_err(format!(
                "expected an array of records, got: {}",
                value_kind(&other)
            ))),
        },
        Shape::Single => Ok(vec![value]),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
