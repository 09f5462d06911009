//! Envelope dispatch and decoding.
//!
//! Decoding accepts only `serde_json::Value`: YAML input is deserialized
//! into a `Value` upstream, so JSON and YAML renditions of the same
//! content take the same decode path and produce equal objects.

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::DecodeError;
use crate::kind::Kind;
use crate::object::{AnyObject, GenericObject};
use crate::project::Project;
use crate::service::Service;
use crate::version::Version;

/// Per-call decode behavior. No process-wide state: callers pass options
/// into every decode call.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecodeOptions {
    /// Decode every kind into the dynamic [`GenericObject`] representation
    /// instead of its concrete type. Unknown kinds still fail.
    pub generic: bool,
    /// Reject any field not declared on the target type; lenient mode
    /// ignores unknown fields.
    pub strict: bool,
}

/// The version+kind discriminator pair read before full decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Envelope {
    pub version: Version,
    pub kind: Kind,
}

/// Cheap partial decode extracting only the envelope discriminators.
///
/// # Errors
///
/// Fails when either discriminator is absent, or when the declared
/// version or kind is unknown.
pub fn parse_envelope(value: &Value) -> Result<Envelope, DecodeError> {
    let version = envelope_field(value, "apiVersion")?.parse::<Version>()?;
    let kind = envelope_field(value, "kind")?.parse::<Kind>()?;
    Ok(Envelope { version, kind })
}

fn envelope_field<'a>(value: &'a Value, field: &'static str) -> Result<&'a str, DecodeError> {
    value
        .get(field)
        .and_then(Value::as_str)
        .ok_or(DecodeError::MissingEnvelopeField { field })
}

type DecodeFn = fn(&Value, &DecodeOptions) -> Result<AnyObject, DecodeError>;

/// Maps `(version, kind)` pairs to decode functions. New kinds extend the
/// registry instead of a central branch; [`DecodeRegistry::default`]
/// carries the built-in kinds.
pub struct DecodeRegistry {
    entries: HashMap<(Version, Kind), DecodeFn>,
}

impl DecodeRegistry {
    /// An empty registry.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Register a decode function for a `(version, kind)` pair.
    pub fn register(&mut self, version: Version, kind: Kind, decode: DecodeFn) {
        self.entries.insert((version, kind), decode);
    }

    /// Dispatch a document to its decode path.
    ///
    /// # Errors
    ///
    /// Fails on a malformed envelope, an unregistered `(version, kind)`
    /// pair, a shape mismatch, or an unknown field under strict mode.
    pub fn decode(&self, value: &Value, options: &DecodeOptions) -> Result<AnyObject, DecodeError> {
        let envelope = parse_envelope(value)?;
        let decode = self
            .entries
            .get(&(envelope.version, envelope.kind))
            .ok_or_else(|| DecodeError::UnsupportedKind {
                kind: envelope.kind.to_string(),
            })?;
        if options.generic {
            return decode_generic(envelope, value);
        }
        decode(value, options)
    }
}

impl Default for DecodeRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(Version::V1alpha, Kind::Project, decode_project);
        registry.register(Version::V1alpha, Kind::Service, decode_service);
        registry
    }
}

fn decode_project(value: &Value, options: &DecodeOptions) -> Result<AnyObject, DecodeError> {
    Ok(AnyObject::Project(decode_typed::<Project>(
        value,
        Kind::Project,
        options,
    )?))
}

fn decode_service(value: &Value, options: &DecodeOptions) -> Result<AnyObject, DecodeError> {
    Ok(AnyObject::Service(decode_typed::<Service>(
        value,
        Kind::Service,
        options,
    )?))
}

fn decode_generic(envelope: Envelope, value: &Value) -> Result<AnyObject, DecodeError> {
    let fields = value
        .as_object()
        .cloned()
        .ok_or(DecodeError::MissingEnvelopeField { field: "kind" })?;
    Ok(AnyObject::Generic(GenericObject::new(
        envelope.version,
        envelope.kind,
        fields,
    )))
}

/// Decode a concrete kind, enforcing strict unknown-field rejection when
/// requested.
///
/// The strict check compares the input mapping against the re-serialized
/// object: typed kinds serialize every declared field (optionals as
/// `null`), so any input key absent from the re-serialization is unknown.
fn decode_typed<T>(value: &Value, kind: Kind, options: &DecodeOptions) -> Result<T, DecodeError>
where
    T: DeserializeOwned + Serialize,
{
    let decoded: T = serde_json::from_value(value.clone())?;
    if options.strict {
        let known = serde_json::to_value(&decoded)?;
        let mut unknown = Vec::new();
        collect_unknown_fields(value, &known, "", &mut unknown);
        if let Some(field) = unknown.into_iter().next() {
            return Err(DecodeError::UnknownField {
                kind: kind.to_string(),
                field,
            });
        }
    }
    Ok(decoded)
}

fn collect_unknown_fields(input: &Value, known: &Value, path: &str, out: &mut Vec<String>) {
    match (input, known) {
        (Value::Object(input_map), Value::Object(known_map)) => {
            for (key, input_value) in input_map {
                let sub_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{path}.{key}")
                };
                match known_map.get(key) {
                    Some(known_value) => {
                        collect_unknown_fields(input_value, known_value, &sub_path, out);
                    }
                    None => out.push(sub_path),
                }
            }
        }
        (Value::Array(input_items), Value::Array(known_items)) => {
            for (idx, (input_item, known_item)) in
                input_items.iter().zip(known_items).enumerate()
            {
                collect_unknown_fields(input_item, known_item, &format!("{path}[{idx}]"), out);
            }
        }
        _ => {}
    }
}
