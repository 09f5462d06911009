//! Schema-generation discriminator (`apiVersion`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DecodeError;

/// A supported manifest schema generation. Matched case-sensitively
/// against the `apiVersion` envelope field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Version {
    /// The `n9/v1alpha` schema generation.
    #[serde(rename = "n9/v1alpha")]
    V1alpha,
}

impl Version {
    /// The canonical wire form of this version.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::V1alpha => "n9/v1alpha",
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Version {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "n9/v1alpha" => Ok(Self::V1alpha),
            other => Err(DecodeError::UnsupportedVersion {
                version: other.to_owned(),
            }),
        }
    }
}
