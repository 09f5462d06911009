//! Object-type discriminator (`kind`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DecodeError;

/// A supported manifest object kind. Matched case-sensitively against the
/// `kind` envelope field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    /// A project grouping services.
    Project,
    /// A service belonging to a project.
    Service,
}

impl Kind {
    /// The canonical wire form of this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Project => "Project",
            Self::Service => "Service",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kind {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Project" => Ok(Self::Project),
            "Service" => Ok(Self::Service),
            other => Err(DecodeError::UnsupportedKind {
                kind: other.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trip() {
        assert_eq!("Project".parse::<Kind>().unwrap(), Kind::Project);
        assert_eq!(Kind::Service.to_string(), "Service");
    }

    #[test]
    fn test_kind_is_case_sensitive() {
        assert!("project".parse::<Kind>().is_err());
        assert!("SERVICE".parse::<Kind>().is_err());
    }
}
