//! Workflow definition versions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// `MAJOR.MINOR.PATCH` version attached to a workflow definition.
///
/// Serialized as its display string so it reads naturally in schemas and
/// CLI output.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct SemanticVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl SemanticVersion {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl Default for SemanticVersion {
    fn default() -> Self {
        Self::new(1, 0, 0)
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Error returned when a version string is not `X.Y.Z`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseVersionError {
    #[error("Invalid version format: '{0}' (expected X.Y.Z)")]
    InvalidFormat(String),
    #[error("Invalid version number: '{0}'")]
    InvalidNumber(String),
}

impl FromStr for SemanticVersion {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut numbers = [0u32; 3];
        let mut parts = s.split('.');

        for slot in numbers.iter_mut() {
            let part = parts
                .next()
                .ok_or_else(|| ParseVersionError::InvalidFormat(s.to_string()))?;
            *slot = part
                .parse()
                .map_err(|_| ParseVersionError::InvalidNumber(part.to_string()))?;
        }
        if parts.next().is_some() {
            return Err(ParseVersionError::InvalidFormat(s.to_string()));
        }

        Ok(Self::new(numbers[0], numbers[1], numbers[2]))
    }
}

impl TryFrom<String> for SemanticVersion {
    type Error = ParseVersionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SemanticVersion> for String {
    fn from(version: SemanticVersion) -> Self {
        version.to_string()
    }
}
