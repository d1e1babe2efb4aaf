//! Resource versions.
//!
//! A version is a four-part value: major.minor.micro plus an optional
//! qualifier. Ordering compares the numeric components first, then the
//! qualifier, where an absent qualifier sorts before any present one.

use std::fmt;
use std::str::FromStr;

use serde::de;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Invalid version or version range text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum VersionError {
    #[error("version `{raw}` is invalid: {reason}")]
    Version { raw: String, reason: String },

    #[error("version range `{raw}` is invalid: {reason}")]
    Range { raw: String, reason: String },
}

impl VersionError {
    pub(crate) fn version(raw: &str, reason: impl Into<String>) -> Self {
        VersionError::Version {
            raw: raw.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn range(raw: &str, reason: impl Into<String>) -> Self {
        VersionError::Range {
            raw: raw.to_string(),
            reason: reason.into(),
        }
    }
}

/// An immutable resource version.
///
/// Field order matters: the derived ordering compares major, minor, micro,
/// then qualifier, and `None` qualifiers sort before `Some`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    major: u32,
    minor: u32,
    micro: u32,
    qualifier: Option<String>,
}

impl Version {
    /// Create a version with no qualifier.
    pub fn new(major: u32, minor: u32, micro: u32) -> Self {
        Self {
            major,
            minor,
            micro,
            qualifier: None,
        }
    }

    /// Create a version with a qualifier.
    pub fn with_qualifier(major: u32, minor: u32, micro: u32, qualifier: impl Into<String>) -> Self {
        Self {
            major,
            minor,
            micro,
            qualifier: Some(qualifier.into()),
        }
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    pub fn minor(&self) -> u32 {
        self.minor
    }

    pub fn micro(&self) -> u32 {
        self.micro
    }

    pub fn qualifier(&self) -> Option<&str> {
        self.qualifier.as_deref()
    }

    /// The next micro version, qualifier cleared.
    ///
    /// Used to synthesize the exclusive upper bound of an exact-match range.
    pub fn increment_micro(&self) -> Version {
        Version {
            major: self.major,
            minor: self.minor,
            micro: self.micro + 1,
            qualifier: None,
        }
    }

    /// Parse the dotted text form `major[.minor[.micro[.qualifier]]]`.
    ///
    /// Omitted minor/micro default to 0. The qualifier is one or more of
    /// `[0-9A-Za-z_-]`. Anything else is an error, never a partial parse.
    pub fn parse(raw: &str) -> Result<Self, VersionError> {
        let text = raw.trim();
        if text.is_empty() {
            return Err(VersionError::version(raw, "empty version string"));
        }

        let mut parts = text.splitn(4, '.');
        let major = parse_component(raw, parts.next().unwrap_or(""))?;
        let minor = match parts.next() {
            Some(part) => parse_component(raw, part)?,
            None => 0,
        };
        let micro = match parts.next() {
            Some(part) => parse_component(raw, part)?,
            None => 0,
        };
        let qualifier = match parts.next() {
            Some(part) => Some(parse_qualifier(raw, part)?),
            None => None,
        };

        Ok(Self {
            major,
            minor,
            micro,
            qualifier,
        })
    }
}

fn parse_component(raw: &str, part: &str) -> Result<u32, VersionError> {
    if part.is_empty() {
        return Err(VersionError::version(raw, "empty numeric component"));
    }
    if !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(VersionError::version(
            raw,
            format!("component `{part}` is not a number"),
        ));
    }
    part.parse::<u32>()
        .map_err(|_| VersionError::version(raw, format!("component `{part}` is out of range")))
}

fn parse_qualifier(raw: &str, part: &str) -> Result<String, VersionError> {
    if part.is_empty() {
        return Err(VersionError::version(raw, "empty qualifier"));
    }
    if !part
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    {
        return Err(VersionError::version(
            raw,
            format!("qualifier `{part}` contains an illegal character"),
        ));
    }
    Ok(part.to_string())
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.micro)?;
        if let Some(qualifier) = &self.qualifier {
            write!(f, ".{qualifier}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Version({self})")
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Version::parse(s)
    }
}

// The wire form is the object `{"version": "<text>"}`, matching what the
// controller codec exchanges. Both impls are pinned by hand so a derive
// change can never alter the protocol.
impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Version", 1)?;
        state.serialize_field("version", &self.to_string())?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Wire {
            version: String,
        }

        let wire = Wire::deserialize(deserializer)?;
        Version::parse(&wire.version).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_and_partial_forms() {
        assert_eq!(Version::parse("1.2.3").unwrap(), Version::new(1, 2, 3));
        assert_eq!(Version::parse("1.2").unwrap(), Version::new(1, 2, 0));
        assert_eq!(Version::parse("7").unwrap(), Version::new(7, 0, 0));
        assert_eq!(
            Version::parse("1.2.3.beta1").unwrap(),
            Version::with_qualifier(1, 2, 3, "beta1")
        );
        assert_eq!(Version::parse(" 1.0.0 ").unwrap(), Version::new(1, 0, 0));
    }

    #[test]
    fn parse_rejects_malformed_input() {
        for bad in ["", "  ", "a.b.c", "1..3", "1.2.3.", "1.2.3.bad!", "-1.0.0", "1.2.x"] {
            assert!(Version::parse(bad).is_err(), "accepted `{bad}`");
        }
    }

    #[test]
    fn ordering_is_numeric_then_qualifier() {
        let unqualified = Version::new(1, 2, 3);
        let qualified = Version::with_qualifier(1, 2, 3, "alpha");

        assert!(Version::new(1, 2, 3) < Version::new(1, 2, 4));
        assert!(Version::new(1, 2, 9) < Version::new(1, 10, 0));
        assert!(Version::new(1, 9, 9) < Version::new(2, 0, 0));
        assert!(unqualified < qualified);
        assert!(
            Version::with_qualifier(1, 2, 3, "alpha") < Version::with_qualifier(1, 2, 3, "beta")
        );
    }

    #[test]
    fn increment_micro_clears_qualifier() {
        let next = Version::with_qualifier(1, 2, 3, "beta").increment_micro();
        assert_eq!(next, Version::new(1, 2, 4));
        assert_eq!(next.qualifier(), None);
    }

    #[test]
    fn display_round_trips() {
        for text in ["1.2.3", "0.0.1", "1.2.3.beta1"] {
            assert_eq!(Version::parse(text).unwrap().to_string(), text);
        }
    }

    #[test]
    fn wire_form_is_version_object() {
        let encoded = serde_json::to_string(&Version::new(1, 2, 3)).unwrap();
        assert_eq!(encoded, r#"{"version":"1.2.3"}"#);

        let decoded: Version = serde_json::from_str(r#"{"version":"2.0.0.rc1"}"#).unwrap();
        assert_eq!(decoded, Version::with_qualifier(2, 0, 0, "rc1"));

        assert!(serde_json::from_str::<Version>(r#"{"version":"nope"}"#).is_err());
    }
}
