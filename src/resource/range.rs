//! Version ranges for dependency resolution.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::version::{Version, VersionError};

/// An interval over [`Version`]s.
///
/// The lower bound is always closed. The upper bound is open or closed per
/// `inclusive`, or absent entirely (unbounded above).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VersionRange {
    minimum: Version,
    maximum: Option<Version>,
    inclusive: bool,
}

impl VersionRange {
    /// A bounded range. `minimum` must not exceed `maximum`.
    pub fn new(
        minimum: Version,
        maximum: Version,
        inclusive: bool,
    ) -> Result<Self, VersionError> {
        if maximum < minimum {
            return Err(VersionError::Range {
                raw: format!("[{minimum}, {maximum}{}", if inclusive { "]" } else { ")" }),
                reason: "minimum exceeds maximum".into(),
            });
        }
        Ok(Self {
            minimum,
            maximum: Some(maximum),
            inclusive,
        })
    }

    /// The range from `minimum` upward, unbounded above.
    pub fn at_least(minimum: Version) -> Self {
        Self {
            minimum,
            maximum: None,
            inclusive: true,
        }
    }

    /// The range matching exactly `version`: closed below at the version,
    /// open above at the next micro.
    pub fn exact(version: Version) -> Self {
        let maximum = version.increment_micro();
        Self {
            minimum: version,
            maximum: Some(maximum),
            inclusive: false,
        }
    }

    pub fn minimum(&self) -> &Version {
        &self.minimum
    }

    /// The upper bound, `None` when unbounded above.
    pub fn maximum(&self) -> Option<&Version> {
        self.maximum.as_ref()
    }

    pub fn is_inclusive(&self) -> bool {
        self.inclusive
    }

    /// Does the range contain `version`?
    ///
    /// An unbounded range matches any version at or above the minimum.
    pub fn contains(&self, version: &Version) -> bool {
        if version < &self.minimum {
            return false;
        }
        match &self.maximum {
            Some(maximum) => version < maximum || (version == maximum && self.inclusive),
            None => true,
        }
    }

    /// Parse the textual forms:
    ///
    /// - `[<min>,<max>)`: exclusive upper bound
    /// - `[<min>,<max>]`: inclusive upper bound
    /// - `=<v>`: exact match
    /// - `<v>`: unbounded above
    pub fn parse(raw: &str) -> Result<Self, VersionError> {
        let text = raw.trim();
        if text.is_empty() {
            return Err(VersionError::range(raw, "empty range string"));
        }

        if let Some(inner) = text.strip_prefix('[') {
            let Some((low, high)) = inner.split_once(',') else {
                return Err(VersionError::range(raw, "missing comma"));
            };
            let inclusive = match high.bytes().last() {
                Some(b']') => true,
                Some(b')') => false,
                _ => return Err(VersionError::range(raw, "does not end with ] or )")),
            };
            let minimum = Version::parse(low)?;
            let maximum = Version::parse(&high[..high.len() - 1])?;
            VersionRange::new(minimum, maximum, inclusive)
        } else if let Some(exact) = text.strip_prefix('=') {
            Ok(VersionRange::exact(Version::parse(exact)?))
        } else {
            Ok(VersionRange::at_least(Version::parse(text)?))
        }
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.maximum {
            Some(maximum) => write!(
                f,
                "[{}, {}{}",
                self.minimum,
                maximum,
                if self.inclusive { "]" } else { ")" }
            ),
            None => write!(f, "{}", self.minimum),
        }
    }
}

impl FromStr for VersionRange {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VersionRange::parse(s)
    }
}
