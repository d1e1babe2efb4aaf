//! Dependency references and resolved resources.

use serde::{Deserialize, Serialize};

use super::range::VersionRange;
use super::version::Version;

/// A named requirement with an acceptable version range, declared by a live
/// activity against container-level resources.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDependencyReference {
    pub name: String,
    pub range: VersionRange,
}

impl ResourceDependencyReference {
    pub fn new(name: impl Into<String>, range: VersionRange) -> Self {
        Self {
            name: name.into(),
            range,
        }
    }
}

/// A concrete (name, version, signature, source location) tuple chosen to
/// satisfy a dependency reference.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedResource {
    pub name: String,
    pub version: Version,
    pub signature: String,
    pub source_uri: String,
}

impl ResolvedResource {
    pub fn new(
        name: impl Into<String>,
        version: Version,
        signature: impl Into<String>,
        source_uri: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version,
            signature: signature.into(),
            source_uri: source_uri.into(),
        }
    }
}
