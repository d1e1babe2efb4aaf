//! Version-indexed resource collections.
//!
//! The central dependency-resolution primitive: "give me the newest resource
//! satisfying this range." Collections are read far more often than written,
//! so lookups take a read lock and see one consistent snapshot.

use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;

use parking_lot::RwLock;

use super::range::VersionRange;
use super::version::Version;

/// Highest entry of `map` satisfying `range`, if any.
///
/// With a bounded maximum this is the greatest stored version at or below
/// the bound (strictly below when exclusive); unbounded ranges take the
/// greatest stored version outright. The candidate must still clear the
/// minimum.
fn best_in_range<'a, T>(map: &'a BTreeMap<Version, T>, range: &VersionRange) -> Option<&'a T> {
    let candidate = match range.maximum() {
        Some(maximum) => {
            let upper = if range.is_inclusive() {
                Bound::Included(maximum)
            } else {
                Bound::Excluded(maximum)
            };
            map.range((Bound::Unbounded, upper)).next_back()
        }
        None => map.iter().next_back(),
    };

    candidate.and_then(|(version, value)| (range.minimum() <= version).then_some(value))
}

/// A thread-safe collection of resources keyed by version.
///
/// Values are cloned out of the collection so callers never hold the lock.
pub struct VersionedResourceCollection<T> {
    resources: RwLock<BTreeMap<Version, T>>,
}

impl<T: Clone> VersionedResourceCollection<T> {
    pub fn new() -> Self {
        Self {
            resources: RwLock::new(BTreeMap::new()),
        }
    }

    /// Add a resource, returning the value it displaced, if any.
    pub fn add(&self, version: Version, resource: T) -> Option<T> {
        self.resources.write().insert(version, resource)
    }

    /// Exact-version lookup.
    pub fn get(&self, version: &Version) -> Option<T> {
        self.resources.read().get(version).cloned()
    }

    /// The resource at the highest version satisfying `range`, or `None`
    /// when nothing qualifies.
    pub fn get_in_range(&self, range: &VersionRange) -> Option<T> {
        best_in_range(&self.resources.read(), range).cloned()
    }

    /// Remove a version, returning its value, if any.
    pub fn remove(&self, version: &Version) -> Option<T> {
        self.resources.write().remove(version)
    }

    /// The resource at the highest version, if the collection is non-empty.
    pub fn highest(&self) -> Option<T> {
        self.resources
            .read()
            .iter()
            .next_back()
            .map(|(_, value)| value.clone())
    }

    /// All resources, ascending by version.
    pub fn all(&self) -> Vec<T> {
        self.resources.read().values().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.read().is_empty()
    }
}

impl<T: Clone> Default for VersionedResourceCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Versioned resources grouped by name.
///
/// Backs dependency satisfaction: each named dependency resolves against
/// the versions stored under that name.
pub struct NamedVersionedResourceCollection<T> {
    resources: RwLock<HashMap<String, BTreeMap<Version, T>>>,
}

impl<T: Clone> NamedVersionedResourceCollection<T> {
    pub fn new() -> Self {
        Self {
            resources: RwLock::new(HashMap::new()),
        }
    }

    /// Add a resource under a name, returning the value it displaced.
    pub fn add(&self, name: impl Into<String>, version: Version, resource: T) -> Option<T> {
        self.resources
            .write()
            .entry(name.into())
            .or_default()
            .insert(version, resource)
    }

    /// Exact lookup by name and version.
    pub fn get(&self, name: &str, version: &Version) -> Option<T> {
        self.resources
            .read()
            .get(name)
            .and_then(|versions| versions.get(version))
            .cloned()
    }

    /// The resource under `name` at the highest version satisfying `range`.
    pub fn get_in_range(&self, name: &str, range: &VersionRange) -> Option<T> {
        self.resources
            .read()
            .get(name)
            .and_then(|versions| best_in_range(versions, range))
            .cloned()
    }

    /// Remove one version of a named resource.
    pub fn remove(&self, name: &str, version: &Version) -> Option<T> {
        let mut resources = self.resources.write();
        let versions = resources.get_mut(name)?;
        let removed = versions.remove(version);
        if versions.is_empty() {
            resources.remove(name);
        }
        removed
    }
}

impl<T: Clone> Default for NamedVersionedResourceCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}
