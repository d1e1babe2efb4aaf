//! Dependency satisfaction against the master's resource inventory.

use std::sync::Arc;

use thiserror::Error;

use crate::resource::{
    NamedVersionedResourceCollection, ResolvedResource, ResourceDependencyReference, VersionRange,
};

/// A dependency no stored resource satisfies.
#[derive(Debug, Error, Clone)]
#[error("no resource satisfies dependency `{name}` {range}")]
pub struct SatisfyError {
    pub name: String,
    pub range: VersionRange,
}

/// Resolves declared dependencies to concrete resources.
///
/// Invoked on the deploy path when dependencies are sent up front; a
/// failure here fails the deployment before anything reaches the wire.
pub trait DependencySatisfier: Send {
    fn satisfy(
        &self,
        dependencies: &[ResourceDependencyReference],
    ) -> Result<Vec<ResolvedResource>, SatisfyError>;
}

/// Satisfier backed by the named, version-indexed resource collection.
///
/// Each dependency resolves to the highest stored version inside its range.
pub struct CollectionDependencySatisfier {
    resources: Arc<NamedVersionedResourceCollection<ResolvedResource>>,
}

impl CollectionDependencySatisfier {
    pub fn new(resources: Arc<NamedVersionedResourceCollection<ResolvedResource>>) -> Self {
        Self { resources }
    }
}

impl DependencySatisfier for CollectionDependencySatisfier {
    fn satisfy(
        &self,
        dependencies: &[ResourceDependencyReference],
    ) -> Result<Vec<ResolvedResource>, SatisfyError> {
        let mut resolved = Vec::with_capacity(dependencies.len());
        for dependency in dependencies {
            match self
                .resources
                .get_in_range(&dependency.name, &dependency.range)
            {
                Some(resource) => resolved.push(resource),
                None => {
                    return Err(SatisfyError {
                        name: dependency.name.clone(),
                        range: dependency.range.clone(),
                    })
                }
            }
        }
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::Version;

    fn inventory() -> Arc<NamedVersionedResourceCollection<ResolvedResource>> {
        let resources = NamedVersionedResourceCollection::new();
        for (version, uri) in [
            (Version::new(1, 0, 0), "repo://bundles/lib-comm/1.0.0"),
            (Version::new(1, 5, 0), "repo://bundles/lib-comm/1.5.0"),
            (Version::new(2, 0, 0), "repo://bundles/lib-comm/2.0.0"),
        ] {
            resources.add(
                "lib-comm",
                version.clone(),
                ResolvedResource::new("lib-comm", version, "sig", uri),
            );
        }
        Arc::new(resources)
    }

    #[test]
    fn resolves_highest_version_in_range() {
        let satisfier = CollectionDependencySatisfier::new(inventory());
        let resolved = satisfier
            .satisfy(&[ResourceDependencyReference::new(
                "lib-comm",
                VersionRange::parse("[1.0.0,2.0.0)").unwrap(),
            )])
            .unwrap();

        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].version, Version::new(1, 5, 0));
    }

    #[test]
    fn missing_dependency_is_an_error_naming_it() {
        let satisfier = CollectionDependencySatisfier::new(inventory());
        let err = satisfier
            .satisfy(&[ResourceDependencyReference::new(
                "lib-vision",
                VersionRange::parse("1.0.0").unwrap(),
            )])
            .unwrap_err();

        assert_eq!(err.name, "lib-vision");
        assert!(err.to_string().contains("lib-vision"));
    }

    #[test]
    fn one_miss_fails_the_whole_set() {
        let satisfier = CollectionDependencySatisfier::new(inventory());
        let result = satisfier.satisfy(&[
            ResourceDependencyReference::new(
                "lib-comm",
                VersionRange::parse("1.0.0").unwrap(),
            ),
            ResourceDependencyReference::new(
                "lib-vision",
                VersionRange::parse("1.0.0").unwrap(),
            ),
        ]);
        assert!(result.is_err());
    }
}
