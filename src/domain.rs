//! Minimal fleet identities the orchestrator works with.
//!
//! The full domain model (controllers, activities, spaces) lives outside
//! this crate; deployment only needs the identifying slices below.

use serde::{Deserialize, Serialize};

use crate::resource::{ResourceDependencyReference, Version, VersionRange};

/// A remote node capable of installing and running live activities.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceControllerRef {
    /// The controller's UUID on the wire.
    pub uuid: String,
}

impl SpaceControllerRef {
    pub fn new(uuid: impl Into<String>) -> Self {
        Self { uuid: uuid.into() }
    }
}

/// A container-resource requirement declared by an activity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityDependency {
    pub identifying_name: String,
    pub range: VersionRange,
}

impl ActivityDependency {
    pub fn new(identifying_name: impl Into<String>, range: VersionRange) -> Self {
        Self {
            identifying_name: identifying_name.into(),
            range,
        }
    }

    /// The dependency as the reference shape carried in query requests.
    pub fn to_reference(&self) -> ResourceDependencyReference {
        ResourceDependencyReference::new(self.identifying_name.clone(), self.range.clone())
    }
}

/// The identity of an installable live activity instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveActivityRef {
    /// Instance UUID, the stable identity across installs.
    pub uuid: String,
    /// The activity's identifying name in the resource repository.
    pub identifying_name: String,
    pub version: Version,
    /// Container resources the activity declares it needs.
    pub dependencies: Vec<ActivityDependency>,
}

impl LiveActivityRef {
    pub fn new(
        uuid: impl Into<String>,
        identifying_name: impl Into<String>,
        version: Version,
    ) -> Self {
        Self {
            uuid: uuid.into(),
            identifying_name: identifying_name.into(),
            version,
            dependencies: Vec::new(),
        }
    }

    pub fn with_dependencies(mut self, dependencies: Vec<ActivityDependency>) -> Self {
        self.dependencies = dependencies;
        self
    }
}

/// A live activity paired with the controller it is assigned to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveLiveActivity {
    pub activity: LiveActivityRef,
    pub controller: SpaceControllerRef,
}

impl ActiveLiveActivity {
    pub fn new(activity: LiveActivityRef, controller: SpaceControllerRef) -> Self {
        Self {
            activity,
            controller,
        }
    }
}
