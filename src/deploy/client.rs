//! Collaborator seams at the network boundary.
//!
//! The transport itself lives outside this crate. The orchestrator only
//! needs fire-and-forget sends; responses come back later through its
//! handler entry points, correlated by transaction id.

use crate::domain::SpaceControllerRef;
use crate::messages::{
    ContainerResourceDeploymentCommitRequest, ContainerResourceDeploymentQueryRequest,
    LiveActivityDeleteRequest, LiveActivityDeploymentRequest,
};
use crate::resource::Version;

/// Client for sending requests to a remote space controller.
///
/// Every call is fire-and-forget: delivery failures surface later as a
/// missing response, not as an error here.
pub trait RemoteControllerClient: Send {
    fn deploy_live_activity(
        &self,
        controller: &SpaceControllerRef,
        request: &LiveActivityDeploymentRequest,
    );

    fn delete_live_activity(
        &self,
        controller: &SpaceControllerRef,
        request: &LiveActivityDeleteRequest,
    );

    fn query_resource_deployment(
        &self,
        controller: &SpaceControllerRef,
        query: &ContainerResourceDeploymentQueryRequest,
    );

    fn commit_resource_deployment(
        &self,
        controller: &SpaceControllerRef,
        commit: &ContainerResourceDeploymentCommitRequest,
    );
}

/// Repository artifact classes addressable by URI.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResourceCategory {
    /// Installable activity packages.
    Activity,
    /// Container-level shared bundles.
    ContainerBundle,
}

impl ResourceCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceCategory::Activity => "activity",
            ResourceCategory::ContainerBundle => "container_bundle",
        }
    }
}

/// Server holding deployable artifacts, addressed by category, name and
/// version. Used once per deployment to locate the activity package the
/// controller should fetch.
pub trait ResourceRepositoryServer: Send {
    fn resource_uri(&self, category: ResourceCategory, name: &str, version: &Version) -> String;
}
