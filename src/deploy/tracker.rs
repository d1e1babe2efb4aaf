//! Per-deployment transaction tracking.

use crate::domain::ActiveLiveActivity;
use crate::messages::{
    ContainerResourceDeploymentQueryRequest, LiveActivityDeploymentRequest, TransactionId,
};

/// Where a deployment transaction currently stands.
///
/// Transitions move forward only; no phase is revisited. `DeploymentComplete`
/// and `Failed` are terminal, at which point the tracker leaves the live set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeploymentPhase {
    /// Tracker built, nothing sent yet.
    Created,
    /// Dependency query sent, awaiting the controller's answer.
    QueryingDependencies,
    /// Resource commit sent, awaiting acceptance.
    SatisfyingDependencies,
    /// Deploy request sent, awaiting the deployment result.
    DeployingActivity,
    /// Terminal: a deployment result was delivered.
    DeploymentComplete,
    /// Terminal: the master decided failure locally.
    Failed,
}

impl DeploymentPhase {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            DeploymentPhase::DeploymentComplete | DeploymentPhase::Failed
        )
    }
}

/// Mutable record of one live-activity install attempt.
///
/// Owned exclusively by the orchestrator; created once per deploy call and
/// never reused across deployments.
pub struct DeploymentTracker {
    transaction_id: TransactionId,
    activity: ActiveLiveActivity,
    deployment_request: LiveActivityDeploymentRequest,
    resource_query: Option<ContainerResourceDeploymentQueryRequest>,
    phase: DeploymentPhase,
    created_at_ms: u64,
    updated_at_ms: u64,
}

impl DeploymentTracker {
    /// Build a tracker and its deploy request for `activity`.
    pub fn new(
        activity: ActiveLiveActivity,
        transaction_id: TransactionId,
        activity_source_uri: String,
        now_ms: u64,
    ) -> Self {
        let deployment_request = LiveActivityDeploymentRequest {
            transaction_id: transaction_id.clone(),
            uuid: activity.activity.uuid.clone(),
            identifying_name: activity.activity.identifying_name.clone(),
            version: activity.activity.version.clone(),
            activity_source_uri,
        };

        Self {
            transaction_id,
            activity,
            deployment_request,
            resource_query: None,
            phase: DeploymentPhase::Created,
            created_at_ms: now_ms,
            updated_at_ms: now_ms,
        }
    }

    pub fn transaction_id(&self) -> &TransactionId {
        &self.transaction_id
    }

    pub fn activity(&self) -> &ActiveLiveActivity {
        &self.activity
    }

    pub fn deployment_request(&self) -> &LiveActivityDeploymentRequest {
        &self.deployment_request
    }

    /// The dependency query, present iff the activity declares dependencies.
    pub fn resource_query(&self) -> Option<&ContainerResourceDeploymentQueryRequest> {
        self.resource_query.as_ref()
    }

    pub fn set_resource_query(&mut self, query: ContainerResourceDeploymentQueryRequest) {
        self.resource_query = Some(query);
    }

    pub fn phase(&self) -> DeploymentPhase {
        self.phase
    }

    /// Move to `phase`, stamping the update time.
    pub fn advance(&mut self, phase: DeploymentPhase, now_ms: u64) {
        self.phase = phase;
        self.updated_at_ms = now_ms;
    }

    pub fn created_at_ms(&self) -> u64 {
        self.created_at_ms
    }

    /// Last phase-transition time; what the expiry sweep ages against.
    pub fn updated_at_ms(&self) -> u64 {
        self.updated_at_ms
    }
}
