//! Live-activity deployment and deletion messages.

use serde::{Deserialize, Serialize};

use super::TransactionId;
use crate::resource::Version;

/// Master-to-controller request to install a live activity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveActivityDeploymentRequest {
    pub transaction_id: TransactionId,
    /// UUID of the live activity instance.
    pub uuid: String,
    pub identifying_name: String,
    pub version: Version,
    /// Where the controller fetches the activity package from.
    pub activity_source_uri: String,
}

/// Terminal outcome of one deployment transaction.
///
/// Built by the controller for delivered results, or by the master itself
/// for failures decided locally (dependency commit rejection, expiry).
/// Never mutated after construction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveActivityDeploymentResult {
    pub transaction_id: TransactionId,
    pub uuid: String,
    pub status: ActivityDeployStatus,
    /// Remote-supplied or master-supplied failure detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_detail: Option<String>,
    /// Wall-clock milliseconds at which the outcome was determined.
    pub time_deployed: u64,
}

impl LiveActivityDeploymentResult {
    pub fn new(
        transaction_id: TransactionId,
        uuid: impl Into<String>,
        status: ActivityDeployStatus,
        status_detail: Option<String>,
        time_deployed: u64,
    ) -> Self {
        Self {
            transaction_id,
            uuid: uuid.into(),
            status,
            status_detail,
            time_deployed,
        }
    }
}

/// How a deployment transaction ended. Closed vocabulary; an unknown status
/// string on the wire is a decode error, not a default.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityDeployStatus {
    Success,
    /// The activity package could not be copied to the controller.
    FailureCopy,
    /// The activity package could not be unpacked on the controller.
    FailureUnpack,
    /// The controller rejected the dependency commit.
    FailureDependenciesNotCommitted,
    /// The master could not resolve the declared dependencies.
    FailureDependenciesNotSatisfied,
    /// The master gave up waiting for a controller response.
    FailureTimeout,
}

impl ActivityDeployStatus {
    pub fn is_success(self) -> bool {
        matches!(self, ActivityDeployStatus::Success)
    }

    pub fn description(self) -> &'static str {
        match self {
            ActivityDeployStatus::Success => "live activity deployment was successful",
            ActivityDeployStatus::FailureCopy => {
                "the live activity failed to copy to the remote destination"
            }
            ActivityDeployStatus::FailureUnpack => {
                "the live activity could not be unpacked at the remote destination"
            }
            ActivityDeployStatus::FailureDependenciesNotCommitted => {
                "dependencies for the live activity could not be installed"
            }
            ActivityDeployStatus::FailureDependenciesNotSatisfied => {
                "dependencies for the live activity could not be resolved"
            }
            ActivityDeployStatus::FailureTimeout => {
                "the controller did not respond within the deployment window"
            }
        }
    }
}

/// Master-to-controller request to remove a live activity.
///
/// Deletion is stateless on the master side: no transaction, no tracker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveActivityDeleteRequest {
    pub uuid: String,
    pub identifying_name: String,
    pub version: String,
    /// Remove even if the controller considers the activity active.
    pub force: bool,
}
