//! Master/controller wire messages.
//!
//! Value objects exchanged between master and controller, and the envelope
//! codec that frames them on the stream transport.

mod activity;
pub mod codec;
mod resource;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use activity::{
    ActivityDeployStatus, LiveActivityDeleteRequest, LiveActivityDeploymentRequest,
    LiveActivityDeploymentResult,
};
pub use resource::{
    ContainerResourceDeploymentCommitRequest, ContainerResourceDeploymentCommitResponse,
    ContainerResourceDeploymentQueryRequest, ContainerResourceDeploymentQueryResponse,
    ResourceCommitStatus, ResourceQueryStatus,
};

/// The identifier correlating every message of one deployment transaction.
///
/// Opaque on the wire; the master mints them as UUIDs but echoes whatever a
/// response carries when correlating.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TransactionId({})", self.0)
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
