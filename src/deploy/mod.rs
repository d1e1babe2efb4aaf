//! Master-side activity deployment orchestration.
//!
//! `manager` holds the transaction state machine, `runtime` the state
//! thread serializing access to it. The network, repository and event
//! collaborators appear only as traits at the boundary.

mod client;
mod ids;
mod listeners;
mod manager;
mod runtime;
mod satisfier;
mod tracker;

use thiserror::Error;

pub use client::{RemoteControllerClient, ResourceCategory, ResourceRepositoryServer};
pub use ids::{
    SystemTimeSource, TimeSource, TransactionIdGenerator, UuidTransactionIdGenerator,
};
pub use listeners::{DeploymentListener, DeploymentListeners};
pub use manager::ActivityDeploymentManager;
pub use runtime::{DeploymentCommand, DeploymentHandle, DeploymentRuntime};
pub use satisfier::{CollectionDependencySatisfier, DependencySatisfier, SatisfyError};
pub use tracker::{DeploymentPhase, DeploymentTracker};

/// Deployment subsystem errors reported synchronously to callers.
///
/// Deployment *outcomes* never surface here; they flow to listeners as
/// [`crate::messages::LiveActivityDeploymentResult`]s.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DeployError {
    #[error("deployment runtime has stopped")]
    RuntimeStopped,

    #[error(transparent)]
    UnsatisfiedDependency(#[from] SatisfyError),
}
