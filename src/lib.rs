#![forbid(unsafe_code)]

//! Master-side deployment orchestration for fleet-managed live activities.
//!
//! A master node tracks remote space controllers, each hosting installable
//! live activities. This crate implements the orchestration core: the
//! version/range types dependency resolution runs on, the version-indexed
//! resource collections, the deployment transaction state machine, and the
//! JSON wire envelope correlating requests, responses and status pushes by
//! transaction id.

pub mod config;
pub mod deploy;
pub mod domain;
pub mod error;
pub mod messages;
pub mod resource;
pub mod telemetry;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;

// Re-export the main types at the crate root for convenience.
pub use crate::config::DeploymentConfig;
pub use crate::deploy::{
    ActivityDeploymentManager, DeploymentHandle, DeploymentListener, DeploymentPhase,
    DeploymentRuntime,
};
pub use crate::domain::{ActiveLiveActivity, LiveActivityRef, SpaceControllerRef};
pub use crate::messages::{LiveActivityDeploymentResult, TransactionId};
pub use crate::resource::{
    NamedVersionedResourceCollection, Version, VersionError, VersionRange,
    VersionedResourceCollection,
};
