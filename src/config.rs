//! Deployment policy configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Policy knobs for the deployment orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeploymentConfig {
    /// Push resolved dependencies with every deployment instead of asking
    /// the controller what it already has.
    pub always_send_dependencies: bool,

    /// How long a transaction may sit without a controller response before
    /// the expiry sweep fails it. `None` disables eviction; the
    /// transaction then stays resident until process shutdown.
    pub transaction_ttl_ms: Option<u64>,
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            always_send_dependencies: true,
            transaction_ttl_ms: None,
        }
    }
}

impl DeploymentConfig {
    pub fn transaction_ttl(&self) -> Option<Duration> {
        self.transaction_ttl_ms.map(Duration::from_millis)
    }
}
