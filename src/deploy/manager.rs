//! The master-side deployment orchestrator.
//!
//! Drives each deployment transaction through its phases, issuing wire
//! requests through the remote-controller client and reacting to the
//! asynchronous responses correlated back by transaction id.
//!
//! The manager is single-owner: all calls are serialized by the runtime
//! state loop (see `runtime`), so phase reads and writes never race.
//! Response handlers never return errors upward; anything they cannot make
//! sense of is logged and dropped.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::client::{RemoteControllerClient, ResourceCategory, ResourceRepositoryServer};
use super::ids::{
    SystemTimeSource, TimeSource, TransactionIdGenerator, UuidTransactionIdGenerator,
};
use super::listeners::{DeploymentListener, DeploymentListeners};
use super::satisfier::DependencySatisfier;
use super::tracker::{DeploymentPhase, DeploymentTracker};
use crate::config::DeploymentConfig;
use crate::domain::ActiveLiveActivity;
use crate::messages::{
    ActivityDeployStatus, ContainerResourceDeploymentCommitRequest,
    ContainerResourceDeploymentCommitResponse, ContainerResourceDeploymentQueryRequest,
    ContainerResourceDeploymentQueryResponse, LiveActivityDeleteRequest,
    LiveActivityDeploymentResult, ResourceCommitStatus, ResourceQueryStatus, TransactionId,
};

/// Orchestrates live-activity deployments to remote space controllers.
pub struct ActivityDeploymentManager {
    config: DeploymentConfig,
    client: Box<dyn RemoteControllerClient>,
    repository: Box<dyn ResourceRepositoryServer>,
    satisfier: Box<dyn DependencySatisfier>,
    listeners: DeploymentListeners,
    ids: Box<dyn TransactionIdGenerator>,
    time: Box<dyn TimeSource>,

    /// The live-transaction set. Insertion always happens before the first
    /// outbound request, so a response can never beat its tracker here.
    transactions: HashMap<TransactionId, DeploymentTracker>,
}

impl ActivityDeploymentManager {
    pub fn new(
        config: DeploymentConfig,
        client: Box<dyn RemoteControllerClient>,
        repository: Box<dyn ResourceRepositoryServer>,
        satisfier: Box<dyn DependencySatisfier>,
    ) -> Self {
        Self {
            config,
            client,
            repository,
            satisfier,
            listeners: DeploymentListeners::new(),
            ids: Box::new(UuidTransactionIdGenerator),
            time: Box::new(SystemTimeSource),
            transactions: HashMap::new(),
        }
    }

    /// Replace the transaction-id source (deterministic ids in tests).
    pub fn with_id_generator(mut self, ids: Box<dyn TransactionIdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// Replace the wall clock (fixed time in tests).
    pub fn with_time_source(mut self, time: Box<dyn TimeSource>) -> Self {
        self.time = time;
        self
    }

    pub fn add_listener(&mut self, listener: Arc<dyn DeploymentListener>) {
        self.listeners.add(listener);
    }

    pub fn config(&self) -> &DeploymentConfig {
        &self.config
    }

    /// Start deploying a live activity, returning its transaction id.
    ///
    /// Issues the first wire request and returns; all further progress
    /// happens as responses are delivered to the handlers below.
    pub fn deploy_live_activity(&mut self, activity: ActiveLiveActivity) -> TransactionId {
        let transaction_id = self.ids.next_id();
        let now = self.time.now_ms();

        let activity_source_uri = self.repository.resource_uri(
            ResourceCategory::Activity,
            &activity.activity.identifying_name,
            &activity.activity.version,
        );

        let query = if activity.activity.dependencies.is_empty() {
            None
        } else {
            let mut query =
                ContainerResourceDeploymentQueryRequest::new(transaction_id.clone());
            for dependency in &activity.activity.dependencies {
                query.add_query(dependency.to_reference());
            }
            Some(query)
        };

        let mut tracker =
            DeploymentTracker::new(activity, transaction_id.clone(), activity_source_uri, now);
        if let Some(query) = query {
            tracker.set_resource_query(query);
        }

        info!(
            transaction_id = %transaction_id,
            uuid = %tracker.deployment_request().uuid,
            "starting live activity deployment"
        );

        self.transactions.insert(transaction_id.clone(), tracker);
        self.begin_deployment(&transaction_id);

        transaction_id
    }

    /// Delete a live activity from its controller.
    ///
    /// Stateless fire-and-forget: deletion carries no dependency
    /// negotiation, so no tracker is created.
    pub fn delete_live_activity(&self, activity: &ActiveLiveActivity) {
        let request = LiveActivityDeleteRequest {
            uuid: activity.activity.uuid.clone(),
            identifying_name: activity.activity.identifying_name.clone(),
            version: activity.activity.version.to_string(),
            force: false,
        };

        debug!(uuid = %request.uuid, "requesting live activity deletion");
        self.client
            .delete_live_activity(&activity.controller, &request);
    }

    /// Deliver a controller's answer to a dependency query.
    pub fn handle_resource_deployment_query_response(
        &mut self,
        response: &ContainerResourceDeploymentQueryResponse,
    ) {
        let transaction_id = &response.transaction_id;
        if !self.transactions.contains_key(transaction_id) {
            warn!(
                transaction_id = %transaction_id,
                "resource deployment query response for unknown transaction; dropping"
            );
            return;
        }

        info!(
            transaction_id = %transaction_id,
            "resource deployment query answered for live activity deployment"
        );

        match response.status {
            ResourceQueryStatus::SpecificQuerySatisfied => {
                self.deploy_activity(transaction_id);
            }
            ResourceQueryStatus::SpecificQueryNotSatisfied => {
                // Automatic satisfaction after a failed query is not
                // implemented; end the transaction instead of stalling it.
                self.fail(
                    transaction_id,
                    ActivityDeployStatus::FailureDependenciesNotSatisfied,
                    "controller reported unsatisfied dependencies; \
                     automatic dependency satisfaction is not implemented"
                        .to_string(),
                );
            }
            ResourceQueryStatus::GeneralQueryResponse => {
                warn!(
                    transaction_id = %transaction_id,
                    status = ?response.status,
                    "resource deployment query response has inconsistent status; dropping"
                );
            }
        }
    }

    /// Deliver a controller's answer to a resource commit.
    pub fn handle_resource_deployment_commit_response(
        &mut self,
        response: &ContainerResourceDeploymentCommitResponse,
    ) {
        let transaction_id = &response.transaction_id;
        if !self.transactions.contains_key(transaction_id) {
            warn!(
                transaction_id = %transaction_id,
                "resource deployment commit response for unknown transaction; dropping"
            );
            return;
        }

        info!(
            transaction_id = %transaction_id,
            "resource deployment commit answered for live activity deployment"
        );

        match response.status {
            ResourceCommitStatus::Success => {
                self.deploy_activity(transaction_id);
            }
            ResourceCommitStatus::Failure => {
                let detail = response.detail.clone().unwrap_or_else(|| {
                    ActivityDeployStatus::FailureDependenciesNotCommitted
                        .description()
                        .to_string()
                });
                self.fail(
                    transaction_id,
                    ActivityDeployStatus::FailureDependenciesNotCommitted,
                    detail,
                );
            }
        }
    }

    /// Deliver the terminal deployment result from a controller.
    ///
    /// Applied only while the transaction is in `DeployingActivity`;
    /// duplicate or stray deliveries are logged and dropped.
    pub fn handle_live_deploy_result(&mut self, result: LiveActivityDeploymentResult) {
        let phase = self
            .transactions
            .get(&result.transaction_id)
            .map(|tracker| tracker.phase());

        match phase {
            None => {
                warn!(
                    transaction_id = %result.transaction_id,
                    "deployment result for unknown transaction; dropping"
                );
            }
            Some(DeploymentPhase::DeployingActivity) => {
                info!(
                    transaction_id = %result.transaction_id,
                    status = ?result.status,
                    "deployment result delivered"
                );
                self.complete(result);
            }
            Some(phase) => {
                warn!(
                    transaction_id = %result.transaction_id,
                    phase = ?phase,
                    status = ?result.status,
                    "deployment result arrived in inconsistent phase; dropping"
                );
            }
        }
    }

    /// Fail every transaction with no activity for the configured TTL.
    ///
    /// Returns the number of transactions expired. No-op when eviction is
    /// disabled.
    pub fn expire_stale(&mut self, now_ms: u64) -> usize {
        let Some(ttl) = self.config.transaction_ttl() else {
            return 0;
        };
        let ttl_ms = ttl.as_millis() as u64;

        let stale: Vec<TransactionId> = self
            .transactions
            .iter()
            .filter(|(_, tracker)| now_ms.saturating_sub(tracker.updated_at_ms()) >= ttl_ms)
            .map(|(transaction_id, _)| transaction_id.clone())
            .collect();

        for transaction_id in &stale {
            warn!(
                transaction_id = %transaction_id,
                "transaction expired without a controller response"
            );
            self.fail(
                transaction_id,
                ActivityDeployStatus::FailureTimeout,
                format!("no controller response within {ttl_ms}ms"),
            );
        }

        stale.len()
    }

    /// [`Self::expire_stale`] against the manager's own clock.
    pub fn expire_stale_now(&mut self) -> usize {
        let now = self.time.now_ms();
        self.expire_stale(now)
    }

    pub fn transaction_phase(&self, transaction_id: &TransactionId) -> Option<DeploymentPhase> {
        self.transactions
            .get(transaction_id)
            .map(|tracker| tracker.phase())
    }

    pub fn active_transaction_count(&self) -> usize {
        self.transactions.len()
    }

    /// First transition out of `Created`: straight to deployment when the
    /// activity has no dependencies, otherwise through the dependency
    /// commit or query round trip per policy.
    fn begin_deployment(&mut self, transaction_id: &TransactionId) {
        let Some(tracker) = self.transactions.get(transaction_id) else {
            return;
        };

        match tracker.resource_query().cloned() {
            None => {
                self.deploy_activity(transaction_id);
            }
            Some(query) if self.config.always_send_dependencies => {
                match self.satisfier.satisfy(&query.queries) {
                    Ok(items) => {
                        self.advance(transaction_id, DeploymentPhase::SatisfyingDependencies);
                        let commit = ContainerResourceDeploymentCommitRequest::new(
                            transaction_id.clone(),
                            items,
                        );
                        let Some(tracker) = self.transactions.get(transaction_id) else {
                            return;
                        };
                        self.client
                            .commit_resource_deployment(&tracker.activity().controller, &commit);
                    }
                    Err(err) => {
                        warn!(
                            transaction_id = %transaction_id,
                            error = %err,
                            "dependency resolution failed before commit"
                        );
                        self.fail(
                            transaction_id,
                            ActivityDeployStatus::FailureDependenciesNotSatisfied,
                            err.to_string(),
                        );
                    }
                }
            }
            Some(query) => {
                self.advance(transaction_id, DeploymentPhase::QueryingDependencies);
                let Some(tracker) = self.transactions.get(transaction_id) else {
                    return;
                };
                self.client
                    .query_resource_deployment(&tracker.activity().controller, &query);
            }
        }
    }

    /// Send the deploy request and move to `DeployingActivity`.
    fn deploy_activity(&mut self, transaction_id: &TransactionId) {
        self.advance(transaction_id, DeploymentPhase::DeployingActivity);
        let Some(tracker) = self.transactions.get(transaction_id) else {
            return;
        };
        self.client
            .deploy_live_activity(&tracker.activity().controller, tracker.deployment_request());
    }

    fn advance(&mut self, transaction_id: &TransactionId, phase: DeploymentPhase) {
        let now = self.time.now_ms();
        if let Some(tracker) = self.transactions.get_mut(transaction_id) {
            tracker.advance(phase, now);
        }
    }

    /// Terminal success path: the delivered result is final.
    fn complete(&mut self, result: LiveActivityDeploymentResult) {
        let transaction_id = result.transaction_id.clone();
        self.advance(&transaction_id, DeploymentPhase::DeploymentComplete);
        self.remove_and_signal(&transaction_id, result);
    }

    /// Terminal failure decided on the master side.
    fn fail(&mut self, transaction_id: &TransactionId, status: ActivityDeployStatus, detail: String) {
        let Some(tracker) = self.transactions.get(transaction_id) else {
            return;
        };
        let uuid = tracker.deployment_request().uuid.clone();
        let now = self.time.now_ms();

        self.advance(transaction_id, DeploymentPhase::Failed);
        let result =
            LiveActivityDeploymentResult::new(transaction_id.clone(), uuid, status, Some(detail), now);
        self.remove_and_signal(transaction_id, result);
    }

    fn remove_and_signal(
        &mut self,
        transaction_id: &TransactionId,
        result: LiveActivityDeploymentResult,
    ) {
        if self.transactions.remove(transaction_id).is_some() {
            self.listeners.signal_deploy_status(&result.uuid, &result);
        }
    }
}
