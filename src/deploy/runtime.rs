//! The deployment state loop.
//!
//! One dedicated thread owns the [`ActivityDeploymentManager`] and is THE
//! serialization point: deploy calls and network-delivered responses all
//! arrive as commands on one channel, so every phase transition happens on
//! this thread. Callers never block beyond the channel send.

use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam::channel::{never, tick, unbounded, Receiver, Sender};
use tracing::{debug, warn};

use super::manager::ActivityDeploymentManager;
use super::DeployError;
use crate::domain::ActiveLiveActivity;
use crate::messages::{
    ContainerResourceDeploymentCommitResponse, ContainerResourceDeploymentQueryResponse,
    LiveActivityDeploymentResult,
};

/// Commands delivered to the state loop.
pub enum DeploymentCommand {
    Deploy(ActiveLiveActivity),
    Delete(ActiveLiveActivity),
    QueryResponse(ContainerResourceDeploymentQueryResponse),
    CommitResponse(ContainerResourceDeploymentCommitResponse),
    DeployResult(LiveActivityDeploymentResult),
    ExpireStale,
    Shutdown,
}

/// Cloneable submitter of commands to the state loop.
///
/// The deploy/delete entry points report a stopped runtime to the caller.
/// The response entry points mirror the handler contract and never error;
/// a response that cannot be delivered is logged and dropped.
#[derive(Clone)]
pub struct DeploymentHandle {
    commands: Sender<DeploymentCommand>,
}

impl DeploymentHandle {
    pub fn deploy_live_activity(&self, activity: ActiveLiveActivity) -> Result<(), DeployError> {
        self.send(DeploymentCommand::Deploy(activity))
    }

    pub fn delete_live_activity(&self, activity: ActiveLiveActivity) -> Result<(), DeployError> {
        self.send(DeploymentCommand::Delete(activity))
    }

    pub fn handle_resource_deployment_query_response(
        &self,
        response: ContainerResourceDeploymentQueryResponse,
    ) {
        self.deliver(DeploymentCommand::QueryResponse(response));
    }

    pub fn handle_resource_deployment_commit_response(
        &self,
        response: ContainerResourceDeploymentCommitResponse,
    ) {
        self.deliver(DeploymentCommand::CommitResponse(response));
    }

    pub fn handle_live_deploy_result(&self, result: LiveActivityDeploymentResult) {
        self.deliver(DeploymentCommand::DeployResult(result));
    }

    /// Trigger an expiry sweep outside the periodic ticker.
    pub fn expire_stale(&self) {
        self.deliver(DeploymentCommand::ExpireStale);
    }

    fn send(&self, command: DeploymentCommand) -> Result<(), DeployError> {
        self.commands
            .send(command)
            .map_err(|_| DeployError::RuntimeStopped)
    }

    fn deliver(&self, command: DeploymentCommand) {
        if self.commands.send(command).is_err() {
            warn!("deployment runtime stopped; dropping response");
        }
    }
}

/// The running state loop and its thread.
pub struct DeploymentRuntime {
    handle: DeploymentHandle,
    thread: JoinHandle<()>,
}

impl DeploymentRuntime {
    /// Spawn the state thread around `manager`.
    ///
    /// When the manager's config carries a transaction TTL, a ticker feeds
    /// periodic expiry sweeps into the same command stream.
    pub fn spawn(manager: ActivityDeploymentManager) -> Self {
        let (commands, inbox) = unbounded();
        let sweep = match manager.config().transaction_ttl() {
            Some(ttl) => tick(sweep_interval(ttl)),
            None => never(),
        };

        let thread = thread::spawn(move || run_state_loop(manager, inbox, sweep));

        Self {
            handle: DeploymentHandle { commands },
            thread,
        }
    }

    pub fn handle(&self) -> DeploymentHandle {
        self.handle.clone()
    }

    /// Stop the loop and wait for the thread to exit.
    pub fn shutdown(self) {
        let _ = self.handle.commands.send(DeploymentCommand::Shutdown);
        let _ = self.thread.join();
    }
}

/// Sweep at half the TTL so expiry lands at most 1.5×TTL after the last
/// activity, with a floor to keep short test TTLs from spinning.
fn sweep_interval(ttl: Duration) -> Duration {
    (ttl / 2).max(Duration::from_millis(50))
}

fn run_state_loop(
    mut manager: ActivityDeploymentManager,
    commands: Receiver<DeploymentCommand>,
    sweep: Receiver<Instant>,
) {
    debug!("deployment state loop started");
    loop {
        crossbeam::select! {
            recv(commands) -> message => match message {
                Ok(DeploymentCommand::Deploy(activity)) => {
                    manager.deploy_live_activity(activity);
                }
                Ok(DeploymentCommand::Delete(activity)) => {
                    manager.delete_live_activity(&activity);
                }
                Ok(DeploymentCommand::QueryResponse(response)) => {
                    manager.handle_resource_deployment_query_response(&response);
                }
                Ok(DeploymentCommand::CommitResponse(response)) => {
                    manager.handle_resource_deployment_commit_response(&response);
                }
                Ok(DeploymentCommand::DeployResult(result)) => {
                    manager.handle_live_deploy_result(result);
                }
                Ok(DeploymentCommand::ExpireStale) => {
                    manager.expire_stale_now();
                }
                Ok(DeploymentCommand::Shutdown) | Err(_) => break,
            },
            recv(sweep) -> _ => {
                manager.expire_stale_now();
            }
        }
    }
    debug!("deployment state loop stopped");
}
