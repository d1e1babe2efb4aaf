//! Deployment event fan-out.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tracing::warn;

use crate::messages::LiveActivityDeploymentResult;

/// Observer of terminal deployment outcomes.
pub trait DeploymentListener: Send + Sync {
    /// Called once per transaction, on success or failure.
    fn on_deploy_status(&self, live_activity_uuid: &str, result: &LiveActivityDeploymentResult);
}

/// Registered listeners, dispatched with per-listener isolation.
///
/// Each call runs inside its own recovery boundary: a panicking listener is
/// logged and skipped, and the remaining listeners still get the event.
#[derive(Default)]
pub struct DeploymentListeners {
    listeners: Vec<Arc<dyn DeploymentListener>>,
}

impl DeploymentListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, listener: Arc<dyn DeploymentListener>) {
        self.listeners.push(listener);
    }

    pub fn signal_deploy_status(
        &self,
        live_activity_uuid: &str,
        result: &LiveActivityDeploymentResult,
    ) {
        for listener in &self.listeners {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                listener.on_deploy_status(live_activity_uuid, result);
            }));
            if outcome.is_err() {
                warn!(
                    live_activity_uuid,
                    transaction_id = %result.transaction_id,
                    "deployment listener panicked; continuing with remaining listeners"
                );
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::messages::{ActivityDeployStatus, TransactionId};

    struct Counting(AtomicUsize);

    impl DeploymentListener for Counting {
        fn on_deploy_status(&self, _uuid: &str, _result: &LiveActivityDeploymentResult) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct Panicking;

    impl DeploymentListener for Panicking {
        fn on_deploy_status(&self, _uuid: &str, _result: &LiveActivityDeploymentResult) {
            panic!("bad listener");
        }
    }

    fn result() -> LiveActivityDeploymentResult {
        LiveActivityDeploymentResult::new(
            TransactionId::new("tx-1"),
            "la-uuid",
            ActivityDeployStatus::Success,
            None,
            1,
        )
    }

    #[test]
    fn panicking_listener_does_not_starve_the_rest() {
        let counting = Arc::new(Counting(AtomicUsize::new(0)));

        let mut listeners = DeploymentListeners::new();
        listeners.add(Arc::new(Panicking));
        listeners.add(counting.clone());

        listeners.signal_deploy_status("la-uuid", &result());
        assert_eq!(counting.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn every_listener_sees_the_event() {
        let a = Arc::new(Counting(AtomicUsize::new(0)));
        let b = Arc::new(Counting(AtomicUsize::new(0)));

        let mut listeners = DeploymentListeners::new();
        listeners.add(a.clone());
        listeners.add(b.clone());

        listeners.signal_deploy_status("la-uuid", &result());
        listeners.signal_deploy_status("la-uuid", &result());

        assert_eq!(a.0.load(Ordering::SeqCst), 2);
        assert_eq!(b.0.load(Ordering::SeqCst), 2);
    }
}
