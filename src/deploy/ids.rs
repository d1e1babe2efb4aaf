//! Injected capabilities: transaction identity and wall-clock time.
//!
//! Both are seams so tests can run the state machine with deterministic
//! ids and a controllable clock.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::messages::TransactionId;

/// Source of fresh transaction ids.
pub trait TransactionIdGenerator: Send {
    fn next_id(&mut self) -> TransactionId;
}

/// Production generator: random UUIDs.
#[derive(Default)]
pub struct UuidTransactionIdGenerator;

impl TransactionIdGenerator for UuidTransactionIdGenerator {
    fn next_id(&mut self) -> TransactionId {
        TransactionId::new(uuid::Uuid::new_v4().to_string())
    }
}

/// Source of wall-clock time in milliseconds since the Unix epoch.
///
/// Not an ordering primitive; tracker timestamps are diagnostic and feed
/// the expiry sweep.
pub trait TimeSource: Send {
    fn now_ms(&self) -> u64;
}

/// Production time source: the system clock.
#[derive(Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_generator_yields_distinct_ids() {
        let mut generator = UuidTransactionIdGenerator;
        let a = generator.next_id();
        let b = generator.next_id();
        assert_ne!(a, b);
    }
}
