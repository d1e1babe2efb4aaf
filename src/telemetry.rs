//! Tracing subscriber setup for binaries and tests.
//!
//! The library itself only emits `tracing` events; embedding applications
//! install whatever subscriber they want. These helpers cover the common
//! case.

use tracing_subscriber::EnvFilter;

/// Install a formatting subscriber filtered by `RUST_LOG`, defaulting to
/// `info`. Safe to call more than once; later calls are no-ops.
pub fn init() {
    init_with("info");
}

/// Install a formatting subscriber with an explicit default directive.
pub fn init_with(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}
