//! # Telemetry
//!
//! Tracing subscriber setup for binaries and tests. Library code only emits
//! `tracing` events; whoever owns `main` decides where they go.

use tracing_subscriber::EnvFilter;

/// Initializes the global tracing subscriber.
///
/// Filter comes from `RUST_LOG` when set, defaulting to `info`. Safe to call
/// more than once (later calls are no-ops), which keeps test setup simple.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
