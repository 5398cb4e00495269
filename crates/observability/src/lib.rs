//! Process-wide tracing/logging setup for the auth service.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber: JSON lines, level filtered via `RUST_LOG`
/// (default `info`). Safe to call more than once; later calls are no-ops.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_target(false)
        .try_init();
}
