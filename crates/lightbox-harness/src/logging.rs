#![forbid(unsafe_code)]

//! Test logging setup.

use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber that writes through the test harness.
///
/// Honors `RUST_LOG`, defaulting to debug for the lightbox crates. Safe to call from every
/// test; only the first call installs anything.
pub fn init_test_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("lightbox_widgets=debug,lightbox_runtime=debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
