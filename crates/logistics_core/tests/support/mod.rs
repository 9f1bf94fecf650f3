#![allow(dead_code)]

pub mod network;

use std::sync::Once;

static TRACING: Once = Once::new();

/// Installs a test writer subscriber once per test binary. Filter with
/// `RUST_LOG`, e.g. `RUST_LOG=logistics_core=debug`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
