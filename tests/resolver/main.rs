//! Integration tests for Layer 2: Resolver
//!
//! Tests for setting resolution, stored-value policy, and collaborators.
//!
//! Set `RUST_LOG=tierset_resolver=trace` to see each resolution step.

mod collaborators;

/// Installs a test-friendly subscriber once per process.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
