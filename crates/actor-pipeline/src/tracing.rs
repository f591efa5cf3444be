//! # Observability & Tracing
//!
//! Structured logging for the monitor, the pipeline and the rally harness.
//!
//! ## What Gets Traced
//!
//! - **Monitor lifecycle**: start, stop/drain, final snapshot, rejected mutations
//! - **Pipeline**: worker start/exit, termination tokens, supervisor restarts
//! - **Rally**: every state change of every peer, and who stalled
//!
//! ## Usage Examples
//!
//! ```bash
//! # Lifecycle only
//! RUST_LOG=info cargo run
//!
//! # Every request and every work item
//! RUST_LOG=debug cargo run
//!
//! # Filter to one module
//! RUST_LOG=actor_pipeline::pipeline=debug cargo run
//! ```
//!
//! Fields are recorded with `tracing`'s structured syntax (`worker = %id`,
//! `?snapshot`), so the compact output stays greppable:
//!
//! ```text
//! INFO Monitor started resource_type="Account"
//! INFO Worker started worker=worker-0
//! INFO Termination token received worker=worker-2 exit=Completed tokens=3 expected=3
//! INFO Stopped resource_type="Account" applied=1500 rejected=0 snapshot=AccountSnapshot { balance: 10500.01, .. }
//! ```

/// Initializes the global subscriber.
///
/// Uses the compact format, hides module paths (`with_target(false)`) and reads
/// the filter from `RUST_LOG`. Panics if a global subscriber is already set; use
/// [`try_setup_tracing`] where that can happen (tests).
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}

/// Like [`setup_tracing`], but returns `false` instead of panicking when a
/// subscriber is already installed.
pub fn try_setup_tracing() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .with_test_writer()
        .try_init()
        .is_ok()
}
