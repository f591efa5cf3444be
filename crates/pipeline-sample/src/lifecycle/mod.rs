//! # System Lifecycle & Orchestration
//!
//! This module manages the runtime lifecycle of the sample: starting the account
//! monitor, running pipelines and rallies against it, and shutting it down.
//!
//! ## The System Pattern
//!
//! ```rust,ignore
//! impl System {
//!     pub fn start(config: SystemConfig) -> Result<Self, SystemError> {
//!         // 1. Create the monitor and its client together
//!         let (monitor, account) = account::with_config(config.initial_balance, &config.monitor);
//!
//!         // 2. Spawn the monitor; keep the handle for shutdown
//!         let monitor = tokio::spawn(monitor.run());
//!
//!         Ok(Self { account, config, monitor })
//!     }
//!
//!     pub async fn shutdown(self) -> Result<AccountSnapshot, SystemError> {
//!         // Explicit stop: everything queued before it is applied first
//!         self.account.stop().await?;
//!         Ok(self.monitor.await?)
//!     }
//! }
//! ```
//!
//! Pipelines and rallies are short-lived: each call to
//! [`System::run_prime_filter`] or [`System::play_rally`] builds its own tasks and
//! waits for all of them before returning.
//!
//! ## Graceful Shutdown
//!
//! 1. **Stop the monitor** - a `Stop` request is queued behind every pending mutation
//! 2. **Monitor drains** - it closes its inbox and applies whatever already arrived
//! 3. **Await completion** - the task's return value is the final account state
//!
//! Requests sent after the stop fail with `MonitorUnavailable` instead of being
//! silently lost.
//!
//! ## Observability & Tracing
//!
//! Call [`actor_pipeline::tracing::setup_tracing`] once at startup:
//!
//! ```bash
//! RUST_LOG=info cargo run      # Lifecycle events
//! RUST_LOG=debug cargo run     # Every request and work item
//! ```

pub mod config;
pub mod system;

pub use config::*;
pub use system::*;
