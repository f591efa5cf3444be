//! # Actor Pipeline
//!
//! This crate provides building blocks for message-passing concurrency on Tokio:
//! a single-owner resource monitor, a supervised fan-out/fan-in worker pipeline,
//! a timeout race, and a two-peer rendezvous rally that exercises all of them.
//!
//! Nothing in here shares mutable state between tasks except through channels.
//! Every channel is bounded, so a slow consumer slows its producers down instead of
//! letting memory grow.
//!
//! ## Architecture Overview
//!
//! 1. **Resource Layer** ([`Resource`]) - your state and the mutations it accepts
//! 2. **Runtime Layer** ([`ResourceMonitor`], [`Pipeline`]) - tasks that own state and move messages
//! 3. **Interface Layer** ([`MonitorClient`], [`WorkSubmitter`], [`Collector`]) - the handles callers hold
//!
//! ## Single-Owner Monitor
//!
//! ```rust
//! use actor_pipeline::{MonitorError, Resource, ResourceMonitor};
//!
//! #[derive(Debug)]
//! struct Stock { units: u32 }
//!
//! #[derive(Debug)]
//! enum StockOp { Receive(u32), Ship(u32) }
//!
//! #[derive(Debug, thiserror::Error)]
//! #[error("only {0} units left")]
//! struct OutOfStock(u32);
//!
//! impl Resource for Stock {
//!     type Mutation = StockOp;
//!     type Snapshot = u32;
//!     type Error = OutOfStock;
//!
//!     fn apply(&mut self, op: StockOp) -> Result<(), OutOfStock> {
//!         match op {
//!             StockOp::Receive(n) => self.units += n,
//!             StockOp::Ship(n) if n > self.units => return Err(OutOfStock(self.units)),
//!             StockOp::Ship(n) => self.units -= n,
//!         }
//!         Ok(())
//!     }
//!
//!     fn snapshot(&self) -> u32 { self.units }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (monitor, client) = ResourceMonitor::new(10, Stock { units: 0 });
//!     tokio::spawn(monitor.run());
//!
//!     client.apply(StockOp::Receive(3)).await.unwrap();
//!     let refused = client.apply_confirmed(StockOp::Ship(5)).await;
//!     assert!(matches!(refused, Err(MonitorError::Rejected(_))));
//!     assert_eq!(client.stop().await.unwrap(), 3);
//! }
//! ```
//!
//! ## Worker Pipeline
//!
//! See the [`pipeline`] module for the protocol. In short: submit work, close the
//! input (one shutdown token per worker), and let the collector drain until every
//! worker has reported back.
//!
//! ## Timeout Race
//!
//! [`run_with_timeout`] runs an operation on its own task and waits for either the
//! result or the deadline, whichever comes first. The loser is not cancelled.
//!
//! ## Concurrency Model
//!
//! - The monitor processes requests **sequentially** in arrival order (no locks needed)
//! - Pipeline workers run in **parallel** and share one bounded input channel
//! - A panicking worker is caught by its supervisor and either restarted or
//!   replaced by a `Failed` termination token
//!
//! ## Testing
//!
//! The [`mock`] module provides `MockMonitor`, which answers a real
//! [`MonitorClient`] from canned expectations, so client wrappers can be unit
//! tested without spawning a monitor.

pub mod client;
pub mod client_trait;
pub mod config;
pub mod error;
pub mod message;
pub mod mock;
pub mod monitor;
pub mod ping_pong;
pub mod pipeline;
pub mod rendezvous;
pub mod resource;
pub mod timeout;
pub mod tracing;

// Re-export core types for convenience
pub use client::MonitorClient;
pub use client_trait::MonitorHandle;
pub use config::{MonitorConfig, PeerConfig, PipelineConfig, RallyConfig, TerminationPolicy};
pub use error::{ConfigError, Disconnected, MonitorError, PipelineError, RaceError, RallyError};
pub use message::{MonitorRequest, Response};
pub use monitor::ResourceMonitor;
pub use ping_pong::{PeerOutcome, PeerReport, PeerState, Rally, RallyReport, StallCause};
pub use pipeline::{
    generate, Assignment, Collector, Envelope, Pipeline, PipelineSummary, Predicate, Stage,
    TerminationToken, WorkItem, WorkSubmitter, WorkerExit, WorkerId,
};
pub use resource::Resource;
pub use timeout::{run_blocking_with_timeout, run_with_timeout};
