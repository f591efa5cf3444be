//! # Worker Pipeline (Fan-out / Fan-in)
//!
//! ```text
//!                      { ------ pool workers ------ }
//!                          +--> worker-0 --+
//!                          |               |
//! submitter -[ fan-out ]---+--> worker-1 --+--[ fan-in ]--> collector
//!                          |               |
//!                          +--> worker-2 --+
//! ```
//!
//! ## Protocol
//!
//! 1. The [`WorkSubmitter`] (or [`generate`]) sends `Envelope::Work` items, then
//!    [`close`](WorkSubmitter::close) sends exactly K `Shutdown` tokens.
//! 2. Each worker takes envelopes from the shared fan-out channel. Work goes
//!    through the [`Stage`]; survivors are annotated with the worker's id and
//!    output sequence number. On its first token a worker forwards exactly one
//!    `WorkerExited` token and stops.
//! 3. The [`Collector`] hands out results until its [`TerminationPolicy`] is
//!    satisfied: K tokens by default, so nothing in flight is lost.
//!
//! ## Guarantees
//!
//! - **Ordering**: none across workers; per worker, output order follows input order.
//! - **Backpressure**: both channels are bounded. A slow collector blocks the
//!   workers, which block the submitter. Nothing is dropped.
//! - **Ownership**: an item belongs to exactly one task at a time; sending it
//!   moves it.
//! - **Worker failure**: each worker runs under a supervisor. A panicking stage is
//!   restarted up to `max_restarts` times, after which the supervisor injects a
//!   `Failed` token so the collector is never left waiting.
//!
//! ## Example
//!
//! ```rust
//! use actor_pipeline::{generate, Pipeline, PipelineConfig, Predicate};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = PipelineConfig::default().with_workers(3);
//!     let stage = Predicate::new(|n: &u64| n % 7 == 0);
//!     let (submitter, collector) = Pipeline::spawn(&config, stage).unwrap();
//!
//!     tokio::spawn(generate(submitter, 0..50u64, Duration::ZERO));
//!
//!     let summary = collector.wait().await.unwrap();
//!     assert_eq!(summary.results.len(), 8);
//!     assert_eq!(summary.tokens.len(), 3);
//! }
//! ```

mod collector;
mod generator;
mod item;
mod stage;
mod submitter;
mod worker;

pub use collector::{Collector, PipelineSummary};
pub use generator::generate;
pub use item::{Assignment, Envelope, TerminationToken, WorkItem, WorkerExit, WorkerId};
pub use stage::{Predicate, Stage};
pub use submitter::WorkSubmitter;

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tracing::info;
use worker::Worker;

/// Entry point for building a pipeline.
pub struct Pipeline;

impl Pipeline {
    /// Starts `config.worker_count` supervised workers running `stage`.
    ///
    /// Returns the submitter for the fan-out side and the collector for the
    /// fan-in side. Must be called from inside a Tokio runtime.
    pub fn spawn<S: Stage>(
        config: &PipelineConfig,
        stage: S,
    ) -> Result<(WorkSubmitter<S::Input>, Collector<S::Output>), PipelineError> {
        config.validate()?;

        let (in_tx, in_rx) = mpsc::channel(config.channel_capacity);
        let (out_tx, out_rx) = mpsc::channel(config.channel_capacity);
        let inbox = Arc::new(Mutex::new(in_rx));
        let stage = Arc::new(stage);

        let supervisors = (0..config.worker_count)
            .map(|n| {
                let id = WorkerId(n as u32);
                let worker = Worker::new(id, stage.clone(), inbox.clone(), out_tx.clone());
                (id, tokio::spawn(worker.supervise(config.max_restarts)))
            })
            .collect();
        // Only workers and supervisors may hold fan-in senders, so the channel
        // closes if they all disappear.
        drop(out_tx);

        info!(
            workers = config.worker_count,
            capacity = config.channel_capacity,
            policy = ?config.termination,
            "Pipeline started"
        );

        let submitter = WorkSubmitter::new(in_tx, config.worker_count);
        let collector = Collector::new(
            out_rx,
            config.termination,
            config.worker_count,
            supervisors,
        );
        Ok((submitter, collector))
    }
}

