//! The fan-in end of the pipeline.

use super::item::{Envelope, TerminationToken, WorkItem, WorkerExit, WorkerId};
use crate::config::TerminationPolicy;
use crate::error::{PipelineError, RaceError};
use crate::timeout::run_with_timeout;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// What a drained pipeline reports.
#[derive(Debug)]
pub struct PipelineSummary<T> {
    /// Every result the collector handed out during `wait`, in arrival order.
    pub results: Vec<WorkItem<T>>,
    /// Tokens observed before the collector stopped.
    pub tokens: Vec<TerminationToken>,
    /// Workers whose supervisor had to inject a token.
    pub failed_workers: Vec<WorkerId>,
}

/// Drains results and termination tokens from the fan-in channel.
pub struct Collector<T> {
    receiver: mpsc::Receiver<Envelope<T>>,
    policy: TerminationPolicy,
    worker_count: usize,
    tokens: Vec<TerminationToken>,
    supervisors: Vec<(WorkerId, JoinHandle<WorkerExit>)>,
}

impl<T: Send + 'static> Collector<T> {
    pub(crate) fn new(
        receiver: mpsc::Receiver<Envelope<T>>,
        policy: TerminationPolicy,
        worker_count: usize,
        supervisors: Vec<(WorkerId, JoinHandle<WorkerExit>)>,
    ) -> Self {
        Self {
            receiver,
            policy,
            worker_count,
            tokens: Vec::new(),
            supervisors,
        }
    }

    /// Number of tokens after which the collector stops: K, or 1 under
    /// [`TerminationPolicy::FirstToken`].
    pub fn expected_tokens(&self) -> usize {
        match self.policy {
            TerminationPolicy::AllWorkers => self.worker_count,
            TerminationPolicy::FirstToken => 1,
        }
    }

    pub fn tokens_seen(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_finished(&self) -> bool {
        self.tokens.len() >= self.expected_tokens()
    }

    /// Next result, or `Ok(None)` once enough tokens have arrived.
    ///
    /// A channel that closes before that is a logic error and is reported as
    /// [`PipelineError::ChannelClosed`].
    pub async fn next(&mut self) -> Result<Option<WorkItem<T>>, PipelineError> {
        while !self.is_finished() {
            match self.receiver.recv().await {
                Some(Envelope::Work(item)) => return Ok(Some(item)),
                Some(Envelope::Terminate(token)) => {
                    self.tokens.push(token);
                    if let TerminationToken::WorkerExited { worker, exit } = token {
                        info!(
                            %worker,
                            ?exit,
                            tokens = self.tokens.len(),
                            expected = self.expected_tokens(),
                            "Termination token received"
                        );
                    }
                }
                None => {
                    error!(
                        expected = self.expected_tokens(),
                        received = self.tokens.len(),
                        "Result channel closed prematurely"
                    );
                    return Err(PipelineError::ChannelClosed {
                        expected: self.expected_tokens(),
                        received: self.tokens.len(),
                    });
                }
            }
        }
        // Workers still sending (FirstToken) fail fast instead of blocking.
        self.receiver.close();
        Ok(None)
    }

    /// Drains every remaining result and joins all worker supervisors.
    pub async fn wait(mut self) -> Result<PipelineSummary<T>, PipelineError> {
        let mut results = Vec::new();
        while let Some(item) = self.next().await? {
            results.push(item);
        }

        let mut failed_workers = Vec::new();
        for (worker, handle) in std::mem::take(&mut self.supervisors) {
            match handle.await {
                Ok(WorkerExit::Completed) => {}
                Ok(WorkerExit::Failed) => failed_workers.push(worker),
                Err(e) => return Err(PipelineError::SupervisorFailed(e.to_string())),
            }
        }

        debug!(
            results = results.len(),
            failed = failed_workers.len(),
            "Pipeline drained"
        );
        Ok(PipelineSummary {
            results,
            tokens: self.tokens,
            failed_workers,
        })
    }

    /// [`wait`](Self::wait), bounded by `window`. A pipeline that does not drain
    /// in time is a [`PipelineError::DrainTimeout`], never a hang.
    pub async fn wait_timeout(self, window: Duration) -> Result<PipelineSummary<T>, PipelineError> {
        match run_with_timeout(self.wait(), window).await {
            Ok(summary) => summary,
            Err(RaceError::Elapsed(_)) => Err(PipelineError::DrainTimeout(window)),
            Err(e) => Err(PipelineError::SupervisorFailed(e.to_string())),
        }
    }
}
