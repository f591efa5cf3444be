//! The fan-out end of the pipeline.

use super::item::{Envelope, TerminationToken, WorkItem};
use crate::error::PipelineError;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, info};

struct Shared {
    next_seq: AtomicU64,
    accepted: AtomicU64,
    // `true` while open. Submits hold the read side across their send, so
    // no work item can land behind the termination tokens.
    open: RwLock<bool>,
    worker_count: usize,
}

/// Feeds work into the pipeline. Clones share one sequence counter and one
/// open/closed state.
pub struct WorkSubmitter<T> {
    sender: mpsc::Sender<Envelope<T>>,
    shared: Arc<Shared>,
}

impl<T> Clone for WorkSubmitter<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            shared: self.shared.clone(),
        }
    }
}

impl<T: Send> WorkSubmitter<T> {
    pub(crate) fn new(sender: mpsc::Sender<Envelope<T>>, worker_count: usize) -> Self {
        Self {
            sender,
            shared: Arc::new(Shared {
                next_seq: AtomicU64::new(0),
                accepted: AtomicU64::new(0),
                open: RwLock::new(true),
                worker_count,
            }),
        }
    }

    /// Queues one payload and returns its sequence number.
    ///
    /// Waits while the fan-out channel is full; nothing is ever dropped.
    pub async fn submit(&self, payload: T) -> Result<u64, PipelineError> {
        let open = self.shared.open.read().await;
        if !*open {
            return Err(PipelineError::Closed);
        }
        let seq = self.shared.next_seq.fetch_add(1, Ordering::SeqCst);
        self.sender
            .send(Envelope::Work(WorkItem::new(seq, payload)))
            .await
            .map_err(|_| PipelineError::WorkersGone)?;
        self.shared.accepted.fetch_add(1, Ordering::SeqCst);
        debug!(seq, "Submitted");
        Ok(seq)
    }

    /// Sends exactly one shutdown token per worker.
    ///
    /// Only the first call across all clones does anything; later calls, and any
    /// `submit` afterwards, fail with [`PipelineError::Closed`].
    pub async fn close(&self) -> Result<(), PipelineError> {
        let mut open = self.shared.open.write().await;
        if !*open {
            return Err(PipelineError::Closed);
        }
        *open = false;
        for _ in 0..self.shared.worker_count {
            self.sender
                .send(Envelope::Terminate(TerminationToken::Shutdown))
                .await
                .map_err(|_| PipelineError::WorkersGone)?;
        }
        info!(
            tokens = self.shared.worker_count,
            submitted = self.accepted(),
            "Input closed"
        );
        Ok(())
    }

    /// How many items the fan-out channel has accepted so far.
    pub fn accepted(&self) -> u64 {
        self.shared.accepted.load(Ordering::SeqCst)
    }

    pub fn worker_count(&self) -> usize {
        self.shared.worker_count
    }
}
