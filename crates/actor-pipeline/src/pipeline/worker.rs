//! Pool workers and the supervisor that watches each of them.

use super::item::{Assignment, Envelope, TerminationToken, WorkItem, WorkerExit, WorkerId};
use super::stage::Stage;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, error, info, warn};

/// The fan-out receiver, shared by every worker in the pool.
pub(crate) type SharedInbox<T> = Arc<Mutex<mpsc::Receiver<Envelope<T>>>>;

/// One worker. Cloning it yields a fresh incarnation with the same id, inbox,
/// outbox and output counter, which is what a restart needs.
pub(crate) struct Worker<S: Stage> {
    id: WorkerId,
    stage: Arc<S>,
    inbox: SharedInbox<S::Input>,
    outbox: mpsc::Sender<Envelope<S::Output>>,
    next_seq: Arc<AtomicU64>,
}

impl<S: Stage> Clone for Worker<S> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            stage: self.stage.clone(),
            inbox: self.inbox.clone(),
            outbox: self.outbox.clone(),
            next_seq: self.next_seq.clone(),
        }
    }
}

impl<S: Stage> Worker<S> {
    pub(crate) fn new(
        id: WorkerId,
        stage: Arc<S>,
        inbox: SharedInbox<S::Input>,
        outbox: mpsc::Sender<Envelope<S::Output>>,
    ) -> Self {
        Self {
            id,
            stage,
            inbox,
            outbox,
            next_seq: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Processes work until a shutdown token arrives, then forwards exactly one
    /// token of its own.
    async fn run(self) {
        let worker = self.id;
        info!(%worker, "Worker started");

        loop {
            // The lock is released before processing, so other workers can
            // pick up the next envelope meanwhile.
            let envelope = { self.inbox.lock().await.recv().await };

            match envelope {
                Some(Envelope::Work(item)) => {
                    let WorkItem { seq, payload, .. } = item;
                    let Some(output) = self.stage.process(payload).await else {
                        debug!(%worker, seq, "Filtered out");
                        continue;
                    };
                    let worker_seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
                    let result = WorkItem {
                        seq,
                        payload: output,
                        assignment: Some(Assignment { worker, worker_seq }),
                    };
                    debug!(%worker, seq, worker_seq, "Forwarding");
                    if self.outbox.send(Envelope::Work(result)).await.is_err() {
                        info!(%worker, "Collector is gone, stopping");
                        return;
                    }
                }
                Some(Envelope::Terminate(_)) => break,
                None => {
                    // Producers vanished without closing. Exiting without a token
                    // lets the collector report the premature close.
                    error!(%worker, "Input channel closed without a termination token");
                    return;
                }
            }
        }

        let token = TerminationToken::WorkerExited {
            worker,
            exit: WorkerExit::Completed,
        };
        if self.outbox.send(Envelope::Terminate(token)).await.is_err() {
            debug!(%worker, "Collector is gone, token not delivered");
        }
        info!(%worker, "Worker terminating");
    }

    /// Runs the worker in its own task and watches it.
    ///
    /// A panic inside the stage kills only that task. The supervisor then
    /// restarts it (while `max_restarts` allows) or injects a `Failed` token
    /// on its behalf, so the collector still sees one token per worker.
    pub(crate) async fn supervise(self, max_restarts: u32) -> WorkerExit {
        let worker = self.id;
        let mut restarts = 0;

        loop {
            let handle = tokio::spawn(self.clone().run());
            let failure = match handle.await {
                Ok(()) => return WorkerExit::Completed,
                Err(e) => e,
            };

            if failure.is_panic() && restarts < max_restarts {
                restarts += 1;
                warn!(%worker, restarts, max_restarts, "Worker panicked, restarting");
                continue;
            }

            error!(%worker, error = %failure, restarts, "Worker failed, injecting termination token");
            let token = TerminationToken::WorkerExited {
                worker,
                exit: WorkerExit::Failed,
            };
            if self.outbox.send(Envelope::Terminate(token)).await.is_err() {
                debug!(%worker, "Collector is gone, injected token not delivered");
            }
            return WorkerExit::Failed;
        }
    }
}
