//! Work items and the envelope that carries them between stages.

use std::fmt::Display;

/// Identifies one worker in the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkerId(pub u32);

impl Display for WorkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "worker-{}", self.0)
    }
}

/// Which worker produced a result, and its position in that worker's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Assignment {
    pub worker: WorkerId,
    /// 0, 1, 2, … per worker, in the order that worker emitted results.
    pub worker_seq: u64,
}

/// A unit of work.
///
/// `seq` is assigned at submission. `assignment` is `None` on the way in and set
/// exactly once by the worker that processed the item.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkItem<T> {
    pub seq: u64,
    pub payload: T,
    pub assignment: Option<Assignment>,
}

impl<T> WorkItem<T> {
    pub fn new(seq: u64, payload: T) -> Self {
        Self {
            seq,
            payload,
            assignment: None,
        }
    }

    pub fn worker(&self) -> Option<WorkerId> {
        self.assignment.map(|a| a.worker)
    }
}

/// Why a worker sent its token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerExit {
    /// Received its shutdown token and stopped normally.
    Completed,
    /// Crashed; the token was injected by its supervisor. The item it was
    /// holding is lost.
    Failed,
}

/// The "no more data" signal. Never carries a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationToken {
    /// Sent into the fan-out channel, one per worker.
    Shutdown,
    /// Sent into the fan-in channel, exactly one per worker.
    WorkerExited { worker: WorkerId, exit: WorkerExit },
}

/// Channel payload: either work or a termination token, never both.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope<T> {
    Work(WorkItem<T>),
    Terminate(TerminationToken),
}
