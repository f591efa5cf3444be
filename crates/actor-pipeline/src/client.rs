//! # Monitor Client
//!
//! This module defines the generic client for talking to a resource monitor.

use crate::error::MonitorError;
use crate::message::MonitorRequest;
use crate::resource::Resource;
use tokio::sync::{mpsc, oneshot};

/// ## MonitorClient
///
/// The `MonitorClient<R>` provides a type‑safe, async API for interacting with a
/// `ResourceMonitor<R>`. It forwards requests over a Tokio mpsc channel and, where
/// an answer is needed, waits for it on a oneshot channel. The client is cheap to
/// clone and can be shared across tasks.
///
/// * **Cloneable** – holds only a sender, so cloning is inexpensive.
/// * **Fire-and-forget mutations** – [`apply`](Self::apply) returns once the request is queued.
/// * **Bounded** – when the monitor's queue is full, callers wait for space.
pub struct MonitorClient<R: Resource> {
    sender: mpsc::Sender<MonitorRequest<R>>,
}

impl<R: Resource> Clone for MonitorClient<R> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<R: Resource> MonitorClient<R> {
    pub fn new(sender: mpsc::Sender<MonitorRequest<R>>) -> Self {
        Self { sender }
    }

    /// Queues a mutation without waiting for it to be applied.
    pub async fn apply(&self, mutation: R::Mutation) -> Result<(), MonitorError> {
        self.sender
            .send(MonitorRequest::Apply {
                mutation,
                respond_to: None,
            })
            .await
            .map_err(|_| MonitorError::Closed)
    }

    /// Queues a mutation and waits until the monitor has applied (or rejected) it.
    pub async fn apply_confirmed(&self, mutation: R::Mutation) -> Result<(), MonitorError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(MonitorRequest::Apply {
                mutation,
                respond_to: Some(respond_to),
            })
            .await
            .map_err(|_| MonitorError::Closed)?;
        response.await.map_err(|_| MonitorError::Dropped)?
    }

    /// Reads the resource as of this request's position in the stream.
    pub async fn read(&self) -> Result<R::Snapshot, MonitorError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(MonitorRequest::Read { respond_to })
            .await
            .map_err(|_| MonitorError::Closed)?;
        response.await.map_err(|_| MonitorError::Dropped)?
    }

    /// Asks the monitor to drain its queue and stop. Returns the final snapshot.
    ///
    /// Only the first caller gets the snapshot; later callers get
    /// [`MonitorError::Closed`].
    pub async fn stop(&self) -> Result<R::Snapshot, MonitorError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(MonitorRequest::Stop { respond_to })
            .await
            .map_err(|_| MonitorError::Closed)?;
        response.await.map_err(|_| MonitorError::Dropped)?
    }

    /// True once the monitor has stopped accepting requests.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}
