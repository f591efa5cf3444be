//! # Single-Owner Resource Monitor
//!
//! This module defines the `ResourceMonitor`, the task that owns one mutable
//! resource and serialises every mutation and observation of it through a
//! message queue.

use crate::client::MonitorClient;
use crate::error::MonitorError;
use crate::message::MonitorRequest;
use crate::resource::Resource;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The monitor task that owns a single resource.
///
/// # Architecture Note
/// This struct is the "server" half of the pair. It owns the resource and the
/// receiver end of the request channel. Because only this task ever touches the
/// resource, and it handles one request at a time, there is no `Mutex` anywhere:
/// exclusive ownership inside the task is the synchronisation.
///
/// # Usage Pattern
///
/// 1.  **Create**: `ResourceMonitor::new()` returns the `monitor` and a `client`.
/// 2.  **Run**: spawn `monitor.run()` on the Tokio runtime.
/// 3.  **Use**: clone the client freely; stop with [`MonitorClient::stop`].
///
/// ```rust
/// use actor_pipeline::{Resource, ResourceMonitor};
///
/// #[derive(Debug)] struct Counter(i64);
/// #[derive(Debug)] enum CounterOp { Add(i64) }
/// #[derive(Debug, thiserror::Error)] #[error("counter error")] struct CounterError;
///
/// impl Resource for Counter {
///     type Mutation = CounterOp;
///     type Snapshot = i64;
///     type Error = CounterError;
///     fn apply(&mut self, op: CounterOp) -> Result<(), CounterError> {
///         match op { CounterOp::Add(n) => self.0 += n }
///         Ok(())
///     }
///     fn snapshot(&self) -> i64 { self.0 }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let (monitor, client) = ResourceMonitor::new(16, Counter(0));
///     let handle = tokio::spawn(monitor.run());
///
///     client.apply(CounterOp::Add(5)).await.unwrap();
///     assert_eq!(client.read().await.unwrap(), 5);
///
///     let last = client.stop().await.unwrap();
///     assert_eq!(last, 5);
///     assert_eq!(handle.await.unwrap(), 5);
/// }
/// ```
///
/// # Stop & Drain
///
/// A `Stop` request is queued like any other, so everything accepted before it is
/// applied first. The monitor then closes its inbox (new sends fail with
/// [`MonitorError::Closed`]), applies whatever was already buffered, answers the
/// stopper with the final snapshot and returns it from `run`.
///
/// If every client is dropped instead, the loop ends when the channel closes.
pub struct ResourceMonitor<R: Resource> {
    receiver: mpsc::Receiver<MonitorRequest<R>>,
    resource: R,
    applied: u64,
    rejected: u64,
}

impl<R: Resource> ResourceMonitor<R> {
    /// Creates a new `ResourceMonitor` and its associated `MonitorClient`.
    ///
    /// # Arguments
    ///
    /// * `buffer_size` - The capacity of the request channel. When it is full,
    ///   client calls wait until there is space.
    /// * `resource` - The initial value; from here on only the monitor touches it.
    pub fn new(buffer_size: usize, resource: R) -> (Self, MonitorClient<R>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let monitor = Self {
            receiver,
            resource,
            applied: 0,
            rejected: 0,
        };
        (monitor, MonitorClient::new(sender))
    }

    /// Runs the monitor loop until it is stopped or every client is dropped.
    ///
    /// Returns the final snapshot of the resource.
    pub async fn run(mut self) -> R::Snapshot {
        let resource_type = resource_type::<R>();
        info!(resource_type, "Monitor started");

        while let Some(request) = self.receiver.recv().await {
            match request {
                MonitorRequest::Stop { respond_to } => {
                    info!(resource_type, "Stop requested, draining");
                    self.receiver.close();
                    self.drain(resource_type).await;
                    let snapshot = self.resource.snapshot();
                    let _ = respond_to.send(Ok(snapshot.clone()));
                    info!(
                        resource_type,
                        applied = self.applied,
                        rejected = self.rejected,
                        ?snapshot,
                        "Stopped"
                    );
                    return snapshot;
                }
                request => self.handle(request, resource_type),
            }
        }

        let snapshot = self.resource.snapshot();
        info!(
            resource_type,
            applied = self.applied,
            rejected = self.rejected,
            ?snapshot,
            "Shutdown"
        );
        snapshot
    }

    async fn drain(&mut self, resource_type: &str) {
        while let Some(request) = self.receiver.recv().await {
            match request {
                MonitorRequest::Stop { respond_to } => {
                    debug!(resource_type, "Duplicate stop");
                    let _ = respond_to.send(Err(MonitorError::Closed));
                }
                request => self.handle(request, resource_type),
            }
        }
    }

    fn handle(&mut self, request: MonitorRequest<R>, resource_type: &str) {
        match request {
            MonitorRequest::Apply {
                mutation,
                respond_to,
            } => {
                debug!(resource_type, ?mutation, "Apply");
                let result = match self.resource.apply(mutation) {
                    Ok(()) => {
                        self.applied += 1;
                        Ok(())
                    }
                    Err(e) => {
                        self.rejected += 1;
                        // Fire-and-forget callers only learn about this from the log.
                        warn!(resource_type, error = %e, "Mutation rejected");
                        Err(MonitorError::Rejected(Box::new(e)))
                    }
                };
                if let Some(respond_to) = respond_to {
                    let _ = respond_to.send(result);
                }
            }
            MonitorRequest::Read { respond_to } => {
                let snapshot = self.resource.snapshot();
                if respond_to.send(Ok(snapshot)).is_err() {
                    debug!(resource_type, "Reader abandoned request");
                }
            }
            MonitorRequest::Stop { respond_to } => {
                let _ = respond_to.send(Err(MonitorError::Closed));
            }
        }
    }
}

// Extract just the type name (e.g., "Account" instead of "pipeline_sample::model::account::Account")
fn resource_type<R>() -> &'static str {
    std::any::type_name::<R>()
        .split("::")
        .last()
        .unwrap_or("Unknown")
}
