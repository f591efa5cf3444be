//! # Monitor Messages
//!
//! The request type that travels from a [`MonitorClient`](crate::MonitorClient)
//! to its [`ResourceMonitor`](crate::ResourceMonitor).

use crate::error::MonitorError;
use crate::resource::Resource;
use tokio::sync::oneshot;

/// Type alias for the one-shot reply channel used by the monitor.
///
/// Sending on a oneshot never blocks, so a caller that abandons its request can
/// never stall the monitor: the reply is simply dropped.
pub type Response<T> = oneshot::Sender<Result<T, MonitorError>>;

/// Internal message type sent to the monitor.
///
/// All requests for one monitor travel through a single FIFO channel, so the
/// arrival order at the monitor is the order in which they are applied. Nothing is
/// reordered or coalesced.
///
/// - **Apply**: a mutation. `respond_to` is `None` for fire-and-forget calls such
///   as `deposit`, which return as soon as the channel accepts the request.
/// - **Read**: a snapshot of the resource as of this point in the stream.
/// - **Stop**: finish everything already queued, then shut down and report the
///   final snapshot.
#[derive(Debug)]
pub enum MonitorRequest<R: Resource> {
    Apply {
        mutation: R::Mutation,
        respond_to: Option<Response<()>>,
    },
    Read {
        respond_to: Response<R::Snapshot>,
    },
    Stop {
        respond_to: Response<R::Snapshot>,
    },
}
