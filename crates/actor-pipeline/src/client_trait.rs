//! # MonitorHandle Trait
//!
//! Provides a common interface for resource‑specific clients, adding default
//! `snapshot` and `stop` methods on top of a generic `MonitorClient`.
use crate::{MonitorClient, MonitorError, Resource};
use async_trait::async_trait;

/// Trait for resource-specific clients to inherit the standard monitor operations.
///
/// A wrapper such as `AccountClient` only has to say where its inner
/// [`MonitorClient`] lives and how framework errors map onto its own error type;
/// reading and stopping come for free.
///
/// # Example
///
/// ```rust
/// use actor_pipeline::{MonitorClient, MonitorError, MonitorHandle, Resource};
/// use async_trait::async_trait;
///
/// #[derive(Debug)] struct Gauge(u32);
/// #[derive(Debug)] enum GaugeOp { Set(u32) }
/// #[derive(Debug, thiserror::Error)] #[error("{0}")] struct GaugeError(String);
///
/// impl Resource for Gauge {
///     type Mutation = GaugeOp;
///     type Snapshot = u32;
///     type Error = GaugeError;
///     fn apply(&mut self, op: GaugeOp) -> Result<(), GaugeError> {
///         match op { GaugeOp::Set(v) => self.0 = v }
///         Ok(())
///     }
///     fn snapshot(&self) -> u32 { self.0 }
/// }
///
/// struct GaugeClient { inner: MonitorClient<Gauge> }
///
/// #[async_trait]
/// impl MonitorHandle<Gauge> for GaugeClient {
///     type Error = GaugeError;
///     fn inner(&self) -> &MonitorClient<Gauge> { &self.inner }
///     fn map_error(e: MonitorError) -> GaugeError { GaugeError(e.to_string()) }
/// }
///
/// async fn usage(client: GaugeClient) {
///     // snapshot() and stop() are provided automatically
///     let _ = client.snapshot().await;
///     let _ = client.stop().await;
/// }
/// ```
#[async_trait]
pub trait MonitorHandle<R: Resource>: Send + Sync {
    /// The resource-specific error type.
    type Error: Send + Sync;

    /// Access the inner generic MonitorClient.
    fn inner(&self) -> &MonitorClient<R>;

    /// Map framework errors to the specific resource error type.
    fn map_error(e: MonitorError) -> Self::Error;

    /// Read the current state of the resource.
    #[tracing::instrument(skip(self))]
    async fn snapshot(&self) -> Result<R::Snapshot, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().read().await.map_err(Self::map_error)
    }

    /// Drain the monitor and stop it, returning the final state.
    #[tracing::instrument(skip(self))]
    async fn stop(&self) -> Result<R::Snapshot, Self::Error> {
        tracing::debug!("Sending stop");
        self.inner().stop().await.map_err(Self::map_error)
    }
}
