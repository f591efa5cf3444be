//! # Mock Monitors & Testing Guide
//!
//! The `MockMonitor<R>` type hands out a real [`MonitorClient<R>`], but answers its
//! requests from a queue of expectations instead of owning a resource. It lets you
//! unit-test the logic *around* a client (validation, error mapping) without
//! spawning a [`ResourceMonitor`](crate::ResourceMonitor).
//!
//! ## When to use Mocks vs Real Monitors
//!
//! | Feature | MockMonitor | Real Monitor |
//! |---------|-------------|--------------|
//! | **Speed** | Instant (in-memory) | Fast (but involves tokio spawn) |
//! | **Determinism** | 100% Deterministic | Subject to scheduler |
//! | **State** | No real state (expectations) | Real resource |
//! | **Use Case** | Unit testing client wrappers | Testing the monitor or the whole system |
//! | **Error Injection** | Easy (`return_err`) | Hard (requires specific state) |
//!
//! ## Testing Strategies
//!
//! <details>
//! <summary><b>Pattern 0: Client Logic Test (Pure Mock)</b></summary>
//!
//! ```rust
//! use actor_pipeline::mock::MockMonitor;
//! use actor_pipeline::{MonitorError, Resource};
//!
//! #[derive(Debug)] struct Counter(i64);
//! #[derive(Debug)] enum CounterOp { Add(i64) }
//! #[derive(Debug, thiserror::Error)] #[error("Err")] struct CounterError;
//!
//! impl Resource for Counter {
//!     type Mutation = CounterOp; type Snapshot = i64; type Error = CounterError;
//!     fn apply(&mut self, op: CounterOp) -> Result<(), CounterError> {
//!         match op { CounterOp::Add(n) => self.0 += n }
//!         Ok(())
//!     }
//!     fn snapshot(&self) -> i64 { self.0 }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockMonitor::<Counter>::new();
//!     mock.expect_apply().return_ok(());
//!     mock.expect_read().return_ok(42);
//!     mock.expect_read().return_err(MonitorError::Closed);
//!
//!     let client = mock.client();
//!     client.apply_confirmed(CounterOp::Add(1)).await.unwrap();
//!     assert_eq!(client.read().await.unwrap(), 42);
//!     assert!(matches!(client.read().await, Err(MonitorError::Closed)));
//!
//!     mock.verify();
//! }
//! ```
//! </details>
//!
//! <details>
//! <summary><b>Pattern 1: Real Monitor Test</b></summary>
//!
//! Spawn [`ResourceMonitor::run`](crate::ResourceMonitor::run) and talk to it through
//! the client. See `tests/integration_test.rs`.
//! </details>
//!
//! <details>
//! <summary><b>Pattern 2: Full System Test</b></summary>
//!
//! Start the whole orchestrator. See `tests/integration_test.rs` in the
//! pipeline-sample crate.
//! </details>
//!
//! ## Mocking Utilities
//!
//! Use [`create_mock_client`] to get a client and the raw receiver, or use the
//! fluent [`MockMonitor`] API.

use crate::client::MonitorClient;
use crate::error::MonitorError;
use crate::message::{MonitorRequest, Response};
use crate::resource::Resource;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

enum Expectation<R: Resource> {
    Apply {
        response: Result<(), MonitorError>,
    },
    Read {
        response: Result<R::Snapshot, MonitorError>,
    },
    Stop {
        response: Result<R::Snapshot, MonitorError>,
    },
}

type Expectations<R> = Arc<Mutex<VecDeque<Expectation<R>>>>;

fn lock<R: Resource>(expectations: &Expectations<R>) -> MutexGuard<'_, VecDeque<Expectation<R>>> {
    expectations.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A mock monitor with expectation tracking for fluent testing.
///
/// Expectations are consumed in order. A request that does not match the next
/// expectation panics the background task, which the client then observes as
/// [`MonitorError::Dropped`].
pub struct MockMonitor<R: Resource> {
    client: MonitorClient<R>,
    expectations: Expectations<R>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<R: Resource> Default for MockMonitor<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Resource> MockMonitor<R> {
    /// Creates a new mock with no expectations. Must be called inside a Tokio runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<MonitorRequest<R>>(100);
        let expectations: Expectations<R> = Arc::new(Mutex::new(VecDeque::new()));
        let queue = expectations.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = lock(&queue).pop_front();

                match (request, expectation) {
                    (MonitorRequest::Apply { respond_to, .. }, Some(Expectation::Apply { response })) => {
                        if let Some(respond_to) = respond_to {
                            let _ = respond_to.send(response);
                        }
                    }
                    (MonitorRequest::Read { respond_to }, Some(Expectation::Read { response })) => {
                        let _ = respond_to.send(response);
                    }
                    (MonitorRequest::Stop { respond_to }, Some(Expectation::Stop { response })) => {
                        let _ = respond_to.send(response);
                    }
                    _ => {
                        panic!("Unexpected request or expectation mismatch");
                    }
                }
            }
        });

        Self {
            client: MonitorClient::new(sender),
            expectations,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> MonitorClient<R> {
        self.client.clone()
    }

    /// Expects an `apply` or `apply_confirmed`.
    pub fn expect_apply(&mut self) -> ExpectationBuilder<R, ()> {
        ExpectationBuilder::new(self.expectations.clone(), |response| Expectation::Apply { response })
    }

    /// Expects a `read`.
    pub fn expect_read(&mut self) -> ExpectationBuilder<R, R::Snapshot> {
        ExpectationBuilder::new(self.expectations.clone(), |response| Expectation::Read { response })
    }

    /// Expects a `stop`.
    pub fn expect_stop(&mut self) -> ExpectationBuilder<R, R::Snapshot> {
        ExpectationBuilder::new(self.expectations.clone(), |response| Expectation::Stop { response })
    }

    /// Panics unless every expectation was consumed.
    pub fn verify(&self) {
        let remaining = lock(&self.expectations).len();
        if remaining != 0 {
            panic!("Not all expectations were met. {remaining} remaining");
        }
    }
}

/// Builder for a single expectation.
pub struct ExpectationBuilder<R: Resource, T> {
    expectations: Expectations<R>,
    make: fn(Result<T, MonitorError>) -> Expectation<R>,
}

impl<R: Resource, T> ExpectationBuilder<R, T> {
    fn new(expectations: Expectations<R>, make: fn(Result<T, MonitorError>) -> Expectation<R>) -> Self {
        Self { expectations, make }
    }

    /// Answers the request with `value`.
    pub fn return_ok(self, value: T) {
        lock(&self.expectations).push_back((self.make)(Ok(value)));
    }

    /// Answers the request with `error`.
    pub fn return_err(self, error: MonitorError) {
        lock(&self.expectations).push_back((self.make)(Err(error)));
    }
}

// =============================================================================
// RECEIVER HELPERS
// =============================================================================

/// Creates a client and the receiver its requests arrive on.
///
/// # Testing Strategy
/// Instead of a monitor, the test itself reads from `receiver`, asserts on each
/// request and answers through its `respond_to` channel. This makes it easy to
/// check exactly what a client wrapper sends, in which order.
///
/// **Note**: Consider using [`MockMonitor`] for a more fluent API.
pub fn create_mock_client<R: Resource>(
    buffer_size: usize,
) -> (MonitorClient<R>, mpsc::Receiver<MonitorRequest<R>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (MonitorClient::new(sender), receiver)
}

/// Next message, if it is an Apply request.
pub async fn expect_apply<R: Resource>(
    receiver: &mut mpsc::Receiver<MonitorRequest<R>>,
) -> Option<(R::Mutation, Option<Response<()>>)> {
    match receiver.recv().await {
        Some(MonitorRequest::Apply {
            mutation,
            respond_to,
        }) => Some((mutation, respond_to)),
        _ => None,
    }
}

/// Next message, if it is a Read request.
pub async fn expect_read<R: Resource>(
    receiver: &mut mpsc::Receiver<MonitorRequest<R>>,
) -> Option<Response<R::Snapshot>> {
    match receiver.recv().await {
        Some(MonitorRequest::Read { respond_to }) => Some(respond_to),
        _ => None,
    }
}

/// Next message, if it is a Stop request.
pub async fn expect_stop<R: Resource>(
    receiver: &mut mpsc::Receiver<MonitorRequest<R>>,
) -> Option<Response<R::Snapshot>> {
    match receiver.recv().await {
        Some(MonitorRequest::Stop { respond_to }) => Some(respond_to),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Tally(u32);

    #[derive(Debug, PartialEq)]
    enum TallyOp {
        Bump,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("Tally error")]
    struct TallyError;

    impl Resource for Tally {
        type Mutation = TallyOp;
        type Snapshot = u32;
        type Error = TallyError;

        fn apply(&mut self, op: TallyOp) -> Result<(), TallyError> {
            match op {
                TallyOp::Bump => self.0 += 1,
            }
            Ok(())
        }

        fn snapshot(&self) -> u32 {
            self.0
        }
    }

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client::<Tally>(10);

        client.apply(TallyOp::Bump).await.unwrap();
        let (mutation, respond_to) = expect_apply(&mut receiver)
            .await
            .expect("Expected Apply request");
        assert_eq!(mutation, TallyOp::Bump);
        assert!(respond_to.is_none());

        let read_task = tokio::spawn(async move { client.read().await });
        let responder = expect_read(&mut receiver).await.expect("Expected Read request");
        responder.send(Ok(7)).unwrap();
        assert_eq!(read_task.await.unwrap().unwrap(), 7);
    }

    #[tokio::test]
    async fn test_mock_monitor_with_expectations() {
        let mut mock = MockMonitor::<Tally>::new();
        mock.expect_apply().return_ok(());
        mock.expect_read().return_ok(1);
        mock.expect_stop().return_ok(1);

        let client = mock.client();
        client.apply_confirmed(TallyOp::Bump).await.unwrap();
        assert_eq!(client.read().await.unwrap(), 1);
        assert_eq!(client.stop().await.unwrap(), 1);

        mock.verify();
    }

    #[tokio::test]
    async fn test_mock_monitor_error_injection() {
        let mut mock = MockMonitor::<Tally>::new();
        mock.expect_apply()
            .return_err(MonitorError::Rejected(Box::new(TallyError)));

        let result = mock.client().apply_confirmed(TallyOp::Bump).await;
        assert!(matches!(result, Err(MonitorError::Rejected(_))));
    }

    #[tokio::test]
    async fn test_mock_monitor_mismatch_drops_response() {
        let mut mock = MockMonitor::<Tally>::new();
        mock.expect_stop().return_ok(0);

        let result = mock.client().read().await;
        assert!(matches!(result, Err(MonitorError::Dropped)));
    }
}
