//! # Timeout Race
//!
//! Races an operation against a deadline and always comes back with a definite
//! answer instead of hanging.
//!
//! The operation runs as its own Tokio task. When the deadline wins, the task is
//! detached, not aborted: it keeps running to completion in the background and its
//! result is dropped. Cancellation is cooperative only, so an operation that
//! touches shared state must leave it consistent whenever it finishes.

use crate::error::RaceError;
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// Runs `operation` concurrently and waits at most `duration` for its result.
///
/// A zero `duration` resolves to [`RaceError::Elapsed`] immediately, without
/// starting the operation.
///
/// ```rust
/// use actor_pipeline::run_with_timeout;
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() {
///     let quick = run_with_timeout(async { 42 }, Duration::from_millis(100)).await;
///     assert_eq!(quick, Ok(42));
///
///     let slow = run_with_timeout(
///         tokio::time::sleep(Duration::from_secs(5)),
///         Duration::from_millis(10),
///     )
///     .await;
///     assert!(slow.unwrap_err().is_elapsed());
/// }
/// ```
pub async fn run_with_timeout<F>(operation: F, duration: Duration) -> Result<F::Output, RaceError>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    if duration.is_zero() {
        return Err(RaceError::Elapsed(duration));
    }
    race(tokio::spawn(operation), duration).await
}

/// Same race for a synchronous closure, run on Tokio's blocking pool.
pub async fn run_blocking_with_timeout<F, T>(operation: F, duration: Duration) -> Result<T, RaceError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    if duration.is_zero() {
        return Err(RaceError::Elapsed(duration));
    }
    race(tokio::task::spawn_blocking(operation), duration).await
}

async fn race<T>(handle: JoinHandle<T>, duration: Duration) -> Result<T, RaceError> {
    match tokio::time::timeout(duration, handle).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) if e.is_panic() => Err(RaceError::Panicked(e.to_string())),
        Ok(Err(_)) => Err(RaceError::Cancelled),
        Err(_) => {
            // The JoinHandle is dropped here, which detaches the task.
            debug!(?duration, "Deadline won the race");
            Err(RaceError::Elapsed(duration))
        }
    }
}
