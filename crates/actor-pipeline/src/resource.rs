//! # Resource Trait
//!
//! The `Resource` trait is the contract a value must satisfy to be owned by a
//! [`ResourceMonitor`](crate::ResourceMonitor). The monitor task is the only code
//! that ever holds `&mut` access to the resource; callers only ever see
//! [`Resource::Snapshot`] copies handed back through reply channels.
//!
//! # Architecture Note
//! Writing the monitor loop once against this trait means an account balance, a
//! counter or an inventory level all get the same serialised, lock-free access
//! discipline. Associated types keep it type safe: an account monitor only accepts
//! account mutations, and the compiler rejects anything else.

use std::fmt::Debug;

/// A mutable value exclusively owned by one monitor task.
///
/// # Example
///
/// ```rust
/// use actor_pipeline::Resource;
///
/// #[derive(Debug)]
/// struct Counter(i64);
///
/// #[derive(Debug)]
/// enum CounterOp { Add(i64) }
///
/// #[derive(Debug, thiserror::Error)]
/// #[error("counter error")]
/// struct CounterError;
///
/// impl Resource for Counter {
///     type Mutation = CounterOp;
///     type Snapshot = i64;
///     type Error = CounterError;
///
///     fn apply(&mut self, mutation: CounterOp) -> Result<(), CounterError> {
///         match mutation { CounterOp::Add(n) => self.0 += n }
///         Ok(())
///     }
///
///     fn snapshot(&self) -> i64 { self.0 }
/// }
/// ```
pub trait Resource: Send + 'static {
    /// A request to change the resource (e.g. `Deposit(10.0)`).
    type Mutation: Send + Debug + 'static;

    /// The value handed back to readers.
    type Snapshot: Clone + Send + Sync + Debug + 'static;

    /// Why a mutation was refused.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Applies one mutation. Called only from the monitor task, one request at a time.
    fn apply(&mut self, mutation: Self::Mutation) -> Result<(), Self::Error>;

    /// Copies out the current state.
    fn snapshot(&self) -> Self::Snapshot;
}
