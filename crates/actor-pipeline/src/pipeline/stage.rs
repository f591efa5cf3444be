//! # Stage Trait
//!
//! What a worker does to each item. A stage either transforms an item into an
//! output or drops it (`None`), which is how filters are expressed.

use async_trait::async_trait;
use std::fmt::Debug;
use std::marker::PhantomData;

/// Per-item processing run by every worker in the pool.
///
/// The same stage instance is shared by all workers, so it takes `&self`. A
/// stage that panics takes its worker down with it; the pipeline's supervisor
/// deals with the consequences.
#[async_trait]
pub trait Stage: Send + Sync + 'static {
    type Input: Send + Debug + 'static;
    type Output: Send + Debug + 'static;

    async fn process(&self, input: Self::Input) -> Option<Self::Output>;
}

/// Adapts a plain `Fn(&T) -> bool` into a filtering stage.
///
/// ```rust
/// use actor_pipeline::{Predicate, Stage};
///
/// #[tokio::main]
/// async fn main() {
///     let evens = Predicate::new(|n: &u64| n % 2 == 0);
///     assert_eq!(evens.process(4).await, Some(4));
///     assert_eq!(evens.process(5).await, None);
/// }
/// ```
pub struct Predicate<T, F> {
    filter: F,
    _input: PhantomData<fn(T) -> T>,
}

impl<T, F> Predicate<T, F>
where
    F: Fn(&T) -> bool,
{
    pub fn new(filter: F) -> Self {
        Self {
            filter,
            _input: PhantomData,
        }
    }
}

#[async_trait]
impl<T, F> Stage for Predicate<T, F>
where
    T: Send + Debug + 'static,
    F: Fn(&T) -> bool + Send + Sync + 'static,
{
    type Input = T;
    type Output = T;

    async fn process(&self, input: T) -> Option<T> {
        (self.filter)(&input).then_some(input)
    }
}
