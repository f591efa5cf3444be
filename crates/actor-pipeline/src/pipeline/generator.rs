//! The generator: a finite, ordered producer.

use super::submitter::WorkSubmitter;
use crate::error::PipelineError;
use std::time::Duration;
use tracing::info;

/// Submits every item of `items` in order, waits `drain_delay`, then closes the
/// input with one shutdown token per worker.
///
/// When `submitter` is used by nothing else, the items get sequence numbers
/// `0..N`. Returns `N`.
pub async fn generate<T, I>(
    submitter: WorkSubmitter<T>,
    items: I,
    drain_delay: Duration,
) -> Result<u64, PipelineError>
where
    T: Send,
    I: IntoIterator<Item = T>,
{
    let mut generated = 0;
    for item in items {
        submitter.submit(item).await?;
        generated += 1;
    }
    info!(generated, ?drain_delay, "Generator finished");

    if !drain_delay.is_zero() {
        tokio::time::sleep(drain_delay).await;
    }
    submitter.close().await?;
    Ok(generated)
}
