//! # Pipeline Sample
//!
//! A tour of the `actor-pipeline` building blocks.
//!
//! ## Core Components
//!
//! - **[model]**: [`Account`](pipeline_sample::model::Account), the resource behind the monitor.
//! - **[clients]**: [`AccountClient`](pipeline_sample::clients::AccountClient) hides the message passing.
//! - **[primes]**: the prime-filter stage run by the worker pipeline.
//! - **[lifecycle]**: [`System`] starts, wires and stops everything.
//!
//! ## Quick Start
//!
//! ```bash
//! RUST_LOG=info cargo run -p pipeline-sample
//! RUST_LOG=info cargo run -p pipeline-sample -- system.toml
//! ```
//!
//! The run:
//! 1.  Hammers the account with concurrent deposits and withdrawals.
//! 2.  Filters primes through the fan-out/fan-in pipeline.
//! 3.  Plays a ping-pong rally until one side stalls.
//! 4.  Stops the monitor and prints the final balance.

use actor_pipeline::tracing::setup_tracing;
use pipeline_sample::lifecycle::{System, SystemConfig, SystemError};
use tracing::{info, Instrument};

#[tokio::main]
async fn main() -> Result<(), SystemError> {
    // Setup tracing once for the entire application
    setup_tracing();

    let config = match std::env::args().nth(1) {
        Some(path) => SystemConfig::load(path)?,
        None => SystemConfig::default(),
    };
    let prime_limit = config.prime_limit;

    info!("Starting pipeline sample");
    let system = System::start(config)?;

    let span = tracing::info_span!("account");
    async {
        let mut tasks = Vec::new();
        for _ in 0..1000 {
            let account = system.account.clone();
            tasks.push(tokio::spawn(async move { account.deposit(1.0).await }));
        }
        for _ in 0..500 {
            let account = system.account.clone();
            tasks.push(tokio::spawn(async move { account.withdraw(1.0).await }));
        }
        for task in tasks {
            task.await
                .map_err(|e| SystemError::TaskFailed(e.to_string()))??;
        }
        let balance = system.account.get_balance().await?;
        info!(balance, "Concurrent deposits and withdrawals applied");
        Ok::<_, SystemError>(())
    }
    .instrument(span)
    .await?;

    let span = tracing::info_span!("primes", limit = prime_limit);
    let summary = system.run_prime_filter(prime_limit).instrument(span).await?;
    let mut primes: Vec<u64> = summary.results.iter().map(|item| item.payload).collect();
    primes.sort_unstable();
    info!(
        count = primes.len(),
        failed_workers = summary.failed_workers.len(),
        ?primes,
        "Primes found"
    );

    let span = tracing::info_span!("rally");
    let report = system.play_rally().instrument(span).await?;
    match report.winner() {
        Some(winner) => info!(
            winner = %winner.name,
            rounds = winner.rounds_completed,
            "Rally finished"
        ),
        None => info!("Rally finished without a stall"),
    }

    let final_state = system.shutdown().await?;
    info!(
        balance = final_state.balance,
        deposits = final_state.deposits,
        withdrawals = final_state.withdrawals,
        "Application completed successfully"
    );
    Ok(())
}
