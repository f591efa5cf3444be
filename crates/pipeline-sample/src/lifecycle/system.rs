use super::config::SystemConfig;
use crate::account;
use crate::clients::AccountClient;
use crate::model::AccountSnapshot;
use crate::primes::PrimeFilter;
use actor_pipeline::{
    generate, ConfigError, MonitorHandle, Pipeline, PipelineError, PipelineSummary, Rally,
    RallyError, RallyReport,
};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Errors surfaced by the orchestrator.
#[derive(Debug, Error)]
pub enum SystemError {
    #[error(transparent)]
    Account(#[from] account::AccountError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Rally(#[from] RallyError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A task owned by the system panicked or was cancelled.
    #[error("Task failed: {0}")]
    TaskFailed(String),
}

/// The runtime orchestrator: owns the account monitor and runs the pipeline and
/// rally demos on demand.
///
/// `System` is responsible for:
/// - **Lifecycle Management**: starting the monitor and stopping it with a drain
/// - **Wiring**: building pipelines and rallies from [`SystemConfig`]
/// - **Failure Reporting**: turning panicked tasks into [`SystemError::TaskFailed`]
///
/// # Example
///
/// ```ignore
/// let system = System::start(SystemConfig::default())?;
///
/// system.account.deposit(10.0).await?;
/// let primes = system.run_prime_filter(272).await?;
/// let rally = system.play_rally().await?;
///
/// let final_state = system.shutdown().await?;
/// ```
pub struct System {
    /// Client for the account monitor.
    pub account: AccountClient,

    config: SystemConfig,

    /// The account monitor task (used for graceful shutdown)
    monitor: JoinHandle<AccountSnapshot>,
}

impl System {
    /// Validates `config`, then creates and spawns the account monitor.
    ///
    /// Must be called from inside a Tokio runtime.
    pub fn start(config: SystemConfig) -> Result<Self, SystemError> {
        config.validate()?;

        let (monitor, account) = account::with_config(config.initial_balance, &config.monitor);
        let monitor = tokio::spawn(monitor.run());

        info!(
            initial_balance = config.initial_balance,
            workers = config.pipeline.worker_count,
            "System started"
        );
        Ok(Self {
            account,
            config,
            monitor,
        })
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    /// Runs `0..limit` through a prime-filtering pipeline and waits for it to drain.
    ///
    /// The generator runs as its own task; the collector drains on this one,
    /// bounded by `drain_timeout_ms`.
    pub async fn run_prime_filter(&self, limit: u64) -> Result<PipelineSummary<u64>, SystemError> {
        let stage = PrimeFilter::new(self.config.work_delay());
        let (submitter, collector) = Pipeline::spawn(&self.config.pipeline, stage)?;

        let generator = tokio::spawn(generate(submitter, 0..limit, self.config.pipeline.drain_delay()));
        let summary = collector.wait_timeout(self.config.drain_timeout()).await?;

        // Under FirstToken the generator may still be blocked on a full channel
        // whose workers are gone; it then ends with WorkersGone, which is fine.
        match generator.await {
            Ok(Ok(generated)) => info!(generated, primes = summary.results.len(), "Prime filter done"),
            Ok(Err(e)) => info!(error = %e, primes = summary.results.len(), "Generator stopped early"),
            Err(e) => return Err(SystemError::TaskFailed(e.to_string())),
        }
        Ok(summary)
    }

    /// Plays the ping-pong rally with the configured peers and timing.
    pub async fn play_rally(&self) -> Result<RallyReport, SystemError> {
        Ok(Rally::play(&self.config.rally).await?)
    }

    /// Stops the account monitor, letting it drain everything already queued,
    /// and waits for its task to finish.
    ///
    /// # Returns
    ///
    /// - `Ok(snapshot)` with the final account state
    /// - `Err(SystemError::TaskFailed)` if the monitor task panicked
    pub async fn shutdown(self) -> Result<AccountSnapshot, SystemError> {
        info!("Shutting down system...");

        let stopped = self.account.stop().await;
        // Any clones held elsewhere can no longer reach the monitor.
        drop(self.account);

        let final_state = match self.monitor.await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!(error = %e, "Monitor task failed");
                return Err(SystemError::TaskFailed(e.to_string()));
            }
        };
        stopped?;

        info!(balance = final_state.balance, "System shutdown complete.");
        Ok(final_state)
    }
}
