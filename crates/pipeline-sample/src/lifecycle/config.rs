//! Settings for a whole [`System`](super::System).
//!
//! ```toml
//! initial_balance = 10000.01
//! prime_limit = 272
//! work_delay_ms = 5
//!
//! [pipeline]
//! worker_count = 3
//!
//! [rally]
//! timeout_ms = 100
//! first = { name = "Venus", rounds = 5 }
//! second = { name = "Serena", rounds = 15 }
//! ```

use actor_pipeline::config as framework_config;
use actor_pipeline::{ConfigError, MonitorConfig, PipelineConfig, RallyConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SystemConfig {
    /// Opening balance of the account.
    pub initial_balance: f64,

    pub monitor: MonitorConfig,

    pub pipeline: PipelineConfig,

    pub rally: RallyConfig,

    /// The prime filter checks `0..prime_limit`.
    pub prime_limit: u64,

    /// Simulated work per item in the prime filter.
    pub work_delay_ms: u64,

    /// Upper bound on how long a pipeline run may take to drain.
    pub drain_timeout_ms: u64,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            initial_balance: 10000.01,
            monitor: MonitorConfig::default(),
            pipeline: PipelineConfig::default(),
            rally: RallyConfig::default(),
            prime_limit: 272,
            work_delay_ms: 0,
            drain_timeout_ms: 10_000,
        }
    }
}

impl SystemConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        framework_config::from_toml_str(source)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        framework_config::load(path)
    }

    pub fn work_delay(&self) -> Duration {
        Duration::from_millis(self.work_delay_ms)
    }

    pub fn drain_timeout(&self) -> Duration {
        Duration::from_millis(self.drain_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.initial_balance.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "initial_balance must be finite, got {}",
                self.initial_balance
            )));
        }
        if self.drain_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "drain_timeout_ms must be at least 1".into(),
            ));
        }
        self.monitor.validate()?;
        self.pipeline.validate()?;
        self.rally.validate()
    }
}
