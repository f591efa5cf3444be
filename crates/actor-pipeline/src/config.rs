//! # Configuration
//!
//! Tunables for the pipeline, the monitor and the rally harness. Every struct
//! deserialises from TOML with `#[serde(default)]`, so a config file only needs
//! the keys it wants to change. Durations are written in milliseconds.
//!
//! ```toml
//! worker_count = 4
//! channel_capacity = 16
//! drain_delay_ms = 250
//! termination = "all_workers"
//! ```

use crate::error::ConfigError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// How many termination tokens the collector waits for before it stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TerminationPolicy {
    /// Stop after one token per worker. Every in-flight result is delivered.
    #[default]
    AllWorkers,
    /// Stop at the first token seen. Results still in flight from other
    /// workers are discarded.
    FirstToken,
}

/// Worker pipeline settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Number of workers in the pool (K).
    pub worker_count: usize,

    /// Capacity of both the fan-out and the fan-in channel.
    pub channel_capacity: usize,

    /// Pause between the last work item and the termination tokens.
    pub drain_delay_ms: u64,

    pub termination: TerminationPolicy,

    /// How often a panicked worker is restarted before its token is injected.
    pub max_restarts: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            worker_count: 3,
            channel_capacity: 10,
            drain_delay_ms: 0,
            termination: TerminationPolicy::AllWorkers,
            max_restarts: 0,
        }
    }
}

impl PipelineConfig {
    pub fn with_workers(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    pub fn with_capacity(mut self, channel_capacity: usize) -> Self {
        self.channel_capacity = channel_capacity;
        self
    }

    pub fn with_termination(mut self, termination: TerminationPolicy) -> Self {
        self.termination = termination;
        self
    }

    pub fn with_max_restarts(mut self, max_restarts: u32) -> Self {
        self.max_restarts = max_restarts;
        self
    }

    pub fn drain_delay(&self) -> Duration {
        Duration::from_millis(self.drain_delay_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.worker_count == 0 {
            return Err(ConfigError::Invalid("worker_count must be at least 1".into()));
        }
        if self.channel_capacity == 0 {
            return Err(ConfigError::Invalid(
                "channel_capacity must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Resource monitor settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MonitorConfig {
    /// Capacity of the request queue.
    pub channel_capacity: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 32,
        }
    }
}

impl MonitorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channel_capacity == 0 {
            return Err(ConfigError::Invalid(
                "monitor channel_capacity must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// One side of a rally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PeerConfig {
    pub name: String,
    pub rounds: u32,
}

/// Ping-pong rally settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RallyConfig {
    /// Receives the serve.
    pub first: PeerConfig,
    pub second: PeerConfig,
    /// Deadline for every individual receive and send.
    pub timeout_ms: u64,
    /// Value put into play.
    pub serve: u64,
}

impl Default for RallyConfig {
    fn default() -> Self {
        Self {
            first: PeerConfig {
                name: "Venus".into(),
                rounds: 5,
            },
            second: PeerConfig {
                name: "Serena".into(),
                rounds: 15,
            },
            timeout_ms: 100,
            serve: 0,
        }
    }
}

impl RallyConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.first.name == self.second.name {
            return Err(ConfigError::Invalid(format!(
                "rally peers need distinct names, both are {:?}",
                self.first.name
            )));
        }
        for peer in [&self.first, &self.second] {
            if peer.rounds == 0 {
                return Err(ConfigError::Invalid(format!(
                    "rally peer {:?} must play at least one round",
                    peer.name
                )));
            }
        }
        Ok(())
    }
}

/// Parses any config struct from a TOML string.
pub fn from_toml_str<T: DeserializeOwned>(source: &str) -> Result<T, ConfigError> {
    Ok(toml::from_str(source)?)
}

/// Reads and parses a TOML config file.
pub fn load<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, ConfigError> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    from_toml_str(&source)
}
