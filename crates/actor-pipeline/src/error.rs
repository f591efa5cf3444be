//! # Errors
//!
//! Every layer of the crate reports failures through one of the enums below.
//! Keeping them in one place means the monitor, the pipeline and the timeout
//! race all speak the same vocabulary: a closed channel is always "closed",
//! a missed deadline is always "elapsed".

use std::time::Duration;

/// Errors raised by a [`ResourceMonitor`](crate::ResourceMonitor) or its clients.
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    /// The monitor has stopped (or was never started) and accepts no more requests.
    #[error("Monitor closed")]
    Closed,
    /// The monitor went away before answering.
    #[error("Monitor dropped response channel")]
    Dropped,
    /// The resource refused to apply a mutation.
    #[error("Resource rejected mutation: {0}")]
    Rejected(Box<dyn std::error::Error + Send + Sync>),
}

/// Outcome of a race that did not produce a value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RaceError {
    #[error("Deadline of {0:?} elapsed")]
    Elapsed(Duration),
    #[error("Operation panicked: {0}")]
    Panicked(String),
    #[error("Operation was cancelled")]
    Cancelled,
}

impl RaceError {
    pub fn is_elapsed(&self) -> bool {
        matches!(self, RaceError::Elapsed(_))
    }
}

/// The other end of a rendezvous channel is gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Rendezvous peer disconnected")]
pub struct Disconnected;

/// Errors raised by the worker pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Termination tokens were already sent; no more work is accepted.
    #[error("Pipeline input is closed")]
    Closed,
    /// Every worker has exited, so the inbound channel has no receiver.
    #[error("All workers have exited")]
    WorkersGone,
    /// The fan-in channel closed before the expected termination tokens arrived.
    #[error("Result channel closed prematurely: expected {expected} termination token(s), received {received}")]
    ChannelClosed { expected: usize, received: usize },
    /// Draining did not finish inside the allowed window.
    #[error("Pipeline did not drain within {0:?}")]
    DrainTimeout(Duration),
    /// A supervisor task itself failed.
    #[error("Supervisor failed: {0}")]
    SupervisorFailed(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors raised by the ping-pong rally harness.
#[derive(Debug, thiserror::Error)]
pub enum RallyError {
    #[error("Serve was not taken: {0}")]
    ServeFailed(String),
    #[error("Peer {name} failed: {reason}")]
    PeerFailed { name: String, reason: String },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}
