//! Type-safe wrappers around [`MonitorClient`](actor_pipeline::MonitorClient).

pub mod account_client;

pub use account_client::*;
