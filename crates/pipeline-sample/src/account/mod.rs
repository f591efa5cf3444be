//! # Account Monitor
//!
//! This module puts an [`Account`] behind a single-owner
//! [`ResourceMonitor`](actor_pipeline::ResourceMonitor).
//!
//! ## Structure
//!
//! - [`entity`] - [`Resource`](actor_pipeline::Resource) implementation for [`Account`]
//! - [`error`] - [`AccountError`] type for type-safe error handling
//! - [`actions`] - [`AccountMutation`], the deposits and withdrawals
//! - [`new()`] - Factory function that creates the monitor and client
//!
//! ## Usage
//!
//! ```rust
//! use pipeline_sample::account;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (monitor, client) = account::new(100.0);
//!     tokio::spawn(monitor.run());
//!
//!     client.deposit(25.0).await?;
//!     client.withdraw(50.0).await?;
//!     assert_eq!(client.get_balance().await?, 75.0);
//!     Ok(())
//! }
//! ```
//!
//! ## Key Features
//!
//! - **No locks**: the monitor task is the only owner of the balance
//! - **Fire-and-forget writes**: `deposit`/`withdraw` return once queued
//! - **Ordered reads**: `get_balance` sees every write queued before it

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::AccountClient;
use crate::model::Account;
use actor_pipeline::{MonitorConfig, ResourceMonitor};

/// Creates an account monitor with the default queue capacity, and its client.
pub fn new(initial_balance: f64) -> (ResourceMonitor<Account>, AccountClient) {
    with_config(initial_balance, &MonitorConfig::default())
}

/// Creates an account monitor using `config`, and its client.
pub fn with_config(
    initial_balance: f64,
    config: &MonitorConfig,
) -> (ResourceMonitor<Account>, AccountClient) {
    let (monitor, generic_client) =
        ResourceMonitor::new(config.channel_capacity, Account::new(initial_balance));
    (monitor, AccountClient::new(generic_client))
}
