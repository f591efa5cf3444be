use serde::{Deserialize, Serialize};

/// A bank account holding a single balance.
///
/// # Resource Monitor
/// This struct implements the [`Resource`](actor_pipeline::Resource) trait,
/// allowing it to be owned by a [`ResourceMonitor`](actor_pipeline::ResourceMonitor).
/// Once handed to the monitor, the balance is only ever changed by the monitor
/// task, one mutation at a time.
///
/// See [`impl Resource for Account`](#impl-Resource-for-Account) for details on
/// the accepted mutations ([`AccountMutation`](crate::account::AccountMutation)).
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub balance: f64,
    pub deposits: u64,
    pub withdrawals: u64,
}

impl Account {
    /// Opens an account with `balance` and no history.
    pub fn new(balance: f64) -> Self {
        Self {
            balance,
            deposits: 0,
            withdrawals: 0,
        }
    }
}

/// Point-in-time copy of an account, as returned by reads and by `stop`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub balance: f64,
    pub deposits: u64,
    pub withdrawals: u64,
}
