//! # Account Client
//!
//! Provides a high‑level API for interacting with the account monitor.
//! It wraps a `MonitorClient<Account>` and exposes banking methods.
use crate::account::{validate_amount, AccountError, AccountMutation};
use crate::model::Account;
use actor_pipeline::{MonitorClient, MonitorError, MonitorHandle};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for interacting with the account monitor.
#[derive(Clone)]
pub struct AccountClient {
    inner: MonitorClient<Account>,
}

impl AccountClient {
    pub fn new(inner: MonitorClient<Account>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl MonitorHandle<Account> for AccountClient {
    type Error = AccountError;

    fn inner(&self) -> &MonitorClient<Account> {
        &self.inner
    }

    fn map_error(e: MonitorError) -> Self::Error {
        AccountError::MonitorUnavailable(e.to_string())
    }
}

impl AccountClient {
    /// Queues a deposit. Returns once the monitor has accepted the request,
    /// not when it has been applied.
    #[instrument(skip(self))]
    pub async fn deposit(&self, amount: f64) -> Result<(), AccountError> {
        validate_amount(amount)?;
        debug!("Sending request");
        self.inner
            .apply(AccountMutation::Deposit(amount))
            .await
            .map_err(Self::map_error)
    }

    /// Queues a withdrawal. The balance may go negative.
    #[instrument(skip(self))]
    pub async fn withdraw(&self, amount: f64) -> Result<(), AccountError> {
        validate_amount(amount)?;
        debug!("Sending request");
        self.inner
            .apply(AccountMutation::Withdraw(amount))
            .await
            .map_err(Self::map_error)
    }

    /// The balance after every request queued before this one.
    #[instrument(skip(self))]
    pub async fn get_balance(&self) -> Result<f64, AccountError> {
        let snapshot = self.snapshot().await?;
        Ok(snapshot.balance)
    }
}
