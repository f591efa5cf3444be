//! Error types for the Account monitor.

use thiserror::Error;

/// Errors that can occur during account operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AccountError {
    /// The amount is negative, NaN or infinite.
    #[error("Invalid amount: {0}")]
    InvalidAmount(f64),

    /// The monitor is stopped or went away mid-request.
    #[error("Account monitor unavailable: {0}")]
    MonitorUnavailable(String),
}

/// Accepts finite, non-negative amounts.
pub fn validate_amount(amount: f64) -> Result<(), AccountError> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(())
    } else {
        Err(AccountError::InvalidAmount(amount))
    }
}
