//! Mutations accepted by the account monitor.
//!
//! These are the only ways the balance can change. They are applied by
//! [`Resource::apply`](actor_pipeline::Resource::apply) in exactly the order the
//! monitor received them.

/// A change to an [`Account`](crate::model::Account).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AccountMutation {
    /// Adds the amount to the balance.
    Deposit(f64),
    /// Subtracts the amount from the balance.
    ///
    /// The balance may go negative; overdrafts are not refused.
    Withdraw(f64),
}

impl AccountMutation {
    pub fn amount(&self) -> f64 {
        match self {
            AccountMutation::Deposit(amount) | AccountMutation::Withdraw(amount) => *amount,
        }
    }
}
