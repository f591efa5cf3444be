//! Resource trait implementation for the Account domain type.
//!
//! This module contains the [`Resource`] implementation that lets an
//! [`Account`] be owned by the generic [`actor_pipeline::ResourceMonitor`].

use super::actions::AccountMutation;
use super::error::{validate_amount, AccountError};
use crate::model::{Account, AccountSnapshot};
use actor_pipeline::Resource;

impl Resource for Account {
    type Mutation = AccountMutation;
    type Snapshot = AccountSnapshot;
    type Error = AccountError;

    /// Applies a deposit or withdrawal.
    ///
    /// Amounts are already validated by [`AccountClient`](crate::clients::AccountClient);
    /// the check here covers callers that talk to the raw monitor client.
    fn apply(&mut self, mutation: AccountMutation) -> Result<(), AccountError> {
        validate_amount(mutation.amount())?;
        match mutation {
            AccountMutation::Deposit(amount) => {
                self.balance += amount;
                self.deposits += 1;
            }
            AccountMutation::Withdraw(amount) => {
                self.balance -= amount;
                self.withdrawals += 1;
            }
        }
        Ok(())
    }

    fn snapshot(&self) -> AccountSnapshot {
        AccountSnapshot {
            balance: self.balance,
            deposits: self.deposits,
            withdrawals: self.withdrawals,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overdraft_is_allowed() {
        let mut account = Account::new(5.0);
        account.apply(AccountMutation::Withdraw(7.5)).unwrap();
        assert_eq!(account.snapshot().balance, -2.5);
        assert_eq!(account.snapshot().withdrawals, 1);
    }

    #[test]
    fn test_invalid_amount_leaves_balance_untouched() {
        let mut account = Account::new(5.0);
        let result = account.apply(AccountMutation::Deposit(f64::NAN));
        assert!(matches!(result, Err(AccountError::InvalidAmount(_))));
        assert_eq!(account.snapshot().balance, 5.0);
        assert_eq!(account.snapshot().deposits, 0);
    }
}
