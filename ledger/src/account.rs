//! Account definitions for the ledger.

use chrono::{DateTime, Utc};
use corebank_common::AccountId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A ledger account.
///
/// Values handed out by the store are snapshots: mutating one does not
/// affect stored state. Balances change only through
/// [`LedgerStore::transfer`](crate::store::LedgerStore::transfer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Unique account identifier.
    pub account_id: AccountId,
    /// Current balance. Non-negative at all observable times.
    pub balance: Decimal,
    /// When the account was created.
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account with a zero balance.
    pub fn new(account_id: impl Into<AccountId>) -> Self {
        Self::with_balance(account_id, Decimal::ZERO)
    }

    /// Create a new account with an opening balance.
    ///
    /// The balance is trusted to be non-negative; callers validate before
    /// constructing.
    pub fn with_balance(account_id: impl Into<AccountId>, balance: Decimal) -> Self {
        Self {
            account_id: account_id.into(),
            balance,
            created_at: Utc::now(),
        }
    }

    /// Check if the account can cover a withdrawal of `amount`.
    pub fn has_sufficient_funds(&self, amount: Decimal) -> bool {
        self.balance >= amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_account_has_zero_balance() {
        let account = Account::new("Id-123");
        assert_eq!(account.account_id, AccountId::new("Id-123"));
        assert_eq!(account.balance, Decimal::ZERO);
    }

    #[test]
    fn test_sufficient_funds_boundary() {
        let account = Account::with_balance("Id-123", Decimal::from(1000));
        assert!(account.has_sufficient_funds(Decimal::from(999)));
        assert!(account.has_sufficient_funds(Decimal::from(1000)));
        assert!(!account.has_sufficient_funds(Decimal::from(1001)));
    }

    #[test]
    fn test_wire_shape_is_camel_case() {
        let account = Account::with_balance("Id-123", Decimal::from(1000));
        let value = serde_json::to_value(&account).unwrap();
        assert_eq!(value["accountId"], "Id-123");
        assert_eq!(value["balance"], "1000");
    }

    #[test]
    fn test_deserializes_without_created_at() {
        let account: Account =
            serde_json::from_str(r#"{"accountId":"Id-123","balance":"250.50"}"#).unwrap();
        assert_eq!(account.account_id, AccountId::new("Id-123"));
        assert_eq!(
            account.balance,
            Decimal::from_str_exact("250.50").unwrap()
        );
    }
}
