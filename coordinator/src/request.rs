//! Wire-shaped request types and field validation.

use corebank_common::{AccountId, LedgerError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A request to move funds between two accounts.
///
/// Field validation lives here, at the caller-facing boundary: the store
/// trusts pre-validated, non-negative amounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    /// Source account id.
    pub account_from: String,
    /// Destination account id.
    pub account_to: String,
    /// Amount to move. Must be non-negative.
    pub amount: Decimal,
}

impl TransferRequest {
    /// Create a new transfer request.
    pub fn new(
        account_from: impl Into<String>,
        account_to: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self {
            account_from: account_from.into(),
            account_to: account_to.into(),
            amount,
        }
    }

    /// Validate field constraints.
    ///
    /// A transfer from an account to itself is not rejected here; the store
    /// handles it as a net-zero move.
    pub fn validate(&self) -> Result<()> {
        validate_account_id(&self.account_from, "accountFrom")?;
        validate_account_id(&self.account_to, "accountTo")?;
        if self.amount < Decimal::ZERO {
            return Err(LedgerError::InvalidRequest {
                message: "amount must be non-negative".to_string(),
                field: Some("amount".to_string()),
            });
        }
        Ok(())
    }

    /// Source id as a typed identifier.
    pub fn from_id(&self) -> AccountId {
        AccountId::new(self.account_from.as_str())
    }

    /// Destination id as a typed identifier.
    pub fn to_id(&self) -> AccountId {
        AccountId::new(self.account_to.as_str())
    }
}

fn validate_account_id(raw: &str, field: &str) -> Result<()> {
    if !AccountId::new(raw).is_valid() {
        return Err(LedgerError::InvalidRequest {
            message: format!("{field} is not a valid account id"),
            field: Some(field.to_string()),
        });
    }
    Ok(())
}
