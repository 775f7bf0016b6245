//! Error types for ledger operations.

use crate::AccountId;
use thiserror::Error;

/// Main error type for ledger operations.
///
/// Every variant is an expected business outcome: it is returned to the
/// caller, never retried, and never accompanied by partial mutation of
/// ledger state. The message always names the offending account id when
/// one exists.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Account creation with an id that is already present.
    #[error("account already exists: {0}")]
    AlreadyExists(AccountId),

    /// Operation naming an account id with no entry in the ledger.
    #[error("unknown account: {0}")]
    UnknownAccount(AccountId),

    /// Transfer that would overdraw the source account.
    #[error("account {0} has insufficient balance")]
    InsufficientFunds(AccountId),

    /// Malformed request rejected before reaching the store.
    #[error("invalid request: {message}")]
    InvalidRequest {
        message: String,
        field: Option<String>,
    },
}

impl LedgerError {
    /// Get a stable error code for wire mapping.
    pub fn error_code(&self) -> &'static str {
        match self {
            LedgerError::AlreadyExists(_) => "ALREADY_EXISTS",
            LedgerError::UnknownAccount(_) => "UNKNOWN_ACCOUNT",
            LedgerError::InsufficientFunds(_) => "INSUFFICIENT_FUNDS",
            LedgerError::InvalidRequest { .. } => "INVALID_REQUEST",
        }
    }

    /// Get the account id named by this error, if any.
    pub fn account_id(&self) -> Option<&AccountId> {
        match self {
            LedgerError::AlreadyExists(id)
            | LedgerError::UnknownAccount(id)
            | LedgerError::InsufficientFunds(id) => Some(id),
            LedgerError::InvalidRequest { .. } => None,
        }
    }
}

/// Result type alias for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_account() {
        let id = AccountId::new("Id-123");

        let err = LedgerError::AlreadyExists(id.clone());
        assert_eq!(err.to_string(), "account already exists: Id-123");

        let err = LedgerError::InsufficientFunds(id.clone());
        assert_eq!(err.to_string(), "account Id-123 has insufficient balance");

        let err = LedgerError::UnknownAccount(id.clone());
        assert_eq!(err.to_string(), "unknown account: Id-123");
        assert_eq!(err.account_id(), Some(&id));
    }

    #[test]
    fn test_error_codes() {
        let id = AccountId::new("Id-123");
        assert_eq!(
            LedgerError::AlreadyExists(id.clone()).error_code(),
            "ALREADY_EXISTS"
        );
        assert_eq!(
            LedgerError::InsufficientFunds(id).error_code(),
            "INSUFFICIENT_FUNDS"
        );
        let err = LedgerError::InvalidRequest {
            message: "amount must be non-negative".to_string(),
            field: Some("amount".to_string()),
        };
        assert_eq!(err.error_code(), "INVALID_REQUEST");
        assert_eq!(err.account_id(), None);
    }
}
