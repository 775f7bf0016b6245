//! Core transfer coordinator implementation.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{info, instrument};

use corebank_common::{AccountId, Result, TransferId};
use corebank_ledger::{Account, LedgerStore};

use crate::request::TransferRequest;

/// Coordinates account operations against the ledger store.
///
/// Carries no business logic of its own: it validates caller-facing
/// requests, stamps transfer identifiers, and delegates to the store's
/// atomic primitives, decoupling outer layers from the store's
/// concurrency internals.
pub struct TransferCoordinator {
    /// The ledger store.
    store: Arc<LedgerStore>,
}

impl TransferCoordinator {
    /// Create a coordinator over the given store.
    pub fn new(store: Arc<LedgerStore>) -> Self {
        Self { store }
    }

    /// Access the underlying store.
    pub fn store(&self) -> &Arc<LedgerStore> {
        &self.store
    }

    /// Create a new account.
    pub fn create_account(&self, account: Account) -> Result<()> {
        self.store.create(account)
    }

    /// Get a snapshot of an account.
    pub fn get_account(&self, id: &AccountId) -> Option<Account> {
        self.store.get(id)
    }

    /// Validate and execute a wire-shaped transfer request.
    pub fn submit(&self, request: &TransferRequest) -> Result<TransferId> {
        request.validate()?;
        self.transfer(&request.from_id(), &request.to_id(), request.amount)
    }

    /// Move `amount` from `from` to `to` as one atomic operation.
    ///
    /// Surfaces the store's typed errors unchanged. None are retried:
    /// they are business-rule failures, not transient faults.
    #[instrument(skip(self))]
    pub fn transfer(
        &self,
        from: &AccountId,
        to: &AccountId,
        amount: Decimal,
    ) -> Result<TransferId> {
        let transfer_id = TransferId::new();
        info!(
            transfer_id = %transfer_id,
            from = %from,
            to = %to,
            amount = %amount,
            "Transferring balance"
        );
        self.store.transfer(transfer_id, from, to, amount)?;
        Ok(transfer_id)
    }

    /// Empty the ledger. Test/reset hook only.
    pub fn reset(&self) {
        self.store.clear();
    }
}
