//! The ledger store: owner of the account map and the atomic transfer
//! primitive.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use tracing::{debug, info};

use corebank_common::{AccountId, LedgerError, Result, TransferId};

use crate::account::Account;
use crate::journal::{TransferJournal, TransferRecord};

/// Concurrent in-memory store for accounts.
///
/// The store exclusively owns the id → account mapping; accounts returned
/// by [`get`](Self::get) are value snapshots and all mutation flows through
/// [`create`](Self::create) and [`transfer`](Self::transfer).
///
/// Each account lives behind its own mutex. A transfer locks the two cells
/// it touches in ascending id order and holds both across its
/// check-and-mutate sequence, so transfers sharing an account serialize
/// against each other, disjoint pairs proceed fully in parallel, and two
/// transfers moving funds in opposite directions between the same pair
/// cannot deadlock.
pub struct LedgerStore {
    /// Account cells indexed by id.
    accounts: DashMap<AccountId, Arc<Mutex<Account>>>,
    /// Audit log of committed transfers.
    journal: TransferJournal,
}

impl LedgerStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
            journal: TransferJournal::new(),
        }
    }

    /// Insert a new account.
    ///
    /// The check-and-insert is a single atomic operation: of two concurrent
    /// creates with the same id, exactly one succeeds.
    pub fn create(&self, account: Account) -> Result<()> {
        match self.accounts.entry(account.account_id.clone()) {
            Entry::Occupied(_) => Err(LedgerError::AlreadyExists(account.account_id)),
            Entry::Vacant(entry) => {
                info!(
                    account_id = %account.account_id,
                    balance = %account.balance,
                    "Account created"
                );
                entry.insert(Arc::new(Mutex::new(account)));
                Ok(())
            }
        }
    }

    /// Get a snapshot of an account.
    ///
    /// Absence is a normal outcome, not a failure.
    pub fn get(&self, id: &AccountId) -> Option<Account> {
        let cell = self.lookup(id)?;
        let snapshot = cell.lock().clone();
        Some(snapshot)
    }

    /// Atomically empty the store and its journal.
    ///
    /// Reset hook for test isolation. Not safe to call concurrently with
    /// in-flight transfers: which side wins is undefined.
    pub fn clear(&self) {
        self.accounts.clear();
        self.journal.clear();
        info!("Ledger cleared");
    }

    /// Atomically move `amount` from `from` to `to`.
    ///
    /// Both accounts must exist and the source must cover the amount; any
    /// failure leaves both balances untouched. No other operation can
    /// observe a state where only one side has been updated, and no other
    /// check-then-mutate sequence on either account can interleave with
    /// this one.
    ///
    /// `amount` is trusted non-negative, pre-validated by the caller-facing
    /// layer.
    pub fn transfer(
        &self,
        transfer_id: TransferId,
        from: &AccountId,
        to: &AccountId,
        amount: Decimal,
    ) -> Result<()> {
        let from_cell = self
            .lookup(from)
            .ok_or_else(|| LedgerError::UnknownAccount(from.clone()))?;
        let to_cell = self
            .lookup(to)
            .ok_or_else(|| LedgerError::UnknownAccount(to.clone()))?;

        // A self-transfer takes the single lock once and nets to zero.
        if from == to {
            let account = from_cell.lock();
            if !account.has_sufficient_funds(amount) {
                return Err(LedgerError::InsufficientFunds(from.clone()));
            }
            self.journal.record(TransferRecord::new(
                transfer_id,
                from.clone(),
                to.clone(),
                amount,
                account.balance,
                account.balance,
            ));
            debug!(
                transfer_id = %transfer_id,
                account_id = %from,
                amount = %amount,
                "Self-transfer committed"
            );
            return Ok(());
        }

        // Lock both cells in ascending id order to avoid deadlock when two
        // transfers move funds in opposite directions between the same pair.
        let (mut from_account, mut to_account) = if from < to {
            let from_account = from_cell.lock();
            let to_account = to_cell.lock();
            (from_account, to_account)
        } else {
            let to_account = to_cell.lock();
            let from_account = from_cell.lock();
            (from_account, to_account)
        };

        if !from_account.has_sufficient_funds(amount) {
            return Err(LedgerError::InsufficientFunds(from.clone()));
        }

        from_account.balance -= amount;
        to_account.balance += amount;

        self.journal.record(TransferRecord::new(
            transfer_id,
            from.clone(),
            to.clone(),
            amount,
            from_account.balance,
            to_account.balance,
        ));

        debug!(
            transfer_id = %transfer_id,
            from = %from,
            to = %to,
            amount = %amount,
            "Transfer committed"
        );

        Ok(())
    }

    /// Number of accounts in the store.
    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    /// Sum of all balances.
    ///
    /// Transfers conserve this sum; it changes only through `create` and
    /// `clear`.
    pub fn total_balance(&self) -> Decimal {
        self.accounts
            .iter()
            .map(|entry| entry.value().lock().balance)
            .sum()
    }

    /// Snapshot of the transfer journal in commit order.
    pub fn journal(&self) -> Vec<TransferRecord> {
        self.journal.snapshot()
    }

    /// Journal records touching the given account, in commit order.
    pub fn journal_for_account(&self, id: &AccountId) -> Vec<TransferRecord> {
        self.journal.entries_for_account(id)
    }

    /// Number of committed transfers.
    pub fn journal_len(&self) -> usize {
        self.journal.len()
    }

    /// Resolve an account cell, cloning the `Arc` out so no map shard lock
    /// is held while the cell's mutex is taken.
    fn lookup(&self, id: &AccountId) -> Option<Arc<Mutex<Account>>> {
        self.accounts.get(id).map(|entry| Arc::clone(entry.value()))
    }
}

impl Default for LedgerStore {
    fn default() -> Self {
        Self::new()
    }
}
