//! Audit journal of committed transfers.

use chrono::{DateTime, Utc};
use corebank_common::{AccountId, TransferId};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A committed transfer.
///
/// Recorded while both account locks are still held, so for any single
/// account the journal order matches its balance history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRecord {
    /// Transfer this record belongs to.
    pub transfer_id: TransferId,
    /// Source account.
    pub from: AccountId,
    /// Destination account.
    pub to: AccountId,
    /// Amount moved.
    pub amount: Decimal,
    /// Source balance after the debit.
    pub from_balance_after: Decimal,
    /// Destination balance after the credit.
    pub to_balance_after: Decimal,
    /// When the transfer committed.
    pub recorded_at: DateTime<Utc>,
}

impl TransferRecord {
    /// Create a new record.
    pub fn new(
        transfer_id: TransferId,
        from: AccountId,
        to: AccountId,
        amount: Decimal,
        from_balance_after: Decimal,
        to_balance_after: Decimal,
    ) -> Self {
        Self {
            transfer_id,
            from,
            to,
            amount,
            from_balance_after,
            to_balance_after,
            recorded_at: Utc::now(),
        }
    }
}

/// Append-only in-memory journal of committed transfers.
pub struct TransferJournal {
    records: Mutex<Vec<TransferRecord>>,
}

impl TransferJournal {
    /// Create an empty journal.
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }

    /// Append a record.
    pub fn record(&self, record: TransferRecord) {
        self.records.lock().push(record);
    }

    /// Snapshot of all records in commit order.
    pub fn snapshot(&self) -> Vec<TransferRecord> {
        self.records.lock().clone()
    }

    /// Records touching the given account, in commit order.
    pub fn entries_for_account(&self, id: &AccountId) -> Vec<TransferRecord> {
        self.records
            .lock()
            .iter()
            .filter(|record| &record.from == id || &record.to == id)
            .cloned()
            .collect()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Check if the journal is empty.
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Clear all records.
    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl Default for TransferJournal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_between(from: &str, to: &str) -> TransferRecord {
        TransferRecord::new(
            TransferId::new(),
            AccountId::new(from),
            AccountId::new(to),
            Decimal::from(100),
            Decimal::from(900),
            Decimal::from(1100),
        )
    }

    #[test]
    fn test_records_kept_in_commit_order() {
        let journal = TransferJournal::new();
        let first = record_between("Id-123", "Id-456");
        let second = record_between("Id-456", "Id-789");
        journal.record(first.clone());
        journal.record(second.clone());

        let snapshot = journal.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].transfer_id, first.transfer_id);
        assert_eq!(snapshot[1].transfer_id, second.transfer_id);
    }

    #[test]
    fn test_entries_for_account_filters() {
        let journal = TransferJournal::new();
        journal.record(record_between("Id-123", "Id-456"));
        journal.record(record_between("Id-456", "Id-789"));
        journal.record(record_between("Id-123", "Id-789"));

        assert_eq!(
            journal.entries_for_account(&AccountId::new("Id-123")).len(),
            2
        );
        assert_eq!(
            journal.entries_for_account(&AccountId::new("Id-456")).len(),
            2
        );
        assert_eq!(
            journal.entries_for_account(&AccountId::new("Id-000")).len(),
            0
        );
    }

    #[test]
    fn test_clear_empties_journal() {
        let journal = TransferJournal::new();
        journal.record(record_between("Id-123", "Id-456"));
        assert!(!journal.is_empty());

        journal.clear();
        assert!(journal.is_empty());
        assert_eq!(journal.len(), 0);
    }
}
