//! Append-only log of completed transfers.

use crossledger_common::{
    now, round_settlement, CurrencyId, Money, Timestamp, TransactionId, UserId,
};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Immutable record of a completed transfer.
///
/// Every field is a captured fact: the rate and settled amount are stored
/// exactly as used inside the transfer, never recomputed, even if the rate
/// table or the receiver's preference changes later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRecord {
    /// Unique, time-ordered id.
    pub id: TransactionId,
    /// Debited user.
    pub sender: UserId,
    /// Credited user.
    pub receiver: UserId,
    /// Currency the sender was debited in.
    pub currency_from: CurrencyId,
    /// Settlement currency: the receiver's preferred currency at transfer time.
    pub currency_to: CurrencyId,
    /// Amount debited from the sender.
    pub amount_from: Decimal,
    /// Conversion rate actually applied.
    pub rate_used: Decimal,
    /// Amount credited to the receiver.
    pub amount_to: Decimal,
    /// When the transfer committed.
    pub created_at: Timestamp,
}

impl TransferRecord {
    /// Check the record against itself: the settled amount must equal the
    /// rounded product of source amount and recorded rate. Auditable without
    /// consulting the rate table.
    pub fn is_self_consistent(&self) -> bool {
        self.amount_to == round_settlement(self.amount_from * self.rate_used)
    }

    /// The debited side as a currency-tagged amount.
    pub fn source(&self) -> Money {
        Money::new(self.amount_from, self.currency_from)
    }

    /// The credited side as a currency-tagged amount.
    pub fn settled(&self) -> Money {
        Money::new(self.amount_to, self.currency_to)
    }
}

/// Append-only transaction log. No update or recompute operation exists.
pub struct TransactionLog {
    records: RwLock<Vec<TransferRecord>>,
}

impl TransactionLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    /// Append a completed transfer and return its id.
    #[allow(clippy::too_many_arguments)]
    pub fn record(
        &self,
        sender: UserId,
        receiver: UserId,
        currency_from: CurrencyId,
        currency_to: CurrencyId,
        amount_from: Decimal,
        rate_used: Decimal,
        amount_to: Decimal,
    ) -> TransactionId {
        let record = TransferRecord {
            id: TransactionId::new(),
            sender,
            receiver,
            currency_from,
            currency_to,
            amount_from,
            rate_used,
            amount_to,
            created_at: now(),
        };
        let id = record.id;

        info!(
            transaction_id = %id,
            sender = %sender,
            receiver = %receiver,
            amount_from = %amount_from,
            amount_to = %amount_to,
            "Transfer recorded"
        );

        self.records.write().push(record);
        id
    }

    /// Look up a record by id.
    pub fn get(&self, id: TransactionId) -> Option<TransferRecord> {
        self.records.read().iter().find(|r| r.id == id).cloned()
    }

    /// All records, in append order.
    pub fn all(&self) -> Vec<TransferRecord> {
        self.records.read().clone()
    }

    /// Records where the user is sender or receiver, in append order.
    pub fn for_user(&self, user: UserId) -> Vec<TransferRecord> {
        self.records
            .read()
            .iter()
            .filter(|r| r.sender == user || r.receiver == user)
            .cloned()
            .collect()
    }

    /// Number of transfers the user has sent.
    pub fn sent_count(&self, user: UserId) -> usize {
        self.records.read().iter().filter(|r| r.sender == user).count()
    }

    /// Total number of records.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Check whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl Default for TransactionLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_record_and_lookup() {
        let log = TransactionLog::new();
        let sender = UserId::new();
        let receiver = UserId::new();
        let clp = CurrencyId::new();
        let usd = CurrencyId::new();

        let id = log.record(
            sender,
            receiver,
            clp,
            usd,
            dec!(15000),
            dec!(0.0010526315789473684),
            dec!(15.79),
        );

        let record = log.get(id).unwrap();
        assert_eq!(record.sender, sender);
        assert_eq!(record.currency_to, usd);
        assert_eq!(record.amount_to, dec!(15.79));
        assert!(record.is_self_consistent());
        assert_eq!(record.source(), Money::new(dec!(15000), clp));
        assert_eq!(record.settled(), Money::new(dec!(15.79), usd));
    }

    #[test]
    fn test_for_user_and_counts() {
        let log = TransactionLog::new();
        let a = UserId::new();
        let b = UserId::new();
        let c = UserId::new();
        let usd = CurrencyId::new();

        log.record(a, b, usd, usd, dec!(10), Decimal::ONE, dec!(10));
        log.record(b, a, usd, usd, dec!(5), Decimal::ONE, dec!(5));
        log.record(b, c, usd, usd, dec!(1), Decimal::ONE, dec!(1));

        assert_eq!(log.for_user(a).len(), 2);
        assert_eq!(log.for_user(c).len(), 1);
        assert_eq!(log.sent_count(b), 2);
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn test_self_consistency_detects_drift() {
        let record = TransferRecord {
            id: TransactionId::new(),
            sender: UserId::new(),
            receiver: UserId::new(),
            currency_from: CurrencyId::new(),
            currency_to: CurrencyId::new(),
            amount_from: dec!(100),
            rate_used: dec!(0.92),
            amount_to: dec!(91.99),
            created_at: now(),
        };
        assert!(!record.is_self_consistent());
    }
}
