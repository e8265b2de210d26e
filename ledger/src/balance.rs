//! Per-(user, currency) balance ledger rows.

use crossledger_common::{now, CurrencyId, LedgerError, Result, Timestamp, UserId};
use dashmap::DashMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Key of a ledger row. One row per (user, currency) pair.
pub type RowKey = (UserId, CurrencyId);

/// A single balance row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceRow {
    /// Owning user.
    pub user: UserId,
    /// Currency of this row.
    pub currency: CurrencyId,
    /// Current amount. Never negative.
    pub amount: Decimal,
    /// When this row was last mutated.
    pub updated_at: Timestamp,
}

impl BalanceRow {
    /// Create a zero row.
    pub fn zero(user: UserId, currency: CurrencyId) -> Self {
        Self {
            user,
            currency,
            amount: Decimal::ZERO,
            updated_at: now(),
        }
    }
}

/// Store of balance rows.
///
/// The map itself is only internally consistent; the cross-row guarantees
/// (no double spend, validate-then-adjust without an intervening release)
/// come from the engine's row locks. Every `read`/`adjust` on the transfer
/// path happens while the corresponding row lock is held.
pub struct BalanceStore {
    rows: DashMap<RowKey, BalanceRow>,
}

impl BalanceStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            rows: DashMap::new(),
        }
    }

    /// Read a row's amount. Absent is a distinct outcome from zero: a sender
    /// with no row in a currency has no funds in that currency.
    pub fn read(&self, user: UserId, currency: CurrencyId) -> Option<Decimal> {
        self.rows.get(&(user, currency)).map(|row| row.amount)
    }

    /// Get a full row snapshot.
    pub fn row(&self, user: UserId, currency: CurrencyId) -> Option<BalanceRow> {
        self.rows.get(&(user, currency)).map(|row| row.clone())
    }

    /// Create a zero row if absent; no-op otherwise.
    ///
    /// Atomic insert-or-ignore through the entry API, so an existing amount
    /// is never clobbered.
    pub fn ensure_row(&self, user: UserId, currency: CurrencyId) {
        self.rows
            .entry((user, currency))
            .or_insert_with(|| BalanceRow::zero(user, currency));
    }

    /// Apply a signed delta to an existing row, returning the new amount.
    ///
    /// The row must exist and the result must be non-negative; both are
    /// validated by the engine under the row lock before this is called, so
    /// a violation here means the unit of work is broken.
    pub fn adjust(&self, user: UserId, currency: CurrencyId, delta: Decimal) -> Result<Decimal> {
        let mut row = self.rows.get_mut(&(user, currency)).ok_or_else(|| {
            LedgerError::Storage(format!("adjust on absent row {user}/{currency}"))
        })?;

        let updated = row.amount + delta;
        if updated < Decimal::ZERO {
            return Err(LedgerError::Storage(format!(
                "adjust would drive row {user}/{currency} negative: {} + ({delta})",
                row.amount
            )));
        }

        row.amount = updated;
        row.updated_at = now();
        debug!(user = %user, currency = %currency, delta = %delta, balance = %updated, "Row adjusted");
        Ok(updated)
    }

    /// Administrative seeding credit: insert-or-add.
    pub fn deposit(&self, user: UserId, currency: CurrencyId, amount: Decimal) -> Result<Decimal> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount(amount));
        }

        let mut row = self
            .rows
            .entry((user, currency))
            .or_insert_with(|| BalanceRow::zero(user, currency));
        row.amount += amount;
        row.updated_at = now();
        Ok(row.amount)
    }

    /// Number of rows in the store.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Default for BalanceStore {
    fn default() -> Self {
        Self::new()
    }
}
