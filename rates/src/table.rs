//! Directed rate table with per-pair update history.

use crossledger_common::{CurrencyId, Timestamp};
use dashmap::DashMap;
use rust_decimal::Decimal;
use tracing::debug;

use crate::record::{RatePair, RateRecord};

/// Stores directed exchange rates and resolves the most recent one per pair.
///
/// Inserts never overwrite: each upsert appends to the pair's history and
/// resolution selects the record with the latest timestamp. The table is
/// read-only from the transfer path; insertion is administrative.
pub struct RateTable {
    rates: DashMap<RatePair, Vec<RateRecord>>,
}

impl RateTable {
    /// Create an empty rate table.
    pub fn new() -> Self {
        Self {
            rates: DashMap::new(),
        }
    }

    /// Insert or supersede the rate for a directed pair.
    pub fn upsert(&self, from: CurrencyId, to: CurrencyId, rate: Decimal) {
        self.upsert_record(RateRecord::new(RatePair::new(from, to), rate));
    }

    /// Insert a rate with an explicit timestamp (administrative backfill).
    pub fn upsert_at(&self, from: CurrencyId, to: CurrencyId, rate: Decimal, at: Timestamp) {
        self.upsert_record(RateRecord::at(RatePair::new(from, to), rate, at));
    }

    /// Insert the identity row for a currency's pair with itself.
    pub fn seed_identity(&self, currency: CurrencyId) {
        self.upsert(currency, currency, Decimal::ONE);
    }

    fn upsert_record(&self, record: RateRecord) {
        debug!(pair = %record.pair, rate = %record.rate, "Rate inserted");
        self.rates.entry(record.pair).or_default().push(record);
    }

    /// Resolve the rate for a directed pair.
    ///
    /// Self-pairs resolve to 1.0 regardless of stored data. For everything
    /// else the exact directed pair must have a record; there is no inverse
    /// or chained fallback. Pure read, no side effects.
    pub fn resolve(&self, from: CurrencyId, to: CurrencyId) -> Option<Decimal> {
        if from == to {
            return Some(Decimal::ONE);
        }

        let pair = RatePair::new(from, to);
        let resolved = self.rates.get(&pair).and_then(|history| {
            // Latest timestamp wins; max_by_key keeps the last record on
            // ties, so a same-instant re-insert supersedes.
            history
                .iter()
                .max_by_key(|record| record.updated_at)
                .map(|record| record.rate)
        });

        match resolved {
            Some(rate) => {
                debug!(pair = %pair, rate = %rate, "Rate resolved");
                Some(rate)
            }
            None => {
                debug!(pair = %pair, "No rate record for pair");
                None
            }
        }
    }

    /// Get the full current record for a pair, if any.
    pub fn current(&self, from: CurrencyId, to: CurrencyId) -> Option<RateRecord> {
        self.rates
            .get(&RatePair::new(from, to))
            .and_then(|history| history.iter().max_by_key(|r| r.updated_at).cloned())
    }

    /// Number of records kept for a pair's history.
    pub fn history_len(&self, from: CurrencyId, to: CurrencyId) -> usize {
        self.rates
            .get(&RatePair::new(from, to))
            .map(|h| h.len())
            .unwrap_or(0)
    }
}

impl Default for RateTable {
    fn default() -> Self {
        Self::new()
    }
}
