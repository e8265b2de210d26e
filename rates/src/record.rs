//! Rate pair and rate record types.

use crossledger_common::{now, CurrencyId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A directed currency pair.
///
/// Direction matters: the rate for (A, B) is independent of the rate for
/// (B, A) unless both were inserted that way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RatePair {
    /// Currency being converted from.
    pub from: CurrencyId,
    /// Currency being converted to.
    pub to: CurrencyId,
}

impl RatePair {
    /// Create a new directed pair.
    pub fn new(from: CurrencyId, to: CurrencyId) -> Self {
        Self { from, to }
    }

    /// Check whether this is a currency's pair with itself.
    pub fn is_identity(&self) -> bool {
        self.from == self.to
    }
}

impl fmt::Display for RatePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.from, self.to)
    }
}

/// A single rate observation for a directed pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateRecord {
    /// The directed pair.
    pub pair: RatePair,
    /// Conversion factor applied to amounts in `pair.from`.
    pub rate: Decimal,
    /// When this record was inserted or last updated.
    pub updated_at: Timestamp,
}

impl RateRecord {
    /// Create a record stamped with the current time.
    pub fn new(pair: RatePair, rate: Decimal) -> Self {
        Self {
            pair,
            rate,
            updated_at: now(),
        }
    }

    /// Create a record with an explicit timestamp (administrative backfill).
    pub fn at(pair: RatePair, rate: Decimal, updated_at: Timestamp) -> Self {
        Self {
            pair,
            rate,
            updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_identity_pair() {
        let usd = CurrencyId::new();
        assert!(RatePair::new(usd, usd).is_identity());
        assert!(!RatePair::new(usd, CurrencyId::new()).is_identity());
    }

    #[test]
    fn test_direction_matters() {
        let a = CurrencyId::new();
        let b = CurrencyId::new();
        assert_ne!(RatePair::new(a, b), RatePair::new(b, a));
        let _ = RateRecord::new(RatePair::new(a, b), dec!(0.92));
    }
}
