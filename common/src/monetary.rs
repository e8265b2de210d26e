//! Monetary types and settlement rounding.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

use crate::CurrencyId;

/// Decimal places kept on settled amounts.
pub const SETTLEMENT_SCALE: u32 = 2;

/// Round a converted amount to the settlement scale.
///
/// Uses round-half-away-from-zero, applied in this one place so every
/// recorded transfer satisfies `amount_to == round_settlement(amount_from * rate)`.
pub fn round_settlement(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(SETTLEMENT_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// A monetary amount tagged with its currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// The amount value (high precision decimal).
    pub value: Decimal,
    /// Currency the amount is denominated in.
    pub currency: CurrencyId,
}

impl Money {
    /// Create a new Money instance.
    pub fn new(value: Decimal, currency: CurrencyId) -> Self {
        Self { value, currency }
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: CurrencyId) -> Self {
        Self {
            value: Decimal::ZERO,
            currency,
        }
    }

    /// Check if the amount is positive.
    pub fn is_positive(&self) -> bool {
        self.value > Decimal::ZERO
    }

    /// Check if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// Round to the settlement scale.
    pub fn rounded(&self) -> Self {
        Self {
            value: round_settlement(self.value),
            currency: self.currency,
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.currency)
    }
}

/// Error when attempting arithmetic on different currencies.
#[derive(Debug, Clone)]
pub struct CurrencyMismatchError {
    pub expected: CurrencyId,
    pub actual: CurrencyId,
}

impl fmt::Display for CurrencyMismatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Currency mismatch: expected {}, got {}",
            self.expected, self.actual
        )
    }
}

impl std::error::Error for CurrencyMismatchError {}

impl Add for Money {
    type Output = Result<Money, CurrencyMismatchError>;

    fn add(self, other: Money) -> Self::Output {
        if self.currency != other.currency {
            return Err(CurrencyMismatchError {
                expected: self.currency,
                actual: other.currency,
            });
        }
        Ok(Money {
            value: self.value + other.value,
            currency: self.currency,
        })
    }
}

impl Sub for Money {
    type Output = Result<Money, CurrencyMismatchError>;

    fn sub(self, other: Money) -> Self::Output {
        if self.currency != other.currency {
            return Err(CurrencyMismatchError {
                expected: self.currency,
                actual: other.currency,
            });
        }
        Ok(Money {
            value: self.value - other.value,
            currency: self.currency,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_arithmetic() {
        let usd = CurrencyId::new();
        let m1 = Money::new(dec!(100.00), usd);
        let m2 = Money::new(dec!(50.00), usd);

        let sum = (m1 + m2).unwrap();
        assert_eq!(sum.value, dec!(150.00));

        let diff = (m1 - m2).unwrap();
        assert_eq!(diff.value, dec!(50.00));
    }

    #[test]
    fn test_currency_mismatch() {
        let m1 = Money::new(dec!(100.00), CurrencyId::new());
        let m2 = Money::new(dec!(100.00), CurrencyId::new());

        assert!((m1 + m2).is_err());
    }

    #[test]
    fn test_round_settlement_half_away_from_zero() {
        assert_eq!(round_settlement(dec!(15.789473)), dec!(15.79));
        assert_eq!(round_settlement(dec!(1.005)), dec!(1.01));
        assert_eq!(round_settlement(dec!(-1.005)), dec!(-1.01));
        assert_eq!(round_settlement(dec!(2.004)), dec!(2.00));
    }

    #[test]
    fn test_round_settlement_is_idempotent() {
        let once = round_settlement(dec!(3.14159));
        assert_eq!(round_settlement(once), once);
    }
}
