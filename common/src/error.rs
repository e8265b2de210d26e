//! Error types for crossledger operations.

use crate::{CurrencyId, UserId};
use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for ledger and transfer operations.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Transfer amount was zero or negative.
    #[error("Invalid amount: {0} (must be positive)")]
    InvalidAmount(Decimal),

    /// Receiver does not exist.
    #[error("Receiver not found: {0}")]
    ReceiverNotFound(UserId),

    /// No rate record exists for the directed currency pair.
    #[error("No exchange rate available for {from} -> {to}")]
    RateUnavailable { from: CurrencyId, to: CurrencyId },

    /// Sender holds no balance row at all in the source currency.
    #[error("User {user} holds no funds in currency {currency}")]
    NoFundsInCurrency { user: UserId, currency: CurrencyId },

    /// Sender's balance is below the requested amount.
    #[error("Insufficient funds: available {available}, requested {requested}")]
    InsufficientFunds {
        available: Decimal,
        requested: Decimal,
    },

    /// A required row lock could not be acquired within the bounded wait.
    #[error("Lock contention on {resource}")]
    Contention { resource: String },

    /// Currency symbol already registered.
    #[error("Currency already registered: {0}")]
    DuplicateCurrency(String),

    /// Contact identifier already in use by another user.
    #[error("Contact already registered: {0}")]
    DuplicateContact(String),

    /// Currency id does not resolve in the registry.
    #[error("Unknown currency: {0}")]
    UnknownCurrency(CurrencyId),

    /// User id does not resolve in the directory.
    #[error("Unknown user: {0}")]
    UnknownUser(UserId),

    /// Underlying store failure; the unit of work did not commit.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl LedgerError {
    /// Check if this error is retryable by the caller.
    pub fn is_retryable(&self) -> bool {
        matches!(self, LedgerError::Contention { .. })
    }

    /// Get a stable error code for logging and API surfaces.
    pub fn error_code(&self) -> &'static str {
        match self {
            LedgerError::InvalidAmount(_) => "INVALID_AMOUNT",
            LedgerError::ReceiverNotFound(_) => "RECEIVER_NOT_FOUND",
            LedgerError::RateUnavailable { .. } => "RATE_UNAVAILABLE",
            LedgerError::NoFundsInCurrency { .. } => "NO_FUNDS_IN_CURRENCY",
            LedgerError::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            LedgerError::Contention { .. } => "CONTENTION",
            LedgerError::DuplicateCurrency(_) => "DUPLICATE_CURRENCY",
            LedgerError::DuplicateContact(_) => "DUPLICATE_CONTACT",
            LedgerError::UnknownCurrency(_) => "UNKNOWN_CURRENCY",
            LedgerError::UnknownUser(_) => "UNKNOWN_USER",
            LedgerError::Storage(_) => "STORAGE_ERROR",
        }
    }
}

/// Result type alias for crossledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
