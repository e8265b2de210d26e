//! The transfer engine: atomic cross-currency transfers.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crossledger_common::{
    round_settlement, CurrencyId, LedgerError, Money, Result, TransactionId, UserId,
};
use crossledger_ledger::{BalanceStore, CurrencyRegistry, TransactionLog, UserDirectory};
use crossledger_rates::RateTable;

use crate::config::EngineConfig;
use crate::locks::{RowLock, RowLockManager};

/// Result of a successful transfer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferOutcome {
    /// Id of the appended transaction record.
    pub transaction_id: TransactionId,
    /// Currency the receiver was credited in.
    pub settlement_currency: CurrencyId,
    /// Amount credited, already rounded to the settlement scale.
    pub settled_amount: Decimal,
}

impl TransferOutcome {
    /// The credited side as a currency-tagged amount.
    pub fn settled(&self) -> Money {
        Money::new(self.settled_amount, self.settlement_currency)
    }
}

/// Orchestrates rate resolution, balance mutation, and transaction recording
/// as one atomic unit.
///
/// The settlement currency is never caller-supplied: it is the receiver's
/// preferred currency, read under the receiver's row lock so a concurrent
/// preference change cannot slip in mid-transfer. Rate and settled amount
/// are computed once inside the unit and stored verbatim on the record.
pub struct TransferEngine {
    registry: Arc<CurrencyRegistry>,
    directory: Arc<UserDirectory>,
    rates: Arc<RateTable>,
    balances: Arc<BalanceStore>,
    log: Arc<TransactionLog>,
    row_locks: RowLockManager,
}

impl TransferEngine {
    /// Create a new engine over the given stores.
    pub fn new(
        config: EngineConfig,
        registry: Arc<CurrencyRegistry>,
        directory: Arc<UserDirectory>,
        rates: Arc<RateTable>,
        balances: Arc<BalanceStore>,
        log: Arc<TransactionLog>,
    ) -> Self {
        Self {
            registry,
            directory,
            rates,
            balances,
            log,
            row_locks: RowLockManager::new(config.lock_wait),
        }
    }

    /// Execute a transfer: debit `sender` in `source_currency`, credit
    /// `receiver` in the receiver's preferred currency at the current rate.
    ///
    /// All-or-nothing: any failure leaves every store unchanged. Sender and
    /// receiver may be the same user, in which case this is a same-user
    /// currency conversion.
    #[instrument(skip(self), fields(sender = %sender, receiver = %receiver))]
    pub async fn transfer(
        &self,
        sender: UserId,
        receiver: UserId,
        source_currency: CurrencyId,
        amount: Decimal,
    ) -> Result<TransferOutcome> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount(amount));
        }

        // Receiver's user lock first: the preference read, the rate it
        // selects, and the credit all stay consistent with each other.
        let _receiver_guard = self.row_locks.acquire(RowLock::User(receiver)).await?;

        let settlement_currency = self
            .directory
            .preferred_currency(receiver)
            .ok_or(LedgerError::ReceiverNotFound(receiver))?;

        // Hard stop when no rate resolves; never guess or default.
        let rate = self
            .rates
            .resolve(source_currency, settlement_currency)
            .ok_or(LedgerError::RateUnavailable {
                from: source_currency,
                to: settlement_currency,
            })?;

        let settled_amount = round_settlement(amount * rate);

        // Both balance rows are known now; lock them in sorted key order.
        let _balance_guards = self
            .row_locks
            .acquire_all(vec![
                RowLock::Balance(sender, source_currency),
                RowLock::Balance(receiver, settlement_currency),
            ])
            .await?;

        let available = self.balances.read(sender, source_currency).ok_or(
            LedgerError::NoFundsInCurrency {
                user: sender,
                currency: source_currency,
            },
        )?;
        if available < amount {
            return Err(LedgerError::InsufficientFunds {
                available,
                requested: amount,
            });
        }

        // Validation is done; apply with no await point until the record is
        // appended, so the unit commits or leaves nothing behind.
        self.balances.adjust(sender, source_currency, -amount)?;
        self.balances.ensure_row(receiver, settlement_currency);
        if let Err(e) = self
            .balances
            .adjust(receiver, settlement_currency, settled_amount)
        {
            // Undo the debit before surfacing; both rows are still locked,
            // so a partial debit is never observable.
            let _ = self.balances.adjust(sender, source_currency, amount);
            return Err(e);
        }

        let transaction_id = self.log.record(
            sender,
            receiver,
            source_currency,
            settlement_currency,
            amount,
            rate,
            settled_amount,
        );

        info!(
            transaction_id = %transaction_id,
            settlement_currency = %settlement_currency,
            rate = %rate,
            amount = %amount,
            settled_amount = %settled_amount,
            "Transfer committed"
        );

        Ok(TransferOutcome {
            transaction_id,
            settlement_currency,
            settled_amount,
        })
    }

    /// Change a user's preferred currency.
    ///
    /// Holds the user's row lock across the write, serializing the change
    /// with transfers that read the preference. Transfers already committed
    /// keep the settlement currency they recorded.
    #[instrument(skip(self), fields(user = %user))]
    pub async fn set_preferred_currency(
        &self,
        user: UserId,
        currency: CurrencyId,
    ) -> Result<()> {
        if !self.registry.contains(currency) {
            return Err(LedgerError::UnknownCurrency(currency));
        }

        let _guard = self.row_locks.acquire(RowLock::User(user)).await?;
        self.directory.set_preferred_currency(user, currency)?;

        info!(currency = %currency, "Preferred currency changed");
        Ok(())
    }
}
