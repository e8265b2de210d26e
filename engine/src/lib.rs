//! Crossledger Transfer Engine
//!
//! Executes cross-currency wallet transfers as single atomic units: resolve
//! the rate for (source currency, receiver's preferred currency), validate
//! the sender's balance, debit, credit, and append an immutable transaction
//! record, all under exclusive per-row locks.
//!
//! # Example
//!
//! ```rust,ignore
//! use crossledger_engine::{EngineConfig, TransferEngine};
//!
//! let engine = TransferEngine::new(EngineConfig::default(), registry, directory, rates, balances, log);
//!
//! let outcome = engine.transfer(alice, bob, clp, dec!(15000)).await?;
//! println!("settled {} in {}", outcome.settled_amount, outcome.settlement_currency);
//! ```

pub mod config;
pub mod locks;
pub mod transfer;

pub use config::EngineConfig;
pub use locks::{RowGuard, RowLock, RowLockManager};
pub use transfer::{TransferEngine, TransferOutcome};
