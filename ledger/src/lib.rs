//! Crossledger State Stores
//!
//! In-process stores backing the transfer engine: the currency registry, the
//! user directory, per-(user, currency) balance rows, and the append-only
//! transaction log. Balances and transaction records are mutated only by the
//! engine; everything else here is administrative reference data.

pub mod balance;
pub mod registry;
pub mod txlog;
pub mod users;

pub use balance::{BalanceRow, BalanceStore, RowKey};
pub use registry::{Currency, CurrencyRegistry};
pub use txlog::{TransactionLog, TransferRecord};
pub use users::{User, UserDirectory};
