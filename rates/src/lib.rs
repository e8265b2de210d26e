//! Crossledger Rate Table
//!
//! Directed exchange rates with per-pair update history. Resolution always
//! selects the most recent record for the exact ordered pair; self-pairs are
//! identity. No inverse or multi-hop completion is attempted.

pub mod record;
pub mod table;

pub use record::{RatePair, RateRecord};
pub use table::RateTable;
