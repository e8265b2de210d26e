//! Crossledger Common Types
//!
//! This crate contains shared types used across the crossledger wallet ledger,
//! including identifiers, monetary types, and the error taxonomy.

pub mod error;
pub mod identifiers;
pub mod monetary;
pub mod time;

pub use error::*;
pub use identifiers::*;
pub use monetary::*;
pub use time::*;
