//! Time utilities for the ledger.

use chrono::{DateTime, Utc};

/// A timestamp with timezone (always UTC for crossledger).
pub type Timestamp = DateTime<Utc>;

/// Get the current timestamp.
pub fn now() -> Timestamp {
    Utc::now()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_now_is_monotone_enough() {
        let a = now();
        let b = now();
        assert!(b - a >= Duration::zero());
    }
}
