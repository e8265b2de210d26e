//! Per-row exclusive locks with bounded acquisition.
//!
//! Deadlock avoidance: a transfer takes exactly one user lock, always before
//! any balance lock, and balance locks are acquired in sorted key order. A
//! holder of a balance lock therefore never waits on a user lock, and waits
//! among balance locks are acyclic. Bounded waits turn any residual stall
//! into a contention error.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crossledger_common::{CurrencyId, LedgerError, Result, UserId};
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tokio::time::timeout;
use tracing::warn;

/// Key of a lockable row.
///
/// The derived ordering puts user locks before balance locks, matching the
/// acquisition protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RowLock {
    /// A user row; guards preferred-currency reads and writes.
    User(UserId),
    /// A balance row.
    Balance(UserId, CurrencyId),
}

impl fmt::Display for RowLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowLock::User(user) => write!(f, "user:{user}"),
            RowLock::Balance(user, currency) => write!(f, "balance:{user}/{currency}"),
        }
    }
}

/// Guard for a held row lock. The row stays locked until the guard drops,
/// so every exit path of a transfer releases its locks.
pub struct RowGuard {
    key: RowLock,
    _guard: OwnedMutexGuard<()>,
}

impl RowGuard {
    /// The key this guard holds.
    pub fn key(&self) -> RowLock {
        self.key
    }
}

impl fmt::Debug for RowGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowGuard").field("key", &self.key).finish()
    }
}

/// Manager of per-row mutexes, created lazily per key.
pub struct RowLockManager {
    locks: DashMap<RowLock, Arc<Mutex<()>>>,
    wait: Duration,
}

impl RowLockManager {
    /// Create a manager with the given bounded wait per acquisition.
    pub fn new(wait: Duration) -> Self {
        Self {
            locks: DashMap::new(),
            wait,
        }
    }

    /// Acquire one row lock, waiting at most the configured bound.
    pub async fn acquire(&self, key: RowLock) -> Result<RowGuard> {
        let lock = self
            .locks
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        match timeout(self.wait, lock.lock_owned()).await {
            Ok(guard) => Ok(RowGuard {
                key,
                _guard: guard,
            }),
            Err(_) => {
                warn!(row = %key, wait_ms = self.wait.as_millis() as u64, "Row lock wait exceeded");
                Err(LedgerError::Contention {
                    resource: key.to_string(),
                })
            }
        }
    }

    /// Acquire a set of row locks in global sorted order, deduplicated.
    ///
    /// Sorting is what makes concurrent acquisition of overlapping sets
    /// cycle-free; deduplication handles the same-user same-currency case
    /// where debit and credit land on one row.
    pub async fn acquire_all(&self, mut keys: Vec<RowLock>) -> Result<Vec<RowGuard>> {
        keys.sort();
        keys.dedup();

        let mut guards = Vec::with_capacity(keys.len());
        for key in keys {
            guards.push(self.acquire(key).await?);
        }
        Ok(guards)
    }
}
