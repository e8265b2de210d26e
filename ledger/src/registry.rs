//! Currency registry: canonical currency identities and symbols.

use crossledger_common::{CurrencyId, LedgerError, Result};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::info;

/// A registered currency. Immutable once created; referenced by id elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Currency {
    /// Opaque identity.
    pub id: CurrencyId,
    /// Display name, e.g. "US Dollar".
    pub name: String,
    /// Unique symbol, e.g. "USD". Stored uppercased.
    pub symbol: String,
}

/// Registry of currencies with a unique symbol index.
pub struct CurrencyRegistry {
    currencies: DashMap<CurrencyId, Currency>,
    by_symbol: DashMap<String, CurrencyId>,
}

impl CurrencyRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            currencies: DashMap::new(),
            by_symbol: DashMap::new(),
        }
    }

    /// Register a currency. Fails if the symbol is already taken.
    pub fn register(&self, name: impl Into<String>, symbol: impl Into<String>) -> Result<CurrencyId> {
        let symbol = symbol.into().to_uppercase();
        let id = CurrencyId::new();

        // The symbol index is the uniqueness gate; claim it atomically
        // before publishing the currency itself.
        match self.by_symbol.entry(symbol.clone()) {
            Entry::Occupied(_) => return Err(LedgerError::DuplicateCurrency(symbol)),
            Entry::Vacant(slot) => {
                slot.insert(id);
            }
        }

        let currency = Currency {
            id,
            name: name.into(),
            symbol: symbol.clone(),
        };
        self.currencies.insert(id, currency);

        info!(currency_id = %id, symbol = %symbol, "Currency registered");
        Ok(id)
    }

    /// Look up a currency by id.
    pub fn get(&self, id: CurrencyId) -> Option<Currency> {
        self.currencies.get(&id).map(|c| c.clone())
    }

    /// Look up a currency id by symbol.
    pub fn by_symbol(&self, symbol: &str) -> Option<CurrencyId> {
        self.by_symbol.get(&symbol.to_uppercase()).map(|id| *id)
    }

    /// Check whether a currency id is registered.
    pub fn contains(&self, id: CurrencyId) -> bool {
        self.currencies.contains_key(&id)
    }

    /// Number of registered currencies.
    pub fn len(&self) -> usize {
        self.currencies.len()
    }

    /// Check whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.currencies.is_empty()
    }
}

impl Default for CurrencyRegistry {
    fn default() -> Self {
        Self::new()
    }
}
