//! User directory: identities, contacts, and preferred currencies.

use crossledger_common::{now, CurrencyId, LedgerError, Result, Timestamp, UserId};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::info;

/// A wallet user.
///
/// `preferred_currency` defines the settlement currency for every transfer
/// this user receives. It can change over the user's lifetime; the transfer
/// engine reads it under the user's row lock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Opaque identity.
    pub id: UserId,
    /// Display name.
    pub display_name: String,
    /// Unique contact identifier (email, phone, handle).
    pub contact: String,
    /// Credential material, opaque to the ledger core.
    pub credential: Vec<u8>,
    /// Settlement currency for transfers this user receives.
    pub preferred_currency: CurrencyId,
    /// When the user was created.
    pub created_at: Timestamp,
}

/// Directory of users with a unique contact index.
pub struct UserDirectory {
    users: DashMap<UserId, User>,
    by_contact: DashMap<String, UserId>,
}

impl UserDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            by_contact: DashMap::new(),
        }
    }

    /// Create a user with an initial preferred currency.
    pub fn create(
        &self,
        display_name: impl Into<String>,
        contact: impl Into<String>,
        credential: Vec<u8>,
        preferred_currency: CurrencyId,
    ) -> Result<UserId> {
        let contact = contact.into();
        let id = UserId::new();

        match self.by_contact.entry(contact.clone()) {
            Entry::Occupied(_) => return Err(LedgerError::DuplicateContact(contact)),
            Entry::Vacant(slot) => {
                slot.insert(id);
            }
        }

        let user = User {
            id,
            display_name: display_name.into(),
            contact,
            credential,
            preferred_currency,
            created_at: now(),
        };
        self.users.insert(id, user);

        info!(user_id = %id, preferred = %preferred_currency, "User created");
        Ok(id)
    }

    /// Look up a user by id.
    pub fn get(&self, id: UserId) -> Option<User> {
        self.users.get(&id).map(|u| u.clone())
    }

    /// Look up a user id by contact identifier.
    pub fn by_contact(&self, contact: &str) -> Option<UserId> {
        self.by_contact.get(contact).map(|id| *id)
    }

    /// Read a user's preferred currency.
    pub fn preferred_currency(&self, id: UserId) -> Option<CurrencyId> {
        self.users.get(&id).map(|u| u.preferred_currency)
    }

    /// Change a user's preferred currency.
    ///
    /// Raw setter: callers that may race with in-flight transfers must go
    /// through `TransferEngine::set_preferred_currency`, which holds the
    /// user's row lock across this write.
    pub fn set_preferred_currency(&self, id: UserId, currency: CurrencyId) -> Result<()> {
        match self.users.get_mut(&id) {
            Some(mut user) => {
                user.preferred_currency = currency;
                Ok(())
            }
            None => Err(LedgerError::UnknownUser(id)),
        }
    }

    /// Check whether a user id exists.
    pub fn contains(&self, id: UserId) -> bool {
        self.users.contains_key(&id)
    }

    /// Number of users.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Check whether the directory is empty.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl Default for UserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_lookup() {
        let directory = UserDirectory::new();
        let clp = CurrencyId::new();
        let id = directory
            .create("Ada", "ada@example.com", b"secret".to_vec(), clp)
            .unwrap();

        assert_eq!(directory.preferred_currency(id), Some(clp));
        assert_eq!(directory.by_contact("ada@example.com"), Some(id));
    }

    #[test]
    fn test_duplicate_contact_rejected() {
        let directory = UserDirectory::new();
        let clp = CurrencyId::new();
        directory
            .create("Ada", "ada@example.com", Vec::new(), clp)
            .unwrap();

        let err = directory
            .create("Impostor", "ada@example.com", Vec::new(), clp)
            .unwrap_err();
        assert_eq!(err.error_code(), "DUPLICATE_CONTACT");
        assert_eq!(directory.len(), 1);
    }

    #[test]
    fn test_set_preferred_currency() {
        let directory = UserDirectory::new();
        let clp = CurrencyId::new();
        let usd = CurrencyId::new();
        let id = directory
            .create("Ada", "ada@example.com", Vec::new(), clp)
            .unwrap();

        directory.set_preferred_currency(id, usd).unwrap();
        assert_eq!(directory.preferred_currency(id), Some(usd));
    }

    #[test]
    fn test_set_preferred_currency_unknown_user() {
        let directory = UserDirectory::new();
        let err = directory
            .set_preferred_currency(UserId::new(), CurrencyId::new())
            .unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_USER");
    }
}
