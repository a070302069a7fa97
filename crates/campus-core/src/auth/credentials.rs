//! Remembered login passwords for `campus login --remember`.

use anyhow::Result;
use tracing::debug;

use super::storage::{KeyringStorage, SessionStorage};

/// Keychain service that holds remembered passwords, separate from the
/// session record.
const LOGIN_SERVICE: &str = "campus-login";

/// Login passwords keyed by account email.
///
/// Emails are matched case-insensitively, the same way the records API
/// treats them at sign-in.
pub struct CredentialStore {
    storage: Box<dyn SessionStorage>,
}

impl CredentialStore {
    /// Passwords in the OS keychain.
    pub fn new() -> Self {
        Self::with_storage(KeyringStorage::with_service(LOGIN_SERVICE))
    }

    pub fn with_storage(storage: impl SessionStorage + 'static) -> Self {
        Self {
            storage: Box::new(storage),
        }
    }

    pub fn remember(&self, email: &str, password: &str) -> Result<()> {
        self.storage.set(&account_key(email), password)
    }

    /// The remembered password for `email`, if any. Read errors count as
    /// nothing remembered.
    pub fn password(&self, email: &str) -> Option<String> {
        self.storage
            .get(&account_key(email))
            .unwrap_or_else(|e| {
                debug!(error = %e, "Remembered password unavailable");
                None
            })
            .filter(|p| !p.is_empty())
    }

    pub fn forget(&self, email: &str) -> Result<()> {
        self.storage.remove(&account_key(email))
    }
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

fn account_key(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::storage::MemoryStorage;

    #[test]
    fn test_remember_then_forget() {
        let storage = MemoryStorage::new();
        let store = CredentialStore::with_storage(storage.clone());

        assert_eq!(store.password("ada@example.edu"), None);
        store.remember("ada@example.edu", "hunter2").unwrap();
        assert_eq!(store.password("ada@example.edu").as_deref(), Some("hunter2"));

        store.forget("ada@example.edu").unwrap();
        assert_eq!(store.password("ada@example.edu"), None);
        assert!(storage.is_empty());
    }

    #[test]
    fn test_email_is_case_insensitive() {
        let store = CredentialStore::with_storage(MemoryStorage::new());
        store.remember(" Ada@Example.edu", "pw").unwrap();
        assert_eq!(store.password("ada@example.edu").as_deref(), Some("pw"));
        store.forget("ADA@EXAMPLE.EDU").unwrap();
        assert_eq!(store.password("ada@example.edu"), None);
    }

    #[test]
    fn test_forget_unknown_account_is_ok() {
        let store = CredentialStore::with_storage(MemoryStorage::new());
        store.forget("nobody@example.edu").unwrap();
    }
}
