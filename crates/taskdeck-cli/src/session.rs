//! Session token persistence in the OS keyring.

#[cfg(test)]
use std::collections::HashMap;
#[cfg(test)]
use std::sync::{Mutex, OnceLock};

#[cfg(not(test))]
use keyring::Entry;

use taskdeck_core::auth::{AuthError, AuthResult, Session, SessionStore};

#[cfg(not(test))]
const KEYRING_SERVICE_NAME: &str = "taskdeck-cli";
const KEYRING_SESSION_KEY: &str = "session";

/// Keyring-backed [`SessionStore`]. Under `cfg(test)` the keyring is
/// replaced by a process-local map so tests never touch the OS keychain.
#[derive(Clone, Default)]
pub struct CliSessionStore;

impl CliSessionStore {
    #[cfg(test)]
    fn test_store() -> &'static Mutex<HashMap<String, String>> {
        static STORE: OnceLock<Mutex<HashMap<String, String>>> = OnceLock::new();
        STORE.get_or_init(|| Mutex::new(HashMap::new()))
    }

    #[cfg(not(test))]
    fn entry() -> AuthResult<Entry> {
        Entry::new(KEYRING_SERVICE_NAME, KEYRING_SESSION_KEY)
            .map_err(|error| AuthError::SecureStorage(error.to_string()))
    }
}

impl SessionStore for CliSessionStore {
    #[cfg(not(test))]
    fn load(&self) -> AuthResult<Option<Session>> {
        let entry = Self::entry()?;
        match entry.get_password() {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(error) => Err(AuthError::SecureStorage(error.to_string())),
        }
    }

    #[cfg(test)]
    fn load(&self) -> AuthResult<Option<Session>> {
        let guard = Self::test_store()
            .lock()
            .map_err(|error| AuthError::SecureStorage(error.to_string()))?;
        if let Some(raw) = guard.get(KEYRING_SESSION_KEY) {
            Ok(Some(serde_json::from_str(raw)?))
        } else {
            Ok(None)
        }
    }

    #[cfg(not(test))]
    fn save(&self, session: &Session) -> AuthResult<()> {
        let raw = serde_json::to_string(session)?;
        Self::entry()?
            .set_password(&raw)
            .map_err(|error| AuthError::SecureStorage(error.to_string()))?;
        Ok(())
    }

    #[cfg(test)]
    fn save(&self, session: &Session) -> AuthResult<()> {
        let raw = serde_json::to_string(session)?;
        let mut guard = Self::test_store()
            .lock()
            .map_err(|error| AuthError::SecureStorage(error.to_string()))?;
        guard.insert(KEYRING_SESSION_KEY.to_string(), raw);
        Ok(())
    }

    #[cfg(not(test))]
    fn clear(&self) -> AuthResult<()> {
        let entry = Self::entry()?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(error) => Err(AuthError::SecureStorage(error.to_string())),
        }
    }

    #[cfg(test)]
    fn clear(&self) -> AuthResult<()> {
        let mut guard = Self::test_store()
            .lock()
            .map_err(|error| AuthError::SecureStorage(error.to_string()))?;
        guard.remove(KEYRING_SESSION_KEY);
        Ok(())
    }
}

pub fn load_stored_session() -> AuthResult<Option<Session>> {
    CliSessionStore.load()
}

pub fn clear_stored_session() -> AuthResult<()> {
    CliSessionStore.clear()
}
