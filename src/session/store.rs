//! Single-slot durable token storage.
//!
//! The portal issues one opaque bearer token; it lives under a single
//! named slot in the OS credential store, mirroring the web client's one
//! localStorage key. The `TokenStore` trait keeps the storage mechanism
//! swappable (tests use an in-memory slot).

use keyring::Entry;

use crate::error::PortalError;

/// Credential-store service name for the desktop client.
const SERVICE_NAME: &str = "com.medivault.desktop";

/// The one slot the portal token lives under.
const TOKEN_SLOT: &str = "auth-token";

/// A single-slot key-value store for the auth token.
///
/// `clear` is idempotent: clearing an empty slot succeeds.
pub trait TokenStore: Send + Sync {
    fn get(&self) -> Result<Option<String>, PortalError>;
    fn set(&self, token: &str) -> Result<(), PortalError>;
    fn clear(&self) -> Result<(), PortalError>;
}

/// Token storage backed by the OS credential store.
#[derive(Default)]
pub struct KeyringStore;

impl KeyringStore {
    pub fn new() -> Self {
        Self
    }

    fn entry(&self) -> Result<Entry, PortalError> {
        Entry::new(SERVICE_NAME, TOKEN_SLOT).map_err(|e| PortalError::Storage(e.to_string()))
    }
}

impl TokenStore for KeyringStore {
    /// Returns `None` if no token is stored (never logged in or logged out).
    fn get(&self) -> Result<Option<String>, PortalError> {
        match self.entry()?.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(PortalError::Storage(e.to_string())),
        }
    }

    fn set(&self, token: &str) -> Result<(), PortalError> {
        self.entry()?
            .set_password(token)
            .map_err(|e| PortalError::Storage(e.to_string()))
    }

    fn clear(&self) -> Result<(), PortalError> {
        match self.entry()?.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()), // already cleared
            Err(e) => Err(PortalError::Storage(e.to_string())),
        }
    }
}

/// In-memory slot for tests. Cloning shares the slot, so a test can
/// mutate the stored token behind a session's back.
#[cfg(test)]
#[derive(Clone, Default)]
pub struct MemoryStore(std::sync::Arc<std::sync::Mutex<Option<String>>>);

#[cfg(test)]
impl TokenStore for MemoryStore {
    fn get(&self) -> Result<Option<String>, PortalError> {
        Ok(self.0.lock().unwrap().clone())
    }

    fn set(&self, token: &str) -> Result<(), PortalError> {
        *self.0.lock().unwrap() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), PortalError> {
        *self.0.lock().unwrap() = None;
        Ok(())
    }
}
