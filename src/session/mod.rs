//! Session state for the MediVault desktop client.
//!
//! The session is the only mutable state the client owns: one bearer
//! token in durable storage, plus a broadcast channel that tells any
//! listening presentation layer when that token changes or when the user
//! must return to the login screen. The channel is decoupled from the
//! storage mechanism; out-of-process token changes are reconciled by the
//! poll-based `watcher`.

pub mod store;
pub mod watcher;

use tokio::sync::broadcast;

use crate::error::PortalError;
use store::TokenStore;

/// Signals emitted to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The stored token was written or cleared.
    TokenChanged,
    /// The session ended; the user must log in again.
    ReturnToLogin,
}

/// Holds the token store and the event channel.
pub struct Session {
    store: Box<dyn TokenStore>,
    events: broadcast::Sender<SessionEvent>,
}

impl Session {
    pub fn new(store: Box<dyn TokenStore>) -> Self {
        let (events, _) = broadcast::channel(16);
        Self { store, events }
    }

    /// Subscribe to session signals.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Read the current token from durable storage.
    ///
    /// Read-through on every call: a token written by another process is
    /// picked up without restart.
    pub fn token(&self) -> Result<Option<String>, PortalError> {
        self.store.get()
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.store.get(), Ok(Some(_)))
    }

    /// Persist a freshly issued token and signal the change.
    pub fn store_token(&self, token: &str) -> Result<(), PortalError> {
        self.store.set(token)?;
        let _ = self.events.send(SessionEvent::TokenChanged);
        Ok(())
    }

    /// Clear the stored token and signal the change. Idempotent.
    pub fn clear_token(&self) -> Result<(), PortalError> {
        self.store.clear()?;
        let _ = self.events.send(SessionEvent::TokenChanged);
        Ok(())
    }

    /// User-initiated logout: clear the token, then send the caller back
    /// to the login entry point. Succeeds even with no token stored.
    pub fn logout(&self) -> Result<(), PortalError> {
        self.clear_token()?;
        let _ = self.events.send(SessionEvent::ReturnToLogin);
        log::info!("Logged out, token cleared");
        Ok(())
    }

    /// Forced logout on an authentication failure (HTTP 401).
    ///
    /// Exactly one token-clear, one TokenChanged, one ReturnToLogin per
    /// call, no matter which operation hit the 401. Storage failures are
    /// logged rather than propagated so the sequence always completes.
    pub(crate) fn force_logout(&self) {
        if let Err(e) = self.store.clear() {
            log::warn!("Failed to clear token during forced logout: {}", e);
        }
        let _ = self.events.send(SessionEvent::TokenChanged);
        let _ = self.events.send(SessionEvent::ReturnToLogin);
        log::info!("Session ended by the server (401), token cleared");
    }

    /// Signal a token change observed outside the normal write paths
    /// (used by the storage watcher).
    pub(crate) fn notify_token_changed(&self) {
        let _ = self.events.send(SessionEvent::TokenChanged);
    }
}

#[cfg(test)]
mod tests {
    use super::store::{MemoryStore, TokenStore};
    use super::*;

    fn session_with_store() -> (MemoryStore, Session, broadcast::Receiver<SessionEvent>) {
        let store = MemoryStore::default();
        let session = Session::new(Box::new(store.clone()));
        let events = session.subscribe();
        (store, session, events)
    }

    #[test]
    fn test_store_token_persists_and_signals_once() {
        let (store, session, mut events) = session_with_store();

        session.store_token("abc").unwrap();

        assert_eq!(store.get().unwrap().as_deref(), Some("abc"));
        assert_eq!(events.try_recv().unwrap(), SessionEvent::TokenChanged);
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_logout_without_token_is_idempotent() {
        let (store, session, mut events) = session_with_store();

        // No token was ever stored; logout must still succeed, twice.
        session.logout().unwrap();
        session.logout().unwrap();

        assert_eq!(store.get().unwrap(), None);
        for _ in 0..2 {
            assert_eq!(events.try_recv().unwrap(), SessionEvent::TokenChanged);
            assert_eq!(events.try_recv().unwrap(), SessionEvent::ReturnToLogin);
        }
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_force_logout_clears_and_signals_exactly_once() {
        let (store, session, mut events) = session_with_store();
        store.set("stale").unwrap();

        session.force_logout();

        assert_eq!(store.get().unwrap(), None);
        assert_eq!(events.try_recv().unwrap(), SessionEvent::TokenChanged);
        assert_eq!(events.try_recv().unwrap(), SessionEvent::ReturnToLogin);
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_is_authenticated_tracks_store() {
        let (store, session, _events) = session_with_store();
        assert!(!session.is_authenticated());

        store.set("abc").unwrap();
        assert!(session.is_authenticated());

        store.clear().unwrap();
        assert!(!session.is_authenticated());
    }
}
