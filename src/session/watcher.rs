//! Poll-based watcher for out-of-process token changes.
//!
//! Another client instance (or an operator poking at the credential
//! store) can rewrite or clear the token while we run. The watcher
//! compares the stored token against the last value it observed on a
//! fixed interval and emits `TokenChanged` on drift. No reconciliation
//! beyond the notification is attempted.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use zeroize::Zeroize;

use super::Session;

/// Default polling interval for the token slot.
pub const WATCH_INTERVAL: Duration = Duration::from_secs(5);

/// Watches the durable token slot for changes made outside this process.
///
/// Runs in a tokio task. Can be nudged into an immediate check via the
/// `check_now` channel.
pub struct TokenWatcher {
    session: Arc<Session>,
    poll_interval: Duration,
    check_now_rx: mpsc::Receiver<()>,
    /// Last token value this watcher observed. Wiped on replacement.
    last_seen: Option<String>,
}

impl TokenWatcher {
    pub fn new(session: Arc<Session>, check_now_rx: mpsc::Receiver<()>) -> Self {
        let last_seen = session.token().unwrap_or_default();
        Self {
            session,
            poll_interval: WATCH_INTERVAL,
            check_now_rx,
            last_seen,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Main run loop. Call from a spawned tokio task.
    pub async fn run(&mut self) {
        let mut ticker = tokio::time::interval(self.poll_interval);
        // The first tick fires immediately; nothing can have drifted yet.
        ticker.tick().await;

        log::debug!(
            "Token watcher started (interval: {}ms)",
            self.poll_interval.as_millis()
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.check();
                }
                Some(()) = self.check_now_rx.recv() => {
                    self.check();
                }
            }
        }
    }

    fn check(&mut self) {
        let current = match self.session.token() {
            Ok(token) => token,
            Err(e) => {
                // A storage read failure is not a token change.
                log::warn!("Token watcher could not read the store: {}", e);
                return;
            }
        };

        if current != self.last_seen {
            log::info!("Stored token changed outside this process");
            if let Some(ref mut old) = self.last_seen {
                old.zeroize();
            }
            self.last_seen = current;
            self.session.notify_token_changed();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::store::{MemoryStore, TokenStore};
    use crate::session::SessionEvent;

    async fn expect_quiet(events: &mut tokio::sync::broadcast::Receiver<SessionEvent>) {
        let res = tokio::time::timeout(Duration::from_millis(100), events.recv()).await;
        assert!(res.is_err(), "expected no session event, got {:?}", res);
    }

    #[tokio::test]
    async fn test_watcher_emits_on_external_change() {
        let store = MemoryStore::default();
        let session = Arc::new(Session::new(Box::new(store.clone())));
        let mut events = session.subscribe();

        let (check_tx, check_rx) = mpsc::channel(1);
        let mut watcher =
            TokenWatcher::new(session.clone(), check_rx).with_interval(Duration::from_secs(3600));
        tokio::spawn(async move { watcher.run().await });

        // Nothing changed yet: a manual check stays quiet.
        check_tx.send(()).await.unwrap();
        expect_quiet(&mut events).await;

        // Simulate another client instance writing the slot.
        store.set("fresh").unwrap();
        check_tx.send(()).await.unwrap();

        let event = tokio::time::timeout(Duration::from_secs(1), events.recv())
            .await
            .expect("watcher did not notice the drift")
            .unwrap();
        assert_eq!(event, SessionEvent::TokenChanged);
    }

    #[tokio::test]
    async fn test_watcher_emits_on_external_clear() {
        let store = MemoryStore::default();
        store.set("abc").unwrap();
        let session = Arc::new(Session::new(Box::new(store.clone())));
        let mut events = session.subscribe();

        let (check_tx, check_rx) = mpsc::channel(1);
        let mut watcher =
            TokenWatcher::new(session.clone(), check_rx).with_interval(Duration::from_secs(3600));
        tokio::spawn(async move { watcher.run().await });

        store.clear().unwrap();
        check_tx.send(()).await.unwrap();

        let event = tokio::time::timeout(Duration::from_secs(1), events.recv())
            .await
            .expect("watcher did not notice the cleared slot")
            .unwrap();
        assert_eq!(event, SessionEvent::TokenChanged);
    }

    #[tokio::test]
    async fn test_watcher_polls_without_manual_trigger() {
        let store = MemoryStore::default();
        let session = Arc::new(Session::new(Box::new(store.clone())));
        let mut events = session.subscribe();

        let (_check_tx, check_rx) = mpsc::channel::<()>(1);
        let mut watcher =
            TokenWatcher::new(session.clone(), check_rx).with_interval(Duration::from_millis(20));
        tokio::spawn(async move { watcher.run().await });

        store.set("fresh").unwrap();

        let event = tokio::time::timeout(Duration::from_secs(2), events.recv())
            .await
            .expect("polling tick did not fire")
            .unwrap();
        assert_eq!(event, SessionEvent::TokenChanged);
    }
}
