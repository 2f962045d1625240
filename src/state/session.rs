//! Login-session state for the current user.
//!
//! SYSTEM CONTEXT
//! ==============
//! One `SessionStore` is built per running app and handed to every view,
//! guard, and the HTTP client (which reads the bearer token from it).
//! Clones share the same state.
//!
//! DESIGN
//! ======
//! The record lives in a `watch` channel of `Option<SessionInformation>`.
//! "Logged in" is derived from `is_some()`, so the flag and the record can
//! never disagree, and each `log_in`/`log_out` is one atomic swap.
//! Subscribers each own an unbounded queue. A new queue is primed with the
//! current flag, and every later change is pushed to all queues while the
//! subscriber list is locked, so a slow subscriber still sees each change
//! in order.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::{mpsc, watch};
use tracing::info;

use crate::net::types::{SessionInformation, UserId};

#[derive(Debug)]
struct StoreInner {
    tx: watch::Sender<Option<SessionInformation>>,
    subscribers: Mutex<Vec<mpsc::UnboundedSender<bool>>>,
}

/// Process-wide holder of "is someone logged in" and "who".
#[derive(Clone, Debug)]
pub struct SessionStore {
    inner: Arc<StoreInner>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { inner: Arc::new(StoreInner { tx, subscribers: Mutex::new(Vec::new()) }) }
    }

    fn subscribers(&self) -> MutexGuard<'_, Vec<mpsc::UnboundedSender<bool>>> {
        self.inner.subscribers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store `record` and publish `true`. Replaces any previous record.
    pub fn log_in(&self, record: SessionInformation) {
        info!(user_id = record.id, admin = record.admin, "logged in");
        let mut subscribers = self.subscribers();
        self.inner.tx.send_replace(Some(record));
        publish(&mut subscribers, true);
    }

    /// Clear the record and publish `false`. No-op when already logged out.
    pub fn log_out(&self) {
        let mut subscribers = self.subscribers();
        let cleared = self.inner.tx.send_if_modified(|current| current.take().is_some());
        if cleared {
            info!("logged out");
            publish(&mut subscribers, false);
        }
    }

    #[must_use]
    pub fn is_logged(&self) -> bool {
        self.inner.tx.borrow().is_some()
    }

    /// Snapshot of the current record.
    #[must_use]
    pub fn session_information(&self) -> Option<SessionInformation> {
        self.inner.tx.borrow().clone()
    }

    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        self.inner.tx.borrow().as_ref().map(|info| info.id)
    }

    /// `false` when logged out.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.inner.tx.borrow().as_ref().is_some_and(|info| info.admin)
    }

    /// `Authorization` header value for the current record, if any.
    #[must_use]
    pub fn authorization(&self) -> Option<String> {
        self.inner.tx.borrow().as_ref().map(SessionInformation::authorization)
    }

    /// Subscribe to the logged flag. The first [`LoggedState::next`] yields
    /// the current value immediately.
    #[must_use]
    pub fn observe_logged_state(&self) -> LoggedState {
        let mut subscribers = self.subscribers();
        let (tx, rx) = mpsc::unbounded_channel();
        let _ = tx.send(self.is_logged());
        subscribers.push(tx);
        LoggedState { current: self.inner.tx.subscribe(), changes: rx }
    }
}

/// Push `logged` to every live subscriber and forget the ones that hung up.
fn publish(subscribers: &mut Vec<mpsc::UnboundedSender<bool>>, logged: bool) {
    subscribers.retain(|tx| tx.send(logged).is_ok());
}

/// Push-based stream of the logged flag with replay-last semantics.
///
/// Runs until every clone of the owning [`SessionStore`] is dropped.
#[derive(Debug)]
pub struct LoggedState {
    current: watch::Receiver<Option<SessionInformation>>,
    changes: mpsc::UnboundedReceiver<bool>,
}

impl LoggedState {
    /// Latest value without waiting.
    #[must_use]
    pub fn current(&self) -> bool {
        self.current.borrow().is_some()
    }

    /// Next value: the current one on first call, then each change in the
    /// order it happened. Returns `None` once the store is gone and every
    /// queued change has been read.
    pub async fn next(&mut self) -> Option<bool> {
        self.changes.recv().await
    }
}
