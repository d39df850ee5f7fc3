//! Current-user session state.
//!
//! Holds the snapshot of the authenticated user and a multicast stream
//! of snapshot changes. The snapshot is replaced wholesale by a
//! successful `/auth/me` fetch and set to absent on logout or terminal
//! auth failure; nothing else touches it. Subscribers get the latest
//! value immediately on subscription.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::cell::RefCell;
use std::rc::Rc;

use futures::channel::mpsc::{UnboundedReceiver, UnboundedSender, unbounded};

use crate::net::types::CurrentUser;

struct SessionInner {
    user: Option<CurrentUser>,
    subscribers: Vec<UnboundedSender<Option<CurrentUser>>>,
}

/// Cheaply cloneable handle to the shared session snapshot.
#[derive(Clone)]
pub struct Session {
    inner: Rc<RefCell<SessionInner>>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(SessionInner {
                user: None,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Latest snapshot, if any.
    pub fn user(&self) -> Option<CurrentUser> {
        self.inner.borrow().user.clone()
    }

    /// Replace the snapshot and notify subscribers.
    pub fn set_user(&self, user: CurrentUser) {
        self.emit(Some(user));
    }

    /// Drop the snapshot and notify subscribers with absent.
    pub fn clear_user(&self) {
        self.emit(None);
    }

    /// Subscribe to snapshot changes. The current value is replayed
    /// immediately.
    pub fn subscribe(&self) -> UnboundedReceiver<Option<CurrentUser>> {
        let (tx, rx) = unbounded();
        let mut inner = self.inner.borrow_mut();
        let _ = tx.unbounded_send(inner.user.clone());
        inner.subscribers.push(tx);
        rx
    }

    fn emit(&self, user: Option<CurrentUser>) {
        let mut inner = self.inner.borrow_mut();
        inner.user = user.clone();
        // Prune subscribers whose receivers were dropped.
        inner
            .subscribers
            .retain(|tx| tx.unbounded_send(user.clone()).is_ok());
    }
}
