//! Notification feed state.
//!
//! Populated from the REST endpoints and prepended to by the push
//! channel. The feed keeps newest-first order, matching the server.

#[cfg(test)]
#[path = "notifications_test.rs"]
mod notifications_test;

use std::cell::RefCell;
use std::rc::Rc;

use crate::net::types::Notification;

struct FeedInner {
    items: Vec<Notification>,
    watcher: Option<Box<dyn Fn(&[Notification])>>,
}

/// Cheaply cloneable handle to the shared feed.
#[derive(Clone)]
pub struct NotificationFeed {
    inner: Rc<RefCell<FeedInner>>,
}

impl Default for NotificationFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationFeed {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(FeedInner {
                items: Vec::new(),
                watcher: None,
            })),
        }
    }

    /// Replace the feed contents from a REST fetch.
    pub fn set_all(&self, items: Vec<Notification>) {
        let mut inner = self.inner.borrow_mut();
        inner.items = items;
        Self::notify(&inner);
    }

    /// Prepend one notification arriving over the push channel.
    /// A duplicate id replaces the existing entry instead of stacking.
    pub fn receive(&self, notification: Notification) {
        let mut inner = self.inner.borrow_mut();
        inner.items.retain(|n| n.id != notification.id);
        inner.items.insert(0, notification);
        Self::notify(&inner);
    }

    pub fn mark_read(&self, id: u64) {
        let mut inner = self.inner.borrow_mut();
        if let Some(n) = inner.items.iter_mut().find(|n| n.id == id) {
            n.is_read = true;
        }
        Self::notify(&inner);
    }

    pub fn mark_all_read(&self) {
        let mut inner = self.inner.borrow_mut();
        for n in &mut inner.items {
            n.is_read = true;
        }
        Self::notify(&inner);
    }

    pub fn remove(&self, id: u64) {
        let mut inner = self.inner.borrow_mut();
        inner.items.retain(|n| n.id != id);
        Self::notify(&inner);
    }

    pub fn unread_count(&self) -> usize {
        self.inner.borrow().items.iter().filter(|n| !n.is_read).count()
    }

    pub fn snapshot(&self) -> Vec<Notification> {
        self.inner.borrow().items.clone()
    }

    /// Register the single UI watcher, invoked after every change.
    pub fn set_watcher(&self, watcher: impl Fn(&[Notification]) + 'static) {
        self.inner.borrow_mut().watcher = Some(Box::new(watcher));
    }

    fn notify(inner: &FeedInner) {
        if let Some(w) = &inner.watcher {
            w(&inner.items);
        }
    }
}
