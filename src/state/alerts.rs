//! Global alert queue: the single surface for error banners and success
//! toasts.
//!
//! Every classified, non-silent failure and every mutating-call success
//! lands here exactly once. Duplicate messages inside a short window are
//! suppressed so a burst of identical failures does not stack banners.

#[cfg(test)]
#[path = "alerts_test.rs"]
mod alerts_test;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Suppression window for repeated identical alerts.
const DEDUP_WINDOW_MS: f64 = 2000.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlertKind {
    Error,
    Warning,
    Info,
    Success,
}

impl AlertKind {
    /// Auto-dismiss delay in milliseconds.
    pub fn duration_ms(self) -> u32 {
        match self {
            AlertKind::Error => 5000,
            AlertKind::Warning => 4000,
            AlertKind::Info | AlertKind::Success => 3000,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Alert {
    pub id: u64,
    pub kind: AlertKind,
    pub message: String,
    pub timestamp_ms: f64,
}

struct AlertsInner {
    queue: Vec<Alert>,
    recent: HashMap<String, f64>,
    next_id: u64,
    watcher: Option<Box<dyn Fn(&[Alert])>>,
}

/// Cheaply cloneable handle to the shared alert queue.
#[derive(Clone)]
pub struct Alerts {
    inner: Rc<RefCell<AlertsInner>>,
}

impl Default for Alerts {
    fn default() -> Self {
        Self::new()
    }
}

impl Alerts {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(AlertsInner {
                queue: Vec::new(),
                recent: HashMap::new(),
                next_id: 0,
                watcher: None,
            })),
        }
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push_at(AlertKind::Error, message, crate::util::now_ms());
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.push_at(AlertKind::Warning, message, crate::util::now_ms());
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push_at(AlertKind::Info, message, crate::util::now_ms());
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push_at(AlertKind::Success, message, crate::util::now_ms());
    }

    /// Queue an alert at an explicit timestamp. Identical `kind|message`
    /// pairs within the suppression window are dropped.
    pub fn push_at(&self, kind: AlertKind, message: impl Into<String>, now_ms: f64) {
        let message = message.into();
        let key = format!("{kind:?}|{message}");

        let mut inner = self.inner.borrow_mut();
        if let Some(&last) = inner.recent.get(&key) {
            if now_ms - last < DEDUP_WINDOW_MS {
                return;
            }
        }
        inner.recent.insert(key, now_ms);

        let id = inner.next_id;
        inner.next_id += 1;
        inner.queue.push(Alert {
            id,
            kind,
            message,
            timestamp_ms: now_ms,
        });
        Self::notify(&inner);
    }

    pub fn dismiss(&self, id: u64) {
        let mut inner = self.inner.borrow_mut();
        inner.queue.retain(|a| a.id != id);
        Self::notify(&inner);
    }

    pub fn clear(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.queue.clear();
        Self::notify(&inner);
    }

    pub fn snapshot(&self) -> Vec<Alert> {
        self.inner.borrow().queue.clone()
    }

    /// Register the single UI watcher, invoked after every change.
    pub fn set_watcher(&self, watcher: impl Fn(&[Alert]) + 'static) {
        self.inner.borrow_mut().watcher = Some(Box::new(watcher));
    }

    fn notify(inner: &AlertsInner) {
        if let Some(w) = &inner.watcher {
            w(&inner.queue);
        }
    }
}
