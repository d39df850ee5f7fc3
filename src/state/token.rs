//! Access-token store.
//!
//! The in-memory value is authoritative; localStorage is a warm-start
//! cache only. The cache is read lazily on the first `get` and never
//! re-read afterwards except through `set`/`clear`.

#[cfg(test)]
#[path = "token_test.rs"]
mod token_test;

use std::cell::RefCell;
use std::rc::Rc;

#[cfg(feature = "hydrate")]
const STORAGE_KEY: &str = "moblog_token";

/// Persistent backing for the token store. The browser implementation is
/// localStorage; tests inject an in-memory cache.
pub trait TokenCache {
    fn load(&self) -> Option<String>;
    fn store(&self, token: &str);
    fn clear(&self);
}

/// localStorage-backed cache. All operations degrade to no-ops outside
/// the browser.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorageCache;

#[cfg(feature = "hydrate")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

impl TokenCache for LocalStorageCache {
    fn load(&self) -> Option<String> {
        #[cfg(feature = "hydrate")]
        {
            local_storage().and_then(|s| s.get_item(STORAGE_KEY).ok().flatten())
        }
        #[cfg(not(feature = "hydrate"))]
        {
            None
        }
    }

    fn store(&self, token: &str) {
        #[cfg(feature = "hydrate")]
        {
            if let Some(s) = local_storage() {
                let _ = s.set_item(STORAGE_KEY, token);
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = token;
        }
    }

    fn clear(&self) {
        #[cfg(feature = "hydrate")]
        {
            if let Some(s) = local_storage() {
                let _ = s.remove_item(STORAGE_KEY);
            }
        }
    }
}

/// In-memory cache for tests and server-side rendering.
#[derive(Clone, Debug, Default)]
pub struct MemoryCache {
    slot: Rc<RefCell<Option<String>>>,
}

impl MemoryCache {
    pub fn with_token(token: &str) -> Self {
        Self {
            slot: Rc::new(RefCell::new(Some(token.to_owned()))),
        }
    }
}

impl TokenCache for MemoryCache {
    fn load(&self) -> Option<String> {
        self.slot.borrow().clone()
    }

    fn store(&self, token: &str) {
        *self.slot.borrow_mut() = Some(token.to_owned());
    }

    fn clear(&self) {
        *self.slot.borrow_mut() = None;
    }
}

enum Slot {
    /// Cache not consulted yet.
    Unread,
    Present(String),
    Absent,
}

/// Cheaply cloneable handle to the shared token slot.
#[derive(Clone)]
pub struct TokenStore {
    slot: Rc<RefCell<Slot>>,
    cache: Rc<dyn TokenCache>,
}

impl TokenStore {
    pub fn new(cache: Rc<dyn TokenCache>) -> Self {
        Self {
            slot: Rc::new(RefCell::new(Slot::Unread)),
            cache,
        }
    }

    /// Browser-backed store.
    pub fn browser() -> Self {
        Self::new(Rc::new(LocalStorageCache))
    }

    /// Current access token. Reconciles with the cache on first call.
    pub fn get(&self) -> Option<String> {
        let mut slot = self.slot.borrow_mut();
        if let Slot::Unread = *slot {
            *slot = match self.cache.load() {
                Some(t) => Slot::Present(t),
                None => Slot::Absent,
            };
        }
        match &*slot {
            Slot::Present(t) => Some(t.clone()),
            _ => None,
        }
    }

    pub fn is_set(&self) -> bool {
        self.get().is_some()
    }

    /// Install a token in memory and write it through to the cache.
    pub fn set(&self, token: &str) {
        *self.slot.borrow_mut() = Slot::Present(token.to_owned());
        self.cache.store(token);
    }

    /// Drop the token from memory and cache.
    pub fn clear(&self) {
        *self.slot.borrow_mut() = Slot::Absent;
        self.cache.clear();
    }
}
