//! Reactive cells.
//!
//! [`Ref<T>`] is a shared, mutable value that observers can await changes on.
//! It is a thin wrapper over [`tokio::sync::watch`]: writes replace the value
//! synchronously and wake every receiver. Receivers that fall behind see the
//! latest value, not every intermediate one.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::watch;

/// A cloneable handle to a reactive value. All clones share one cell.
pub struct Ref<T> {
    tx: Arc<watch::Sender<T>>,
}

impl<T> Ref<T> {
    pub fn new(value: T) -> Self {
        let (tx, _) = watch::channel(value);
        Self { tx: Arc::new(tx) }
    }

    /// Replace the value, notify receivers, and return the previous value.
    pub fn set(&self, value: T) -> T {
        self.tx.send_replace(value)
    }

    /// Modify the value in place. Receivers are only notified when `f`
    /// returns `true`.
    pub fn update(&self, f: impl FnOnce(&mut T) -> bool) -> bool {
        self.tx.send_if_modified(f)
    }

    /// Borrow the current value for the duration of `f`.
    ///
    /// Do not call [`set`](Ref::set) on the same cell from inside `f`.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.tx.borrow())
    }

    /// A receiver that starts out having seen the current value.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }

    /// Wait for the next write after this call.
    pub async fn changed(&self) {
        let mut rx = self.subscribe();
        // The sender lives as long as `self`, so this cannot fail.
        let _ = rx.changed().await;
    }

    /// Whether both handles point at the same cell.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.tx, &other.tx)
    }
}

impl<T: Clone> Ref<T> {
    /// A copy of the current value.
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }
}

impl Ref<Option<Value>> {
    /// Deserialize the current query result, if there is one.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<Option<T>, serde_json::Error> {
        self.with(|value| value.clone().map(serde_json::from_value).transpose())
    }
}

impl<T> Clone for Ref<T> {
    fn clone(&self) -> Self {
        Self {
            tx: Arc::clone(&self.tx),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Ref<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Ref").field(&*self.tx.borrow()).finish()
    }
}

impl<T: Default> Default for Ref<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
