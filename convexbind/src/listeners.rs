//! Listener registry for `on_update` fan-out.
//!
//! Client implementations keep one [`Listeners`] per watched query and call
//! [`notify`](Listeners::notify) whenever a new result lands. Callbacks are
//! stored as `Arc`s so the list can be snapshotted cheaply:
//!   - a listener removed during notification is still called in that round;
//!   - a listener added during notification waits for the next one.
//!
//! The lock is never held while a callback runs, so callbacks may add or
//! remove listeners (including themselves).

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::client::{Unsubscribe, UpdateCallback};

type ListenerId = u64;

#[derive(Default)]
struct Registry {
    entries: Vec<(ListenerId, Arc<dyn Fn() + Send + Sync>)>,
}

/// Thread-safe set of zero-argument callbacks.
#[derive(Clone, Default)]
pub struct Listeners {
    registry: Arc<Mutex<Registry>>,
    next_id: Arc<AtomicU64>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback`; the returned closure removes it again.
    pub fn add(&self, callback: UpdateCallback) -> Unsubscribe {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.registry.lock().entries.push((id, Arc::from(callback)));

        let registry = Arc::clone(&self.registry);
        Box::new(move || {
            registry.lock().entries.retain(|(lid, _)| *lid != id);
        })
    }

    /// Call every registered listener in registration order.
    pub fn notify(&self) {
        let snapshot: Vec<Arc<dyn Fn() + Send + Sync>> = {
            let guard = self.registry.lock();
            guard.entries.iter().map(|(_, cb)| Arc::clone(cb)).collect()
        };
        for cb in snapshot {
            cb();
        }
    }

    pub fn len(&self) -> usize {
        self.registry.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners").field("len", &self.len()).finish()
    }
}
