//! Component scopes.
//!
//! A [`Scope`] stands for one mounted component. Hooks register teardown work
//! on it with [`on_unmounted`](Scope::on_unmounted); the work runs exactly once,
//! in registration order, when the scope is unmounted or dropped.

use parking_lot::Mutex;

use crate::context::{Context, InjectionKey};

type Teardown = Box<dyn FnOnce() + Send>;

/// Lifetime owner for hooks.
pub struct Scope {
    context: Context,
    teardown: Mutex<Vec<Teardown>>,
}

impl Scope {
    /// A scope whose context is a child of `parent`.
    pub fn new(parent: &Context) -> Self {
        Self {
            context: parent.child(),
            teardown: Mutex::new(Vec::new()),
        }
    }

    /// A nested scope; its context falls back to this one.
    pub fn child(&self) -> Scope {
        Scope::new(&self.context)
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Provide `value` to this scope and its descendants.
    pub fn provide<T>(&self, key: &InjectionKey<T>, value: T)
    where
        T: Send + Sync + 'static,
    {
        self.context.provide(key, value);
    }

    pub fn inject<T>(&self, key: &InjectionKey<T>) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        self.context.inject(key)
    }

    /// Run `f` when this scope is torn down.
    pub fn on_unmounted(&self, f: impl FnOnce() + Send + 'static) {
        self.teardown.lock().push(Box::new(f));
    }

    /// Number of teardown hooks waiting to run.
    pub fn pending_teardowns(&self) -> usize {
        self.teardown.lock().len()
    }

    /// Tear the scope down. Equivalent to dropping it.
    pub fn unmount(self) {}
}

impl Drop for Scope {
    fn drop(&mut self) {
        let hooks = std::mem::take(self.teardown.get_mut());
        for hook in hooks {
            hook();
        }
    }
}

impl std::fmt::Debug for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scope")
            .field("pending_teardowns", &self.pending_teardowns())
            .finish()
    }
}
