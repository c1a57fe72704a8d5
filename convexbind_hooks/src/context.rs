//! Typed, hierarchical dependency injection.
//!
//! A [`Context`] is a node in a chain of value maps. Lookups walk from the
//! node towards the root, so values provided on a child shadow those of its
//! ancestors. Values are addressed by an [`InjectionKey<T>`], which ties a
//! name to the type stored under it.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use parking_lot::RwLock;

/// Typed key under which a value of type `T` is provided.
pub struct InjectionKey<T> {
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> InjectionKey<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<T> std::fmt::Debug for InjectionKey<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "InjectionKey({})", self.name)
    }
}

type Slot = (TypeId, &'static str);

struct Node {
    values: RwLock<HashMap<Slot, Arc<dyn Any + Send + Sync>>>,
    parent: Option<Context>,
}

/// A shared handle to one node of the context chain.
#[derive(Clone)]
pub struct Context {
    node: Arc<Node>,
}

impl Context {
    /// A new root context.
    pub fn new() -> Self {
        Self::with_parent(None)
    }

    fn with_parent(parent: Option<Context>) -> Self {
        Self {
            node: Arc::new(Node {
                values: RwLock::new(HashMap::new()),
                parent,
            }),
        }
    }

    /// A new context whose lookups fall back to `self`.
    pub fn child(&self) -> Self {
        Self::with_parent(Some(self.clone()))
    }

    /// Provide `value` on this node. Returns `true` if a value under the same
    /// key was replaced.
    pub fn provide<T>(&self, key: &InjectionKey<T>, value: T) -> bool
    where
        T: Send + Sync + 'static,
    {
        self.node
            .values
            .write()
            .insert((TypeId::of::<T>(), key.name), Arc::new(value))
            .is_some()
    }

    /// Whether `key` is provided on this node itself, ignoring ancestors.
    pub fn provides_locally<T: 'static>(&self, key: &InjectionKey<T>) -> bool {
        self.node
            .values
            .read()
            .contains_key(&(TypeId::of::<T>(), key.name))
    }

    /// Look `key` up on this node, then on each ancestor.
    pub fn inject<T>(&self, key: &InjectionKey<T>) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let slot = (TypeId::of::<T>(), key.name);
        let mut current = Some(self);
        while let Some(ctx) = current {
            if let Some(value) = ctx.node.values.read().get(&slot) {
                return value.downcast_ref::<T>().cloned();
            }
            current = ctx.node.parent.as_ref();
        }
        None
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
