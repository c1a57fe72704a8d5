//! The client contract consumed by the reactive bindings.
//!
//! These traits describe the surface of a real-time Convex client: live query
//! watches with a synchronous local snapshot, and one-shot mutations. The
//! bindings never look behind them; caching, transport and subscription
//! bookkeeping all belong to the implementation.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::function_ref::{FunctionReference, Mutation, Query};

/// Callback registered with [`QueryWatch::on_update`]. Receives no payload;
/// the new value is read back through [`QueryWatch::local_query_result`].
pub type UpdateCallback = Box<dyn Fn() + Send + Sync>;

/// An owned one-shot closure that removes a subscription when called.
pub type Unsubscribe = Box<dyn FnOnce() + Send + Sync>;

/// Shared handle to an installed client.
pub type ConvexHandle = Arc<dyn ConvexClient>;

/// A live watch on one query with one set of arguments.
pub trait QueryWatch: Send + Sync {
    /// Register `callback` to run after every result change.
    fn on_update(&self, callback: UpdateCallback) -> Unsubscribe;

    /// The best locally known result, or `None` if nothing has arrived yet.
    fn local_query_result(&self) -> Option<Value>;
}

/// Per-call mutation settings forwarded to the client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct MutationOptions {}

/// A real-time backend client.
#[async_trait]
pub trait ConvexClient: Send + Sync + 'static {
    /// Start watching `query` with `args`. Watching does not by itself
    /// guarantee a network subscription stays open; callers keep the returned
    /// watch and at least one update listener alive for as long as they need
    /// updates.
    fn watch_query(
        &self,
        query: &FunctionReference<Query>,
        args: Option<Value>,
    ) -> Arc<dyn QueryWatch>;

    /// Run `mutation` once with `args`.
    async fn mutation(
        &self,
        mutation: &FunctionReference<Mutation>,
        args: Option<Value>,
        options: MutationOptions,
    ) -> Result<Value, ClientError>;
}

/// Construction of a client from validated configuration. Used by the Convex
/// plugin so that installation only needs an origin.
pub trait Connect: ConvexClient + Sized {
    fn connect(config: ClientConfig) -> Result<Self, ClientError>;
}

/// Guard that invokes an [`Unsubscribe`] at most once: on [`cancel`] or on drop.
///
/// [`cancel`]: Subscription::cancel
pub struct Subscription {
    unsubscribe: Option<Unsubscribe>,
}

impl Subscription {
    pub fn new(unsubscribe: Unsubscribe) -> Self {
        Self {
            unsubscribe: Some(unsubscribe),
        }
    }

    /// Release the subscription. Later calls are no-ops.
    pub fn cancel(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }

    pub fn is_active(&self) -> bool {
        self.unsubscribe.is_some()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
