//! Reactive query and mutation hooks.
//!
//! These hooks turn the callback-based watch API of a [`ConvexClient`] into
//! [`Ref`] cells. Every query hook opens exactly one watch and registers
//! exactly one teardown on the calling [`Scope`]; the watch is released when
//! the scope is unmounted.
//!
//! [`ConvexClient`]: convexbind::ConvexClient

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use convexbind::{
    ClientError, ConvexHandle, FunctionReference, IntoFunctionReference, Mutation,
    MutationOptions, Query, Subscription, Value,
};
use futures::FutureExt;
use futures::future::BoxFuture;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::HookError;
use crate::install::use_convex;
use crate::reactive::Ref;
use crate::scope::Scope;

/// Live result of a query. `None` until the client has a value.
///
/// The update listener is registered before the cell is seeded with the
/// client's local snapshot, so no result is missed in between. The cell is
/// overwritten, in delivery order, every time the client reports an update. Updates are
/// applied synchronously inside the client's notification.
///
/// # Panics
///
/// Panics if no Convex client is installed (see [`use_convex`]).
pub fn use_query<Q>(scope: &Scope, query: Q, args: Option<Value>) -> Ref<Option<Value>>
where
    Q: IntoFunctionReference<Query>,
{
    let convex = use_convex(scope);
    watch_into_ref(scope, &convex, &query.into_function_reference(), args)
}

/// Like [`use_query`], but returns a future that settles once the query has a
/// value.
///
/// The watch is opened immediately, not on first poll. If the snapshot already
/// holds a value the future is ready on its first poll. The settled cell keeps
/// receiving updates for the lifetime of `scope`.
///
/// Awaiting never times out on its own; see [`Suspense::timeout`].
///
/// # Panics
///
/// Panics if no Convex client is installed (see [`use_convex`]).
pub fn use_suspense_query<Q>(scope: &Scope, query: Q, args: Option<Value>) -> Suspense
where
    Q: IntoFunctionReference<Query>,
{
    let convex = use_convex(scope);
    let data = watch_into_ref(scope, &convex, &query.into_function_reference(), args);
    Suspense::new(data)
}

/// A callable that runs a mutation.
///
/// # Panics
///
/// Panics if no Convex client is installed (see [`use_convex`]).
pub fn use_mutation<M>(scope: &Scope, mutation: M) -> MutationHandle
where
    M: IntoFunctionReference<Mutation>,
{
    MutationHandle {
        convex: use_convex(scope),
        reference: mutation.into_function_reference(),
    }
}

fn watch_into_ref(
    scope: &Scope,
    convex: &ConvexHandle,
    query: &FunctionReference<Query>,
    args: Option<Value>,
) -> Ref<Option<Value>> {
    log::debug!("Watching query {query}");
    let watch = convex.watch_query(query, args);
    let data = Ref::new(None);

    let target = data.clone();
    let source = Arc::downgrade(&watch);
    let unsubscribe = watch.on_update(Box::new(move || {
        if let Some(watch) = source.upgrade() {
            target.set(watch.local_query_result());
        }
    }));
    // Seed only after the listener is in place, so a result published in
    // between reaches the cell. A value the callback already wrote is newer
    // than this snapshot and must not be overwritten.
    let snapshot = watch.local_query_result();
    data.update(|current| {
        if current.is_some() {
            return false;
        }
        *current = snapshot;
        current.is_some()
    });

    let subscription = Subscription::new(unsubscribe);
    let name = query.name().to_string();
    scope.on_unmounted(move || {
        drop(subscription);
        drop(watch);
        log::debug!("Released query {name}");
    });

    data
}

/// Future returned by [`use_suspense_query`].
#[must_use = "a suspense query does nothing unless awaited"]
pub struct Suspense {
    ready: BoxFuture<'static, Ref<Option<Value>>>,
}

impl Suspense {
    fn new(data: Ref<Option<Value>>) -> Self {
        let ready = async move {
            let mut rx = data.subscribe();
            // `data` keeps the sender alive, so waiting cannot fail.
            let _ = rx.wait_for(Option::is_some).await;
            data
        };
        Self {
            ready: ready.boxed(),
        }
    }

    /// Settle with [`HookError::SuspenseTimeout`] if no value arrives within
    /// `duration`. The underlying watch stays open either way.
    pub async fn timeout(self, duration: Duration) -> Result<Ref<Option<Value>>, HookError> {
        tokio::time::timeout(duration, self)
            .await
            .map_err(|_| HookError::SuspenseTimeout(duration))
    }
}

impl Future for Suspense {
    type Output = Ref<Option<Value>>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.ready.as_mut().poll(cx)
    }
}

/// Runs one mutation per call. Cheap to clone; clones share the client.
#[derive(Clone)]
pub struct MutationHandle {
    convex: ConvexHandle,
    reference: FunctionReference<Mutation>,
}

impl MutationHandle {
    pub fn reference(&self) -> &FunctionReference<Mutation> {
        &self.reference
    }

    /// Send the mutation with `args` forwarded as-is. The future settles with
    /// exactly what the client returns.
    pub fn call(&self, args: Option<Value>) -> BoxFuture<'static, Result<Value, ClientError>> {
        let convex = Arc::clone(&self.convex);
        let reference = self.reference.clone();
        async move {
            convex
                .mutation(&reference, args, MutationOptions::default())
                .await
        }
        .boxed()
    }

    /// Serialize `args`, send the mutation, and deserialize its result.
    pub async fn call_with<A, R>(&self, args: &A) -> Result<R, ClientError>
    where
        A: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let args = serde_json::to_value(args)?;
        let value = self.call(Some(args)).await?;
        Ok(serde_json::from_value(value)?)
    }
}

impl std::fmt::Debug for MutationHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MutationHandle")
            .field("reference", &self.reference)
            .finish()
    }
}
