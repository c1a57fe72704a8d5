//! Reactive hooks over an injected Convex client.
//!
//! Provides the pieces a UI layer needs to consume live Convex queries:
//!
//! - [`App`] / [`create_convex()`] — install one client into the application
//!   context under [`CONVEX_KEY`].
//! - [`Scope`] — a mounted component; hooks tie their subscriptions to it and
//!   release them when it is unmounted.
//! - [`use_convex()`] — retrieves the installed client.
//! - [`use_query`] — a [`Ref`] cell tracking a query's latest result.
//! - [`use_suspense_query`] — the same, as a future that waits for the first value.
//! - [`use_mutation`] — a callable that runs a mutation.
//!
//! ## Example
//!
//! ```ignore
//! use convexbind::ConvexBackend;
//! use convexbind_hooks::*;
//!
//! let mut app = App::new();
//! app.use_plugin(create_convex::<ConvexBackend>("https://happy-otter-123.convex.cloud"))?;
//!
//! let scope = app.mount();
//! let messages = use_query(&scope, "messages:list", None);
//! let send = use_mutation(&scope, "messages:send");
//! send.call(Some(serde_json::json!({ "body": "hello" }))).await?;
//!
//! let settings = use_suspense_query(&scope, "settings:get", None).await;
//! // ... read messages.get(), settings.get()
//! scope.unmount();
//! ```

pub mod context;
pub mod error;
pub mod hooks;
pub mod install;
pub mod reactive;
pub mod scope;

pub use context::{Context, InjectionKey};
pub use error::HookError;
pub use hooks::*;
pub use install::{App, CONVEX_KEY, ConvexPlugin, Plugin, create_convex, try_use_convex, use_convex};
pub use reactive::Ref;
pub use scope::Scope;
