//! # convexbind
//!
//! Client-side vocabulary for reactive Convex bindings.
//!
//! This crate defines what a binding layer needs from a real-time backend
//! client, without implementing the protocol itself:
//!
//! - [`FunctionReference`] — typed, canonical `module:function` names, resolved
//!   from strings via [`IntoFunctionReference`]
//! - [`ConvexClient`] / [`QueryWatch`] — the consumed client API: live query
//!   watches with a synchronous local snapshot, and one-shot mutations
//! - [`Subscription`] — guard that releases an [`Unsubscribe`] at most once
//! - [`Listeners`] — callback registry for implementing `on_update`
//! - [`ClientConfig`] — validated deployment origin plus connection settings
//!
//! With the `convex` feature, [`ConvexBackend`] implements the client API on
//! top of the official `convex` crate.
//!
//! ## Example
//!
//! ```ignore
//! use convexbind::{ClientConfig, Connect, ConvexBackend, ConvexClient, FunctionReference};
//!
//! let client = ConvexBackend::connect(ClientConfig::new("https://happy-otter-123.convex.cloud")?)?;
//! let watch = client.watch_query(&FunctionReference::new("messages:list"), None);
//! let _unsubscribe = watch.on_update(Box::new(|| println!("messages changed")));
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod function_ref;
pub mod listeners;

#[cfg(feature = "convex")]
pub mod backend;

pub use client::{
    Connect, ConvexClient, ConvexHandle, MutationOptions, QueryWatch, Subscription, Unsubscribe,
    UpdateCallback,
};
pub use config::ClientConfig;
pub use error::{ClientError, ConfigError};
pub use function_ref::{
    FunctionKind, FunctionReference, FunctionType, IntoFunctionReference, Mutation, Query,
};
pub use listeners::Listeners;

#[cfg(feature = "convex")]
pub use backend::ConvexBackend;

// Re-export for users of the library
pub use serde_json::Value;
