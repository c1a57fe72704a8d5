#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use convexbind::{
    ClientConfig, ClientError, Connect, ConvexClient, FunctionReference, Listeners, Mutation,
    MutationOptions, Query, QueryWatch, Unsubscribe, UpdateCallback, Value,
};
use convexbind_hooks::{App, ConvexPlugin};
use parking_lot::Mutex;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Origins passed to `FakeClient::connect`, across all tests.
pub static CONNECTED: std::sync::Mutex<Vec<String>> = std::sync::Mutex::new(Vec::new());

/// Server-side state of one query as the fake sees it.
#[derive(Clone, Default)]
struct FakeQuery {
    result: Arc<Mutex<Option<Value>>>,
    listeners: Listeners,
    watches: Arc<AtomicUsize>,
    unsubscribes: Arc<AtomicUsize>,
    last_args: Arc<Mutex<Option<Value>>>,
    publish_on_read: Arc<Mutex<Option<Value>>>,
}

struct FakeWatch {
    query: FakeQuery,
}

impl QueryWatch for FakeWatch {
    fn on_update(&self, callback: UpdateCallback) -> Unsubscribe {
        let remove = self.query.listeners.add(callback);
        let unsubscribes = Arc::clone(&self.query.unsubscribes);
        Box::new(move || {
            unsubscribes.fetch_add(1, Ordering::SeqCst);
            remove();
        })
    }

    fn local_query_result(&self) -> Option<Value> {
        let snapshot = self.query.result.lock().clone();
        // A result that lands while the snapshot is being taken.
        let published = self.query.publish_on_read.lock().take();
        if let Some(value) = published {
            *self.query.result.lock() = Some(value);
            self.query.listeners.notify();
        }
        snapshot
    }
}

/// Scripted in-memory client.
#[derive(Default)]
pub struct FakeClient {
    queries: Mutex<HashMap<String, FakeQuery>>,
    responses: Mutex<HashMap<String, Result<Value, String>>>,
    calls: Mutex<Vec<(String, Option<Value>)>>,
}

impl FakeClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn query(&self, name: &str) -> FakeQuery {
        let name = FunctionReference::<Query>::new(name).name().to_string();
        self.queries.lock().entry(name).or_default().clone()
    }

    /// Set the local result without notifying anyone.
    pub fn seed(&self, name: &str, value: Value) {
        *self.query(name).result.lock() = Some(value);
    }

    /// Set the local result and notify every listener, like a server push.
    pub fn push(&self, name: &str, value: Value) {
        let query = self.query(name);
        *query.result.lock() = Some(value);
        query.listeners.notify();
    }

    /// Publish `value` during the next `local_query_result` call, after the
    /// returned snapshot was taken.
    pub fn publish_on_next_read(&self, name: &str, value: Value) {
        *self.query(name).publish_on_read.lock() = Some(value);
    }

    pub fn watches(&self, name: &str) -> usize {
        self.query(name).watches.load(Ordering::SeqCst)
    }

    pub fn unsubscribes(&self, name: &str) -> usize {
        self.query(name).unsubscribes.load(Ordering::SeqCst)
    }

    pub fn listeners(&self, name: &str) -> usize {
        self.query(name).listeners.len()
    }

    pub fn last_args(&self, name: &str) -> Option<Value> {
        self.query(name).last_args.lock().clone()
    }

    pub fn respond(&self, name: &str, response: Result<Value, String>) {
        let name = FunctionReference::<Mutation>::new(name).name().to_string();
        self.responses.lock().insert(name, response);
    }

    pub fn calls(&self) -> Vec<(String, Option<Value>)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl ConvexClient for FakeClient {
    fn watch_query(
        &self,
        query: &FunctionReference<Query>,
        args: Option<Value>,
    ) -> Arc<dyn QueryWatch> {
        let state = self.query(query.name());
        state.watches.fetch_add(1, Ordering::SeqCst);
        *state.last_args.lock() = args;
        Arc::new(FakeWatch { query: state })
    }

    async fn mutation(
        &self,
        mutation: &FunctionReference<Mutation>,
        args: Option<Value>,
        _options: MutationOptions,
    ) -> Result<Value, ClientError> {
        self.calls.lock().push((mutation.name().to_string(), args));
        let response = self.responses.lock().get(mutation.name()).cloned();
        match response {
            Some(Ok(value)) => Ok(value),
            Some(Err(message)) => Err(ClientError::server(message)),
            None => Ok(Value::Null),
        }
    }
}

impl Connect for FakeClient {
    fn connect(config: ClientConfig) -> Result<Self, ClientError> {
        CONNECTED.lock().unwrap().push(config.origin().to_string());
        Ok(Self::default())
    }
}

/// An app with `client` installed.
pub fn app_with(client: &Arc<FakeClient>) -> App {
    init_logging();
    let mut app = App::new();
    app.use_plugin(ConvexPlugin::with_client(client.clone()))
        .expect("Failed to install client");
    app
}
