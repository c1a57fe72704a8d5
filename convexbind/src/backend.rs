//! [`ConvexClient`] over the official `convex` crate.
//!
//! The websocket connection is opened lazily, the first time a query is
//! watched or a mutation is sent. Each watch owns a background task that
//! drains the crate's `QuerySubscription` stream into a local result slot and
//! notifies listeners; dropping the watch aborts the task, which closes the
//! server-side subscription.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::{Stream, StreamExt};
use parking_lot::Mutex;
use serde_json::Value;
use tokio::runtime::Handle;
use tokio::sync::OnceCell;
use tokio::task::JoinHandle;

use crate::client::{
    Connect, ConvexClient, MutationOptions, QueryWatch, Unsubscribe, UpdateCallback,
};
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::function_ref::{FunctionReference, Mutation, Query};
use crate::listeners::Listeners;

/// A `convex::ConvexClient` shared by every watch and mutation.
pub struct ConvexBackend {
    config: ClientConfig,
    client: Arc<OnceCell<convex::ConvexClient>>,
    runtime: Handle,
}

impl ConvexBackend {
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl Connect for ConvexBackend {
    fn connect(config: ClientConfig) -> Result<Self, ClientError> {
        let runtime = Handle::try_current().map_err(|_| ClientError::NoRuntime)?;
        Ok(Self {
            config,
            client: Arc::new(OnceCell::new()),
            runtime,
        })
    }
}

async fn shared_client(
    cell: &OnceCell<convex::ConvexClient>,
    config: &ClientConfig,
) -> Result<convex::ConvexClient, ClientError> {
    let client = cell
        .get_or_try_init(|| async {
            log::debug!("Connecting to {}", config.origin());
            let mut builder = convex::ConvexClientBuilder::new(config.origin());
            if let Some(id) = config.client_id() {
                builder = builder.with_client_id(id);
            }
            builder
                .build()
                .await
                .map_err(|e| ClientError::ConnectionFailed(e.to_string()))
        })
        .await?;
    Ok(client.clone())
}

fn to_convex_args(args: Option<Value>) -> Result<BTreeMap<String, convex::Value>, ClientError> {
    match args {
        None | Some(Value::Null) => Ok(BTreeMap::new()),
        Some(Value::Object(map)) => map
            .into_iter()
            .map(|(key, value)| {
                convex::Value::try_from(value)
                    .map(|v| (key.clone(), v))
                    .map_err(|e| ClientError::InvalidArgs(format!("{key}: {e}")))
            })
            .collect(),
        Some(other) => Err(ClientError::InvalidArgs(format!(
            "expected an object, got {other}"
        ))),
    }
}

fn from_function_result(result: convex::FunctionResult) -> Result<Value, ClientError> {
    match result {
        convex::FunctionResult::Value(value) => Ok(value.export()),
        convex::FunctionResult::ErrorMessage(message) => Err(ClientError::server(message)),
        convex::FunctionResult::ConvexError(err) => Err(ClientError::Server {
            message: err.message,
            data: Some(err.data.export()),
        }),
    }
}

/// Copy every successful update into `slot` and notify `listeners`. Failed
/// updates are logged and leave the last good value in place.
async fn drain<S>(name: &str, updates: S, slot: &Mutex<Option<Value>>, listeners: &Listeners)
where
    S: Stream<Item = convex::FunctionResult>,
{
    futures::pin_mut!(updates);
    while let Some(update) = updates.next().await {
        match from_function_result(update) {
            Ok(value) => {
                *slot.lock() = Some(value);
                listeners.notify();
            }
            Err(e) => log::error!("Query {name} failed: {e}"),
        }
    }
}

struct LiveQuery {
    result: Arc<Mutex<Option<Value>>>,
    listeners: Listeners,
    task: JoinHandle<()>,
}

impl QueryWatch for LiveQuery {
    fn on_update(&self, callback: UpdateCallback) -> Unsubscribe {
        self.listeners.add(callback)
    }

    fn local_query_result(&self) -> Option<Value> {
        self.result.lock().clone()
    }
}

impl Drop for LiveQuery {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[async_trait]
impl ConvexClient for ConvexBackend {
    fn watch_query(
        &self,
        query: &FunctionReference<Query>,
        args: Option<Value>,
    ) -> Arc<dyn QueryWatch> {
        let result = Arc::new(Mutex::new(None));
        let listeners = Listeners::new();

        let cell = Arc::clone(&self.client);
        let config = self.config.clone();
        let name = query.name().to_string();
        let slot = Arc::clone(&result);
        let notify = listeners.clone();

        let task = self.runtime.spawn(async move {
            let args = match to_convex_args(args) {
                Ok(args) => args,
                Err(e) => {
                    log::error!("Not watching {name}: {e}");
                    return;
                }
            };
            let mut client = match shared_client(&cell, &config).await {
                Ok(client) => client,
                Err(e) => {
                    log::error!("Not watching {name}: {e}");
                    return;
                }
            };
            let subscription = match client.subscribe(&name, args).await {
                Ok(subscription) => subscription,
                Err(e) => {
                    log::error!("Failed to subscribe to {name}: {e}");
                    return;
                }
            };
            drain(&name, subscription, &slot, &notify).await;
            log::debug!("Subscription to {name} ended");
        });

        Arc::new(LiveQuery {
            result,
            listeners,
            task,
        })
    }

    async fn mutation(
        &self,
        mutation: &FunctionReference<Mutation>,
        args: Option<Value>,
        _options: MutationOptions,
    ) -> Result<Value, ClientError> {
        let args = to_convex_args(args)?;
        let mut client = shared_client(&self.client, &self.config).await?;
        let result = client
            .mutation(mutation.name(), args)
            .await
            .map_err(|e| ClientError::ConnectionFailed(e.to_string()))?;
        from_function_result(result)
    }
}
