use std::sync::Arc;

use convexbind::{ClientConfig, Connect, ConvexHandle};

use crate::context::{Context, InjectionKey};
use crate::error::HookError;
use crate::scope::Scope;

/// The well-known key the Convex client is provided under.
pub const CONVEX_KEY: InjectionKey<ConvexHandle> = InjectionKey::new("convex");

/// Something that can be installed into an [`App`].
pub trait Plugin {
    fn install(self, app: &mut App) -> Result<(), HookError>;
}

/// Application root: owns the root context that every mounted scope inherits.
///
/// # Example
///
/// ```ignore
/// let mut app = App::new();
/// app.use_plugin(create_convex::<ConvexBackend>("https://happy-otter-123.convex.cloud"))?;
///
/// let scope = app.mount();
/// let messages = use_query(&scope, "messages:list", None);
/// ```
#[derive(Default)]
pub struct App {
    context: Context,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Provide an application-wide value.
    pub fn provide<T>(&mut self, key: &InjectionKey<T>, value: T) -> &mut Self
    where
        T: Send + Sync + 'static,
    {
        self.context.provide(key, value);
        self
    }

    pub fn use_plugin(&mut self, plugin: impl Plugin) -> Result<&mut Self, HookError> {
        plugin.install(self)?;
        Ok(self)
    }

    /// Mount a root component scope.
    pub fn mount(&self) -> Scope {
        Scope::new(&self.context)
    }
}

type Connector = Box<dyn FnOnce() -> Result<ConvexHandle, HookError>>;

/// Installs one Convex client under [`CONVEX_KEY`].
pub struct ConvexPlugin {
    connect: Connector,
}

/// Plugin that builds a `C` for `origin` when installed.
pub fn create_convex<C: Connect>(origin: impl Into<String>) -> ConvexPlugin {
    let origin = origin.into();
    ConvexPlugin {
        connect: Box::new(move || {
            let config = ClientConfig::new(&origin)?;
            log::debug!("Connecting Convex client to {}", config.origin());
            let client: ConvexHandle = Arc::new(C::connect(config)?);
            Ok(client)
        }),
    }
}

impl ConvexPlugin {
    /// Plugin that installs an already constructed client.
    pub fn with_client(client: ConvexHandle) -> Self {
        Self {
            connect: Box::new(move || Ok(client)),
        }
    }
}

impl Plugin for ConvexPlugin {
    fn install(self, app: &mut App) -> Result<(), HookError> {
        if app.context.provides_locally(&CONVEX_KEY) {
            return Err(HookError::AlreadyInstalled);
        }
        let client = (self.connect)()?;
        app.context.provide(&CONVEX_KEY, client);
        log::debug!("Convex client installed");
        Ok(())
    }
}

/// The installed Convex client.
///
/// # Panics
///
/// Panics if no client was installed on the app `scope` descends from. Use
/// [`try_use_convex`] to handle that case instead.
pub fn use_convex(scope: &Scope) -> ConvexHandle {
    match try_use_convex(scope) {
        Ok(client) => client,
        Err(err) => panic!("{err}"),
    }
}

/// The installed Convex client, or [`HookError::ContextMissing`].
pub fn try_use_convex(scope: &Scope) -> Result<ConvexHandle, HookError> {
    scope.inject(&CONVEX_KEY).ok_or(HookError::ContextMissing)
}
