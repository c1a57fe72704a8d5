use std::time::Duration;

use convexbind::{ClientError, ConfigError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HookError {
    #[error("No Convex client installed: install the plugin from `create_convex` before using hooks")]
    ContextMissing,

    #[error("A Convex client is already installed on this app")]
    AlreadyInstalled,

    #[error("Query produced no value within {0:?}")]
    SuspenseTimeout(Duration),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Client(#[from] ClientError),
}
