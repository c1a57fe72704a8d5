use serde_json::Value;
use thiserror::Error;

/// Problems with the client configuration, detected before any connection is made.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing deployment origin")]
    EmptyOrigin,

    #[error("Deployment origin must start with http:// or https://, got {0:?}")]
    InvalidScheme(String),
}

/// Errors surfaced by a [`ConvexClient`](crate::ConvexClient).
///
/// The binding layer never inspects these; they travel unchanged from the
/// client to whoever awaited the mutation.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The function ran and failed. `data` carries the payload of an
    /// application-level `ConvexError`, if one was thrown.
    #[error("Server error: {message}")]
    Server {
        message: String,
        data: Option<Value>,
    },

    #[error("Invalid function arguments: {0}")]
    InvalidArgs(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("No tokio runtime available to drive the client")]
    NoRuntime,

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ClientError {
    /// Shorthand for a server error without structured data.
    pub fn server(message: impl Into<String>) -> Self {
        ClientError::Server {
            message: message.into(),
            data: None,
        }
    }
}
