//! Client configuration.
//!
//! [`ClientConfig`] is validated once, when the Convex plugin is installed,
//! and then handed to [`Connect::connect`](crate::Connect::connect).

use crate::error::ConfigError;

/// Connection settings for a Convex deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    origin: String,
    client_id: Option<String>,
}

impl ClientConfig {
    /// Validate `origin` and build a config with default settings.
    ///
    /// The origin must be an `http://` or `https://` URL. A trailing `/` is
    /// dropped. Origins outside `*.convex.cloud` / `*.convex.site` that are not
    /// local addresses are accepted with a warning, since self-hosted
    /// deployments use their own domains.
    pub fn new(origin: &str) -> Result<Self, ConfigError> {
        let origin = origin.trim();
        if origin.is_empty() {
            return Err(ConfigError::EmptyOrigin);
        }
        let Some(host) = origin
            .strip_prefix("https://")
            .or_else(|| origin.strip_prefix("http://"))
        else {
            return Err(ConfigError::InvalidScheme(origin.to_string()));
        };
        if host.trim_end_matches('/').is_empty() {
            return Err(ConfigError::EmptyOrigin);
        }
        if !is_known_host(host) {
            log::warn!("Deployment origin {origin} is not a convex.cloud or local address");
        }
        Ok(Self {
            origin: origin.trim_end_matches('/').to_string(),
            client_id: None,
        })
    }

    /// Identifier reported to the backend when connecting.
    pub fn with_client_id(mut self, id: impl Into<String>) -> Self {
        self.client_id = Some(id.into());
        self
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }
}

fn is_known_host(host: &str) -> bool {
    let host = host.split(['/', ':']).next().unwrap_or(host);
    host.ends_with(".convex.cloud")
        || host.ends_with(".convex.site")
        || host == "localhost"
        || host == "127.0.0.1"
}
