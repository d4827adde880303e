//! Configuration for OAuth servers.
//!
//! Settings can be built in code, deserialized, or read from environment
//! variables:
//!
//! - `OAUTH_TIMESTAMP_THRESHOLD` - replay window in seconds
//! - `OAUTH_SIGNATURE_METHODS` - comma separated shared-secret methods to enable

use crate::error::{CoreError, CoreResult};

/// Default replay window, in seconds.
pub const DEFAULT_TIMESTAMP_THRESHOLD: u64 = 300;

/// Verification settings for an OAuth server.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerConfig {
    /// Maximum distance, in seconds, between `oauth_timestamp` and the
    /// server clock.
    pub timestamp_threshold: u64,
    /// Built-in signature methods registered on construction, by name.
    pub signature_methods: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            timestamp_threshold: DEFAULT_TIMESTAMP_THRESHOLD,
            signature_methods: vec!["HMAC-SHA1".to_owned()],
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables, falling back to the
    /// defaults for unset variables.
    pub fn from_env() -> CoreResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> CoreResult<Self> {
        let mut config = Self::default();

        if let Some(v) = lookup("OAUTH_TIMESTAMP_THRESHOLD") {
            config.timestamp_threshold =
                v.trim().parse().map_err(|_| CoreError::InvalidConfig {
                    name: "OAUTH_TIMESTAMP_THRESHOLD".to_owned(),
                    value: v.clone(),
                })?;
        }
        if let Some(v) = lookup("OAUTH_SIGNATURE_METHODS") {
            config.signature_methods = v
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_ascii_uppercase)
                .collect();
        }

        tracing::debug!(?config, "Loaded OAuth server configuration");
        Ok(config)
    }
}
