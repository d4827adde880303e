//! Error types for the OAuth core.

/// Core error type for configuration and credential parsing.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A configuration value could not be parsed or is not supported.
    #[error("configuration error: invalid value {value:?} for {name}")]
    InvalidConfig {
        /// The setting (or environment variable) name.
        name: String,
        /// The rejected value.
        value: String,
    },

    /// A token endpoint response body could not be parsed.
    #[error("invalid token response: {0}")]
    InvalidTokenResponse(String),
}

/// Convenience result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
