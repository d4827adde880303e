//! Error types for OAuth request verification.
//!
//! Every failure of the verification sequence maps to one [`OAuthError`]
//! variant. Messages name the offending parameter or the timestamps involved,
//! never a secret.

use oauth1_core::CoreError;

/// Errors raised while signing or verifying OAuth requests.
#[derive(Debug, thiserror::Error)]
pub enum OAuthError {
    /// `oauth_version` is present and is not `1.0`.
    #[error("OAuth version '{0}' not supported")]
    UnsupportedVersion(String),

    /// A required OAuth parameter is absent.
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    /// A parameter is present but its value is malformed.
    #[error("Invalid value {value:?} for parameter {name}")]
    InvalidParameter {
        /// The parameter name.
        name: String,
        /// The rejected value.
        value: String,
    },

    /// The consumer key is not known to the credential store.
    #[error("Invalid client: {0}")]
    UnknownClient(String),

    /// The token is not known to the credential store for the given type.
    #[error("Invalid {token_type} token: {key}")]
    InvalidToken {
        /// `request` or `access`.
        token_type: String,
        /// The token key from the request.
        key: String,
    },

    /// The store refused to exchange a request token.
    #[error("Unauthorized request token: {0}")]
    UnauthorizedToken(String),

    /// `oauth_timestamp` lies outside the accepted window.
    #[error("Expired timestamp, yours {timestamp}, ours {now} (threshold {threshold}s)")]
    ExpiredTimestamp {
        /// The timestamp carried by the request.
        timestamp: i64,
        /// The server clock.
        now: i64,
        /// The accepted distance in seconds.
        threshold: u64,
    },

    /// The nonce was already used with this client, token and timestamp.
    #[error("Nonce already used: {0}")]
    ReplayedNonce(String),

    /// `oauth_signature_method` is not registered on the server.
    #[error("Signature method '{method}' not supported, try one of the following: {supported}")]
    UnsupportedSignatureMethod {
        /// The requested method name.
        method: String,
        /// Comma separated names of the registered methods.
        supported: String,
    },

    /// The signature did not verify.
    #[error("Invalid signature")]
    InvalidSignature,

    /// The request URL could not be normalized.
    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),

    /// The `Authorization` header is not a well-formed OAuth header.
    #[error("Invalid Authorization header format")]
    InvalidAuthHeader,

    /// RSA key material could not be fetched or parsed.
    #[error("RSA key error: {0}")]
    KeyMaterial(String),

    /// The credential store failed.
    #[error("Credential store error: {0}")]
    Store(String),

    /// Configuration or credential parsing failed.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Convenience result type for OAuth operations.
pub type OAuthResult<T> = Result<T, OAuthError>;
