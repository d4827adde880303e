//! Credential types shared by signers and servers.
//!
//! A [`Client`] identifies a registered application, a [`Token`] a grant
//! issued to it. Both are immutable key/secret pairs. Their `Debug`
//! implementations never print the secret.

use std::fmt;

use crate::encoding::{encode, parse_form};
use crate::error::{CoreError, CoreResult};

/// A registered client application (a "consumer" in OAuth 1.0 terms).
#[derive(Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    key: String,
    secret: String,
    callback_url: Option<String>,
}

impl Client {
    /// Create a client from its key and shared secret.
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
            callback_url: None,
        }
    }

    /// Attach the callback URL registered for this client.
    #[must_use]
    pub fn with_callback(mut self, callback_url: impl Into<String>) -> Self {
        self.callback_url = Some(callback_url.into());
        self
    }

    /// The public client identifier.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The shared secret.
    #[must_use]
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// The registered callback URL, if any.
    #[must_use]
    pub fn callback_url(&self) -> Option<&str> {
        self.callback_url.as_deref()
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("key", &self.key)
            .field("secret", &"<redacted>")
            .field("callback_url", &self.callback_url)
            .finish()
    }
}

/// A request or access token.
///
/// The empty token returned by [`Token::null`] stands for "no token yet"
/// during the temporary credential request. It signs exactly like a real
/// token whose secret is the empty string.
#[derive(Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Token {
    key: String,
    secret: String,
}

impl Token {
    /// Create a token from its key and secret.
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
        }
    }

    /// The token used before any token has been issued.
    #[must_use]
    pub fn null() -> Self {
        Self {
            key: String::new(),
            secret: String::new(),
        }
    }

    /// Whether this is the [`Token::null`] placeholder.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.key.is_empty() && self.secret.is_empty()
    }

    /// The token identifier sent as `oauth_token`.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The token secret.
    #[must_use]
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Serialize the token the way token endpoints return it.
    ///
    /// # Examples
    ///
    /// ```
    /// use oauth1_core::Token;
    ///
    /// let token = Token::new("foo", "bar baz");
    /// assert_eq!(token.to_wire_format(), "oauth_token=foo&oauth_token_secret=bar%20baz");
    /// ```
    #[must_use]
    pub fn to_wire_format(&self) -> String {
        format!(
            "oauth_token={}&oauth_token_secret={}",
            encode(&self.key),
            encode(&self.secret)
        )
    }

    /// Parse a token endpoint response body.
    ///
    /// Additional parameters such as `oauth_callback_confirmed` are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidTokenResponse`] if either `oauth_token` or
    /// `oauth_token_secret` is missing.
    pub fn from_wire_format(body: &str) -> CoreResult<Self> {
        let pairs = parse_form(body.trim());
        let field = |name: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone())
                .ok_or_else(|| CoreError::InvalidTokenResponse(format!("missing {name}")))
        };

        Ok(Self {
            key: field("oauth_token")?,
            secret: field("oauth_token_secret")?,
        })
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("key", &self.key)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// The grant a token belongs to. Stores key their tokens by this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Temporary credentials, awaiting or holding resource owner authorization.
    Request,
    /// Token credentials used to access protected resources.
    Access,
}

impl TokenType {
    /// The tag as a lowercase string.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Request => "request",
            Self::Access => "access",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
