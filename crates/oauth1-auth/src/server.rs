//! Server-side request verification.
//!
//! Every entry point runs the same sequence of checks, stopping at the first
//! failure:
//!
//! 1. `oauth_version`, if present, is `1.0`
//! 2. `oauth_consumer_key` names a known client
//! 3. `oauth_token` names a token of the expected type (skipped when asking
//!    for a request token)
//! 4. `oauth_timestamp` lies within the configured window of the server clock
//! 5. `oauth_nonce` has not been seen with this client, token and timestamp
//! 6. `oauth_signature_method` is registered on the server
//! 7. `oauth_signature` verifies

use std::sync::Arc;

use oauth1_core::{Client, CoreError, ServerConfig, Token, TokenType};
use tracing::{debug, warn};

use crate::clock::{Clock, SystemClock};
use crate::error::{OAuthError, OAuthResult};
use crate::request::{OAUTH_VERSION, Request};
use crate::signature::SignatureMethod;
use crate::store::CredentialStore;

/// An OAuth 1.0a service provider.
#[derive(Debug)]
pub struct Server<S> {
    store: S,
    signature_methods: Vec<SignatureMethod>,
    timestamp_threshold: u64,
    clock: Arc<dyn Clock>,
}

impl<S: CredentialStore> Server<S> {
    /// Create a server over `store`, registering the methods named in
    /// `config`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`] if `config` names a method that
    /// is unknown or needs key material (`RSA-SHA1`; register it with
    /// [`Server::add_signature_method`]).
    pub fn new(store: S, config: &ServerConfig) -> OAuthResult<Self> {
        let mut server = Self {
            store,
            signature_methods: Vec::new(),
            timestamp_threshold: config.timestamp_threshold,
            clock: Arc::new(SystemClock),
        };
        for name in &config.signature_methods {
            let method =
                SignatureMethod::shared_secret(name).ok_or_else(|| CoreError::InvalidConfig {
                    name: "signature_methods".to_owned(),
                    value: name.clone(),
                })?;
            server.add_signature_method(method);
        }
        Ok(server)
    }

    /// Use `clock` instead of the system clock for timestamp checks.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Accept `method`, replacing any registered method of the same name.
    pub fn add_signature_method(&mut self, method: SignatureMethod) {
        self.signature_methods.retain(|m| m.name() != method.name());
        self.signature_methods.push(method);
    }

    /// Names of the accepted signature methods, in registration order.
    #[must_use]
    pub fn signature_methods(&self) -> Vec<&'static str> {
        self.signature_methods.iter().map(SignatureMethod::name).collect()
    }

    /// The credential store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Handle a temporary credential request and issue a request token.
    ///
    /// The request is signed with the client secret only. `oauth_callback`
    /// is handed to the store.
    ///
    /// # Errors
    ///
    /// Returns the [`OAuthError`] of the first failing check.
    pub fn fetch_request_token(&self, request: &Request) -> OAuthResult<Token> {
        let (client, _) = self
            .authenticate(request, None)
            .inspect_err(|err| warn!(%err, "Rejected request token request"))?;
        let token = self
            .store
            .new_request_token(&client, request.parameter("oauth_callback"))?;
        debug!(client = %client.key(), token = %token.key(), "Issued request token");
        Ok(token)
    }

    /// Exchange an authorized request token for an access token.
    ///
    /// `oauth_verifier` is handed to the store, which also invalidates the
    /// request token.
    ///
    /// # Errors
    ///
    /// Returns the [`OAuthError`] of the first failing check, or the store's
    /// refusal to exchange the token.
    pub fn fetch_access_token(&self, request: &Request) -> OAuthResult<Token> {
        let (client, request_token) = self
            .authenticate(request, Some(TokenType::Request))
            .inspect_err(|err| warn!(%err, "Rejected access token request"))?;
        let token = self
            .store
            .new_access_token(&request_token, &client, request.parameter("oauth_verifier"))
            .inspect_err(|err| warn!(%err, "Request token exchange refused"))?;
        debug!(client = %client.key(), token = %token.key(), "Issued access token");
        Ok(token)
    }

    /// Verify a request for a protected resource and return the
    /// authenticated client and access token.
    ///
    /// # Errors
    ///
    /// Returns the [`OAuthError`] of the first failing check.
    pub fn verify_request(&self, request: &Request) -> OAuthResult<(Client, Token)> {
        self.authenticate(request, Some(TokenType::Access))
            .inspect_err(|err| warn!(%err, "Rejected protected resource request"))
    }

    fn authenticate(
        &self,
        request: &Request,
        token_type: Option<TokenType>,
    ) -> OAuthResult<(Client, Token)> {
        check_version(request)?;
        let client = self.lookup_client(request)?;
        let token = match token_type {
            Some(token_type) => self.lookup_token(request, &client, token_type)?,
            None => Token::null(),
        };
        self.check_signature(request, &client, &token)?;
        debug!(client = %client.key(), token = %token.key(), "Request verified");
        Ok((client, token))
    }

    fn lookup_client(&self, request: &Request) -> OAuthResult<Client> {
        let key = required(request, "oauth_consumer_key")?;
        self.store
            .lookup_client(key)?
            .ok_or_else(|| OAuthError::UnknownClient(key.to_owned()))
    }

    fn lookup_token(
        &self,
        request: &Request,
        client: &Client,
        token_type: TokenType,
    ) -> OAuthResult<Token> {
        let key = required(request, "oauth_token")?;
        self.store
            .lookup_token(client, token_type, key)?
            .ok_or_else(|| OAuthError::InvalidToken {
                token_type: token_type.to_string(),
                key: key.to_owned(),
            })
    }

    fn check_signature(&self, request: &Request, client: &Client, token: &Token) -> OAuthResult<()> {
        let timestamp = self.check_timestamp(request)?;
        self.check_nonce(request, client, token, timestamp)?;

        let method = self.signature_method(request)?;
        let signature = request.parameter("oauth_signature").unwrap_or_default();
        if method.check_signature(request, client, token, signature)? {
            Ok(())
        } else {
            Err(OAuthError::InvalidSignature)
        }
    }

    fn check_timestamp(&self, request: &Request) -> OAuthResult<i64> {
        let raw = required(request, "oauth_timestamp")?;
        let timestamp: i64 = raw.parse().map_err(|_| OAuthError::InvalidParameter {
            name: "oauth_timestamp".to_owned(),
            value: raw.to_owned(),
        })?;

        let now = self.clock.now();
        if now.abs_diff(timestamp) > self.timestamp_threshold {
            return Err(OAuthError::ExpiredTimestamp {
                timestamp,
                now,
                threshold: self.timestamp_threshold,
            });
        }
        Ok(timestamp)
    }

    fn check_nonce(
        &self,
        request: &Request,
        client: &Client,
        token: &Token,
        timestamp: i64,
    ) -> OAuthResult<()> {
        let nonce = required(request, "oauth_nonce")?;
        if self.store.lookup_nonce(client, token, nonce, timestamp)? {
            return Err(OAuthError::ReplayedNonce(nonce.to_owned()));
        }
        Ok(())
    }

    fn signature_method(&self, request: &Request) -> OAuthResult<&SignatureMethod> {
        let name = required(request, "oauth_signature_method")?;
        self.signature_methods
            .iter()
            .find(|m| m.name() == name)
            .ok_or_else(|| OAuthError::UnsupportedSignatureMethod {
                method: name.to_owned(),
                supported: self.signature_methods().join(", "),
            })
    }
}

fn check_version(request: &Request) -> OAuthResult<()> {
    match request.parameter("oauth_version").filter(|v| !v.is_empty()) {
        None | Some(OAUTH_VERSION) => Ok(()),
        Some(other) => Err(OAuthError::UnsupportedVersion(other.to_owned())),
    }
}

/// A parameter that must be present and non-empty.
fn required<'a>(request: &'a Request, name: &str) -> OAuthResult<&'a str> {
    request
        .parameter(name)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| OAuthError::MissingParameter(name.to_owned()))
}
