//! Credential store contract and an in-memory implementation.
//!
//! The server never persists anything itself. Clients, tokens and seen
//! nonces live behind [`CredentialStore`], which an embedder backs with
//! whatever storage it runs on. [`MemoryStore`] keeps everything in
//! concurrent maps and is suitable for tests and single-process servers.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::{DashMap, DashSet};
use oauth1_core::{Client, Token, TokenType};
use tracing::debug;

use crate::error::{OAuthError, OAuthResult};

/// Lookups and issuance the server delegates to storage.
pub trait CredentialStore: Send + Sync {
    /// Find a client by its key.
    fn lookup_client(&self, client_key: &str) -> OAuthResult<Option<Client>>;

    /// Find a token of the given type issued to `client`.
    fn lookup_token(
        &self,
        client: &Client,
        token_type: TokenType,
        token_key: &str,
    ) -> OAuthResult<Option<Token>>;

    /// Record a nonce, returning `true` if the same
    /// (client, token, nonce, timestamp) was already recorded.
    ///
    /// The check and the insert must be a single atomic operation, otherwise
    /// two concurrent replays can both pass.
    fn lookup_nonce(
        &self,
        client: &Client,
        token: &Token,
        nonce: &str,
        timestamp: i64,
    ) -> OAuthResult<bool>;

    /// Issue a request token to `client`.
    fn new_request_token(&self, client: &Client, callback: Option<&str>) -> OAuthResult<Token>;

    /// Exchange an authorized request token for an access token. The
    /// request token must not be usable afterwards.
    fn new_access_token(
        &self,
        request_token: &Token,
        client: &Client,
        verifier: Option<&str>,
    ) -> OAuthResult<Token>;
}

impl<S: CredentialStore + ?Sized> CredentialStore for Arc<S> {
    fn lookup_client(&self, client_key: &str) -> OAuthResult<Option<Client>> {
        (**self).lookup_client(client_key)
    }

    fn lookup_token(
        &self,
        client: &Client,
        token_type: TokenType,
        token_key: &str,
    ) -> OAuthResult<Option<Token>> {
        (**self).lookup_token(client, token_type, token_key)
    }

    fn lookup_nonce(
        &self,
        client: &Client,
        token: &Token,
        nonce: &str,
        timestamp: i64,
    ) -> OAuthResult<bool> {
        (**self).lookup_nonce(client, token, nonce, timestamp)
    }

    fn new_request_token(&self, client: &Client, callback: Option<&str>) -> OAuthResult<Token> {
        (**self).new_request_token(client, callback)
    }

    fn new_access_token(
        &self,
        request_token: &Token,
        client: &Client,
        verifier: Option<&str>,
    ) -> OAuthResult<Token> {
        (**self).new_access_token(request_token, client, verifier)
    }
}

impl<S: CredentialStore + ?Sized> CredentialStore for &S {
    fn lookup_client(&self, client_key: &str) -> OAuthResult<Option<Client>> {
        (**self).lookup_client(client_key)
    }

    fn lookup_token(
        &self,
        client: &Client,
        token_type: TokenType,
        token_key: &str,
    ) -> OAuthResult<Option<Token>> {
        (**self).lookup_token(client, token_type, token_key)
    }

    fn lookup_nonce(
        &self,
        client: &Client,
        token: &Token,
        nonce: &str,
        timestamp: i64,
    ) -> OAuthResult<bool> {
        (**self).lookup_nonce(client, token, nonce, timestamp)
    }

    fn new_request_token(&self, client: &Client, callback: Option<&str>) -> OAuthResult<Token> {
        (**self).new_request_token(client, callback)
    }

    fn new_access_token(
        &self,
        request_token: &Token,
        client: &Client,
        verifier: Option<&str>,
    ) -> OAuthResult<Token> {
        (**self).new_access_token(request_token, client, verifier)
    }
}

#[derive(Debug, Clone)]
struct IssuedToken {
    token: Token,
    client_key: String,
    callback: Option<String>,
    verifier: Option<String>,
}

type NonceKey = (String, String, String, i64);

/// A [`CredentialStore`] backed by concurrent in-memory maps.
#[derive(Debug, Default)]
pub struct MemoryStore {
    clients: DashMap<String, Client>,
    tokens: DashMap<(TokenType, String), IssuedToken>,
    nonces: DashSet<NonceKey>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a client.
    pub fn register_client(&self, client: Client) {
        debug!(client = %client.key(), "Registered client");
        self.clients.insert(client.key().to_owned(), client);
    }

    /// Mark a request token as authorized by the resource owner and return
    /// the verifier the client must present when exchanging it.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::InvalidToken`] if no such request token exists.
    pub fn authorize_request_token(&self, token_key: &str) -> OAuthResult<String> {
        let mut issued = self
            .tokens
            .get_mut(&(TokenType::Request, token_key.to_owned()))
            .ok_or_else(|| OAuthError::InvalidToken {
                token_type: TokenType::Request.to_string(),
                key: token_key.to_owned(),
            })?;
        let verifier = generate_secret();
        issued.verifier = Some(verifier.clone());
        debug!(token = %token_key, "Authorized request token");
        Ok(verifier)
    }

    /// The callback recorded when a request token was issued.
    #[must_use]
    pub fn request_token_callback(&self, token_key: &str) -> Option<String> {
        self.tokens
            .get(&(TokenType::Request, token_key.to_owned()))
            .and_then(|issued| issued.callback.clone())
    }

    /// Revoke a token. Returns whether it existed.
    pub fn revoke_token(&self, token_type: TokenType, token_key: &str) -> bool {
        self.tokens
            .remove(&(token_type, token_key.to_owned()))
            .is_some()
    }

    /// Forget nonces recorded with a timestamp before `older_than`. Returns
    /// how many were dropped.
    ///
    /// Nonces outside the server's timestamp window can never be replayed
    /// successfully, so pruning them is safe.
    pub fn prune_nonces(&self, older_than: i64) -> usize {
        let before = self.nonces.len();
        self.nonces.retain(|(_, _, _, timestamp)| *timestamp >= older_than);
        before.saturating_sub(self.nonces.len())
    }

    fn issue(&self, token_type: TokenType, client: &Client, callback: Option<&str>) -> Token {
        let token = Token::new(generate_secret(), generate_secret());
        self.tokens.insert(
            (token_type, token.key().to_owned()),
            IssuedToken {
                token: token.clone(),
                client_key: client.key().to_owned(),
                callback: callback.map(ToOwned::to_owned),
                verifier: None,
            },
        );
        debug!(client = %client.key(), token = %token.key(), %token_type, "Issued token");
        token
    }
}

impl CredentialStore for MemoryStore {
    fn lookup_client(&self, client_key: &str) -> OAuthResult<Option<Client>> {
        Ok(self.clients.get(client_key).map(|c| c.value().clone()))
    }

    fn lookup_token(
        &self,
        client: &Client,
        token_type: TokenType,
        token_key: &str,
    ) -> OAuthResult<Option<Token>> {
        Ok(self
            .tokens
            .get(&(token_type, token_key.to_owned()))
            .filter(|issued| issued.client_key == client.key())
            .map(|issued| issued.token.clone()))
    }

    fn lookup_nonce(
        &self,
        client: &Client,
        token: &Token,
        nonce: &str,
        timestamp: i64,
    ) -> OAuthResult<bool> {
        let key = (
            client.key().to_owned(),
            token.key().to_owned(),
            nonce.to_owned(),
            timestamp,
        );
        Ok(!self.nonces.insert(key))
    }

    fn new_request_token(&self, client: &Client, callback: Option<&str>) -> OAuthResult<Token> {
        Ok(self.issue(TokenType::Request, client, callback))
    }

    fn new_access_token(
        &self,
        request_token: &Token,
        client: &Client,
        verifier: Option<&str>,
    ) -> OAuthResult<Token> {
        let invalid = || OAuthError::InvalidToken {
            token_type: TokenType::Request.to_string(),
            key: request_token.key().to_owned(),
        };

        // The entry guard holds the shard lock; release it before issuing.
        {
            let Entry::Occupied(entry) = self
                .tokens
                .entry((TokenType::Request, request_token.key().to_owned()))
            else {
                return Err(invalid());
            };
            let issued = entry.get();
            if issued.client_key != client.key() {
                return Err(invalid());
            }
            match issued.verifier.as_deref() {
                None => {
                    return Err(OAuthError::UnauthorizedToken(format!(
                        "{} has not been authorized",
                        request_token.key()
                    )));
                }
                Some(expected) if Some(expected) != verifier => {
                    return Err(OAuthError::UnauthorizedToken(format!(
                        "verifier mismatch for {}",
                        request_token.key()
                    )));
                }
                Some(_) => {}
            }
            entry.remove();
        }

        Ok(self.issue(TokenType::Access, client, None))
    }
}

fn generate_secret() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
