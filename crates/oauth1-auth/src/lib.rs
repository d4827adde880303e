//! OAuth 1.0a request signing and server-side verification.
//!
//! This crate implements RFC 5849 for both sides of the protocol. Consumers
//! build a [`Request`], sign it with one of the [`SignatureMethod`]s and send
//! it as a query string, form body or `Authorization` header. Service
//! providers rebuild the same [`Request`] from the incoming HTTP pieces and
//! run it through a [`Server`], which checks the protocol version, resolves
//! the client and token from a [`CredentialStore`], rejects stale timestamps
//! and replayed nonces, and verifies the signature.
//!
//! # Usage
//!
//! ```rust
//! use oauth1_auth::{MemoryStore, Request, Server, SignatureMethod};
//! use oauth1_core::{Client, ServerConfig, Token};
//!
//! let client = Client::new("dpf43f3p2l4k3l03", "kd94hf93k423kf44");
//! let store = MemoryStore::new();
//! store.register_client(client.clone());
//! let server = Server::new(store, &ServerConfig::default()).unwrap();
//!
//! // Consumer side
//! let mut request = Request::for_client(
//!     "POST",
//!     "https://photos.example.net/initiate",
//!     &client,
//!     &Token::null(),
//! );
//! request
//!     .sign(&SignatureMethod::hmac_sha1(), &client, &Token::null())
//!     .unwrap();
//! let header = request.to_header(Some("Photos"));
//!
//! // Provider side
//! let incoming =
//!     Request::from_http("POST", "https://photos.example.net/initiate", Some(&header), None)
//!         .unwrap();
//! let request_token = server.fetch_request_token(&incoming).unwrap();
//! assert!(!request_token.is_null());
//! ```
//!
//! # Modules
//!
//! - [`clock`] - Time source used for timestamp checks
//! - [`error`] - Verification error types
//! - [`request`] - Request canonicalization and signature base strings
//! - [`server`] - The verification sequence and token issuance
//! - [`signature`] - HMAC-SHA1, PLAINTEXT and RSA-SHA1
//! - [`store`] - Credential store contract and in-memory implementation

pub mod clock;
pub mod error;
pub mod request;
pub mod server;
pub mod signature;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{OAuthError, OAuthResult};
pub use request::{Request, parse_authorization_header};
pub use server::Server;
pub use signature::{PemKeySource, RsaKeySource, SignatureMethod, Signer};
pub use store::{CredentialStore, MemoryStore};
