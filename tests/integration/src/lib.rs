//! End-to-end tests for OAuth 1.0a flows.
//!
//! Each test plays both roles in one process: a consumer builds and signs a
//! request, it is "sent" by serializing it to an `Authorization` header or a
//! form body, and the provider rebuilds it from those pieces and verifies it.
//!
//! Log output is controlled with `RUST_LOG`:
//! ```text
//! RUST_LOG=oauth1_auth=debug cargo test -p oauth1-integration
//! ```

use std::sync::{Arc, Once};

use oauth1_auth::{FixedClock, MemoryStore, Request, Server, SignatureMethod};
use oauth1_core::{Client, ServerConfig, Token};
use tracing::{debug, info};

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Base URL of the simulated service provider.
pub const PROVIDER_URL: &str = "https://photos.example.net";

/// A service provider with one registered client.
#[derive(Debug)]
pub struct Provider {
    /// The server under test.
    pub server: Server<Arc<MemoryStore>>,
    /// The store behind the server, shared for authorization steps.
    pub store: Arc<MemoryStore>,
    /// The server clock, starting at the current time.
    pub clock: Arc<FixedClock>,
    /// The registered client.
    pub client: Client,
}

/// Create a provider with the default configuration.
#[must_use]
pub fn provider() -> Provider {
    provider_with(&ServerConfig::default())
}

/// Create a provider with `config`.
#[must_use]
pub fn provider_with(config: &ServerConfig) -> Provider {
    init_tracing();

    let client = Client::new("dpf43f3p2l4k3l03", "kd94hf93k423kf44")
        .with_callback("http://printer.example.com/ready");
    let store = Arc::new(MemoryStore::new());
    store.register_client(client.clone());

    let clock = Arc::new(FixedClock::new(chrono::Utc::now().timestamp()));
    let server = Server::new(Arc::clone(&store), config)
        .unwrap_or_else(|e| panic!("failed to create server: {e}"))
        .with_clock(Arc::clone(&clock));

    Provider {
        server,
        store,
        clock,
        client,
    }
}

/// Build and sign a consumer request.
#[must_use]
pub fn signed_request(
    method: &str,
    path: &str,
    client: &Client,
    token: &Token,
    signature_method: &SignatureMethod,
) -> Request {
    let mut request = Request::for_client(method, format!("{PROVIDER_URL}{path}"), client, token);
    request
        .sign(signature_method, client, token)
        .unwrap_or_else(|e| panic!("failed to sign request: {e}"));
    request
}

/// Send a request with its OAuth parameters in the `Authorization` header
/// and return what the provider reconstructs.
#[must_use]
pub fn transmit(request: &Request) -> Request {
    let header = request.to_header(Some("Photos"));
    debug!(method = %request.method(), url = %request.url(), %header, "Sending request");
    Request::from_http(request.method(), request.url(), Some(&header), None)
        .unwrap_or_else(|e| panic!("failed to parse request: {e}"))
}

/// Send a request with every parameter in a form body.
#[must_use]
pub fn transmit_as_form(request: &Request) -> Request {
    let url = request
        .normalized_url()
        .unwrap_or_else(|e| panic!("invalid url: {e}"));
    let body = request.to_postdata();
    debug!(method = %request.method(), %url, %body, "Sending form request");
    Request::from_http(request.method(), url, None, Some(&body))
        .unwrap_or_else(|e| panic!("failed to parse request: {e}"))
}

/// Run the request token, authorization and access token steps and return
/// the access token.
#[must_use]
pub fn obtain_access_token(provider: &Provider) -> Token {
    let hmac = SignatureMethod::hmac_sha1();
    let client = &provider.client;

    let request = signed_request("POST", "/initiate", client, &Token::null(), &hmac);
    let request_token = provider
        .server
        .fetch_request_token(&transmit(&request))
        .unwrap_or_else(|e| panic!("request token refused: {e}"));

    let verifier = provider
        .store
        .authorize_request_token(request_token.key())
        .unwrap_or_else(|e| panic!("authorization failed: {e}"));

    let mut request = Request::for_client(
        "POST",
        format!("{PROVIDER_URL}/token"),
        client,
        &request_token,
    );
    request.set_parameter("oauth_verifier", verifier);
    request
        .sign(&hmac, client, &request_token)
        .unwrap_or_else(|e| panic!("failed to sign request: {e}"));

    let access_token = provider
        .server
        .fetch_access_token(&transmit(&request))
        .unwrap_or_else(|e| panic!("access token refused: {e}"));
    info!(token = %access_token.key(), "Obtained access token");
    access_token
}

mod test_access_token;
mod test_request_token;
mod test_rsa;
