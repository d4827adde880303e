//! OAuth request canonicalization (RFC 5849 section 3.4.1).
//!
//! A [`Request`] is an HTTP method, a URL and an ordered list of parameters
//! collected from the query string, a form body and the `Authorization`
//! header. From it the signature base string is derived:
//!
//! ```text
//! METHOD & encode(normalized URL) & encode(sorted, encoded name=value pairs)
//! ```
//!
//! Consumers also use [`Request`] to build and sign outgoing requests
//! ([`Request::for_client`], [`Request::sign`]) and to serialize them as a
//! query string, a form body or an `Authorization` header.

use oauth1_core::encoding::{decode, encode, parse_form};
use oauth1_core::{Client, Token};
use tracing::debug;

use crate::error::{OAuthError, OAuthResult};
use crate::signature::SignatureMethod;

/// The only protocol version this crate speaks.
pub const OAUTH_VERSION: &str = "1.0";

/// An HTTP request as seen by the signer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: String,
    url: String,
    parameters: Vec<(String, String)>,
}

impl Request {
    /// Create a request. Parameters in the URL's query string are collected
    /// into the parameter list.
    ///
    /// # Examples
    ///
    /// ```
    /// use oauth1_auth::Request;
    ///
    /// let request = Request::new("get", "https://api.example.com:443/photos?size=original");
    /// assert_eq!(request.parameter("size"), Some("original"));
    /// assert_eq!(request.normalized_url().unwrap(), "https://api.example.com/photos");
    /// ```
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        let url = url.into();
        let parameters = query_string(&url).map(parse_form).unwrap_or_default();
        Self {
            method: method.into(),
            url,
            parameters,
        }
    }

    /// Build a request from its HTTP pieces: the URL query, an
    /// `application/x-www-form-urlencoded` body and an OAuth `Authorization`
    /// header. `realm` in the header is not a signable parameter and is
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::InvalidAuthHeader`] if the header is present but
    /// not a well-formed OAuth header.
    pub fn from_http(
        method: impl Into<String>,
        url: impl Into<String>,
        authorization: Option<&str>,
        form_body: Option<&str>,
    ) -> OAuthResult<Self> {
        let mut request = Self::new(method, url);
        if let Some(body) = form_body {
            request.parameters.extend(parse_form(body));
        }
        if let Some(header) = authorization {
            request
                .parameters
                .extend(parse_authorization_header(header)?);
        }
        Ok(request)
    }

    /// Start an outgoing request on behalf of `client`.
    ///
    /// Adds `oauth_version`, a fresh `oauth_nonce`, the current
    /// `oauth_timestamp`, `oauth_consumer_key` and, unless `token` is
    /// [`Token::null`], `oauth_token`. Call [`Request::sign`] afterwards.
    pub fn for_client(
        method: impl Into<String>,
        url: impl Into<String>,
        client: &Client,
        token: &Token,
    ) -> Self {
        let mut request = Self::new(method, url);
        request.set_parameter("oauth_version", OAUTH_VERSION);
        request.set_parameter("oauth_nonce", generate_nonce());
        request.set_parameter(
            "oauth_timestamp",
            chrono::Utc::now().timestamp().to_string(),
        );
        request.set_parameter("oauth_consumer_key", client.key());
        if !token.is_null() {
            request.set_parameter("oauth_token", token.key());
        }
        request
    }

    /// The HTTP method as given.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The URL as given, including any query string.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The first value of the named parameter.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// All parameters, decoded, in insertion order.
    #[must_use]
    pub fn parameters(&self) -> &[(String, String)] {
        &self.parameters
    }

    /// Replace every value of `name` with a single `value`.
    pub fn set_parameter(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.parameters.retain(|(k, _)| *k != name);
        self.parameters.push((name, value.into()));
    }

    /// Append a value for `name`, keeping any existing ones.
    pub fn add_parameter(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.parameters.push((name.into(), value.into()));
    }

    /// Remove every value of `name`.
    pub fn remove_parameter(&mut self, name: &str) {
        self.parameters.retain(|(k, _)| k != name);
    }

    /// The uppercased HTTP method.
    #[must_use]
    pub fn normalized_method(&self) -> String {
        self.method.to_uppercase()
    }

    /// The URL reduced to `scheme://host[:port]/path`.
    ///
    /// Scheme and host are lowercased, default ports (80 for http, 443 for
    /// https) are dropped and so are the query and fragment. A URL without a
    /// scheme is taken to be `http`.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::InvalidUrl`] if the URL has no usable host.
    pub fn normalized_url(&self) -> OAuthResult<String> {
        normalize_url(&self.url)
    }

    /// The signable parameters, percent-encoded and sorted by name then
    /// value. `oauth_signature` is excluded.
    #[must_use]
    pub fn signable_parameters(&self) -> Vec<(String, String)> {
        encoded_sorted(
            self.parameters
                .iter()
                .filter(|(k, _)| k != "oauth_signature"),
        )
    }

    /// The signature base string for this request.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::InvalidUrl`] if the URL cannot be normalized.
    pub fn signature_base_string(&self) -> OAuthResult<String> {
        let parameters = join_pairs(&self.signable_parameters());
        let base = format!(
            "{}&{}&{}",
            encode(&self.normalized_method()),
            encode(&self.normalized_url()?),
            encode(&parameters)
        );
        debug!(base_string = %base, "Built signature base string");
        Ok(base)
    }

    /// Sign the request, setting `oauth_signature_method` and
    /// `oauth_signature`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be normalized or the method fails
    /// to produce a signature (for example, missing RSA key material).
    pub fn sign(
        &mut self,
        method: &SignatureMethod,
        client: &Client,
        token: &Token,
    ) -> OAuthResult<()> {
        self.set_parameter("oauth_signature_method", method.name());
        let signature = method.build_signature(self, client, token)?;
        self.set_parameter("oauth_signature", signature);
        Ok(())
    }

    /// Every parameter, encoded and sorted, as a form body.
    #[must_use]
    pub fn to_postdata(&self) -> String {
        join_pairs(&encoded_sorted(self.parameters.iter()))
    }

    /// The normalized URL with every parameter in the query string.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::InvalidUrl`] if the URL cannot be normalized.
    pub fn to_url(&self) -> OAuthResult<String> {
        let url = self.normalized_url()?;
        let postdata = self.to_postdata();
        if postdata.is_empty() {
            Ok(url)
        } else {
            Ok(format!("{url}?{postdata}"))
        }
    }

    /// An `Authorization` header value carrying the `oauth_*` parameters.
    #[must_use]
    pub fn to_header(&self, realm: Option<&str>) -> String {
        let realm = realm.map(|r| format!("realm=\"{}\"", encode(r)));
        let fields: Vec<String> = realm
            .into_iter()
            .chain(
                self.parameters
                    .iter()
                    .filter(|(k, _)| k.starts_with("oauth_"))
                    .map(|(k, v)| format!("{}=\"{}\"", encode(k), encode(v))),
            )
            .collect();
        format!("OAuth {}", fields.join(", "))
    }
}

/// Parse an OAuth `Authorization` header into decoded name/value pairs.
///
/// The `realm` field is dropped.
///
/// # Errors
///
/// Returns [`OAuthError::InvalidAuthHeader`] if the scheme is not `OAuth` or
/// a field is not of the form `name="value"`.
///
/// # Examples
///
/// ```
/// use oauth1_auth::parse_authorization_header;
///
/// let pairs = parse_authorization_header(
///     r#"OAuth realm="Photos", oauth_consumer_key="dpf43f3p2l4k3l03", oauth_nonce="a%20b""#,
/// )
/// .unwrap();
/// assert_eq!(pairs[0], ("oauth_consumer_key".to_owned(), "dpf43f3p2l4k3l03".to_owned()));
/// assert_eq!(pairs[1], ("oauth_nonce".to_owned(), "a b".to_owned()));
/// ```
pub fn parse_authorization_header(header: &str) -> OAuthResult<Vec<(String, String)>> {
    let header = header.trim();
    let (scheme, fields) = header
        .split_once(char::is_whitespace)
        .unwrap_or((header, ""));
    if !scheme.eq_ignore_ascii_case("OAuth") {
        return Err(OAuthError::InvalidAuthHeader);
    }

    let mut pairs = Vec::new();
    for field in split_fields(fields)
        .into_iter()
        .map(str::trim)
        .filter(|f| !f.is_empty())
    {
        let (name, value) = field.split_once('=').ok_or(OAuthError::InvalidAuthHeader)?;
        let value = value
            .trim()
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .ok_or(OAuthError::InvalidAuthHeader)?;
        let name = decode(name.trim());
        if name == "realm" {
            continue;
        }
        pairs.push((name, decode(value)));
    }
    Ok(pairs)
}

fn generate_nonce() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

fn query_string(url: &str) -> Option<&str> {
    let end = url.find('#').unwrap_or(url.len());
    url[..end].split_once('?').map(|(_, query)| query)
}

fn normalize_url(url: &str) -> OAuthResult<String> {
    let invalid = || OAuthError::InvalidUrl(url.to_owned());

    let end = url.find(['?', '#']).unwrap_or(url.len());
    let url_without_query = &url[..end];
    let (scheme, rest) = match url_without_query.split_once("://") {
        Some((scheme, rest)) if is_scheme(scheme) => (scheme.to_ascii_lowercase(), rest),
        _ => ("http".to_owned(), url_without_query),
    };
    let (authority, path) = rest.split_at(rest.find('/').unwrap_or(rest.len()));

    let authority: http::uri::Authority = authority.parse().map_err(|_| invalid())?;
    let host = authority.host().to_ascii_lowercase();
    if host.is_empty() {
        return Err(invalid());
    }

    let default_port = match scheme.as_str() {
        "http" => Some(80),
        "https" => Some(443),
        _ => None,
    };
    match authority.port_u16() {
        Some(port) if Some(port) != default_port => Ok(format!("{scheme}://{host}:{port}{path}")),
        _ => Ok(format!("{scheme}://{host}{path}")),
    }
}

/// RFC 3986 `scheme = ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`.
fn is_scheme(candidate: &str) -> bool {
    candidate.starts_with(|c: char| c.is_ascii_alphabetic())
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Split header fields on commas outside quoted values.
fn split_fields(fields: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;
    for (i, c) in fields.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                parts.push(&fields[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&fields[start..]);
    parts
}

fn encoded_sorted<'a>(pairs: impl Iterator<Item = &'a (String, String)>) -> Vec<(String, String)> {
    let mut encoded: Vec<(String, String)> = pairs.map(|(k, v)| (encode(k), encode(v))).collect();
    encoded.sort();
    encoded
}

fn join_pairs(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}
