//! Signature methods.
//!
//! A server accepts a fixed set of methods, looked up by the name carried in
//! `oauth_signature_method`. The set is closed: [`SignatureMethod`] is an enum
//! over the three methods RFC 5849 defines, and a name that is not
//! registered on the server is rejected rather than resolved.
//!
//! # Methods
//!
//! - [`HmacSha1`] - `HMAC-SHA1` over the signature base string
//! - [`PlainText`] - `PLAINTEXT`, the signature key itself
//! - [`RsaSha1`] - `RSA-SHA1` (PKCS#1 v1.5), keys supplied by a [`RsaKeySource`]

mod hmac_sha1;
mod plaintext;
mod rsa_sha1;

use std::fmt;
use std::sync::Arc;

use oauth1_core::encoding::encode;
use oauth1_core::{Client, Token};
use subtle::ConstantTimeEq;

pub use self::hmac_sha1::HmacSha1;
pub use self::plaintext::PlainText;
pub use self::rsa_sha1::{PemKeySource, RsaKeySource, RsaSha1};
use crate::error::OAuthResult;
use crate::request::Request;

/// A signature algorithm.
pub trait Signer: Send + Sync + fmt::Debug {
    /// The name carried in `oauth_signature_method`.
    fn name(&self) -> &'static str;

    /// Compute the signature of `request`.
    fn build_signature(&self, request: &Request, client: &Client, token: &Token)
    -> OAuthResult<String>;

    /// Check a candidate signature.
    ///
    /// The default rebuilds the signature and compares in constant time.
    fn check_signature(
        &self,
        request: &Request,
        client: &Client,
        token: &Token,
        signature: &str,
    ) -> OAuthResult<bool> {
        let expected = self.build_signature(request, client, token)?;
        Ok(expected.as_bytes().ct_eq(signature.as_bytes()).into())
    }
}

/// The key shared-secret methods sign with:
/// `encode(client secret) & encode(token secret)`.
///
/// # Examples
///
/// ```
/// use oauth1_auth::signature::signature_key;
/// use oauth1_core::{Client, Token};
///
/// let client = Client::new("key", "secret");
/// assert_eq!(signature_key(&client, &Token::null()), "secret&");
/// assert_eq!(signature_key(&client, &Token::new("t", "a b")), "secret&a%20b");
/// ```
#[must_use]
pub fn signature_key(client: &Client, token: &Token) -> String {
    format!("{}&{}", encode(client.secret()), encode(token.secret()))
}

/// One of the supported signature methods.
#[derive(Debug, Clone)]
pub enum SignatureMethod {
    /// `HMAC-SHA1`.
    HmacSha1(HmacSha1),
    /// `PLAINTEXT`.
    PlainText(PlainText),
    /// `RSA-SHA1`.
    RsaSha1(RsaSha1),
}

impl SignatureMethod {
    /// `HMAC-SHA1`.
    #[must_use]
    pub fn hmac_sha1() -> Self {
        Self::HmacSha1(HmacSha1)
    }

    /// `PLAINTEXT`.
    #[must_use]
    pub fn plaintext() -> Self {
        Self::PlainText(PlainText)
    }

    /// `RSA-SHA1` with keys from `source`.
    #[must_use]
    pub fn rsa_sha1(source: Arc<dyn RsaKeySource>) -> Self {
        Self::RsaSha1(RsaSha1::new(source))
    }

    /// Resolve a method that needs no key material by name.
    ///
    /// `RSA-SHA1` is not resolvable here since it needs a key source.
    #[must_use]
    pub fn shared_secret(name: &str) -> Option<Self> {
        match name {
            HmacSha1::NAME => Some(Self::hmac_sha1()),
            PlainText::NAME => Some(Self::plaintext()),
            _ => None,
        }
    }

    fn signer(&self) -> &dyn Signer {
        match self {
            Self::HmacSha1(m) => m,
            Self::PlainText(m) => m,
            Self::RsaSha1(m) => m,
        }
    }

    /// The name carried in `oauth_signature_method`.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.signer().name()
    }

    /// Compute the signature of `request`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request URL cannot be normalized or key
    /// material is unavailable.
    pub fn build_signature(
        &self,
        request: &Request,
        client: &Client,
        token: &Token,
    ) -> OAuthResult<String> {
        self.signer().build_signature(request, client, token)
    }

    /// Check a candidate signature for `request`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request URL cannot be normalized or key
    /// material is unavailable. A signature that simply does not match is
    /// `Ok(false)`.
    pub fn check_signature(
        &self,
        request: &Request,
        client: &Client,
        token: &Token,
        signature: &str,
    ) -> OAuthResult<bool> {
        self.signer()
            .check_signature(request, client, token, signature)
    }
}
