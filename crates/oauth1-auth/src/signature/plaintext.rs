//! `PLAINTEXT` (RFC 5849 section 3.4.4).
//!
//! The signature is the signature key itself. It offers no protection of its
//! own and is only meant for use over TLS.

use oauth1_core::{Client, Token};

use super::{Signer, signature_key};
use crate::error::OAuthResult;
use crate::request::Request;

/// The signature key, unhashed.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainText;

impl PlainText {
    /// The method name.
    pub const NAME: &'static str = "PLAINTEXT";
}

impl Signer for PlainText {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn build_signature(
        &self,
        _request: &Request,
        client: &Client,
        token: &Token,
    ) -> OAuthResult<String> {
        Ok(signature_key(client, token))
    }
}
