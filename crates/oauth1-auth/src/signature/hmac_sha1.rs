//! `HMAC-SHA1` (RFC 5849 section 3.4.2).

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use oauth1_core::{Client, Token};
use sha1::Sha1;

use super::{Signer, signature_key};
use crate::error::OAuthResult;
use crate::request::Request;

type HmacSha1Mac = Hmac<Sha1>;

/// `base64(HMAC-SHA1(signature key, signature base string))`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HmacSha1;

impl HmacSha1 {
    /// The method name.
    pub const NAME: &'static str = "HMAC-SHA1";
}

impl Signer for HmacSha1 {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn build_signature(
        &self,
        request: &Request,
        client: &Client,
        token: &Token,
    ) -> OAuthResult<String> {
        let base = request.signature_base_string()?;
        Ok(compute_hmac_sha1(&signature_key(client, token), &base))
    }
}

fn compute_hmac_sha1(key: &str, message: &str) -> String {
    let mut mac =
        HmacSha1Mac::new_from_slice(key.as_bytes()).expect("HMAC can accept any key length");
    mac.update(message.as_bytes());
    BASE64.encode(mac.finalize().into_bytes())
}
