//! `RSA-SHA1` (RFC 5849 section 3.4.3).
//!
//! Signatures are RSASSA-PKCS1-v1_5 over SHA-1, base64 encoded. Key material
//! is not managed here: an [`RsaKeySource`] supplied by the embedder returns
//! the private key used to sign and the public key used to verify.

use std::fmt;
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use oauth1_core::{Client, Token};
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::pkcs1v15::{Signature, SigningKey, VerifyingKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::signature::{SignatureEncoding, Signer as _, Verifier as _};
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha1::Sha1;
use tracing::debug;

use super::Signer;
use crate::error::{OAuthError, OAuthResult};
use crate::request::Request;

/// Supplies RSA keys for a request.
///
/// Both hooks receive the request and client so a source can pick keys per
/// client, for instance from a certificate registered with it.
pub trait RsaKeySource: Send + Sync + fmt::Debug {
    /// The private key to sign `request` with.
    fn fetch_private_key(&self, request: &Request, client: &Client) -> OAuthResult<RsaPrivateKey>;

    /// The public key to verify `request` against.
    fn fetch_public_key(&self, request: &Request, client: &Client) -> OAuthResult<RsaPublicKey>;
}

/// `RSA-SHA1` backed by an [`RsaKeySource`].
#[derive(Debug, Clone)]
pub struct RsaSha1 {
    source: Arc<dyn RsaKeySource>,
}

impl RsaSha1 {
    /// The method name.
    pub const NAME: &'static str = "RSA-SHA1";

    /// Create the method with keys from `source`.
    #[must_use]
    pub fn new(source: Arc<dyn RsaKeySource>) -> Self {
        Self { source }
    }
}

impl Signer for RsaSha1 {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn build_signature(
        &self,
        request: &Request,
        client: &Client,
        _token: &Token,
    ) -> OAuthResult<String> {
        let base = request.signature_base_string()?;
        let key = self.source.fetch_private_key(request, client)?;
        let signature = SigningKey::<Sha1>::new(key)
            .try_sign(base.as_bytes())
            .map_err(|e| OAuthError::KeyMaterial(e.to_string()))?;
        Ok(BASE64.encode(signature.to_bytes()))
    }

    fn check_signature(
        &self,
        request: &Request,
        client: &Client,
        _token: &Token,
        signature: &str,
    ) -> OAuthResult<bool> {
        let Ok(raw) = BASE64.decode(signature) else {
            debug!("RSA-SHA1 signature is not valid base64");
            return Ok(false);
        };
        let Ok(signature) = Signature::try_from(raw.as_slice()) else {
            return Ok(false);
        };

        let base = request.signature_base_string()?;
        let key = self.source.fetch_public_key(request, client)?;
        Ok(VerifyingKey::<Sha1>::new(key)
            .verify(base.as_bytes(), &signature)
            .is_ok())
    }
}

/// An [`RsaKeySource`] holding one key pair parsed from PEM text.
///
/// Accepts PKCS#8 or PKCS#1 private keys and SPKI or PKCS#1 public keys. A
/// source built from a public key alone can verify but not sign.
#[derive(Clone)]
pub struct PemKeySource {
    private_key: Option<RsaPrivateKey>,
    public_key: RsaPublicKey,
}

impl PemKeySource {
    /// Build a source from a private key; the public key is derived from it.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::KeyMaterial`] if the PEM is not an RSA private key.
    pub fn from_private_pem(pem: &str) -> OAuthResult<Self> {
        let private_key = RsaPrivateKey::from_pkcs8_pem(pem)
            .or_else(|_| RsaPrivateKey::from_pkcs1_pem(pem))
            .map_err(|e| OAuthError::KeyMaterial(format!("invalid private key: {e}")))?;
        let public_key = RsaPublicKey::from(&private_key);
        Ok(Self {
            private_key: Some(private_key),
            public_key,
        })
    }

    /// Build a verification-only source from a public key.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::KeyMaterial`] if the PEM is not an RSA public key.
    pub fn from_public_pem(pem: &str) -> OAuthResult<Self> {
        let public_key = RsaPublicKey::from_public_key_pem(pem)
            .or_else(|_| RsaPublicKey::from_pkcs1_pem(pem))
            .map_err(|e| OAuthError::KeyMaterial(format!("invalid public key: {e}")))?;
        Ok(Self {
            private_key: None,
            public_key,
        })
    }
}

impl fmt::Debug for PemKeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PemKeySource")
            .field("has_private_key", &self.private_key.is_some())
            .finish_non_exhaustive()
    }
}

impl RsaKeySource for PemKeySource {
    fn fetch_private_key(&self, _request: &Request, client: &Client) -> OAuthResult<RsaPrivateKey> {
        self.private_key.clone().ok_or_else(|| {
            OAuthError::KeyMaterial(format!("no private key available for {}", client.key()))
        })
    }

    fn fetch_public_key(&self, _request: &Request, _client: &Client) -> OAuthResult<RsaPublicKey> {
        Ok(self.public_key.clone())
    }
}
