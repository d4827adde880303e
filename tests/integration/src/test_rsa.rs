//! RSA-SHA1 integration tests.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use oauth1_auth::{OAuthError, OAuthResult, PemKeySource, Request, RsaKeySource, SignatureMethod};
    use oauth1_core::{Client, Token};
    use rsa::{RsaPrivateKey, RsaPublicKey};

    use crate::{provider, signed_request, transmit};

    const PRIVATE_PEM: &str = include_str!("../../../crates/oauth1-auth/testdata/rsa_private.pem");
    const PUBLIC_PEM: &str = include_str!("../../../crates/oauth1-auth/testdata/rsa_public.pem");
    const OTHER_PUBLIC_PEM: &str =
        include_str!("../../../crates/oauth1-auth/testdata/rsa_other_public.pem");

    /// Public keys registered per client, the way a provider keeps the
    /// certificates clients upload.
    #[derive(Debug, Default)]
    struct RegisteredCertificates {
        keys: HashMap<String, PemKeySource>,
    }

    impl RsaKeySource for RegisteredCertificates {
        fn fetch_private_key(&self, _request: &Request, client: &Client) -> OAuthResult<RsaPrivateKey> {
            Err(OAuthError::KeyMaterial(format!(
                "provider holds no private key for {}",
                client.key()
            )))
        }

        fn fetch_public_key(&self, request: &Request, client: &Client) -> OAuthResult<RsaPublicKey> {
            self.keys
                .get(client.key())
                .ok_or_else(|| {
                    OAuthError::KeyMaterial(format!("no certificate registered for {}", client.key()))
                })?
                .fetch_public_key(request, client)
        }
    }

    fn consumer_method() -> SignatureMethod {
        SignatureMethod::rsa_sha1(Arc::new(PemKeySource::from_private_pem(PRIVATE_PEM).unwrap()))
    }

    fn provider_method(client: &Client, public_pem: &str) -> SignatureMethod {
        let mut certificates = RegisteredCertificates::default();
        certificates.keys.insert(
            client.key().to_owned(),
            PemKeySource::from_public_pem(public_pem).unwrap(),
        );
        SignatureMethod::rsa_sha1(Arc::new(certificates))
    }

    #[test]
    fn test_should_issue_request_token_for_rsa_signed_request() {
        let mut provider = provider();
        let method = provider_method(&provider.client, PUBLIC_PEM);
        provider.server.add_signature_method(method);
        assert_eq!(provider.server.signature_methods(), vec!["HMAC-SHA1", "RSA-SHA1"]);

        let request = signed_request(
            "POST",
            "/initiate",
            &provider.client,
            &Token::null(),
            &consumer_method(),
        );
        assert_eq!(request.parameter("oauth_signature_method"), Some("RSA-SHA1"));
        assert!(
            provider
                .server
                .fetch_request_token(&transmit(&request))
                .is_ok()
        );
    }

    #[test]
    fn test_should_reject_rsa_signature_from_unregistered_key() {
        let mut provider = provider();
        let method = provider_method(&provider.client, OTHER_PUBLIC_PEM);
        provider.server.add_signature_method(method);

        let request = signed_request(
            "POST",
            "/initiate",
            &provider.client,
            &Token::null(),
            &consumer_method(),
        );
        assert!(matches!(
            provider.server.fetch_request_token(&transmit(&request)),
            Err(OAuthError::InvalidSignature)
        ));
    }

    #[test]
    fn test_should_reject_tampered_rsa_request() {
        let mut provider = provider();
        let method = provider_method(&provider.client, PUBLIC_PEM);
        provider.server.add_signature_method(method);

        let request = signed_request(
            "POST",
            "/initiate?scope=photos",
            &provider.client,
            &Token::null(),
            &consumer_method(),
        );
        let header = request.to_header(None);
        let tampered = Request::from_http(
            "POST",
            "https://photos.example.net/initiate?scope=everything",
            Some(&header),
            None,
        )
        .unwrap();
        assert!(matches!(
            provider.server.fetch_request_token(&tampered),
            Err(OAuthError::InvalidSignature)
        ));
    }

    #[test]
    fn test_should_surface_missing_certificate() {
        let mut provider = provider();
        let stranger = Client::new("someone-else", "secret");
        let method = provider_method(&stranger, PUBLIC_PEM);
        provider.server.add_signature_method(method);

        let request = signed_request(
            "POST",
            "/initiate",
            &provider.client,
            &Token::null(),
            &consumer_method(),
        );
        assert!(matches!(
            provider.server.fetch_request_token(&transmit(&request)),
            Err(OAuthError::KeyMaterial(_))
        ));
    }
}
