//! Temporary credential (request token) integration tests.

#[cfg(test)]
mod tests {
    use oauth1_auth::{OAuthError, SignatureMethod};
    use oauth1_core::{Client, ServerConfig, Token};

    use crate::{provider, provider_with, signed_request, transmit, transmit_as_form};

    #[test]
    fn test_should_issue_request_token_over_authorization_header() {
        let provider = provider();
        let request = signed_request(
            "POST",
            "/initiate",
            &provider.client,
            &Token::null(),
            &SignatureMethod::hmac_sha1(),
        );

        let token = provider
            .server
            .fetch_request_token(&transmit(&request))
            .unwrap();
        assert_ne!(token.key(), provider.client.key());
        assert_ne!(token.secret(), provider.client.secret());
    }

    #[test]
    fn test_should_issue_request_token_over_form_body() {
        let provider = provider();
        let mut request = signed_request(
            "POST",
            "/initiate",
            &provider.client,
            &Token::null(),
            &SignatureMethod::hmac_sha1(),
        );
        request.add_parameter("scope", "photos videos");
        request
            .sign(&SignatureMethod::hmac_sha1(), &provider.client, &Token::null())
            .unwrap();

        assert!(
            provider
                .server
                .fetch_request_token(&transmit_as_form(&request))
                .is_ok()
        );
    }

    #[test]
    fn test_should_record_callback_with_request_token() {
        let provider = provider();
        let hmac = SignatureMethod::hmac_sha1();
        let callback = provider.client.callback_url().unwrap().to_owned();
        let mut request = signed_request("POST", "/initiate", &provider.client, &Token::null(), &hmac);
        request.set_parameter("oauth_callback", callback.clone());
        request.sign(&hmac, &provider.client, &Token::null()).unwrap();

        let token = provider
            .server
            .fetch_request_token(&transmit(&request))
            .unwrap();
        assert_eq!(provider.store.request_token_callback(token.key()), Some(callback));
    }

    #[test]
    fn test_should_reject_request_signed_with_wrong_secret() {
        let provider = provider();
        let impostor = Client::new(provider.client.key(), "not-the-secret");
        let request = signed_request(
            "POST",
            "/initiate",
            &impostor,
            &Token::null(),
            &SignatureMethod::hmac_sha1(),
        );

        assert!(matches!(
            provider.server.fetch_request_token(&transmit(&request)),
            Err(OAuthError::InvalidSignature)
        ));
    }

    #[test]
    fn test_should_accept_plaintext_when_enabled() {
        let config = ServerConfig {
            signature_methods: vec!["HMAC-SHA1".to_owned(), "PLAINTEXT".to_owned()],
            ..ServerConfig::default()
        };
        let provider = provider_with(&config);
        let request = signed_request(
            "POST",
            "/initiate",
            &provider.client,
            &Token::null(),
            &SignatureMethod::plaintext(),
        );
        assert_eq!(request.parameter("oauth_signature"), Some("kd94hf93k423kf44&"));

        assert!(
            provider
                .server
                .fetch_request_token(&transmit(&request))
                .is_ok()
        );
    }

    #[test]
    fn test_should_reject_plaintext_by_default() {
        let provider = provider();
        let request = signed_request(
            "POST",
            "/initiate",
            &provider.client,
            &Token::null(),
            &SignatureMethod::plaintext(),
        );

        assert!(matches!(
            provider.server.fetch_request_token(&transmit(&request)),
            Err(OAuthError::UnsupportedSignatureMethod { .. })
        ));
    }

    #[test]
    fn test_should_reject_verbatim_replay() {
        let provider = provider();
        let request = transmit(&signed_request(
            "POST",
            "/initiate",
            &provider.client,
            &Token::null(),
            &SignatureMethod::hmac_sha1(),
        ));

        provider.server.fetch_request_token(&request).unwrap();
        assert!(matches!(
            provider.server.fetch_request_token(&request),
            Err(OAuthError::ReplayedNonce(_))
        ));
    }
}
