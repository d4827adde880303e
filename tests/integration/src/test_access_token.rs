//! Token credential (access token) integration tests.

#[cfg(test)]
mod tests {
    use oauth1_auth::{CredentialStore, OAuthError, Request, SignatureMethod};
    use oauth1_core::{Token, TokenType};

    use crate::{PROVIDER_URL, obtain_access_token, provider, signed_request, transmit};

    fn request_token(provider: &crate::Provider) -> Token {
        let request = signed_request(
            "POST",
            "/initiate",
            &provider.client,
            &Token::null(),
            &SignatureMethod::hmac_sha1(),
        );
        provider
            .server
            .fetch_request_token(&transmit(&request))
            .unwrap()
    }

    fn exchange_request(provider: &crate::Provider, token: &Token, verifier: Option<&str>) -> Request {
        let hmac = SignatureMethod::hmac_sha1();
        let mut request =
            Request::for_client("POST", format!("{PROVIDER_URL}/token"), &provider.client, token);
        if let Some(verifier) = verifier {
            request.set_parameter("oauth_verifier", verifier);
        }
        request.sign(&hmac, &provider.client, token).unwrap();
        transmit(&request)
    }

    #[test]
    fn test_should_issue_access_token_for_authorized_request_token() {
        let provider = provider();
        let access = obtain_access_token(&provider);

        assert_eq!(
            provider
                .store
                .lookup_token(&provider.client, TokenType::Access, access.key())
                .unwrap(),
            Some(access)
        );
    }

    #[test]
    fn test_should_consume_request_token() {
        let provider = provider();
        let token = request_token(&provider);
        let verifier = provider.store.authorize_request_token(token.key()).unwrap();

        provider
            .server
            .fetch_access_token(&exchange_request(&provider, &token, Some(&verifier)))
            .unwrap();

        let result = provider
            .server
            .fetch_access_token(&exchange_request(&provider, &token, Some(&verifier)));
        assert!(matches!(
            result,
            Err(OAuthError::InvalidToken { token_type, .. }) if token_type == TokenType::Request.as_str()
        ));
    }

    #[test]
    fn test_should_refuse_unauthorized_request_token() {
        let provider = provider();
        let token = request_token(&provider);

        let result = provider
            .server
            .fetch_access_token(&exchange_request(&provider, &token, None));
        assert!(matches!(result, Err(OAuthError::UnauthorizedToken(_))));
    }

    #[test]
    fn test_should_refuse_wrong_verifier() {
        let provider = provider();
        let token = request_token(&provider);
        provider.store.authorize_request_token(token.key()).unwrap();

        let result = provider
            .server
            .fetch_access_token(&exchange_request(&provider, &token, Some("guessed")));
        assert!(matches!(result, Err(OAuthError::UnauthorizedToken(_))));
    }

    #[test]
    fn test_should_require_request_token_secret_in_signature() {
        let provider = provider();
        let token = request_token(&provider);
        let verifier = provider.store.authorize_request_token(token.key()).unwrap();
        let forged = Token::new(token.key(), "guessed-secret");

        let result = provider
            .server
            .fetch_access_token(&exchange_request(&provider, &forged, Some(&verifier)));
        assert!(matches!(result, Err(OAuthError::InvalidSignature)));
    }

    #[test]
    fn test_should_round_trip_token_response_body() {
        let provider = provider();
        let token = request_token(&provider);

        let body = token.to_wire_format();
        assert!(body.starts_with(&format!("oauth_token={}&oauth_token_secret=", token.key())));
        assert_eq!(Token::from_wire_format(&body).unwrap(), token);
    }
}
