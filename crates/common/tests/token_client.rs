//! Integration tests for the token client
//!
//! Runs both grants against a local mock authorization server.

use std::time::Duration;

use wcmeta_common::auth::{
    AuthError, AuthServerUrls, InstitutionContext, Principal, TokenClient, WsKey, AUTH_SCHEME,
};
use wcmeta_domain::GrantType;
use wiremock::matchers::{header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn institutions() -> InstitutionContext {
    InstitutionContext::new("128807", "128808")
}

fn client_for(server: &MockServer, wskey: WsKey) -> TokenClient {
    let urls = AuthServerUrls {
        token_url: format!("{}/oauth2/accessToken", server.uri()),
        authorize_url: format!("{}/oauth2/authorizeCode", server.uri()),
    };
    TokenClient::with_urls(wskey, urls, Duration::from_secs(5)).expect("token client")
}

fn metadata_wskey() -> WsKey {
    WsKey::new("test-key", "test-secret")
        .with_redirect_uri("http://localhost:8000/auth/")
        .with_services(["WorldCatMetadataAPI"])
}

/// Validates the client credentials grant end to end.
///
/// Assertions:
/// - The request is a signed POST carrying the grant parameters.
/// - `access_token`, `principalID`, `principalIDNS` and `expires_at` are
///   mapped onto the token.
#[tokio::test]
async fn client_credentials_token_is_parsed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/accessToken"))
        .and(query_param("grant_type", "client_credentials"))
        .and(query_param("scope", "WorldCatMetadataAPI"))
        .and(query_param("authenticatingInstitutionId", "128807"))
        .and(query_param("contextInstitutionId", "128808"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "tk_1234",
            "token_type": "bearer",
            "expires_in": 1199,
            "principalID": "8eaa-11e1",
            "principalIDNS": "urn:oclc:wms:da",
            "expires_at": "2099-08-22 18:50:28Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, metadata_wskey());
    let principal = Some(Principal::new("8eaa-11e1", "urn:oclc:wms:da"));
    let token = client.client_credentials(&institutions(), principal).await.expect("token");

    assert_eq!(token.value, "tk_1234");
    assert_eq!(token.principal_id.as_deref(), Some("8eaa-11e1"));
    assert_eq!(token.principal_idns.as_deref(), Some("urn:oclc:wms:da"));
    assert_eq!(token.grant_type, GrantType::ClientCredentials);
    assert_eq!(token.scope, "WorldCatMetadataAPI");
    assert!(!token.is_expired());

    let requests = server.received_requests().await.expect("recorded requests");
    let authorization = requests[0]
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .expect("authorization header")
        .to_string();
    assert!(authorization.starts_with(AUTH_SCHEME));
    assert!(authorization.contains("clientId=\"test-key\""));
    assert!(authorization.ends_with("principalIDNS=\"urn:oclc:wms:da\""));
}

#[tokio::test]
async fn auth_code_exchange_sends_code_and_redirect_uri() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/accessToken"))
        .and(query_param("grant_type", "authorization_code"))
        .and(query_param("code", "auth_abc"))
        .and(query_param("redirect_uri", "http://localhost:8000/auth/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "tk_code",
            "expires_at": "2099-01-01T00:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, metadata_wskey());
    let token = client.exchange_code("auth_abc", &institutions()).await.expect("token");

    assert_eq!(token.value, "tk_code");
    assert_eq!(token.grant_type, GrantType::AuthorizationCode);
    assert_eq!(token.principal_id, None);
}

#[tokio::test]
async fn rejection_surfaces_upstream_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": { "errorCode": "401", "errorMessage": "WSKey 'test-key' is invalid" }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, metadata_wskey());
    let err = client.client_credentials(&institutions(), None).await.unwrap_err();

    assert_eq!(
        err,
        AuthError::Rejected { status: 401, message: "WSKey 'test-key' is invalid".to_string() }
    );
}

#[tokio::test]
async fn rejection_without_structured_message_keeps_raw_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let client = client_for(&server, metadata_wskey());
    let err = client.client_credentials(&institutions(), None).await.unwrap_err();

    assert_eq!(err, AuthError::Rejected { status: 500, message: "upstream exploded".to_string() });
}

#[tokio::test]
async fn client_credentials_without_services_fails_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server, WsKey::new("test-key", "test-secret"));
    let err = client.client_credentials(&institutions(), None).await.unwrap_err();

    assert!(matches!(err, AuthError::NoServices(_)));
}

#[tokio::test]
async fn login_url_uses_configured_authorize_endpoint() {
    let server = MockServer::start().await;
    let client = client_for(&server, metadata_wskey());

    let url = client.login_url(&institutions()).expect("login url");

    assert!(url.starts_with(&format!("{}/oauth2/authorizeCode?", server.uri())));
    assert!(url.contains("response_type=code"));
    assert!(url.contains("client_id=test-key"));
}
