//! Access token requests
//!
//! Both grants POST an empty body to the token endpoint. The parameters
//! travel in the query string and the request itself is HMAC-signed with the
//! WSKey, so the secret never leaves the client.

use std::time::Duration;

use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};
use wcmeta_domain::{AccessToken, GrantType};

use super::error::AuthError;
use super::login::{self, sorted_query, InstitutionContext, PRODUCTION_AUTHORIZE_URL};
use super::signature::{Principal, SigningContext};
use super::wskey::WsKey;

/// Production token endpoint
pub const PRODUCTION_TOKEN_URL: &str = "https://authn.sd00.worldcat.org/oauth2/accessToken";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Authorization server endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthServerUrls {
    /// Where tokens are requested
    pub token_url: String,
    /// Where browsers are sent to log in
    pub authorize_url: String,
}

impl Default for AuthServerUrls {
    fn default() -> Self {
        Self {
            token_url: PRODUCTION_TOKEN_URL.to_string(),
            authorize_url: PRODUCTION_AUTHORIZE_URL.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(rename = "principalID")]
    principal_id: Option<String>,
    #[serde(rename = "principalIDNS")]
    principal_idns: Option<String>,
    expires_at: Option<String>,
    expires_in: Option<i64>,
}

/// Client for the authorization server.
///
/// Requests are terminal: a rejected or failed request is returned to the
/// caller and never retried.
#[derive(Debug, Clone)]
pub struct TokenClient {
    wskey: WsKey,
    urls: AuthServerUrls,
    http: Client,
}

impl TokenClient {
    /// Client against the production endpoints with a 30 second timeout.
    ///
    /// # Errors
    /// Returns [`AuthError::Transport`] if the HTTP client cannot be built.
    pub fn new(wskey: WsKey) -> Result<Self, AuthError> {
        Self::with_urls(wskey, AuthServerUrls::default(), DEFAULT_TIMEOUT)
    }

    /// Client against custom endpoints.
    ///
    /// # Errors
    /// Returns [`AuthError::Transport`] if the HTTP client cannot be built.
    pub fn with_urls(
        wskey: WsKey,
        urls: AuthServerUrls,
        timeout: Duration,
    ) -> Result<Self, AuthError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AuthError::Transport(e.to_string()))?;
        Ok(Self { wskey, urls, http })
    }

    /// Browser login URL for the explicit flow.
    ///
    /// # Errors
    /// See [`login::login_url`].
    pub fn login_url(&self, institutions: &InstitutionContext) -> Result<String, AuthError> {
        login::login_url(&self.wskey, &self.urls.authorize_url, institutions)
    }

    /// Exchange an authorization code for a token.
    ///
    /// # Errors
    /// - [`AuthError::NoServices`] / [`AuthError::MissingRedirectUri`] before
    ///   any request is made
    /// - [`AuthError::Rejected`] carrying the server's message on non-2xx
    /// - [`AuthError::Transport`] or [`AuthError::Parse`] otherwise
    #[instrument(skip(self, code), fields(grant = "authorization_code"))]
    pub async fn exchange_code(
        &self,
        code: &str,
        institutions: &InstitutionContext,
    ) -> Result<AccessToken, AuthError> {
        let scope = self.wskey.scope("request an auth code")?;
        let redirect_uri = self.wskey.redirect_uri().ok_or(AuthError::MissingRedirectUri)?;

        let url = self.request_url(
            GrantType::AuthorizationCode,
            &scope,
            institutions,
            &[("redirect_uri", redirect_uri), ("code", code)],
        );
        self.request_token(GrantType::AuthorizationCode, scope, &url, None).await
    }

    /// Obtain a token with the client credentials grant.
    ///
    /// # Errors
    /// - [`AuthError::NoServices`] before any request is made
    /// - [`AuthError::Rejected`] carrying the server's message on non-2xx
    /// - [`AuthError::Transport`] or [`AuthError::Parse`] otherwise
    #[instrument(skip(self, principal), fields(grant = "client_credentials"))]
    pub async fn client_credentials(
        &self,
        institutions: &InstitutionContext,
        principal: Option<Principal>,
    ) -> Result<AccessToken, AuthError> {
        let scope = self.wskey.scope("request an access token")?;
        let url = self.request_url(GrantType::ClientCredentials, &scope, institutions, &[]);
        self.request_token(GrantType::ClientCredentials, scope, &url, principal).await
    }

    /// Token endpoint URL with the sorted, escaped grant parameters.
    #[must_use]
    pub fn request_url(
        &self,
        grant: GrantType,
        scope: &str,
        institutions: &InstitutionContext,
        extra: &[(&str, &str)],
    ) -> String {
        let mut params = vec![
            ("grant_type", grant.as_str()),
            ("scope", scope),
            ("contextInstitutionId", institutions.context_institution_id.as_str()),
            ("authenticatingInstitutionId", institutions.authenticating_institution_id.as_str()),
        ];
        params.extend_from_slice(extra);
        format!("{}?{}", self.urls.token_url, sorted_query(&params))
    }

    async fn request_token(
        &self,
        grant: GrantType,
        scope: String,
        url: &str,
        principal: Option<Principal>,
    ) -> Result<AccessToken, AuthError> {
        let context = SigningContext::new("POST", url)?.with_principal(principal);
        let authorization = self.wskey.sign_context(&context)?;

        debug!(token_url = %self.urls.token_url, "requesting access token");

        let response = self
            .http
            .post(url)
            .header(reqwest::header::AUTHORIZATION, authorization)
            .header(reqwest::header::CONTENT_LENGTH, "0")
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| AuthError::Transport(e.to_string()))?;

        if !status.is_success() {
            let message = error_message(&body);
            warn!(status = status.as_u16(), %message, "token request rejected");
            return Err(AuthError::Rejected { status: status.as_u16(), message });
        }

        let parsed: TokenResponse =
            serde_json::from_str(&body).map_err(|e| AuthError::Parse(e.to_string()))?;
        let expires_at = expiry(&parsed)?;

        info!(%grant, %expires_at, "access token issued");

        Ok(AccessToken {
            value: parsed.access_token,
            expires_at,
            principal_id: parsed.principal_id,
            principal_idns: parsed.principal_idns,
            grant_type: grant,
            scope,
        })
    }
}

/// `message`, then `error.errorMessage`, then the raw body.
fn error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.to_string();
    };

    value
        .get("message")
        .and_then(serde_json::Value::as_str)
        .or_else(|| value.pointer("/error/errorMessage").and_then(serde_json::Value::as_str))
        .map_or_else(|| body.to_string(), ToString::to_string)
}

fn expiry(response: &TokenResponse) -> Result<DateTime<Utc>, AuthError> {
    if let Some(raw) = response.expires_at.as_deref() {
        return parse_timestamp(raw)
            .ok_or_else(|| AuthError::Parse(format!("unreadable expires_at: {raw}")));
    }
    response
        .expires_in
        .map(|secs| Utc::now() + chrono::Duration::seconds(secs))
        .ok_or_else(|| AuthError::Parse("token response has no expiry".to_string()))
}

/// Accepts RFC 3339 and the server's `YYYY-MM-DD HH:MM:SSZ` form.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(&raw.replacen(' ', "T", 1)) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw.trim_end_matches('Z'), "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn client() -> TokenClient {
        let wskey = WsKey::new("key", "secret")
            .with_redirect_uri("http://localhost/cb")
            .with_services(["WorldCatMetadataAPI", "refresh_token"]);
        TokenClient::new(wskey).unwrap()
    }

    #[test]
    fn request_url_is_sorted_and_escaped() {
        let url = client().request_url(
            GrantType::AuthorizationCode,
            "WorldCatMetadataAPI refresh_token",
            &InstitutionContext::new("128807", "128808"),
            &[("redirect_uri", "http://localhost/cb"), ("code", "auth_123")],
        );
        assert_eq!(
            url,
            "https://authn.sd00.worldcat.org/oauth2/accessToken?\
             authenticatingInstitutionId=128807&code=auth_123&contextInstitutionId=128808&\
             grant_type=authorization_code&redirect_uri=http%3A%2F%2Flocalhost%2Fcb&\
             scope=WorldCatMetadataAPI+refresh_token"
        );
    }

    #[test]
    fn error_message_prefers_message_then_error_message_then_body() {
        assert_eq!(error_message(r#"{"message":"Invalid scope"}"#), "Invalid scope");
        assert_eq!(
            error_message(r#"{"error":{"errorMessage":"WSKey is invalid","errorCode":401}}"#),
            "WSKey is invalid"
        );
        assert_eq!(error_message(r#"{"code":401}"#), r#"{"code":401}"#);
        assert_eq!(error_message("<html>nope</html>"), "<html>nope</html>");
    }

    #[test]
    fn parses_server_timestamp_forms() {
        let expected = Utc.with_ymd_and_hms(2013, 8, 22, 18, 50, 28).unwrap();
        assert_eq!(parse_timestamp("2013-08-22 18:50:28Z"), Some(expected));
        assert_eq!(parse_timestamp("2013-08-22T18:50:28Z"), Some(expected));
        assert_eq!(parse_timestamp("2013-08-22T20:50:28+02:00"), Some(expected));
        assert_eq!(parse_timestamp("yesterday"), None);
    }
}
