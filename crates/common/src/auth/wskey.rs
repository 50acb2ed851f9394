//! Web service key

use std::fmt;

use super::error::AuthError;
use super::signature::{sign, Principal, SigningContext};

/// Client key issued to the library, with the secret that signs requests.
///
/// `services` scopes token requests; `redirect_uri` is only needed for the
/// explicit (browser login) flow.
#[derive(Clone, PartialEq, Eq)]
pub struct WsKey {
    key: String,
    secret: String,
    redirect_uri: Option<String>,
    services: Vec<String>,
}

impl WsKey {
    /// Key without services or redirect URI, enough for HMAC signing
    #[must_use]
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self { key: key.into(), secret: secret.into(), redirect_uri: None, services: Vec::new() }
    }

    /// Redirect URI registered for the key
    #[must_use]
    pub fn with_redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(redirect_uri.into());
        self
    }

    /// Services the key may request tokens for. Blank names are dropped.
    #[must_use]
    pub fn with_services<I, S>(mut self, services: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.services = services
            .into_iter()
            .map(Into::into)
            .filter(|s: &String| !s.trim().is_empty())
            .collect();
        self
    }

    /// Client id
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Signing secret
    #[must_use]
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Registered redirect URI
    #[must_use]
    pub fn redirect_uri(&self) -> Option<&str> {
        self.redirect_uri.as_deref()
    }

    /// Configured services
    #[must_use]
    pub fn services(&self) -> &[String] {
        &self.services
    }

    /// Space separated scope for token requests.
    ///
    /// # Errors
    /// Returns [`AuthError::NoServices`] when no service is configured;
    /// `purpose` completes the error message.
    pub fn scope(&self, purpose: &'static str) -> Result<String, AuthError> {
        if self.services.is_empty() {
            return Err(AuthError::NoServices(purpose));
        }
        Ok(self.services.join(" "))
    }

    /// Sign `method` on `url` with a fresh timestamp and nonce.
    ///
    /// # Errors
    /// Returns [`AuthError::InvalidUrl`] for an unparseable URL.
    pub fn hmac_signature(
        &self,
        method: &str,
        url: &str,
        principal: Option<Principal>,
    ) -> Result<String, AuthError> {
        let context = SigningContext::new(method, url)?.with_principal(principal);
        self.sign_context(&context)
    }

    /// Sign a prepared context.
    ///
    /// # Errors
    /// Returns [`AuthError::Signing`] if the HMAC cannot be keyed.
    pub fn sign_context(&self, context: &SigningContext) -> Result<String, AuthError> {
        sign(&self.secret, &self.key, context)
    }
}

impl fmt::Debug for WsKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WsKey")
            .field("key", &self.key)
            .field("secret", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri)
            .field("services", &self.services)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_joins_services_with_spaces() {
        let wskey = WsKey::new("k", "s").with_services(["WorldCatMetadataAPI", " ", "refresh_token"]);
        assert_eq!(wskey.scope("request a token").unwrap(), "WorldCatMetadataAPI refresh_token");
    }

    #[test]
    fn scope_requires_a_service() {
        let err = WsKey::new("k", "s").scope("request an access token").unwrap_err();
        assert_eq!(err, AuthError::NoServices("request an access token"));
        assert!(err.to_string().starts_with("No service specified."));
    }

    #[test]
    fn hmac_signature_uses_key_as_client_id() {
        let header = WsKey::new("abc", "s").hmac_signature("GET", "https://worldcat.org/", None).unwrap();
        assert!(header.contains("clientId=\"abc\""));
    }

    #[test]
    fn debug_hides_secret() {
        let rendered = format!("{:?}", WsKey::new("abc", "topsecret"));
        assert!(!rendered.contains("topsecret"));
    }
}
