//! Authorization header for metadata requests
//!
//! Requests are either HMAC-signed per attempt with the WSKey, or carry a
//! bearer token obtained from the authorization server.

use wcmeta_common::auth::{Principal, WsKey};
use wcmeta_domain::{AccessToken, Credentials};

use super::errors::ApiError;

/// How requests are authorized
#[derive(Debug, Clone)]
pub enum RequestAuth {
    /// Sign every request with the key's secret
    Hmac { wskey: WsKey, principal: Option<Principal> },
    /// Send a previously obtained access token
    Bearer(AccessToken),
}

impl RequestAuth {
    /// HMAC signing with the credentials' key and principal.
    #[must_use]
    pub fn from_credentials(credentials: &Credentials) -> Self {
        Self::Hmac {
            wskey: WsKey::new(&credentials.key, &credentials.secret),
            principal: Some(Principal::new(&credentials.principal_id, &credentials.principal_idns)),
        }
    }

    /// `Authorization` header value for one attempt of `method` on `url`.
    ///
    /// # Errors
    /// Returns `ApiError::Auth` for an expired bearer token or a signing
    /// failure, and `ApiError::InvalidRequest` for an unparseable URL.
    pub fn authorization(&self, method: &str, url: &str) -> Result<String, ApiError> {
        match self {
            Self::Hmac { wskey, principal } => {
                Ok(wskey.hmac_signature(method, url, principal.clone())?)
            }
            Self::Bearer(token) => {
                if token.is_expired() {
                    return Err(ApiError::Auth(format!(
                        "access token expired at {}",
                        token.expires_at.to_rfc3339()
                    )));
                }
                Ok(format!("Bearer {}", token.value))
            }
        }
    }
}
