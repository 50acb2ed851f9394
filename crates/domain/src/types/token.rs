//! OAuth access tokens issued by the authorization server.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// OAuth2 grant used to obtain a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantType {
    /// Explicit flow: a browser login produced an authorization code
    AuthorizationCode,
    /// Machine-to-machine flow with no user interaction
    ClientCredentials,
}

impl GrantType {
    /// Wire value of the `grant_type` parameter
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AuthorizationCode => "authorization_code",
            Self::ClientCredentials => "client_credentials",
        }
    }
}

impl fmt::Display for GrantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Access token with the identity it was issued for.
///
/// There is no refresh. Callers check [`AccessToken::is_expired`] before
/// reusing a token and request a new one when it has lapsed.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    /// Bearer value sent in the `Authorization` header
    pub value: String,
    /// Absolute expiration timestamp (UTC)
    pub expires_at: DateTime<Utc>,
    /// Principal the token acts for, when the server reports one
    pub principal_id: Option<String>,
    /// Namespace of `principal_id`
    pub principal_idns: Option<String>,
    /// Grant that produced the token
    pub grant_type: GrantType,
    /// Space separated services the token is scoped to
    pub scope: String,
}

impl AccessToken {
    /// True iff the expiry instant is strictly before now.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Same as [`AccessToken::is_expired`] against a caller supplied instant.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .field("principal_id", &self.principal_id)
            .field("principal_idns", &self.principal_idns)
            .field("grant_type", &self.grant_type)
            .field("scope", &self.scope)
            .finish()
    }
}
