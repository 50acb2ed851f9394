//! Authentication error type

use thiserror::Error;
use wcmeta_domain::WcMetaError;

/// Errors raised while signing requests or talking to the authorization
/// server.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The WSKey carries no services, so there is no scope to request
    #[error(
        "No service specified. You must construct a WSKey with one or more services to {0}"
    )]
    NoServices(&'static str),

    /// The explicit flow needs somewhere to send the browser back to
    #[error("No redirect URI specified for the WSKey")]
    MissingRedirectUri,

    /// A URL could not be parsed before signing
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The HMAC could not be keyed
    #[error("Signing failed: {0}")]
    Signing(String),

    /// The token request never produced a response
    #[error("Token request failed: {0}")]
    Transport(String),

    /// The authorization server answered with a non-2xx status
    #[error("Token request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The authorization server answered 2xx with an unreadable body
    #[error("Invalid token response: {0}")]
    Parse(String),
}

impl From<AuthError> for WcMetaError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::NoServices(_) | AuthError::MissingRedirectUri => {
                Self::Config(err.to_string())
            }
            AuthError::InvalidUrl { .. } => Self::InvalidInput(err.to_string()),
            AuthError::Transport(_) => Self::Network(err.to_string()),
            AuthError::Signing(_) | AuthError::Rejected { .. } | AuthError::Parse(_) => {
                Self::Auth(err.to_string())
            }
        }
    }
}
