//! API-specific error types
//!
//! Non-2xx responses are not errors: they come back as an
//! [`ApiResponse`](wcmeta_domain::ApiResponse) for the caller to classify.
//! An `ApiError` means no response was obtained at all.

use thiserror::Error;
use wcmeta_common::auth::AuthError;
use wcmeta_domain::WcMetaError;

use crate::errors::InfraError;

/// API operation errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidUrl { .. } => Self::InvalidRequest(err.to_string()),
            AuthError::Transport(message) => Self::Network(message),
            other => Self::Auth(other.to_string()),
        }
    }
}

impl From<WcMetaError> for ApiError {
    fn from(err: WcMetaError) -> Self {
        match err {
            WcMetaError::Auth(message) => Self::Auth(message),
            WcMetaError::Network(message) => Self::Network(message),
            WcMetaError::InvalidInput(message) => Self::InvalidRequest(message),
            WcMetaError::Config(message) => Self::Config(message),
            WcMetaError::Io(message) | WcMetaError::Internal(message) => Self::Network(message),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        WcMetaError::from(InfraError::from(err)).into()
    }
}

impl From<ApiError> for WcMetaError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Auth(message) => Self::Auth(message),
            ApiError::Network(message) => Self::Network(message),
            ApiError::InvalidRequest(message) => Self::InvalidInput(message),
            ApiError::Config(message) => Self::Config(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_errors_keep_their_message() {
        let domain: WcMetaError = ApiError::Network("connection reset".into()).into();
        assert_eq!(domain, WcMetaError::Network("connection reset".into()));
        assert_eq!(domain.to_string(), "Network error: connection reset");
    }

    #[test]
    fn auth_errors_map_by_kind() {
        let invalid = AuthError::InvalidUrl { url: "nope".into(), reason: "relative URL".into() };
        assert!(matches!(ApiError::from(invalid), ApiError::InvalidRequest(_)));
        assert!(matches!(ApiError::from(AuthError::Signing("bad key".into())), ApiError::Auth(_)));
    }
}
