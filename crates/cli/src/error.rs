use thiserror::Error;
use wcmeta_common::auth::AuthError;
use wcmeta_domain::WcMetaError;
use wcmeta_infra::ApiError;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CliError {
    #[error("{0}")]
    Config(String),

    #[error("{0}")]
    Input(String),

    #[error("{0}")]
    Auth(String),

    #[error("{0}")]
    Io(String),

    #[error("{0}")]
    Command(String),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            Self::Input(_) => 3,
            Self::Auth(_) => 4,
            Self::Io(_) => 10,
            Self::Command(_) => 1,
        }
    }
}

impl From<WcMetaError> for CliError {
    fn from(err: WcMetaError) -> Self {
        match err {
            WcMetaError::Config(message) => Self::Config(message),
            WcMetaError::InvalidInput(message) => Self::Input(message),
            WcMetaError::Auth(message) => Self::Auth(message),
            WcMetaError::Io(message) => Self::Io(message),
            WcMetaError::Network(message) | WcMetaError::Internal(message) => {
                Self::Command(message)
            }
        }
    }
}

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        WcMetaError::from(err).into()
    }
}

impl From<AuthError> for CliError {
    fn from(err: AuthError) -> Self {
        WcMetaError::from(err).into()
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
