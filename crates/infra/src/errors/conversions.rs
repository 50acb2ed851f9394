//! Conversions from external infrastructure errors into domain errors.

use std::io::Error as IoError;

use reqwest::Error as HttpError;
use wcmeta_domain::WcMetaError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub WcMetaError);

impl From<InfraError> for WcMetaError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<WcMetaError> for InfraError {
    fn from(value: WcMetaError) -> Self {
        Self(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoWcMetaError {
    fn into_wcmeta(self) -> WcMetaError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → WcMetaError */
/* -------------------------------------------------------------------------- */

impl IntoWcMetaError for HttpError {
    fn into_wcmeta(self) -> WcMetaError {
        if self.is_timeout() {
            return WcMetaError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return WcMetaError::Network(format!("HTTP connection failure: {self}"));
        }

        if self.is_builder() {
            return WcMetaError::InvalidInput(format!("HTTP request could not be built: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => WcMetaError::Auth(message),
                400..=499 => WcMetaError::InvalidInput(message),
                _ => WcMetaError::Network(message),
            };
        }

        WcMetaError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        Self(value.into_wcmeta())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → WcMetaError */
/* -------------------------------------------------------------------------- */

impl IntoWcMetaError for IoError {
    fn into_wcmeta(self) -> WcMetaError {
        use std::io::ErrorKind;

        match self.kind() {
            ErrorKind::NotFound => WcMetaError::Io(format!("file not found: {self}")),
            ErrorKind::PermissionDenied => WcMetaError::Io(format!("permission denied: {self}")),
            _ => WcMetaError::Io(self.to_string()),
        }
    }
}

impl From<IoError> for InfraError {
    fn from(value: IoError) -> Self {
        Self(value.into_wcmeta())
    }
}

/* -------------------------------------------------------------------------- */
/* toml errors → WcMetaError */
/* -------------------------------------------------------------------------- */

impl From<toml::de::Error> for InfraError {
    fn from(value: toml::de::Error) -> Self {
        Self(WcMetaError::Config(format!("Invalid TOML format: {value}")))
    }
}

impl From<toml::ser::Error> for InfraError {
    fn from(value: toml::ser::Error) -> Self {
        Self(WcMetaError::Config(format!("Failed to serialize credentials: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
