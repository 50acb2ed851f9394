//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for wcmeta
///
/// `Config` and `InvalidInput` are fatal to a batch and raised before any
/// remote call. `Network` is the transport failure of a single call and is
/// turned into a failed item by the batch executor.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum WcMetaError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for wcmeta operations
pub type Result<T> = std::result::Result<T, WcMetaError>;
