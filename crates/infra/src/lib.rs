//! # wcmeta Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - The retrying HTTP client
//! - The metadata API client (implements `wcmeta_core::MetadataApi`)
//! - The credential loader and store
//! - Report file output
//!
//! ## Architecture
//! - Implements traits defined in `wcmeta-core`
//! - Depends on `wcmeta-domain`, `wcmeta-common` and `wcmeta-core`
//! - Contains all "impure" code (network, filesystem, environment)

pub mod api;
pub mod config;
pub mod errors;
pub mod http;
pub mod output;

// Re-export commonly used items
pub use api::{
    ApiError, ApiOperation, Endpoints, MetadataClient, MetadataClientConfig, RequestAuth,
    ValidationMode,
};
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use output::{LogFormat, ReportFiles, ReportWriter};
