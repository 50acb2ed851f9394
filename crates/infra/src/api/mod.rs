//! WorldCat Metadata API client
//!
//! # Architecture
//!
//! - [`ApiOperation`] describes each remote capability; [`ApiOperation::plan`]
//!   turns it into method, URL, headers and body
//! - [`MetadataClient`] signs and sends a plan through the retrying
//!   [`HttpClient`](crate::http::HttpClient) and implements the batch port
//! - Every call returns its own [`ApiExchange`](wcmeta_domain::ApiExchange);
//!   nothing is kept on the client between calls

pub mod auth;
pub mod client;
pub mod endpoints;
pub mod errors;
pub mod operation;

pub use auth::RequestAuth;
pub use client::{MetadataClient, MetadataClientConfig};
pub use endpoints::Endpoints;
pub use errors::ApiError;
pub use operation::{ApiOperation, LibraryContext, RequestPlan, ValidationMode};
