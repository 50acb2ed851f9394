//! Port interfaces for batch processing operations

use async_trait::async_trait;
use wcmeta_domain::{ApiExchange, Result};

/// Remote metadata capabilities used by the batch executor.
///
/// Every call returns its own [`ApiExchange`]; a non-2xx status is a normal
/// `Ok` value. `Err` is reserved for calls that never produced a response
/// (transport failures, unbuildable requests).
#[async_trait]
pub trait MetadataApi: Send + Sync {
    /// Fetch a bib record
    async fn read_bib(&self, oclc_number: &str) -> Result<ApiExchange>;

    /// Create a bib record from MARCXML
    async fn create_bib(&self, record: &str) -> Result<ApiExchange>;

    /// Replace a bib record with MARCXML
    async fn update_bib(&self, record: &str) -> Result<ApiExchange>;

    /// Validate a MARCXML record without storing it
    async fn validate_bib(&self, record: &str) -> Result<ApiExchange>;

    /// Set the institution's holding on a record
    async fn add_holding(&self, oclc_number: &str) -> Result<ApiExchange>;

    /// Remove the institution's holding from a record
    async fn delete_holding(&self, oclc_number: &str) -> Result<ApiExchange>;

    /// Check whether a control number is current
    async fn check_control_number(&self, oclc_number: &str) -> Result<ApiExchange>;
}
