//! Metadata API client
//!
//! Turns an [`ApiOperation`] into a signed request and returns the raw
//! exchange. Status classification is left to the caller.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use tracing::{debug, instrument};
use wcmeta_core::MetadataApi;
use wcmeta_domain::{ApiExchange, ApiResponse, Credentials, WcMetaError};

use super::auth::RequestAuth;
use super::endpoints::Endpoints;
use super::errors::ApiError;
use super::operation::{ApiOperation, LibraryContext, ValidationMode};
use crate::http::HttpClient;

/// Configuration for the metadata client
#[derive(Debug, Clone)]
pub struct MetadataClientConfig {
    /// Service base URLs
    pub endpoints: Endpoints,
    /// Timeout of a single attempt
    pub timeout: Duration,
    /// Total attempts per call, retries included
    pub max_attempts: usize,
    /// First retry delay, doubled per retry
    pub base_backoff: Duration,
    /// Endpoint used by `validate`
    pub validation_mode: ValidationMode,
}

impl Default for MetadataClientConfig {
    fn default() -> Self {
        Self {
            endpoints: Endpoints::default(),
            timeout: Duration::from_secs(30),
            max_attempts: 3,
            base_backoff: Duration::from_millis(200),
            validation_mode: ValidationMode::Full,
        }
    }
}

/// Client for the bib, holdings, local bib and validation services.
#[derive(Debug, Clone)]
pub struct MetadataClient {
    http: HttpClient,
    auth: RequestAuth,
    library: LibraryContext,
    config: MetadataClientConfig,
}

impl MetadataClient {
    /// Create a new client
    ///
    /// # Arguments
    ///
    /// * `config` - Endpoints, timeout and retry settings
    /// * `auth` - How requests are authorized
    /// * `library` - Institution values sent with each request
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Config` if the HTTP client cannot be built
    pub fn new(
        config: MetadataClientConfig,
        auth: RequestAuth,
        library: LibraryContext,
    ) -> Result<Self, ApiError> {
        let http = HttpClient::builder()
            .timeout(config.timeout)
            .max_attempts(config.max_attempts)
            .base_backoff(config.base_backoff)
            .user_agent(concat!("wcmeta/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Config(format!("Failed to build HttpClient: {e}")))?;

        Ok(Self { http, auth, library, config })
    }

    /// HMAC-signing client for a credential set.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Config` if the HTTP client cannot be built
    pub fn from_credentials(
        credentials: &Credentials,
        config: MetadataClientConfig,
    ) -> Result<Self, ApiError> {
        Self::new(config, RequestAuth::from_credentials(credentials), LibraryContext::from(credentials))
    }

    /// Send one operation and return its exchange.
    ///
    /// Non-2xx responses are returned, not raised.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when no response could be obtained: signing
    /// failure, expired bearer token, or a transport error after retries
    #[instrument(skip(self, operation), fields(operation = %operation))]
    pub async fn execute(&self, operation: ApiOperation<'_>) -> Result<ApiExchange, ApiError> {
        let plan = operation.plan(&self.config.endpoints, &self.library);
        let trace = plan.trace();

        let response = self
            .http
            .send_with(|| {
                let authorization = self
                    .auth
                    .authorization(plan.method.as_str(), &plan.url)
                    .map_err(WcMetaError::from)?;

                let mut request = self
                    .http
                    .request(plan.method.clone(), &plan.url)
                    .header(AUTHORIZATION, authorization)
                    .header(ACCEPT, plan.accept);
                if let Some(content_type) = plan.content_type {
                    request = request.header(CONTENT_TYPE, content_type);
                }
                if plan.method != Method::GET {
                    request = request.body(plan.body.clone().unwrap_or_default());
                }
                Ok(request)
            })
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!(%trace, status, bytes = body.len(), "metadata call completed");

        Ok(ApiExchange::new(trace, ApiResponse::new(status, body)))
    }

    /// Holding library codes of the institution.
    ///
    /// # Errors
    ///
    /// See [`MetadataClient::execute`]
    pub async fn holding_codes(&self) -> Result<ApiExchange, ApiError> {
        self.execute(ApiOperation::HoldingCodes).await
    }
}

#[async_trait]
impl MetadataApi for MetadataClient {
    async fn read_bib(&self, oclc_number: &str) -> wcmeta_domain::Result<ApiExchange> {
        Ok(self.execute(ApiOperation::ReadBib(oclc_number)).await?)
    }

    async fn create_bib(&self, record: &str) -> wcmeta_domain::Result<ApiExchange> {
        Ok(self.execute(ApiOperation::CreateBib(record)).await?)
    }

    async fn update_bib(&self, record: &str) -> wcmeta_domain::Result<ApiExchange> {
        Ok(self.execute(ApiOperation::UpdateBib(record)).await?)
    }

    async fn validate_bib(&self, record: &str) -> wcmeta_domain::Result<ApiExchange> {
        Ok(self.execute(ApiOperation::Validate(self.config.validation_mode, record)).await?)
    }

    async fn add_holding(&self, oclc_number: &str) -> wcmeta_domain::Result<ApiExchange> {
        Ok(self.execute(ApiOperation::AddHolding(oclc_number)).await?)
    }

    async fn delete_holding(&self, oclc_number: &str) -> wcmeta_domain::Result<ApiExchange> {
        Ok(self.execute(ApiOperation::DeleteHolding(oclc_number)).await?)
    }

    async fn check_control_number(&self, oclc_number: &str) -> wcmeta_domain::Result<ApiExchange> {
        Ok(self.execute(ApiOperation::CheckControlNumber(oclc_number)).await?)
    }
}
