use std::time::Duration;

use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use tracing::debug;
use wcmeta_domain::WcMetaError;

use crate::errors::InfraError;

/// HTTP client with built-in retry and timeout support.
///
/// Connection failures are retried for every method. Timeouts and 5xx
/// responses are retried only for idempotent methods, so a `POST` that may
/// have reached the server is never sent twice.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    max_attempts: usize,
    base_backoff: Duration,
}

impl HttpClient {
    /// Start building a new HTTP client.
    #[must_use]
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute a request rebuilt for every attempt.
    ///
    /// Signed requests need this: each attempt carries a fresh nonce.
    ///
    /// # Errors
    /// Returns the error of `make`, or the mapped transport error of the last
    /// attempt.
    pub async fn send_with<F>(&self, mut make: F) -> Result<Response, WcMetaError>
    where
        F: FnMut() -> Result<RequestBuilder, WcMetaError>,
    {
        let attempts = self.max_attempts.max(1);

        for attempt in 0..attempts {
            let request = make()?.build().map_err(|err| WcMetaError::from(InfraError::from(err)))?;

            let method = request.method().clone();
            let url = request.url().clone();
            let idempotent = is_idempotent(&method);
            let last = attempt + 1 >= attempts;
            debug!(attempt = attempt + 1, %method, %url, "sending HTTP request");

            match self.client.execute(request).await {
                Ok(response) => {
                    let status = response.status();
                    debug!(attempt = attempt + 1, %method, %url, %status, "received HTTP response");

                    if status.is_server_error() && idempotent && !last {
                        self.sleep_with_backoff(attempt + 1).await;
                        continue;
                    }

                    return Ok(response);
                }
                Err(err) => {
                    debug!(attempt = attempt + 1, %method, %url, error = %err, "HTTP request failed");

                    if !last && should_retry_error(&err, idempotent) {
                        self.sleep_with_backoff(attempt + 1).await;
                        continue;
                    }

                    return Err(InfraError::from(err).into());
                }
            }
        }

        Err(WcMetaError::Internal("http client exhausted retries without producing a result".into()))
    }

    fn backoff_delay(&self, retry_number: usize) -> Duration {
        let shift = u32::try_from(retry_number.saturating_sub(1).min(8)).unwrap_or(8);
        self.base_backoff.saturating_mul(1u32 << shift)
    }

    async fn sleep_with_backoff(&self, retry_number: usize) {
        let delay = self.backoff_delay(retry_number);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    max_attempts: usize,
    base_backoff: Duration,
    user_agent: Option<String>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_attempts: 3,
            base_backoff: Duration::from_millis(200),
            user_agent: None,
        }
    }
}

impl HttpClientBuilder {
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Configure the total number of attempts (initial try + retries).
    #[must_use]
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    #[must_use]
    pub const fn base_backoff(mut self, backoff: Duration) -> Self {
        self.base_backoff = backoff;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// # Errors
    /// Returns `WcMetaError::Network` if the TLS backend cannot be initialized.
    pub fn build(self) -> Result<HttpClient, WcMetaError> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout);

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        let client = builder.build().map_err(|err| WcMetaError::from(InfraError::from(err)))?;

        Ok(HttpClient { client, max_attempts: self.max_attempts.max(1), base_backoff: self.base_backoff })
    }
}

fn is_idempotent(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::PUT | Method::DELETE | Method::OPTIONS)
}

fn should_retry_error(err: &reqwest::Error, idempotent: bool) -> bool {
    if err.is_connect() {
        return true;
    }
    idempotent && (err.is_timeout() || err.is_request())
}
