//! Raw request/response pairs returned by every API call.

use serde::{Deserialize, Serialize};

/// Unclassified response from the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body, verbatim
    pub body: String,
}

impl ApiResponse {
    /// Create a response
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    /// Status class is 2xx
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// One call's request trace together with its response.
///
/// Owned by the caller of that single call; nothing is kept on the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiExchange {
    /// Method and URL of the request, for debug logs
    pub trace: String,
    /// What came back
    pub response: ApiResponse,
}

impl ApiExchange {
    /// Pair a trace line with its response
    #[must_use]
    pub fn new(trace: impl Into<String>, response: ApiResponse) -> Self {
        Self { trace: trace.into(), response }
    }
}
