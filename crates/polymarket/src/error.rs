//! Error types for Polymarket API access.

use thiserror::Error;

/// Errors that can occur when talking to the Polymarket APIs.
#[derive(Debug, Error)]
pub enum PolymarketError {
    /// API request returned a non-success status.
    #[error("API error: {status_code} - {message}")]
    Api {
        /// HTTP status code.
        status_code: u16,
        /// Error body from the API.
        message: String,
    },

    /// Network error.
    #[error("network error: {0}")]
    Network(String),

    /// Request timeout.
    #[error("request timeout: {0}")]
    Timeout(String),

    /// Market could not be resolved from the given input.
    #[error("unable to resolve market: {0}")]
    MarketNotFound(String),

    /// Response parsed as JSON but lacked required fields.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl PolymarketError {
    /// Creates an API error from status code and message.
    pub fn api(status_code: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status_code,
            message: message.into(),
        }
    }

    /// Creates a malformed-response error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }

    /// Returns true if a retry may succeed.
    ///
    /// Client errors other than 429 are permanent; server errors, rate
    /// limits, and transport failures are worth retrying.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout(_) => true,
            Self::Api { status_code, .. } => *status_code == 429 || *status_code >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for PolymarketError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::Network(format!("connection failed: {err}"))
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// Result type alias for Polymarket API operations.
pub type Result<T> = std::result::Result<T, PolymarketError>;
