//! HTTP transport errors.

use thiserror::Error;

/// Errors from the HTTP transport layer.
///
/// These errors represent network-level failures, HTTP status errors,
/// and request construction problems that occur while dispatching a call.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed due to network or protocol error.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned a non-success HTTP status code.
    #[error("HTTP {status}: {message}")]
    HttpStatus {
        /// The HTTP status code returned.
        status: u16,
        /// Error message from the response body.
        message: String,
    },

    /// The request target could not be turned into a URL.
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        /// The URL text that failed to parse.
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// A header name or value is not valid HTTP.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),
}

impl ClientError {
    /// Returns `true` if this error is retryable.
    ///
    /// Connection errors are typically retryable, while HTTP status errors
    /// depend on the status code.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::HttpStatus { status, .. } => {
                // 5xx errors and 429 (rate limit) are retryable
                *status >= 500 || *status == 429
            }
            Self::Request(e) => e.is_timeout() || e.is_connect(),
            Self::InvalidUrl { .. } | Self::InvalidHeader(_) => false,
        }
    }

    /// Returns the HTTP status code if this is an HTTP status error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
