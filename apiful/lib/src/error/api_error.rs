//! Top-level API error type.

use super::{ClientError, ValidationError};
use thiserror::Error;

/// Top-level error type for all client operations.
///
/// This enum aggregates all error categories, enabling unified error handling
/// while preserving the ability to match on specific error types when needed.
///
/// ## Examples
///
/// ```rust,ignore
/// use apiful::ApiError;
///
/// fn handle_error(err: ApiError) {
///     match err {
///         ApiError::Client(e) => eprintln!("Transport error: {e}"),
///         ApiError::Validation(e) => eprintln!("Invalid value: {e}"),
///         ApiError::Extension(message) => eprintln!("Extension failed: {message}"),
///     }
/// }
/// ```
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP transport errors (network, status, URL construction).
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Decoding and argument errors.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Failure raised by a user-supplied extension function.
    #[error("Extension error: {0}")]
    Extension(String),
}

impl ApiError {
    /// Creates an error for a failure inside a user-supplied extension.
    pub fn extension(message: impl Into<String>) -> Self {
        Self::Extension(message.into())
    }

    /// Returns the HTTP status code if the server rejected the request.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Client(e) => e.status_code(),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Validation(ValidationError::JsonParse(err))
    }
}
