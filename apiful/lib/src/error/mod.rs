//! Layered error types for the client runtime.
//!
//! The error hierarchy is structured for actionable diagnostics:
//! - [`ApiError`] - Top-level error type for all client operations
//! - [`ClientError`] - Transport, URL and HTTP status errors
//! - [`ValidationError`] - Response decoding and dynamic argument errors

mod api_error;
mod client_error;
mod validation_error;

pub use api_error::ApiError;
pub use client_error::ClientError;
pub use validation_error::ValidationError;
