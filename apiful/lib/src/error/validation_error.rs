//! Decoding and argument validation errors.

use thiserror::Error;

/// Errors raised while decoding responses or interpreting dynamic arguments.
///
/// Dynamic calls receive their arguments as a `Vec<Value>`; these variants
/// describe which position was missing or had the wrong shape.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// JSON parsing or conversion failed.
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A required positional argument was not supplied.
    #[error("Missing argument {index}: expected {expected}")]
    MissingArgument {
        /// Zero-based argument position.
        index: usize,
        /// What the callee expected at that position.
        expected: &'static str,
    },

    /// A positional argument had the wrong shape.
    #[error("Invalid argument {index}: expected {expected}")]
    InvalidArgument {
        /// Zero-based argument position.
        index: usize,
        /// What the callee expected at that position.
        expected: &'static str,
    },

    /// A value that is neither a function nor a callable object was invoked.
    #[error("Value is not callable")]
    NotCallable,
}

impl ValidationError {
    /// Returns `true` if this error describes a bad dynamic argument.
    pub fn is_argument_error(&self) -> bool {
        matches!(
            self,
            Self::MissingArgument { .. } | Self::InvalidArgument { .. }
        )
    }
}
