//! Error types for confluence.

use thiserror::Error;

/// Result alias for confluence operations.
pub type ConfluenceResult<T> = std::result::Result<T, ConfluenceError>;

/// Errors that can occur when running confluence suppression.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfluenceError {
    /// The detection inputs are malformed, e.g. parallel sequences of
    /// different lengths.
    #[error("invalid input: {reason}")]
    InvalidInput { reason: &'static str },
    /// A suppression parameter is out of range.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: &'static str },
}
