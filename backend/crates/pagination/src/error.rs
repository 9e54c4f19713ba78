//! Error types for pagination parameter parsing.

use thiserror::Error;

/// Errors raised while validating pagination parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    /// The page number is missing, zero, or not a number.
    #[error("page must be a positive integer, got '{value}'")]
    InvalidPage {
        /// Raw value received from the client.
        value: String,
    },

    /// The page size is zero, not a number, or exceeds the maximum.
    #[error("limit must be between 1 and {max}, got '{value}'")]
    InvalidLimit {
        /// Raw value received from the client.
        value: String,
        /// Largest accepted page size.
        max: u32,
    },
}
