//! Error types for catalog bundle loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading or validating a catalog bundle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BundleError {
    /// The bundle file could not be read.
    #[error("failed to read catalog bundle at '{path}': {message}")]
    Io {
        /// Path to the bundle file.
        path: PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// The bundle JSON is malformed or missing required fields.
    #[error("invalid catalog bundle JSON: {message}")]
    Parse {
        /// Description of the parse error.
        message: String,
    },

    /// The bundle version is not supported.
    #[error("unsupported catalog bundle version: expected {expected}, found {actual}")]
    UnsupportedVersion {
        /// Expected version number.
        expected: u32,
        /// Version found in the bundle.
        actual: u32,
    },

    /// An ingredient entry violates a field rule.
    #[error("invalid ingredient at index {index}: {reason}")]
    InvalidIngredient {
        /// Position of the entry in the `ingredients` array.
        index: usize,
        /// Which rule was violated.
        reason: String,
    },

    /// A tag entry violates a field rule.
    #[error("invalid tag at index {index}: {reason}")]
    InvalidTag {
        /// Position of the entry in the `tags` array.
        index: usize,
        /// Which rule was violated.
        reason: String,
    },

    /// Two tags share a slug.
    #[error("duplicate tag slug '{slug}'")]
    DuplicateTagSlug {
        /// The repeated slug.
        slug: String,
    },
}
