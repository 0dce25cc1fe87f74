//! Error types for Chronicle.

use thiserror::Error;

/// Result type for Chronicle operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building logs or generating proofs.
///
/// Verification never surfaces an error: a malformed or mismatching proof is
/// reported as a plain `false` by the verify functions.
#[derive(Debug, Error)]
pub enum Error {
    /// A tree was constructed from an empty data list.
    #[error("no data provided")]
    NoData,

    /// An empty leaf was appended to a mountain range.
    #[error("empty leaf not allowed")]
    EmptyLeaf,

    /// An inclusion proof was requested for a position outside the log.
    #[error("invalid index")]
    InvalidIndex,

    /// No leaf with the requested digest exists in the log.
    #[error("leaf not found in the tree")]
    LeafNotFound,

    /// A consistency proof was requested for an out-of-range prefix size.
    #[error("invalid m: must be between 1 and the number of leaves")]
    InvalidConsistencyRange,

    /// A digest could not be parsed.
    #[error("invalid hash: {0}")]
    InvalidHash(String),
}

impl Error {
    /// Create an InvalidHash error.
    pub fn invalid_hash(message: impl Into<String>) -> Self {
        Error::InvalidHash(message.into())
    }
}

impl From<hex::FromHexError> for Error {
    fn from(e: hex::FromHexError) -> Self {
        Error::InvalidHash(e.to_string())
    }
}
