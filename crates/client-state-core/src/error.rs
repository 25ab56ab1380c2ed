//! Error types for the client state core.

use thiserror::Error;

use crate::types::Tid;

/// Errors that can occur while building editions or handling packets.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The token does not have the expected shape.
    #[error("malformed token: {0}")]
    Format(String),

    /// No configured edition carries the token's tid.
    #[error("no edition matches tid {0}")]
    UnknownEdition(Tid),

    /// Key material is unusable for the configured algorithm.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// The algorithm name is not one we implement.
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("encryption error: {0}")]
    Encryption(String),

    #[error("decryption error: {0}")]
    Decryption(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
