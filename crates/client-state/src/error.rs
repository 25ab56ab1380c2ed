//! Error types for the client state codec.

use client_state_core::{CoreError, Tid};
use thiserror::Error;

/// Coarse failure classes, for callers that branch on what went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The token is not shaped like a token.
    Format,
    /// The token was produced under an edition we no longer know.
    UnknownEdition,
    /// The token was tampered with, corrupted, or sealed under other keys.
    Integrity,
    /// The token is too old, or too far in the future.
    Freshness,
    Serialization,
    Deserialization,
    /// Keys or algorithms are misconfigured.
    Configuration,
}

/// Errors that can occur while persisting or restoring state.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("malformed client state: {0}")]
    Format(String),

    #[error("client state was issued under unknown edition {0}")]
    UnknownEdition(Tid),

    /// MAC mismatch or undecryptable ciphertext. Deliberately carries no detail.
    #[error("client state fails authenticity check")]
    Integrity,

    #[error("client state issued at {issued_at} has timed out (now {now})")]
    Expired { issued_at: u64, now: u64 },

    #[error("client state issued at {issued_at} is in the future (now {now})")]
    IssuedInFuture { issued_at: u64, now: u64 },

    #[error("unable to serialize state: {0}")]
    Serialization(String),

    #[error("unable to deserialize state: {0}")]
    Deserialization(String),

    #[error("configuration error: {0}")]
    Configuration(String),
}

impl StateError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StateError::Format(_) => ErrorKind::Format,
            StateError::UnknownEdition(_) => ErrorKind::UnknownEdition,
            StateError::Integrity => ErrorKind::Integrity,
            StateError::Expired { .. } | StateError::IssuedInFuture { .. } => ErrorKind::Freshness,
            StateError::Serialization(_) => ErrorKind::Serialization,
            StateError::Deserialization(_) => ErrorKind::Deserialization,
            StateError::Configuration(_) => ErrorKind::Configuration,
        }
    }

    /// True when the fault lies with the token the client sent.
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self.kind(),
            ErrorKind::Serialization | ErrorKind::Configuration
        )
    }
}

impl From<CoreError> for StateError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::Format(msg) => StateError::Format(msg),
            CoreError::UnknownEdition(tid) => StateError::UnknownEdition(tid),
            // Padding failures must look exactly like MAC failures
            CoreError::Decryption(_) => StateError::Integrity,
            CoreError::InvalidKey(msg) | CoreError::Encryption(msg) => {
                StateError::Configuration(msg)
            }
            CoreError::UnsupportedAlgorithm(name) => {
                StateError::Configuration(format!("unsupported algorithm: {name}"))
            }
        }
    }
}

/// Result type for codec operations.
pub type Result<T> = std::result::Result<T, StateError>;
