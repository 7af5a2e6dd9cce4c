//! Secure Comparator error types.

use thiserror::Error;

/// Secure Comparator errors
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ComparatorError {
    /// Empty secret or peer message
    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),

    /// No secret appended before the comparison started
    #[error("no secret to compare")]
    MissingSecret,

    /// Operation not allowed in the current protocol step
    #[error("invalid state for operation")]
    InvalidState,

    /// Peer message has the wrong size or a malformed group element
    #[error("invalid comparator message")]
    InvalidMessage,

    /// Random number generation failed
    #[error("random number generation failed")]
    RandomFailed,
}
