//! Secure Session error types.

use thiserror::Error;

/// Secure Session errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The local identity is empty
    #[error("missing session id")]
    MissingId,

    /// The local private key is empty
    #[error("missing private key")]
    MissingKey,

    /// Malformed input or a message that does not belong to this session
    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),

    /// The operation is not allowed in the current state
    #[error("operation not allowed in the current session state")]
    InvalidState,

    /// The peer identity was rejected: unknown id or bad signature
    #[error("peer rejected: {0}")]
    Callback(&'static str),

    /// Authentication or decryption failed
    #[error("secure session operation failed")]
    Fail,

    /// A length does not fit the 32-bit wire fields
    #[error("data too large for secure session")]
    NoMemory,
}
