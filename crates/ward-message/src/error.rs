//! Secure Message error types.

use thiserror::Error;
use ward_cell::CellError;
use ward_soter::SoterError;

/// Secure Message errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MessageError {
    /// An input was empty
    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),

    /// The header does not describe a message of the expected kind
    #[error("invalid message: {0}")]
    InvalidMessage(&'static str),

    /// Decryption or signature verification failed
    #[error("secure message operation failed")]
    Fail,

    /// A key could not be used
    #[error("key error: {0}")]
    Soter(#[from] SoterError),
}

impl From<CellError> for MessageError {
    fn from(err: CellError) -> Self {
        match err {
            CellError::NoMemory => Self::InvalidParameter("message too large"),
            _ => Self::Fail,
        }
    }
}
