//! Secure Cell error types.

use thiserror::Error;
use ward_soter::SoterError;

/// Secure Cell errors
///
/// Every failure after parameter checks is reported as [`CellError::Fail`]:
/// a wrong key, a wrong context and corrupted data are indistinguishable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CellError {
    /// A required input was empty
    #[error("missing input: {0}")]
    MissingInput(&'static str),

    /// An input was present but unusable
    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),

    /// Encryption or decryption failed
    #[error("secure cell operation failed")]
    Fail,

    /// A length does not fit the 32-bit wire fields
    #[error("data too large for secure cell")]
    NoMemory,
}

impl From<SoterError> for CellError {
    fn from(_: SoterError) -> Self {
        Self::Fail
    }
}
