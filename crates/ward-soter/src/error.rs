//! Soter error types.

use thiserror::Error;

/// Errors raised by Soter primitives
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SoterError {
    /// Key material is not a well-formed key of the expected kind
    #[error("invalid key")]
    InvalidKey,

    /// Signature did not verify
    #[error("invalid signature")]
    InvalidSignature,

    /// AEAD encryption failed
    #[error("encryption failed")]
    EncryptionFailed,

    /// AEAD decryption failed (authentication failure)
    #[error("decryption failed: authentication failure")]
    DecryptionFailed,

    /// Random number generation failed
    #[error("random number generation failed")]
    RandomFailed,
}
