//! ECDSA P-256 / SHA-256 signatures.
//!
//! Signatures are DER encoded (at most 72 bytes). Signing and verification
//! take the message as a list of parts that are joined in order, so callers
//! can pass protocol transcripts piece by piece.
//!
//! ## Usage
//!
//! ```ignore
//! use ward_soter::KeyPair;
//!
//! let pair = KeyPair::generate_ec();
//! let signature = pair.private_key().sign(&[b"header", b"body"]);
//! assert!(pair.public_key().verify(&[b"header", b"body"], signature.as_bytes()).is_ok());
//! ```

use p256::ecdsa::signature::{Signer, Verifier};
use p256::ecdsa::{self, SigningKey, VerifyingKey};

use crate::SoterError;
use crate::keys::{PrivateKey, PublicKey};

/// Upper bound of a DER-encoded P-256 signature.
pub const MAX_SIGNATURE_SIZE: usize = 72;

/// DER-encoded ECDSA signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature(Vec<u8>);

impl Signature {
    /// Wrap DER bytes after checking they decode.
    ///
    /// # Errors
    ///
    /// Returns [`SoterError::InvalidSignature`] if the bytes are not a DER signature.
    pub fn from_der(bytes: &[u8]) -> Result<Self, SoterError> {
        ecdsa::Signature::from_der(bytes).map_err(|_| SoterError::InvalidSignature)?;
        Ok(Self(bytes.to_vec()))
    }

    /// DER bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume into DER bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl PrivateKey {
    /// Sign the concatenation of `parts`.
    #[must_use]
    pub fn sign(&self, parts: &[&[u8]]) -> Signature {
        let signing_key = SigningKey::from(self.secret());
        let signature: ecdsa::Signature = signing_key.sign(&parts.concat());
        Signature(signature.to_der().as_bytes().to_vec())
    }
}

impl PublicKey {
    /// Verify a DER signature over the concatenation of `parts`.
    ///
    /// # Errors
    ///
    /// Returns [`SoterError::InvalidSignature`] if the signature is malformed
    /// or does not verify.
    pub fn verify(&self, parts: &[&[u8]], signature: &[u8]) -> Result<(), SoterError> {
        let signature =
            ecdsa::Signature::from_der(signature).map_err(|_| SoterError::InvalidSignature)?;
        VerifyingKey::from(self.point())
            .verify(&parts.concat(), &signature)
            .map_err(|_| SoterError::InvalidSignature)
    }
}
