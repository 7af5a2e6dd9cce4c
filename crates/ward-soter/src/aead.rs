//! AES-256-GCM AEAD encryption.
//!
//! Provides authenticated encryption with associated data (AEAD) using
//! AES-256-GCM. Features include:
//! - 256-bit keys
//! - 96-bit nonces for Secure Cell tokens
//! - 128-bit nonces for Secure Session transport frames
//! - 128-bit authentication tags
//! - Detached in-place operation for token-based layouts
//!
//! ## Usage
//!
//! ```ignore
//! use ward_soter::aead::{AeadKey, Nonce};
//!
//! let key = AeadKey::new(derived);
//! let nonce = Nonce::random()?;
//!
//! let ciphertext = key.encrypt(&nonce, b"secret", b"aad")?;
//! let plaintext = key.decrypt(&nonce, &ciphertext, b"aad")?;
//! ```

use aes_gcm::{
    Aes256Gcm, AesGcm,
    aead::{Aead, AeadInPlace, KeyInit, Payload, consts::U16, generic_array::GenericArray},
    aes::Aes256,
};
use zeroize::ZeroizeOnDrop;

use crate::SoterError;
use crate::random::random_array;

/// Authentication tag size (16 bytes / 128 bits).
pub const TAG_SIZE: usize = 16;

/// Standard GCM nonce size (12 bytes / 96 bits).
pub const NONCE_SIZE: usize = 12;

/// Long GCM nonce size (16 bytes / 128 bits).
pub const LONG_NONCE_SIZE: usize = 16;

/// AEAD key size (32 bytes / 256 bits).
pub const KEY_SIZE: usize = 32;

type Aes256GcmLongNonce = AesGcm<Aes256, U16>;

/// 96-bit AES-GCM nonce.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Nonce([u8; NONCE_SIZE]);

impl Nonce {
    /// Create a nonce from raw bytes.
    #[must_use]
    pub fn from_bytes(bytes: [u8; NONCE_SIZE]) -> Self {
        Self(bytes)
    }

    /// Create a nonce from a slice.
    #[must_use]
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        <[u8; NONCE_SIZE]>::try_from(slice).ok().map(Self)
    }

    /// Generate a random nonce.
    ///
    /// # Errors
    ///
    /// Returns [`SoterError::RandomFailed`] if the OS CSPRNG fails.
    pub fn random() -> Result<Self, SoterError> {
        random_array().map(Self)
    }

    /// Get raw bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; NONCE_SIZE] {
        &self.0
    }
}

/// 128-bit AES-GCM nonce, hashed into the initial counter by GHASH.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LongNonce([u8; LONG_NONCE_SIZE]);

impl LongNonce {
    /// Create a nonce from raw bytes.
    #[must_use]
    pub fn from_bytes(bytes: [u8; LONG_NONCE_SIZE]) -> Self {
        Self(bytes)
    }

    /// Create a nonce from a slice.
    #[must_use]
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        <[u8; LONG_NONCE_SIZE]>::try_from(slice).ok().map(Self)
    }

    /// Generate a random nonce.
    ///
    /// # Errors
    ///
    /// Returns [`SoterError::RandomFailed`] if the OS CSPRNG fails.
    pub fn random() -> Result<Self, SoterError> {
        random_array().map(Self)
    }

    /// Get raw bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; LONG_NONCE_SIZE] {
        &self.0
    }
}

/// Authentication tag (16 bytes).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tag([u8; TAG_SIZE]);

impl Tag {
    /// Create a tag from raw bytes.
    #[must_use]
    pub fn from_bytes(bytes: [u8; TAG_SIZE]) -> Self {
        Self(bytes)
    }

    /// Create from slice.
    #[must_use]
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        <[u8; TAG_SIZE]>::try_from(slice).ok().map(Self)
    }

    /// Get raw bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; TAG_SIZE] {
        &self.0
    }
}

/// AES-256-GCM key (32 bytes).
///
/// Key is zeroized on drop.
#[derive(Clone, ZeroizeOnDrop)]
pub struct AeadKey([u8; KEY_SIZE]);

impl AeadKey {
    /// Create a key from raw bytes.
    #[must_use]
    pub fn new(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Create from slice.
    ///
    /// # Errors
    ///
    /// Returns [`SoterError::InvalidKey`] if the slice is not 32 bytes.
    pub fn from_slice(slice: &[u8]) -> Result<Self, SoterError> {
        <[u8; KEY_SIZE]>::try_from(slice)
            .map(Self)
            .map_err(|_| SoterError::InvalidKey)
    }

    /// Get raw key bytes.
    ///
    /// # Security
    ///
    /// Handle with extreme care - this exposes the raw key material.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }

    fn cipher(&self) -> Aes256Gcm {
        Aes256Gcm::new(GenericArray::from_slice(&self.0))
    }

    fn long_nonce_cipher(&self) -> Aes256GcmLongNonce {
        Aes256GcmLongNonce::new(GenericArray::from_slice(&self.0))
    }

    /// Encrypt plaintext with associated data.
    ///
    /// Returns ciphertext with appended authentication tag (`plaintext.len()` + 16 bytes).
    ///
    /// # Errors
    ///
    /// Returns [`SoterError::EncryptionFailed`] if AEAD encryption fails.
    pub fn encrypt(&self, nonce: &Nonce, plaintext: &[u8], aad: &[u8]) -> Result<Vec<u8>, SoterError> {
        self.cipher()
            .encrypt(
                GenericArray::from_slice(&nonce.0),
                Payload {
                    msg: plaintext,
                    aad,
                },
            )
            .map_err(|_| SoterError::EncryptionFailed)
    }

    /// Decrypt ciphertext with associated data.
    ///
    /// Input must include the authentication tag at the end.
    ///
    /// # Errors
    ///
    /// Returns [`SoterError::DecryptionFailed`] on authentication failure.
    pub fn decrypt(
        &self,
        nonce: &Nonce,
        ciphertext_and_tag: &[u8],
        aad: &[u8],
    ) -> Result<Vec<u8>, SoterError> {
        if ciphertext_and_tag.len() < TAG_SIZE {
            return Err(SoterError::DecryptionFailed);
        }

        self.cipher()
            .decrypt(
                GenericArray::from_slice(&nonce.0),
                Payload {
                    msg: ciphertext_and_tag,
                    aad,
                },
            )
            .map_err(|_| SoterError::DecryptionFailed)
    }

    /// Encrypt in-place, returning the authentication tag.
    ///
    /// # Errors
    ///
    /// Returns [`SoterError::EncryptionFailed`] if AEAD encryption fails.
    pub fn encrypt_in_place(&self, nonce: &Nonce, buffer: &mut [u8], aad: &[u8]) -> Result<Tag, SoterError> {
        let tag = self
            .cipher()
            .encrypt_in_place_detached(GenericArray::from_slice(&nonce.0), aad, buffer)
            .map_err(|_| SoterError::EncryptionFailed)?;

        let mut tag_bytes = [0u8; TAG_SIZE];
        tag_bytes.copy_from_slice(&tag);
        Ok(Tag(tag_bytes))
    }

    /// Decrypt in-place, verifying the authentication tag.
    ///
    /// # Errors
    ///
    /// Returns [`SoterError::DecryptionFailed`] on authentication failure.
    pub fn decrypt_in_place(
        &self,
        nonce: &Nonce,
        buffer: &mut [u8],
        tag: &Tag,
        aad: &[u8],
    ) -> Result<(), SoterError> {
        self.cipher()
            .decrypt_in_place_detached(
                GenericArray::from_slice(&nonce.0),
                aad,
                buffer,
                GenericArray::from_slice(&tag.0),
            )
            .map_err(|_| SoterError::DecryptionFailed)
    }

    /// Encrypt with a 128-bit nonce, returning ciphertext ‖ tag.
    ///
    /// # Errors
    ///
    /// Returns [`SoterError::EncryptionFailed`] if AEAD encryption fails.
    pub fn encrypt_long(&self, nonce: &LongNonce, plaintext: &[u8], aad: &[u8]) -> Result<Vec<u8>, SoterError> {
        self.long_nonce_cipher()
            .encrypt(
                GenericArray::from_slice(&nonce.0),
                Payload {
                    msg: plaintext,
                    aad,
                },
            )
            .map_err(|_| SoterError::EncryptionFailed)
    }

    /// Decrypt ciphertext ‖ tag produced with a 128-bit nonce.
    ///
    /// # Errors
    ///
    /// Returns [`SoterError::DecryptionFailed`] on authentication failure.
    pub fn decrypt_long(
        &self,
        nonce: &LongNonce,
        ciphertext_and_tag: &[u8],
        aad: &[u8],
    ) -> Result<Vec<u8>, SoterError> {
        if ciphertext_and_tag.len() < TAG_SIZE {
            return Err(SoterError::DecryptionFailed);
        }

        self.long_nonce_cipher()
            .decrypt(
                GenericArray::from_slice(&nonce.0),
                Payload {
                    msg: ciphertext_and_tag,
                    aad,
                },
            )
            .map_err(|_| SoterError::DecryptionFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let key = AeadKey::new([0x42; 32]);
        let nonce = Nonce::from_bytes([7; 12]);

        let ciphertext = key.encrypt(&nonce, b"hello", b"aad").unwrap();
        assert_eq!(ciphertext.len(), 5 + TAG_SIZE);

        let plaintext = key.decrypt(&nonce, &ciphertext, b"aad").unwrap();
        assert_eq!(plaintext, b"hello");
    }

    #[test]
    fn test_wrong_aad_fails() {
        let key = AeadKey::new([0x42; 32]);
        let nonce = Nonce::from_bytes([7; 12]);
        let ciphertext = key.encrypt(&nonce, b"hello", b"aad").unwrap();

        assert_eq!(
            key.decrypt(&nonce, &ciphertext, b"other"),
            Err(SoterError::DecryptionFailed)
        );
    }

    #[test]
    fn test_nist_gcm_empty_vector() {
        // NIST GCM test case 13: zero key, zero IV, empty plaintext
        let key = AeadKey::new([0; 32]);
        let nonce = Nonce::from_bytes([0; 12]);
        let tag = key.encrypt(&nonce, b"", b"").unwrap();
        assert_eq!(hex::encode(tag), "530f8afbc74536b9a963b4f1c4cb738b");
    }

    #[test]
    fn test_detached_roundtrip() {
        let key = AeadKey::new([1; 32]);
        let nonce = Nonce::random().unwrap();

        let mut buffer = b"detached message".to_vec();
        let tag = key.encrypt_in_place(&nonce, &mut buffer, b"ctx").unwrap();
        assert_ne!(buffer, b"detached message");

        key.decrypt_in_place(&nonce, &mut buffer, &tag, b"ctx").unwrap();
        assert_eq!(buffer, b"detached message");
    }

    #[test]
    fn test_detached_tampered_tag() {
        let key = AeadKey::new([1; 32]);
        let nonce = Nonce::random().unwrap();

        let mut buffer = b"detached message".to_vec();
        let tag = key.encrypt_in_place(&nonce, &mut buffer, b"").unwrap();
        let mut bad = *tag.as_bytes();
        bad[0] ^= 1;

        assert!(
            key.decrypt_in_place(&nonce, &mut buffer, &Tag::from_bytes(bad), b"")
                .is_err()
        );
    }

    #[test]
    fn test_long_nonce_roundtrip() {
        let key = AeadKey::new([9; 32]);
        let nonce = LongNonce::random().unwrap();

        let sealed = key.encrypt_long(&nonce, b"frame", b"").unwrap();
        assert_eq!(key.decrypt_long(&nonce, &sealed, b"").unwrap(), b"frame");

        let other = LongNonce::from_bytes([0; 16]);
        assert!(key.decrypt_long(&other, &sealed, b"").is_err());
    }

    #[test]
    fn test_short_ciphertext_rejected() {
        let key = AeadKey::new([9; 32]);
        let nonce = Nonce::from_bytes([0; 12]);
        assert!(key.decrypt(&nonce, &[0u8; 15], b"").is_err());
    }

    #[test]
    fn test_from_slice_lengths() {
        assert!(AeadKey::from_slice(&[0u8; 31]).is_err());
        assert!(AeadKey::from_slice(&[0u8; 32]).is_ok());
        assert!(Nonce::from_slice(&[0u8; 11]).is_none());
        assert!(LongNonce::from_slice(&[0u8; 16]).is_some());
        assert!(Tag::from_slice(&[0u8; 16]).is_some());
    }
}
