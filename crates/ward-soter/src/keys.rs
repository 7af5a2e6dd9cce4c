//! Asymmetric keys packaged in Soter containers.
//!
//! Keys travel as containers whose tag names the key family and size:
//!
//! | Tag | Kind |
//! |-----|------|
//! | `REC2` | EC P-256 private key (32-byte scalar) |
//! | `UEC2` | EC P-256 public key (33-byte compressed SEC1 point) |
//! | `RRA*` | RSA private key |
//! | `URA*` | RSA public key |
//!
//! Only EC keys can be used for cryptography here. RSA keys are recognised
//! by tag so that callers get a precise "wrong key family" error.
//!
//! On import the legacy 33-byte private key payload (scalar followed by a
//! zero byte) and 65-byte uncompressed public points are accepted too.

use std::fmt;

use p256::elliptic_curve::sec1::ToEncodedPoint;
use rand_core::OsRng;
use zeroize::Zeroizing;

use crate::container::Container;
use crate::{CONTAINER_HEADER_SIZE, SoterError};

/// EC P-256 private key container tag.
pub const EC_PRIVATE_TAG: [u8; 4] = *b"REC2";

/// EC P-256 public key container tag.
pub const EC_PUBLIC_TAG: [u8; 4] = *b"UEC2";

const EC_PRIVATE_PREFIX: &[u8; 3] = b"REC";
const EC_PUBLIC_PREFIX: &[u8; 3] = b"UEC";
const RSA_PRIVATE_PREFIX: &[u8; 3] = b"RRA";
const RSA_PUBLIC_PREFIX: &[u8; 3] = b"URA";

/// P-256 scalar size.
pub const EC_PRIVATE_KEY_SIZE: usize = 32;

/// Compressed P-256 point size.
pub const EC_PUBLIC_KEY_SIZE: usize = 33;

const EC_PUBLIC_KEY_UNCOMPRESSED_SIZE: usize = 65;

/// Key family and visibility, read from the container tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    /// RSA private key
    RsaPrivate,
    /// RSA public key
    RsaPublic,
    /// EC private key
    EcPrivate,
    /// EC public key
    EcPublic,
}

impl KeyKind {
    /// Classify a serialized key by its tag. Does not validate the checksum.
    #[must_use]
    pub fn of(key: &[u8]) -> Option<Self> {
        if key.len() < CONTAINER_HEADER_SIZE {
            return None;
        }
        match &key[..3] {
            p if p == RSA_PRIVATE_PREFIX => Some(Self::RsaPrivate),
            p if p == RSA_PUBLIC_PREFIX => Some(Self::RsaPublic),
            p if p == EC_PRIVATE_PREFIX => Some(Self::EcPrivate),
            p if p == EC_PUBLIC_PREFIX => Some(Self::EcPublic),
            _ => None,
        }
    }

    /// Whether this is a private key.
    #[must_use]
    pub fn is_private(self) -> bool {
        matches!(self, Self::RsaPrivate | Self::EcPrivate)
    }

    /// Whether this is an EC key.
    #[must_use]
    pub fn is_ec(self) -> bool {
        matches!(self, Self::EcPrivate | Self::EcPublic)
    }
}

/// Check that `key` is a well-formed key container of a known kind.
///
/// The declared container length must cover the buffer exactly and the
/// checksum must match.
///
/// # Errors
///
/// Returns [`SoterError::InvalidKey`] otherwise.
pub fn validate_key(key: &[u8]) -> Result<KeyKind, SoterError> {
    let kind = KeyKind::of(key).ok_or(SoterError::InvalidKey)?;
    match Container::parse(key) {
        Some((_, rest)) if rest.is_empty() => Ok(kind),
        _ => Err(SoterError::InvalidKey),
    }
}

fn parse_exact(key: &[u8], tag: &[u8; 4]) -> Result<Container, SoterError> {
    match Container::parse_tagged(key, tag) {
        Some((container, rest)) if rest.is_empty() => Ok(container),
        _ => Err(SoterError::InvalidKey),
    }
}

/// EC P-256 private key.
///
/// Secret scalar and its serialized form are zeroized on drop.
#[derive(Clone)]
pub struct PrivateKey {
    secret: p256::SecretKey,
    encoded: Zeroizing<Vec<u8>>,
}

impl PrivateKey {
    /// Generate a new random key.
    #[must_use]
    pub fn generate() -> Self {
        Self::from_secret(p256::SecretKey::random(&mut OsRng))
    }

    fn from_secret(secret: p256::SecretKey) -> Self {
        let scalar = Zeroizing::new(secret.to_bytes().to_vec());
        let encoded = Zeroizing::new(Container::new(EC_PRIVATE_TAG, scalar.to_vec()).to_bytes());
        Self { secret, encoded }
    }

    /// Parse a `REC2` container.
    ///
    /// # Errors
    ///
    /// Returns [`SoterError::InvalidKey`] if the container is malformed, is
    /// not an EC private key, or holds an invalid scalar.
    pub fn from_bytes(key: &[u8]) -> Result<Self, SoterError> {
        let container = parse_exact(key, &EC_PRIVATE_TAG)?;
        let scalar = match container.payload() {
            p if p.len() == EC_PRIVATE_KEY_SIZE => p,
            p if p.len() == EC_PUBLIC_KEY_SIZE && p[EC_PRIVATE_KEY_SIZE] == 0 => {
                &p[..EC_PRIVATE_KEY_SIZE]
            }
            _ => return Err(SoterError::InvalidKey),
        };
        let secret = p256::SecretKey::from_slice(scalar).map_err(|_| SoterError::InvalidKey)?;
        Ok(Self {
            secret,
            encoded: Zeroizing::new(key.to_vec()),
        })
    }

    /// Serialized container bytes.
    ///
    /// # Security
    ///
    /// This exposes the secret key. Handle with care.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.encoded
    }

    /// Corresponding public key.
    #[must_use]
    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_point(self.secret.public_key())
    }

    /// ECDH agreement with a peer public key, returning the x-coordinate.
    #[must_use]
    pub fn agree(&self, peer: &PublicKey) -> Zeroizing<[u8; 32]> {
        let shared = p256::ecdh::diffie_hellman(self.secret.to_nonzero_scalar(), peer.point.as_affine());
        let mut out = Zeroizing::new([0u8; 32]);
        out.copy_from_slice(shared.raw_secret_bytes());
        out
    }

    pub(crate) fn secret(&self) -> &p256::SecretKey {
        &self.secret
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey").finish_non_exhaustive()
    }
}

/// EC P-256 public key.
///
/// Keeps the exact bytes it was parsed from so that signatures computed
/// over the serialized key stay stable.
#[derive(Clone)]
pub struct PublicKey {
    point: p256::PublicKey,
    encoded: Vec<u8>,
}

impl PublicKey {
    fn from_point(point: p256::PublicKey) -> Self {
        let sec1 = point.to_encoded_point(true);
        let encoded = Container::new(EC_PUBLIC_TAG, sec1.as_bytes().to_vec()).to_bytes();
        Self { point, encoded }
    }

    /// Parse a `UEC2` container.
    ///
    /// # Errors
    ///
    /// Returns [`SoterError::InvalidKey`] if the container is malformed, is
    /// not an EC public key, or the point is not on the curve.
    pub fn from_bytes(key: &[u8]) -> Result<Self, SoterError> {
        let container = parse_exact(key, &EC_PUBLIC_TAG)?;
        let sec1 = container.payload();
        if sec1.len() != EC_PUBLIC_KEY_SIZE && sec1.len() != EC_PUBLIC_KEY_UNCOMPRESSED_SIZE {
            return Err(SoterError::InvalidKey);
        }
        let point = p256::PublicKey::from_sec1_bytes(sec1).map_err(|_| SoterError::InvalidKey)?;
        Ok(Self {
            point,
            encoded: key.to_vec(),
        })
    }

    /// Serialized container bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.encoded
    }

    pub(crate) fn point(&self) -> &p256::PublicKey {
        &self.point
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.point == other.point
    }
}

impl Eq for PublicKey {}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicKey")
            .field("len", &self.encoded.len())
            .finish()
    }
}

/// Matching private and public EC keys.
#[derive(Clone, Debug)]
pub struct KeyPair {
    private: PrivateKey,
    public: PublicKey,
}

impl KeyPair {
    /// Generate a new EC P-256 key pair.
    #[must_use]
    pub fn generate_ec() -> Self {
        Self::from_private(PrivateKey::generate())
    }

    /// Build a pair from an existing private key.
    #[must_use]
    pub fn from_private(private: PrivateKey) -> Self {
        let public = private.public_key();
        Self { private, public }
    }

    /// Private half.
    #[must_use]
    pub fn private_key(&self) -> &PrivateKey {
        &self.private
    }

    /// Public half.
    #[must_use]
    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    /// Split into owned halves.
    #[must_use]
    pub fn into_parts(self) -> (PrivateKey, PublicKey) {
        (self.private, self.public)
    }
}
