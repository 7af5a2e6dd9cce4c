//! # WARD Soter
//!
//! Low-level primitives shared by every WARD protocol.
//!
//! This crate provides:
//! - Soter KDF (HMAC-SHA-256 based, with implicit keys for empty input)
//! - Soter containers (tagged, length-prefixed, CRC-32C checksummed blobs)
//! - Secure Cell `AlgorithmId` bitfield
//! - AES-256-GCM and AES-256-CTR
//! - EC P-256 key pairs packaged in containers, ECDSA signatures, ECDH
//! - PBKDF2 for passphrase-derived keys
//! - Secure random number generation and constant-time comparison
//!
//! ## Cryptographic Suite
//!
//! | Function | Algorithm | Security Level |
//! |----------|-----------|----------------|
//! | KDF | Soter KDF (HMAC-SHA-256) | 256-bit key |
//! | AEAD | AES-256-GCM | 256-bit key |
//! | Stream | AES-256-CTR | 256-bit key |
//! | Key Agreement | ECDH P-256 | 128-bit |
//! | Signatures | ECDSA P-256 / SHA-256 | 128-bit |
//! | Passphrase KDF | PBKDF2-HMAC-SHA-256 | passphrase bound |
//! | Checksum | CRC-32C | integrity only |

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod aead;
pub mod alg;
pub mod constant_time;
pub mod container;
pub mod error;
pub mod kdf;
pub mod keys;
pub mod mac;
pub mod pbkdf;
pub mod random;
pub mod signatures;
pub mod stream;

pub use alg::AlgorithmId;
pub use container::Container;
pub use error::SoterError;
pub use keys::{KeyKind, KeyPair, PrivateKey, PublicKey};

/// Soter KDF maximum output size (one HMAC-SHA-256 block)
pub const KDF_MAX_OUTPUT_SIZE: usize = 32;

/// HMAC-SHA-256 output size
pub const HMAC_SHA256_SIZE: usize = 32;

/// Container header size (tag + length + checksum)
pub const CONTAINER_HEADER_SIZE: usize = 12;

/// Container tag size
pub const CONTAINER_TAG_SIZE: usize = 4;
