//! Secure Cell algorithm identifiers.
//!
//! Every Secure Cell authentication token starts with a 32-bit algorithm
//! identifier (little-endian on the wire):
//!
//! ```text
//!  31    28 27    24 23    20 19    16 15    12 11                0
//! +--------+--------+--------+--------+--------+-------------------+
//! |  alg   |  kdf   |reserved|padding |reserved|     key bits      |
//! +--------+--------+--------+--------+--------+-------------------+
//! ```

use std::fmt;

/// Symmetric algorithm mask.
pub const ALG_MASK: u32 = 0xF000_0000;
/// KDF selector mask.
pub const KDF_MASK: u32 = 0x0F00_0000;
/// Padding selector mask.
pub const PADDING_MASK: u32 = 0x000F_0000;
/// Key length mask (bits).
pub const KEY_BITS_MASK: u32 = 0x0000_0FFF;

const RESERVED_MASK: u32 = !(ALG_MASK | KDF_MASK | PADDING_MASK | KEY_BITS_MASK);

/// Symmetric cipher selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymmetricAlgorithm {
    /// AES in ECB mode
    AesEcb,
    /// AES in CTR mode
    AesCtr,
    /// AES in XTS mode
    AesXts,
    /// AES in GCM mode
    AesGcm,
}

impl SymmetricAlgorithm {
    const fn nibble(self) -> u32 {
        match self {
            Self::AesEcb => 0x1,
            Self::AesCtr => 0x2,
            Self::AesXts => 0x3,
            Self::AesGcm => 0x4,
        }
    }

    const fn from_nibble(nibble: u32) -> Option<Self> {
        match nibble {
            0x1 => Some(Self::AesEcb),
            0x2 => Some(Self::AesCtr),
            0x3 => Some(Self::AesXts),
            0x4 => Some(Self::AesGcm),
            _ => None,
        }
    }
}

/// Key derivation selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KdfAlgorithm {
    /// Master key goes straight into the Soter KDF
    None,
    /// Passphrase stretched with PBKDF2-HMAC-SHA-256 first
    Pbkdf2,
}

impl KdfAlgorithm {
    const fn nibble(self) -> u32 {
        match self {
            Self::None => 0x0,
            Self::Pbkdf2 => 0x1,
        }
    }

    const fn from_nibble(nibble: u32) -> Option<Self> {
        match nibble {
            0x0 => Some(Self::None),
            0x1 => Some(Self::Pbkdf2),
            _ => None,
        }
    }
}

/// Padding selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Padding {
    /// No padding
    None,
    /// PKCS#7 padding
    Pkcs7,
}

impl Padding {
    const fn nibble(self) -> u32 {
        match self {
            Self::None => 0x0,
            Self::Pkcs7 => 0x1,
        }
    }

    const fn from_nibble(nibble: u32) -> Option<Self> {
        match nibble {
            0x0 => Some(Self::None),
            0x1 => Some(Self::Pkcs7),
            _ => None,
        }
    }
}

/// Packed algorithm identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct AlgorithmId(u32);

impl AlgorithmId {
    /// AES-256-GCM keyed through the Soter KDF, used by master-key cells.
    pub const SEAL_MASTER_KEY: Self =
        Self::new(SymmetricAlgorithm::AesGcm, KdfAlgorithm::None, Padding::Pkcs7, 256);

    /// AES-256-GCM keyed through PBKDF2 then the Soter KDF, used by passphrase cells.
    pub const SEAL_PASSPHRASE: Self =
        Self::new(SymmetricAlgorithm::AesGcm, KdfAlgorithm::Pbkdf2, Padding::Pkcs7, 256);

    /// Pack an identifier. Key bits beyond 12 bits are masked off.
    #[must_use]
    pub const fn new(
        algorithm: SymmetricAlgorithm,
        kdf: KdfAlgorithm,
        padding: Padding,
        key_bits: u32,
    ) -> Self {
        Self(
            (algorithm.nibble() << 28)
                | (kdf.nibble() << 24)
                | (padding.nibble() << 16)
                | (key_bits & KEY_BITS_MASK),
        )
    }

    /// Wrap a raw identifier.
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw 32-bit value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Symmetric algorithm, if known.
    #[must_use]
    pub const fn algorithm(self) -> Option<SymmetricAlgorithm> {
        SymmetricAlgorithm::from_nibble((self.0 & ALG_MASK) >> 28)
    }

    /// KDF selector, if known.
    #[must_use]
    pub const fn kdf(self) -> Option<KdfAlgorithm> {
        KdfAlgorithm::from_nibble((self.0 & KDF_MASK) >> 24)
    }

    /// Padding selector, if known.
    #[must_use]
    pub const fn padding(self) -> Option<Padding> {
        Padding::from_nibble((self.0 & PADDING_MASK) >> 16)
    }

    /// Key length in bits.
    #[must_use]
    pub const fn key_bits(self) -> u32 {
        self.0 & KEY_BITS_MASK
    }

    /// Whether all reserved bits are clear.
    #[must_use]
    pub const fn reserved_bits_valid(self) -> bool {
        self.0 & RESERVED_MASK == 0
    }

    /// Whether a Secure Cell can process this identifier: AES-GCM with
    /// PKCS#7, a 256-bit key, a known KDF and clear reserved bits.
    #[must_use]
    pub const fn is_valid_for_cell(self) -> bool {
        matches!(self.algorithm(), Some(SymmetricAlgorithm::AesGcm))
            && matches!(self.padding(), Some(Padding::Pkcs7))
            && self.kdf().is_some()
            && self.key_bits() == 256
            && self.reserved_bits_valid()
    }

    /// Little-endian wire encoding.
    #[must_use]
    pub const fn to_le_bytes(self) -> [u8; 4] {
        self.0.to_le_bytes()
    }

    /// Decode from little-endian wire encoding.
    #[must_use]
    pub const fn from_le_bytes(bytes: [u8; 4]) -> Self {
        Self(u32::from_le_bytes(bytes))
    }
}

impl fmt::Debug for AlgorithmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AlgorithmId({:#010x})", self.0)
    }
}
