//! Authentication token headers.
//!
//! Master key token, all integers little-endian:
//!
//! ```text
//! +-----------+--------+---------+-------------+--------+---------+
//! | alg (4)   | iv len | tag len | message len | iv(12) | tag(16) |
//! +-----------+--------+---------+-------------+--------+---------+
//! ```
//!
//! Passphrase token inserts a KDF context length after the message length
//! and appends the KDF context (iterations `u32`, salt length `u16`, salt).

use ward_soter::AlgorithmId;
use ward_soter::aead::{NONCE_SIZE, TAG_SIZE};
use ward_soter::alg::KdfAlgorithm;
use ward_soter::pbkdf::SALT_SIZE;

use crate::CellError;

/// Master key token size.
pub const AUTH_TOKEN_SIZE: usize = 4 * 4 + NONCE_SIZE + TAG_SIZE;

/// Passphrase KDF context size (iterations, salt length, salt).
pub(crate) const PBKDF2_CONTEXT_SIZE: usize = 4 + 2 + SALT_SIZE;

/// Passphrase token size.
pub const PASSPHRASE_TOKEN_SIZE: usize = 5 * 4 + NONCE_SIZE + TAG_SIZE + PBKDF2_CONTEXT_SIZE;

struct Reader<'a> {
    buf: &'a [u8],
}

impl<'a> Reader<'a> {
    fn take<const N: usize>(&mut self) -> Result<[u8; N], CellError> {
        if self.buf.len() < N {
            return Err(CellError::Fail);
        }
        let (head, rest) = self.buf.split_at(N);
        self.buf = rest;
        let mut out = [0u8; N];
        out.copy_from_slice(head);
        Ok(out)
    }

    fn u32(&mut self) -> Result<u32, CellError> {
        self.take::<4>().map(u32::from_le_bytes)
    }

    fn u16(&mut self) -> Result<u16, CellError> {
        self.take::<2>().map(u16::from_le_bytes)
    }
}

pub(crate) fn message_len(len: usize) -> Result<u32, CellError> {
    u32::try_from(len).map_err(|_| CellError::NoMemory)
}

/// Header of a master key token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Header {
    pub alg: AlgorithmId,
    pub iv: [u8; NONCE_SIZE],
    pub tag: [u8; TAG_SIZE],
    pub message_len: u32,
}

impl Header {
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(AUTH_TOKEN_SIZE);
        out.extend_from_slice(&self.alg.to_le_bytes());
        out.extend_from_slice(&(NONCE_SIZE as u32).to_le_bytes());
        out.extend_from_slice(&(TAG_SIZE as u32).to_le_bytes());
        out.extend_from_slice(&self.message_len.to_le_bytes());
        out.extend_from_slice(&self.iv);
        out.extend_from_slice(&self.tag);
        out
    }

    /// Decode the leading token bytes. Trailing bytes are not inspected.
    pub fn decode(token: &[u8]) -> Result<Self, CellError> {
        let mut r = Reader { buf: token };
        let alg = AlgorithmId::from_raw(r.u32()?);
        let iv_len = r.u32()?;
        let tag_len = r.u32()?;
        let message_len = r.u32()?;

        if !alg.is_valid_for_cell() || alg.kdf() != Some(KdfAlgorithm::None) {
            return Err(CellError::Fail);
        }
        if iv_len as usize != NONCE_SIZE || tag_len as usize != TAG_SIZE {
            return Err(CellError::Fail);
        }

        Ok(Self {
            alg,
            iv: r.take()?,
            tag: r.take()?,
            message_len,
        })
    }
}

/// Header of a passphrase token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PassphraseHeader {
    pub iv: [u8; NONCE_SIZE],
    pub tag: [u8; TAG_SIZE],
    pub message_len: u32,
    pub iterations: u32,
    pub salt: [u8; SALT_SIZE],
}

impl PassphraseHeader {
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(PASSPHRASE_TOKEN_SIZE);
        out.extend_from_slice(&AlgorithmId::SEAL_PASSPHRASE.to_le_bytes());
        out.extend_from_slice(&(NONCE_SIZE as u32).to_le_bytes());
        out.extend_from_slice(&(TAG_SIZE as u32).to_le_bytes());
        out.extend_from_slice(&self.message_len.to_le_bytes());
        out.extend_from_slice(&(PBKDF2_CONTEXT_SIZE as u32).to_le_bytes());
        out.extend_from_slice(&self.iv);
        out.extend_from_slice(&self.tag);
        out.extend_from_slice(&self.iterations.to_le_bytes());
        out.extend_from_slice(&(SALT_SIZE as u16).to_le_bytes());
        out.extend_from_slice(&self.salt);
        out
    }

    pub fn decode(token: &[u8]) -> Result<Self, CellError> {
        let mut r = Reader { buf: token };
        let alg = AlgorithmId::from_raw(r.u32()?);
        let iv_len = r.u32()?;
        let tag_len = r.u32()?;
        let message_len = r.u32()?;
        let kdf_context_len = r.u32()?;

        if !alg.is_valid_for_cell() || alg.kdf() != Some(KdfAlgorithm::Pbkdf2) {
            return Err(CellError::Fail);
        }
        if iv_len as usize != NONCE_SIZE
            || tag_len as usize != TAG_SIZE
            || kdf_context_len as usize != PBKDF2_CONTEXT_SIZE
        {
            return Err(CellError::Fail);
        }

        let iv = r.take()?;
        let tag = r.take()?;
        let iterations = r.u32()?;
        let salt_len = r.u16()?;
        if iterations == 0 || salt_len as usize != SALT_SIZE {
            return Err(CellError::Fail);
        }

        Ok(Self {
            iv,
            tag,
            message_len,
            iterations,
            salt: r.take()?,
        })
    }
}
