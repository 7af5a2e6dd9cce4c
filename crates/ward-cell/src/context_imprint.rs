//! Context Imprint mode: length-preserving encryption.
//!
//! # No integrity
//!
//! Context Imprint uses AES-256-CTR with a key and IV derived from the
//! master key, the message length and the context. It detects nothing:
//! a wrong key, a wrong context or a damaged ciphertext all decrypt to
//! garbage without an error. Use [`crate::Seal`] or [`crate::TokenProtect`]
//! whenever there is room for a token.
//!
//! The same (key, context, length) always yields the same ciphertext, so the
//! context must be unique per message (a record id, a row number).

use ward_soter::kdf;
use ward_soter::stream::{self, IV_SIZE};
use zeroize::Zeroizing;

use crate::seal::MESSAGE_KEY_LABEL;
use crate::token::message_len;
use crate::{CellError, Mode};

const MESSAGE_IV_LABEL: &str = "Themis secure cell message iv";

/// Secure Cell in Context Imprint mode.
pub struct ContextImprint {
    key: Zeroizing<Vec<u8>>,
}

impl ContextImprint {
    /// Create a cell keyed with a symmetric master key.
    ///
    /// # Errors
    ///
    /// Returns [`CellError::MissingInput`] if `key` is empty.
    pub fn new(key: impl AsRef<[u8]>) -> Result<Self, CellError> {
        let key = key.as_ref();
        if key.is_empty() {
            return Err(CellError::MissingInput("key"));
        }
        Ok(Self {
            key: Zeroizing::new(key.to_vec()),
        })
    }

    /// Cell mode.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        Mode::ContextImprint
    }

    fn apply(&self, data: &[u8], context: &[u8]) -> Result<Vec<u8>, CellError> {
        if data.is_empty() {
            return Err(CellError::MissingInput("message"));
        }
        if context.is_empty() {
            return Err(CellError::MissingInput("context"));
        }
        let len = message_len(data.len())?.to_le_bytes();

        let key = Zeroizing::new(kdf::derive_key::<32>(&self.key, MESSAGE_KEY_LABEL, &[&len]));
        let iv: [u8; IV_SIZE] = kdf::derive_key(key.as_slice(), MESSAGE_IV_LABEL, &[context]);

        let mut out = data.to_vec();
        stream::apply_keystream(&key, &iv, &mut out);
        Ok(out)
    }

    /// Encrypt `message` under a mandatory `context`.
    ///
    /// # Errors
    ///
    /// Returns [`CellError::MissingInput`] for an empty message or context.
    pub fn encrypt(&self, message: &[u8], context: &[u8]) -> Result<Vec<u8>, CellError> {
        self.apply(message, context)
    }

    /// Decrypt `ciphertext` under the same `context`.
    ///
    /// Never fails on wrong keys or contexts, see the module documentation.
    ///
    /// # Errors
    ///
    /// Returns [`CellError::MissingInput`] for an empty ciphertext or context.
    pub fn decrypt(&self, ciphertext: &[u8], context: &[u8]) -> Result<Vec<u8>, CellError> {
        self.apply(ciphertext, context)
    }
}
