//! Seal mode keyed by a passphrase.
//!
//! The passphrase is stretched with PBKDF2-HMAC-SHA-256 using a fresh
//! 16-byte salt per message; the iteration count and salt travel in the
//! token so decryption needs only the passphrase.

use tracing::{debug, trace};
use ward_soter::aead::{Nonce, Tag};
use ward_soter::pbkdf::{self, SALT_SIZE};
use ward_soter::random::random_array;
use zeroize::Zeroizing;

use crate::config::CellConfig;
use crate::seal::message_key;
use crate::token::{PASSPHRASE_TOKEN_SIZE, PassphraseHeader, message_len};
use crate::{CellError, Mode};

/// Secure Cell in Seal mode with a passphrase.
pub struct SealWithPassphrase {
    passphrase: Zeroizing<Vec<u8>>,
    iterations: u32,
}

impl SealWithPassphrase {
    /// Create a cell from a UTF-8 passphrase.
    ///
    /// # Errors
    ///
    /// Returns [`CellError::MissingInput`] if the passphrase is empty.
    pub fn new(passphrase: &str) -> Result<Self, CellError> {
        if passphrase.is_empty() {
            return Err(CellError::MissingInput("passphrase"));
        }
        Ok(Self {
            passphrase: Zeroizing::new(passphrase.as_bytes().to_vec()),
            iterations: pbkdf::DEFAULT_ITERATIONS,
        })
    }

    /// Apply configuration to messages encrypted from now on.
    ///
    /// Decryption always uses the iteration count stored in the token.
    ///
    /// # Errors
    ///
    /// Returns [`CellError::InvalidParameter`] if the iteration count is zero.
    pub fn with_config(mut self, config: &CellConfig) -> Result<Self, CellError> {
        if config.pbkdf2_iterations == 0 {
            return Err(CellError::InvalidParameter("pbkdf2_iterations"));
        }
        self.iterations = config.pbkdf2_iterations;
        Ok(self)
    }

    /// Cell mode.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        Mode::SealWithPassphrase
    }

    /// Encrypt `message`, binding it to `context`.
    ///
    /// # Errors
    ///
    /// Returns [`CellError::MissingInput`] for an empty message,
    /// [`CellError::NoMemory`] if it does not fit a 32-bit length.
    pub fn encrypt(&self, message: &[u8], context: &[u8]) -> Result<Vec<u8>, CellError> {
        if message.is_empty() {
            return Err(CellError::MissingInput("message"));
        }
        let message_len = message_len(message.len())?;
        let salt: [u8; SALT_SIZE] = random_array()?;
        let stretched = pbkdf::pbkdf2_sha256(&self.passphrase, &salt, self.iterations);
        let key = message_key(stretched.as_slice(), message_len, context);
        let nonce = Nonce::random()?;

        let mut ciphertext = message.to_vec();
        let tag = key.encrypt_in_place(&nonce, &mut ciphertext, context)?;

        let header = PassphraseHeader {
            iv: *nonce.as_bytes(),
            tag: *tag.as_bytes(),
            message_len,
            iterations: self.iterations,
            salt,
        };
        let mut sealed = header.encode();
        sealed.extend_from_slice(&ciphertext);
        trace!(len = sealed.len(), iterations = self.iterations, "sealed message with passphrase");
        Ok(sealed)
    }

    /// Decrypt a sealed message.
    ///
    /// # Errors
    ///
    /// Returns [`CellError::MissingInput`] for empty input and
    /// [`CellError::Fail`] for anything that does not authenticate.
    pub fn decrypt(&self, sealed: &[u8], context: &[u8]) -> Result<Vec<u8>, CellError> {
        if sealed.is_empty() {
            return Err(CellError::MissingInput("message"));
        }
        let header = PassphraseHeader::decode(sealed)?;
        let ciphertext = &sealed[PASSPHRASE_TOKEN_SIZE..];
        if header.message_len as usize != ciphertext.len() {
            return Err(CellError::Fail);
        }

        let stretched = pbkdf::pbkdf2_sha256(&self.passphrase, &header.salt, header.iterations);
        let key = message_key(stretched.as_slice(), header.message_len, context);
        let mut plaintext = ciphertext.to_vec();
        key.decrypt_in_place(
            &Nonce::from_bytes(header.iv),
            &mut plaintext,
            &Tag::from_bytes(header.tag),
            context,
        )
        .map_err(|_| {
            debug!("passphrase cell authentication failed");
            CellError::Fail
        })?;
        Ok(plaintext)
    }
}
