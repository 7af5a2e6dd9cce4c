//! Seal mode: authenticated encryption with the token prepended.

use tracing::{debug, trace};
use ward_soter::aead::{AeadKey, Nonce, Tag};
use ward_soter::{AlgorithmId, kdf};
use zeroize::Zeroizing;

use crate::token::{AUTH_TOKEN_SIZE, Header, message_len};
use crate::{CellError, Mode};

pub(crate) const MESSAGE_KEY_LABEL: &str = "Themis secure cell message key";

/// Per-message AES key bound to the message length and context.
pub(crate) fn message_key(master: &[u8], message_len: u32, context: &[u8]) -> AeadKey {
    let len = message_len.to_le_bytes();
    let key = Zeroizing::new(kdf::derive_key::<32>(master, MESSAGE_KEY_LABEL, &[&len, context]));
    AeadKey::new(*key)
}

/// Encrypt under `master`, returning the token and the ciphertext.
pub(crate) fn seal_detached(
    master: &[u8],
    message: &[u8],
    context: &[u8],
) -> Result<(Vec<u8>, Vec<u8>), CellError> {
    let message_len = message_len(message.len())?;
    let key = message_key(master, message_len, context);
    let nonce = Nonce::random()?;

    let mut ciphertext = message.to_vec();
    let tag = key.encrypt_in_place(&nonce, &mut ciphertext, context)?;

    let header = Header {
        alg: AlgorithmId::SEAL_MASTER_KEY,
        iv: *nonce.as_bytes(),
        tag: *tag.as_bytes(),
        message_len,
    };
    Ok((header.encode(), ciphertext))
}

/// Authenticate and decrypt `ciphertext` described by `header`.
pub(crate) fn open_detached(
    master: &[u8],
    header: &Header,
    ciphertext: &[u8],
    context: &[u8],
) -> Result<Vec<u8>, CellError> {
    if header.message_len as usize != ciphertext.len() {
        trace!(
            declared = header.message_len,
            actual = ciphertext.len(),
            "secure cell length mismatch"
        );
        return Err(CellError::Fail);
    }

    let key = message_key(master, header.message_len, context);
    let mut plaintext = ciphertext.to_vec();
    key.decrypt_in_place(
        &Nonce::from_bytes(header.iv),
        &mut plaintext,
        &Tag::from_bytes(header.tag),
        context,
    )
    .map_err(|_| {
        debug!(alg = ?header.alg, "secure cell authentication failed");
        CellError::Fail
    })?;
    Ok(plaintext)
}

/// Secure Cell in Seal mode.
///
/// Output is the 44-byte authentication token followed by the ciphertext, so
/// a sealed message is always 44 bytes longer than the plaintext. The
/// optional context is authenticated but not stored: decryption must supply
/// the same context.
pub struct Seal {
    key: Zeroizing<Vec<u8>>,
}

impl Seal {
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
        Mode::Seal
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
        let (mut sealed, ciphertext) = seal_detached(&self.key, message, context)?;
        sealed.extend_from_slice(&ciphertext);
        trace!(len = sealed.len(), "sealed message");
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
        let header = Header::decode(sealed)?;
        open_detached(&self.key, &header, &sealed[AUTH_TOKEN_SIZE..], context)
    }
}
