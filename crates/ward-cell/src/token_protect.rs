//! Token Protect mode: ciphertext and authentication token kept apart.

use tracing::trace;
use zeroize::Zeroizing;

use crate::seal::{open_detached, seal_detached};
use crate::token::Header;
use crate::{CellError, Mode};

/// Secure Cell in Token Protect mode.
///
/// The ciphertext has exactly the length of the plaintext; the 44-byte
/// authentication token is returned separately and must be supplied again
/// for decryption.
///
/// Only the first 44 bytes of a token are read. A longer token whose
/// leading bytes are correct is accepted, which lets callers pass a token
/// slice taken from a larger buffer.
pub struct TokenProtect {
    key: Zeroizing<Vec<u8>>,
}

impl TokenProtect {
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
        Mode::TokenProtect
    }

    /// Encrypt `message`, returning `(ciphertext, token)`.
    ///
    /// # Errors
    ///
    /// Returns [`CellError::MissingInput`] for an empty message,
    /// [`CellError::NoMemory`] if it does not fit a 32-bit length.
    pub fn encrypt(&self, message: &[u8], context: &[u8]) -> Result<(Vec<u8>, Vec<u8>), CellError> {
        if message.is_empty() {
            return Err(CellError::MissingInput("message"));
        }
        let (token, ciphertext) = seal_detached(&self.key, message, context)?;
        trace!(len = ciphertext.len(), "token protected message");
        Ok((ciphertext, token))
    }

    /// Decrypt `ciphertext` with its authentication token.
    ///
    /// A token longer than the 44-byte header is accepted as long as its
    /// leading bytes authenticate; the extra bytes are ignored. This keeps
    /// existing stored tokens readable and is intentionally permissive.
    ///
    /// # Errors
    ///
    /// Returns [`CellError::MissingInput`] for empty input and
    /// [`CellError::Fail`] for anything that does not authenticate.
    pub fn decrypt(&self, ciphertext: &[u8], token: &[u8], context: &[u8]) -> Result<Vec<u8>, CellError> {
        if ciphertext.is_empty() {
            return Err(CellError::MissingInput("message"));
        }
        if token.is_empty() {
            return Err(CellError::MissingInput("token"));
        }
        let header = Header::decode(token)?;
        open_detached(&self.key, &header, ciphertext, context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::AUTH_TOKEN_SIZE;

    fn cell() -> TokenProtect {
        TokenProtect::new(b"token protect key").unwrap()
    }

    #[test]
    fn test_token_protect_roundtrip() {
        let cell = cell();
        let (ciphertext, token) = cell.encrypt(b"payload", b"ctx").unwrap();
        assert_eq!(ciphertext.len(), 7);
        assert_eq!(token.len(), AUTH_TOKEN_SIZE);
        assert_eq!(cell.decrypt(&ciphertext, &token, b"ctx").unwrap(), b"payload");
    }

    #[test]
    fn test_swapped_inputs_fail() {
        let cell = cell();
        let (ciphertext, token) = cell.encrypt(b"payload", b"").unwrap();
        assert_eq!(cell.decrypt(&token, &ciphertext, b""), Err(CellError::Fail));
    }

    #[test]
    fn test_truncated_token_fails() {
        let cell = cell();
        let (ciphertext, token) = cell.encrypt(b"payload", b"").unwrap();
        assert_eq!(
            cell.decrypt(&ciphertext, &token[..AUTH_TOKEN_SIZE - 1], b""),
            Err(CellError::Fail)
        );
    }

    #[test]
    fn test_overlong_token_accepted() {
        let cell = cell();
        let (ciphertext, mut token) = cell.encrypt(b"payload", b"").unwrap();
        token.extend_from_slice(&[0xEE; 8]);
        assert_eq!(cell.decrypt(&ciphertext, &token, b"").unwrap(), b"payload");
    }

    #[test]
    fn test_corrupted_ciphertext_fails() {
        let cell = cell();
        let (mut ciphertext, token) = cell.encrypt(b"payload", b"").unwrap();
        ciphertext[0] ^= 0x80;
        assert_eq!(cell.decrypt(&ciphertext, &token, b""), Err(CellError::Fail));
    }

    #[test]
    fn test_ciphertext_length_mismatch_fails() {
        let cell = cell();
        let (ciphertext, token) = cell.encrypt(b"payload", b"").unwrap();
        assert_eq!(
            cell.decrypt(&ciphertext[..6], &token, b""),
            Err(CellError::Fail)
        );
    }

    #[test]
    fn test_empty_inputs() {
        let cell = cell();
        assert_eq!(cell.decrypt(b"", b"token", b""), Err(CellError::MissingInput("message")));
        assert_eq!(cell.decrypt(b"data", b"", b""), Err(CellError::MissingInput("token")));
        assert!(matches!(TokenProtect::new(Vec::new()), Err(CellError::MissingInput("key"))));
        assert_eq!(cell.mode(), Mode::TokenProtect);
    }
}
