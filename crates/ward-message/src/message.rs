//! Encrypted and signed messages.
//!
//! ```text
//! encrypted: type(4, LE) ‖ total length(4, LE) ‖ Seal(ECDH secret, message)
//! signed:    type(4, LE) ‖ message length(4, LE) ‖ signature length(4, LE) ‖ message ‖ signature
//! ```

use tracing::trace;
use ward_cell::Seal;
use ward_soter::{PrivateKey, PublicKey};

use crate::MessageError;

/// Header type of an EC encrypted message.
pub const EC_ENCRYPTED: u32 = 0x2604_2720;

/// Header type of an EC signed message.
pub const EC_SIGNED: u32 = 0x2604_2620;

const ENCRYPTED_HEADER_SIZE: usize = 8;
const SIGNED_HEADER_SIZE: usize = 12;

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    let mut word = [0u8; 4];
    word.copy_from_slice(&bytes[at..at + 4]);
    u32::from_le_bytes(word)
}

fn wire_len(len: usize) -> Result<u32, MessageError> {
    u32::try_from(len).map_err(|_| MessageError::InvalidParameter("message too large"))
}

fn private_key(key: &[u8]) -> Result<PrivateKey, MessageError> {
    if key.is_empty() {
        return Err(MessageError::InvalidParameter("empty private key"));
    }
    Ok(PrivateKey::from_bytes(key)?)
}

fn public_key(key: &[u8]) -> Result<PublicKey, MessageError> {
    if key.is_empty() {
        return Err(MessageError::InvalidParameter("empty public key"));
    }
    Ok(PublicKey::from_bytes(key)?)
}

/// Encrypts and decrypts messages between two EC key holders.
///
/// Both sides derive the same Secure Cell key from ECDH, so a message
/// encrypted by either party decrypts on either side.
pub struct SecureMessage {
    cell: Seal,
}

impl SecureMessage {
    /// Bind our private key to the peer's public key.
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::InvalidParameter`] for empty keys and
    /// [`MessageError::Soter`] for keys that do not parse.
    pub fn new(private_key_bytes: &[u8], peer_public_key: &[u8]) -> Result<Self, MessageError> {
        let private = private_key(private_key_bytes)?;
        let peer = public_key(peer_public_key)?;
        let shared = private.agree(&peer);
        let cell = Seal::new(shared.as_slice())?;
        Ok(Self { cell })
    }

    /// Encrypt a message for the peer.
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::InvalidParameter`] for an empty or oversized
    /// message.
    pub fn encrypt(&self, message: &[u8]) -> Result<Vec<u8>, MessageError> {
        if message.is_empty() {
            return Err(MessageError::InvalidParameter("empty message"));
        }
        let sealed = self.cell.encrypt(message, &[])?;
        let total = wire_len(ENCRYPTED_HEADER_SIZE + sealed.len())?;

        let mut out = Vec::with_capacity(total as usize);
        out.extend_from_slice(&EC_ENCRYPTED.to_le_bytes());
        out.extend_from_slice(&total.to_le_bytes());
        out.extend_from_slice(&sealed);
        trace!(len = out.len(), "encrypted secure message");
        Ok(out)
    }

    /// Decrypt a message from the peer.
    ///
    /// # Errors
    ///
    /// - [`MessageError::InvalidParameter`] for empty input
    /// - [`MessageError::InvalidMessage`] if the header is not an encrypted
    ///   message header or its length does not match
    /// - [`MessageError::Fail`] if decryption fails
    pub fn decrypt(&self, wrapped: &[u8]) -> Result<Vec<u8>, MessageError> {
        if wrapped.is_empty() {
            return Err(MessageError::InvalidParameter("empty message"));
        }
        if wrapped.len() <= ENCRYPTED_HEADER_SIZE {
            return Err(MessageError::InvalidMessage("truncated header"));
        }
        if read_u32(wrapped, 0) != EC_ENCRYPTED {
            return Err(MessageError::InvalidMessage("not an encrypted message"));
        }
        if read_u32(wrapped, 4) as usize != wrapped.len() {
            return Err(MessageError::InvalidMessage("length mismatch"));
        }
        Ok(self.cell.decrypt(&wrapped[ENCRYPTED_HEADER_SIZE..], &[])?)
    }

    /// Sign a message with an EC private key.
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::InvalidParameter`] for empty inputs and
    /// [`MessageError::Soter`] for a key that does not parse.
    pub fn sign(private_key_bytes: &[u8], message: &[u8]) -> Result<Vec<u8>, MessageError> {
        let key = private_key(private_key_bytes)?;
        if message.is_empty() {
            return Err(MessageError::InvalidParameter("empty message"));
        }
        let signature = key.sign(&[message]);

        let mut out = Vec::with_capacity(SIGNED_HEADER_SIZE + message.len() + signature.as_bytes().len());
        out.extend_from_slice(&EC_SIGNED.to_le_bytes());
        out.extend_from_slice(&wire_len(message.len())?.to_le_bytes());
        out.extend_from_slice(&wire_len(signature.as_bytes().len())?.to_le_bytes());
        out.extend_from_slice(message);
        out.extend_from_slice(signature.as_bytes());
        Ok(out)
    }

    /// Verify a signed message and return its content.
    ///
    /// # Errors
    ///
    /// - [`MessageError::InvalidParameter`] for empty inputs
    /// - [`MessageError::Soter`] for a key that does not parse
    /// - [`MessageError::InvalidMessage`] for a malformed header
    /// - [`MessageError::Fail`] if the signature does not verify
    pub fn verify(public_key_bytes: &[u8], signed: &[u8]) -> Result<Vec<u8>, MessageError> {
        let key = public_key(public_key_bytes)?;
        if signed.is_empty() {
            return Err(MessageError::InvalidParameter("empty message"));
        }
        if signed.len() < SIGNED_HEADER_SIZE {
            return Err(MessageError::InvalidMessage("truncated header"));
        }
        if read_u32(signed, 0) != EC_SIGNED {
            return Err(MessageError::InvalidMessage("not a signed message"));
        }

        let message_len = read_u32(signed, 4) as usize;
        let signature_len = read_u32(signed, 8) as usize;
        let body = &signed[SIGNED_HEADER_SIZE..];
        if message_len.checked_add(signature_len) != Some(body.len()) {
            return Err(MessageError::InvalidMessage("length mismatch"));
        }

        let (message, signature) = body.split_at(message_len);
        key.verify(&[message], signature).map_err(|_| MessageError::Fail)?;
        Ok(message.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ward_soter::KeyPair;

    fn keys() -> (KeyPair, KeyPair) {
        (KeyPair::generate_ec(), KeyPair::generate_ec())
    }

    #[test]
    fn test_encrypt_decrypt_between_peers() {
        let (alice, bob) = keys();
        let to_bob = SecureMessage::new(alice.private_key().as_bytes(), bob.public_key().as_bytes()).unwrap();
        let from_alice = SecureMessage::new(bob.private_key().as_bytes(), alice.public_key().as_bytes()).unwrap();

        let wrapped = to_bob.encrypt(b"meet at noon").unwrap();
        assert_eq!(read_u32(&wrapped, 0), EC_ENCRYPTED);
        assert_eq!(read_u32(&wrapped, 4) as usize, wrapped.len());
        assert_eq!(from_alice.decrypt(&wrapped).unwrap(), b"meet at noon");

        // Symmetric key: the sender can read its own message too.
        assert_eq!(to_bob.decrypt(&wrapped).unwrap(), b"meet at noon");
    }

    #[test]
    fn test_decrypt_with_wrong_keys_fails() {
        let (alice, bob) = keys();
        let eve = KeyPair::generate_ec();
        let to_bob = SecureMessage::new(alice.private_key().as_bytes(), bob.public_key().as_bytes()).unwrap();
        let eve_view = SecureMessage::new(eve.private_key().as_bytes(), alice.public_key().as_bytes()).unwrap();

        let wrapped = to_bob.encrypt(b"secret").unwrap();
        assert_eq!(eve_view.decrypt(&wrapped), Err(MessageError::Fail));
    }

    #[test]
    fn test_decrypt_rejects_bad_headers() {
        let (alice, bob) = keys();
        let cell = SecureMessage::new(alice.private_key().as_bytes(), bob.public_key().as_bytes()).unwrap();
        let wrapped = cell.encrypt(b"payload").unwrap();

        let mut wrong_type = wrapped.clone();
        wrong_type[0] ^= 0xFF;
        assert!(matches!(cell.decrypt(&wrong_type), Err(MessageError::InvalidMessage(_))));

        assert!(matches!(
            cell.decrypt(&wrapped[..wrapped.len() - 1]),
            Err(MessageError::InvalidMessage(_))
        ));

        let mut tampered = wrapped;
        let last = tampered.len() - 1;
        tampered[last] ^= 1;
        assert_eq!(cell.decrypt(&tampered), Err(MessageError::Fail));

        assert_eq!(cell.decrypt(b""), Err(MessageError::InvalidParameter("empty message")));
    }

    #[test]
    fn test_sign_verify() {
        let pair = KeyPair::generate_ec();
        let signed = SecureMessage::sign(pair.private_key().as_bytes(), b"statement").unwrap();

        assert_eq!(read_u32(&signed, 0), EC_SIGNED);
        assert_eq!(read_u32(&signed, 4), 9);
        assert_eq!(&signed[12..21], b"statement");
        assert_eq!(
            SecureMessage::verify(pair.public_key().as_bytes(), &signed).unwrap(),
            b"statement"
        );
    }

    #[test]
    fn test_verify_rejects_tampering() {
        let pair = KeyPair::generate_ec();
        let other = KeyPair::generate_ec();
        let signed = SecureMessage::sign(pair.private_key().as_bytes(), b"statement").unwrap();

        let mut altered = signed.clone();
        altered[12] ^= 0x20;
        assert_eq!(
            SecureMessage::verify(pair.public_key().as_bytes(), &altered),
            Err(MessageError::Fail)
        );
        assert_eq!(
            SecureMessage::verify(other.public_key().as_bytes(), &signed),
            Err(MessageError::Fail)
        );
        assert!(matches!(
            SecureMessage::verify(pair.public_key().as_bytes(), &signed[..signed.len() - 1]),
            Err(MessageError::InvalidMessage(_))
        ));
    }

    #[test]
    fn test_key_errors() {
        let pair = KeyPair::generate_ec();
        assert_eq!(
            SecureMessage::sign(b"", b"message").unwrap_err(),
            MessageError::InvalidParameter("empty private key")
        );
        assert!(matches!(
            SecureMessage::sign(pair.public_key().as_bytes(), b"message"),
            Err(MessageError::Soter(_))
        ));
        assert!(matches!(
            SecureMessage::new(pair.private_key().as_bytes(), b"not a key"),
            Err(MessageError::Soter(_))
        ));
    }
}
