//! # WARD Secure Message
//!
//! Single messages between two key holders, no session state.
//!
//! | Mode | Keys | Header |
//! |------|------|--------|
//! | encrypted | own private key, peer public key | type, total length |
//! | signed | private key to sign, public key to verify | type, message length, signature length |
//!
//! Encrypted messages are Secure Cell seals keyed with the ECDH shared
//! secret, so either party can decrypt what the other encrypted. Signed
//! messages carry the plaintext followed by a DER ECDSA signature.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod message;

pub use error::MessageError;
pub use message::SecureMessage;
