//! # WARD Secure Session
//!
//! Mutually authenticated key agreement followed by an encrypted,
//! replay-checked message transport.
//!
//! ## Protocol
//!
//! | Step | Direction | Content |
//! |------|-----------|---------|
//! | 1 | client → server | id, ephemeral key, signature |
//! | 2 | server → client | id, ephemeral key, signature over both keys and ids |
//! | 3 | client → server | signature over both keys and ids, key confirmation |
//! | 4 | server → client | key confirmation |
//!
//! Long-term identities are EC P-256 keys; the shared secret comes from
//! ephemeral ECDH and every key is derived with the Soter KDF. After the
//! handshake each side sends with its own AES-256-GCM key and sequence
//! counter.
//!
//! ## Usage
//!
//! ```ignore
//! use ward_session::{SecureSession, Unwrapped};
//!
//! let mut client = SecureSession::new(b"client", client_key, resolve)?;
//! let mut request = client.connect_request()?;
//! // send `request`; for every received message:
//! match client.unwrap(&received)? {
//!     Unwrapped::Forward(reply) => send(reply),
//!     Unwrapped::Data(data) => deliver(data),
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
mod handshake;
pub mod session;
pub mod transport;

pub use config::SessionConfig;
pub use error::SessionError;
pub use session::{SecureSession, SessionState, Unwrapped};
pub use transport::WRAP_OVERHEAD;
