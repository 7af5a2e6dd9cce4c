//! # WARD Secure Cell
//!
//! Symmetric encryption of data at rest.
//!
//! | Mode | Output | Integrity |
//! |------|--------|-----------|
//! | [`Seal`] | token ‖ ciphertext (+44 bytes) | AES-256-GCM |
//! | [`SealWithPassphrase`] | token ‖ ciphertext (+70 bytes) | AES-256-GCM |
//! | [`TokenProtect`] | ciphertext, token (44 bytes) | AES-256-GCM |
//! | [`ContextImprint`] | ciphertext (same length) | none |
//!
//! Every mode derives a per-message key from the master key (or the
//! PBKDF2-stretched passphrase), the message length and the optional
//! context through the Soter KDF. Cells are immutable and can be shared
//! between threads.
//!
//! ```ignore
//! use ward_cell::Seal;
//!
//! let cell = Seal::new(b"master key")?;
//! let sealed = cell.encrypt(b"record", b"row 42")?;
//! assert_eq!(cell.decrypt(&sealed, b"row 42")?, b"record");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod context_imprint;
pub mod error;
pub mod passphrase;
pub mod seal;
pub mod token;
pub mod token_protect;

pub use config::CellConfig;
pub use context_imprint::ContextImprint;
pub use error::CellError;
pub use passphrase::SealWithPassphrase;
pub use seal::Seal;
pub use token::{AUTH_TOKEN_SIZE, PASSPHRASE_TOKEN_SIZE};
pub use token_protect::TokenProtect;

/// Secure Cell operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Authenticated, token prepended to the ciphertext
    Seal,
    /// Seal keyed by a passphrase
    SealWithPassphrase,
    /// Authenticated, token kept separately
    TokenProtect,
    /// Length preserving, unauthenticated
    ContextImprint,
}

impl Mode {
    /// Whether ciphertexts in this mode are authenticated.
    #[must_use]
    pub const fn is_authenticated(self) -> bool {
        !matches!(self, Self::ContextImprint)
    }
}
