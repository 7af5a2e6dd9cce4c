//! # WARD
//!
//! One-stop crate re-exporting every WARD component.
//!
//! | Module | Crate | Purpose |
//! |--------|-------|---------|
//! | [`soter`] | `ward-soter` | KDF, containers, keys, signatures |
//! | [`cell`] | `ward-cell` | Secure Cell: data at rest |
//! | [`comparator`] | `ward-comparator` | Secure Comparator: zero-knowledge equality |
//! | [`session`] | `ward-session` | Secure Session: authenticated transport |
//! | [`message`] | `ward-message` | Secure Message: single signed or encrypted messages |
//!
//! Tunables for the cell and session live in [`Config`], loaded from TOML.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;

pub use config::Config;

pub use ward_cell as cell;
pub use ward_comparator as comparator;
pub use ward_message as message;
pub use ward_session as session;
pub use ward_soter as soter;

pub use ward_cell::{ContextImprint, Seal, SealWithPassphrase, TokenProtect};
pub use ward_comparator::{ComparisonResult, SecureComparator};
pub use ward_message::SecureMessage;
pub use ward_session::{SecureSession, SessionState, Unwrapped};
pub use ward_soter::{KeyPair, PrivateKey, PublicKey};
