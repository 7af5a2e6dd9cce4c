//! # WARD Secure Comparator
//!
//! Zero-knowledge comparison of two secrets: both parties learn whether
//! their secrets are equal and nothing else. The construction follows the
//! socialist millionaire protocol over the Ristretto group, with
//! Fiat-Shamir proofs (SHA-512 challenges) at every step.
//!
//! | Step | Sender | Elements |
//! |------|--------|----------|
//! | 1 | initiator | 6 |
//! | 2 | responder | 11 |
//! | 3 | initiator | 8 |
//! | 4 | responder | 3 |
//!
//! Every element is 32 bytes: a compressed Ristretto point or a canonical
//! scalar.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod comparator;
pub mod error;
mod proof;

pub use comparator::{ComparisonResult, SecureComparator};
pub use error::ComparatorError;

/// Size of one encoded group element or scalar
pub const ELEMENT_SIZE: usize = 32;
