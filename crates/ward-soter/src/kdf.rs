//! Soter key derivation function.
//!
//! A single HMAC-SHA-256 block:
//!
//! ```text
//! output = HMAC-SHA-256(key, 00 00 00 01 ‖ label ‖ 00 ‖ context[0] ‖ context[1] ‖ ...)[..len]
//! ```
//!
//! When the input key is empty an implicit 32-byte key is built from the
//! label and the contexts, so the function is still keyed by something the
//! caller controls. Output length is limited to one HMAC block (1..=32 bytes);
//! asking for anything else is a programming error and panics.

use zeroize::{Zeroize, Zeroizing};

use crate::KDF_MAX_OUTPUT_SIZE;
use crate::mac::hmac_sha256;

const IMPLICIT_KEY_SIZE: usize = 32;

/// Big-endian block counter; Soter KDF never produces a second block.
const BLOCK_COUNTER: [u8; 4] = [0, 0, 0, 1];

fn implicit_key(label: &str, context: &[&[u8]]) -> Zeroizing<[u8; IMPLICIT_KEY_SIZE]> {
    let mut key = Zeroizing::new([0u8; IMPLICIT_KEY_SIZE]);

    let label = label.as_bytes();
    let n = label.len().min(IMPLICIT_KEY_SIZE);
    key[..n].copy_from_slice(&label[..n]);

    for ctx in context {
        for (k, c) in key.iter_mut().zip(ctx.iter()) {
            *k ^= c;
        }
    }

    key
}

/// Derive `output.len()` bytes from `input_key`, `label` and `context`.
///
/// # Panics
///
/// Panics if `output` is empty or longer than 32 bytes.
pub fn derive(input_key: &[u8], label: &str, context: &[&[u8]], output: &mut [u8]) {
    assert!(
        (1..=KDF_MAX_OUTPUT_SIZE).contains(&output.len()),
        "Soter KDF output length must be within 1..=32, got {}",
        output.len()
    );

    let implicit;
    let key: &[u8] = if input_key.is_empty() {
        implicit = implicit_key(label, context);
        implicit.as_slice()
    } else {
        input_key
    };

    let mut parts: Vec<&[u8]> = Vec::with_capacity(context.len() + 3);
    parts.push(&BLOCK_COUNTER);
    parts.push(label.as_bytes());
    parts.push(&[0u8]);
    parts.extend_from_slice(context);

    let mut block = hmac_sha256(key, &parts);
    output.copy_from_slice(&block[..output.len()]);
    block.zeroize();
}

/// Derive a fixed-size key.
///
/// # Panics
///
/// Panics if `N` is zero or greater than 32.
#[must_use]
pub fn derive_key<const N: usize>(input_key: &[u8], label: &str, context: &[&[u8]]) -> [u8; N] {
    let mut out = [0u8; N];
    derive(input_key, label, context, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const LABEL: &str = "Example key derivation";
    const CONTEXT: [&[u8]; 2] = [b"2020-12-20", b"11:18:24"];

    #[test]
    fn test_kdf_implicit_key_vector() {
        let out: [u8; 32] = derive_key(b"", LABEL, &CONTEXT);
        assert_eq!(
            hex::encode(out),
            "cf9846b8026c5b76a0641aa85f4152ff02c15ad45b726c6e578be52afdfd6930"
        );
    }

    #[test]
    fn test_kdf_keyed_vector() {
        let out: [u8; 32] = derive_key(b"Nohmayahng9ahv5aiwae4Pho4iebiew0", LABEL, &CONTEXT);
        assert_eq!(
            hex::encode(out),
            "3ea065095d003ec8251ada003839cd2bd2494de8a250c0398ee078a6dfb2cf41"
        );
    }

    #[test]
    fn test_kdf_deterministic() {
        let a: [u8; 32] = derive_key(b"key", LABEL, &CONTEXT);
        let b: [u8; 32] = derive_key(b"key", LABEL, &CONTEXT);
        assert_eq!(a, b);
    }

    #[test]
    fn test_kdf_truncates() {
        let full: [u8; 32] = derive_key(b"key", LABEL, &CONTEXT);
        let short: [u8; 4] = derive_key(b"key", LABEL, &CONTEXT);
        assert_eq!(&full[..4], &short);
    }

    #[test]
    fn test_kdf_context_changes_output() {
        let a: [u8; 32] = derive_key(b"key", LABEL, &[b"one"]);
        let b: [u8; 32] = derive_key(b"key", LABEL, &[b"two"]);
        let c: [u8; 32] = derive_key(b"key", LABEL, &[]);
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_implicit_key_layout() {
        let key = implicit_key("ab", &[&[0x01, 0x02, 0x03], &[0xFF]]);
        assert_eq!(key[0], b'a' ^ 0x01 ^ 0xFF);
        assert_eq!(key[1], b'b' ^ 0x02);
        assert_eq!(key[2], 0x03);
        assert!(key[3..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_implicit_key_truncates_long_label() {
        let label = "0123456789abcdef0123456789abcdefOVERFLOW";
        let key = implicit_key(label, &[]);
        assert_eq!(&key[..], &label.as_bytes()[..32]);
    }

    #[test]
    #[should_panic(expected = "Soter KDF output length")]
    fn test_kdf_rejects_zero_length() {
        let mut out = [0u8; 0];
        derive(b"key", LABEL, &CONTEXT, &mut out);
    }

    #[test]
    #[should_panic(expected = "Soter KDF output length")]
    fn test_kdf_rejects_oversized_output() {
        let mut out = [0u8; 33];
        derive(b"key", LABEL, &CONTEXT, &mut out);
    }
}
