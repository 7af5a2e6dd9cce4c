//! Fuzz target for container parsing
//!
//! Tests that the container parser and key classification handle arbitrary
//! input without panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;
use ward_soter::{AlgorithmId, Container, KeyKind, PrivateKey, PublicKey};

fuzz_target!(|data: &[u8]| {
    if let Some((container, rest)) = Container::parse(data) {
        assert_eq!(container.encoded_len() + rest.len(), data.len());
    }

    let _ = KeyKind::of(data);
    let _ = PublicKey::from_bytes(data);
    let _ = PrivateKey::from_bytes(data);

    if let Some(word) = data.first_chunk::<4>() {
        let id = AlgorithmId::from_raw(u32::from_le_bytes(*word));
        let _ = (id.algorithm(), id.kdf(), id.padding(), id.key_bits());
    }
});
