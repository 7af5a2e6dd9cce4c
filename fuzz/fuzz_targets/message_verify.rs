//! Fuzz target for Secure Message parsing
//!
//! Tests that signed and encrypted message headers are validated without
//! panicking.

#![no_main]

use std::sync::OnceLock;

use libfuzzer_sys::fuzz_target;
use ward_message::SecureMessage;
use ward_soter::KeyPair;

fn keys() -> &'static (KeyPair, KeyPair) {
    static KEYS: OnceLock<(KeyPair, KeyPair)> = OnceLock::new();
    KEYS.get_or_init(|| (KeyPair::generate_ec(), KeyPair::generate_ec()))
}

fuzz_target!(|data: &[u8]| {
    let (ours, theirs) = keys();

    let _ = SecureMessage::verify(theirs.public_key().as_bytes(), data);

    if let Ok(message) = SecureMessage::new(ours.private_key().as_bytes(), theirs.public_key().as_bytes()) {
        let _ = message.decrypt(data);
    }
});
