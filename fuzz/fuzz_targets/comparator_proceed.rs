//! Fuzz target for Secure Comparator messages
//!
//! Tests that both roles reject malformed protocol messages without
//! panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;
use ward_comparator::SecureComparator;

fuzz_target!(|data: &[u8]| {
    let mut responder = SecureComparator::new();
    if responder.append_secret(b"fuzz secret").is_ok() {
        let _ = responder.proceed(data);
    }

    let mut initiator = SecureComparator::new();
    if initiator.append_secret(b"fuzz secret").is_ok() && initiator.begin().is_ok() {
        let _ = initiator.proceed(data);
    }
});
