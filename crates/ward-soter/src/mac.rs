//! HMAC-SHA-256 over multi-part messages.
//!
//! Protocol code authenticates concatenations of several buffers (ephemeral
//! keys, identities, session ids). The helpers here feed the parts in order
//! instead of allocating the concatenation.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::HMAC_SHA256_SIZE;

type HmacSha256 = Hmac<Sha256>;

fn keyed(key: &[u8], parts: &[&[u8]]) -> HmacSha256 {
    let Ok(mut mac) = <HmacSha256 as Mac>::new_from_slice(key) else {
        unreachable!("HMAC accepts keys of any length");
    };
    for part in parts {
        mac.update(part);
    }
    mac
}

/// Compute `HMAC-SHA-256(key, parts[0] ‖ parts[1] ‖ ...)`.
#[must_use]
pub fn hmac_sha256(key: &[u8], parts: &[&[u8]]) -> [u8; HMAC_SHA256_SIZE] {
    keyed(key, parts).finalize().into_bytes().into()
}

/// Verify an HMAC-SHA-256 tag in constant time.
#[must_use]
pub fn verify_hmac_sha256(key: &[u8], parts: &[&[u8]], tag: &[u8]) -> bool {
    keyed(key, parts).verify_slice(tag).is_ok()
}
