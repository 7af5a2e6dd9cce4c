//! PBKDF2-HMAC-SHA-256 passphrase stretching.

use sha2::Sha256;
use zeroize::Zeroizing;

/// Default iteration count for passphrase cells.
pub const DEFAULT_ITERATIONS: u32 = 200_000;

/// Default salt size.
pub const SALT_SIZE: usize = 16;

/// Stretch a passphrase into a 32-byte key.
#[must_use]
pub fn pbkdf2_sha256(passphrase: &[u8], salt: &[u8], iterations: u32) -> Zeroizing<[u8; 32]> {
    let mut key = Zeroizing::new([0u8; 32]);
    pbkdf2::pbkdf2_hmac::<Sha256>(passphrase, salt, iterations, key.as_mut_slice());
    key
}
