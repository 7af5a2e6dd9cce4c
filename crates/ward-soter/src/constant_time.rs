//! Constant-time comparisons.
//!
//! MAC and checksum checks go through here so that verification time
//! depends only on input length, never on where the first mismatch is.

use subtle::ConstantTimeEq;

/// Constant-time comparison of byte slices.
///
/// Returns `true` if slices are equal, `false` otherwise.
/// Execution time depends only on slice length, not content.
#[must_use]
pub fn ct_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.ct_eq(b).into()
}

/// Timing-safe 4-byte comparison, used for container checksums.
#[must_use]
#[inline(never)]
pub fn verify_4(a: &[u8; 4], b: &[u8; 4]) -> bool {
    ct_eq(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ct_eq_equal() {
        assert!(ct_eq(b"session", b"session"));
    }

    #[test]
    fn test_ct_eq_different_content() {
        assert!(!ct_eq(b"session", b"sessioN"));
    }

    #[test]
    fn test_ct_eq_different_length() {
        assert!(!ct_eq(b"abc", b"abcd"));
        assert!(ct_eq(b"", b""));
    }

    #[test]
    fn test_verify_4() {
        assert!(verify_4(&[1, 2, 3, 4], &[1, 2, 3, 4]));
        assert!(!verify_4(&[1, 2, 3, 4], &[1, 2, 3, 5]));
    }
}
