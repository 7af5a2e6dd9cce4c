//! Secure random number generation.
//!
//! All randomness comes from the operating system CSPRNG: IVs, salts and
//! keys through [`random_array`], EC key generation through `OsRng`.

use crate::SoterError;

/// Fixed-size array of OS CSPRNG bytes.
///
/// # Errors
///
/// Returns [`SoterError::RandomFailed`] if the underlying OS CSPRNG fails.
pub fn random_array<const N: usize>() -> Result<[u8; N], SoterError> {
    let mut buf = [0u8; N];
    getrandom::getrandom(&mut buf).map_err(|_| SoterError::RandomFailed)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_arrays_differ() {
        let a = random_array::<32>().unwrap();
        let b = random_array::<32>().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_zero_sized_array() {
        assert_eq!(random_array::<0>().unwrap(), []);
    }
}
