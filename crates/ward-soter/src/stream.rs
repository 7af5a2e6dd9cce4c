//! AES-256-CTR keystream.
//!
//! The counter block is the full 128-bit IV, incremented as a big-endian
//! integer per block. There is no authentication: callers that need
//! integrity must use [`crate::aead`].

use aes_gcm::aes::{
    Aes256,
    cipher::{BlockEncrypt, KeyInit, generic_array::GenericArray},
};
use zeroize::Zeroize;

/// CTR IV size (one AES block).
pub const IV_SIZE: usize = 16;

const BLOCK_SIZE: usize = 16;

/// XOR the AES-256-CTR keystream into `data` in place.
///
/// Encryption and decryption are the same operation.
pub fn apply_keystream(key: &[u8; 32], iv: &[u8; IV_SIZE], data: &mut [u8]) {
    let cipher = Aes256::new(GenericArray::from_slice(key));
    let mut counter = u128::from_be_bytes(*iv);

    for chunk in data.chunks_mut(BLOCK_SIZE) {
        let mut block = GenericArray::from(counter.to_be_bytes());
        cipher.encrypt_block(&mut block);
        for (byte, pad) in chunk.iter_mut().zip(block.iter()) {
            *byte ^= pad;
        }
        block.as_mut_slice().zeroize();
        counter = counter.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn test_nist_sp800_38a_ctr_aes256() {
        // NIST SP 800-38A F.5.5 CTR-AES256.Encrypt, first two blocks
        let key = hex!("603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4");
        let iv = hex!("f0f1f2f3f4f5f6f7f8f9fafbfcfdfeff");
        let mut data = hex!(
            "6bc1bee22e409f96e93d7e117393172a"
            "ae2d8a571e03ac9c9eb76fac45af8e51"
        );

        apply_keystream(&key, &iv, &mut data);
        assert_eq!(
            data,
            hex!(
                "601ec313775789a5b7a7f504bbf3d228"
                "f443e3ca4d62b59aca84e990cacaf5c5"
            )
        );
    }

    #[test]
    fn test_length_preserving_roundtrip() {
        let key = [3u8; 32];
        let iv = [5u8; IV_SIZE];
        let original = b"not a multiple of the block size".to_vec();

        let mut data = original.clone();
        apply_keystream(&key, &iv, &mut data);
        assert_eq!(data.len(), original.len());
        assert_ne!(data, original);

        apply_keystream(&key, &iv, &mut data);
        assert_eq!(data, original);
    }

    #[test]
    fn test_counter_wraps() {
        let key = [1u8; 32];
        let iv = [0xFF; IV_SIZE];
        let mut data = [0u8; 48];
        apply_keystream(&key, &iv, &mut data);

        let mut second = [0u8; 16];
        apply_keystream(&key, &[0u8; IV_SIZE], &mut second);
        assert_eq!(&data[16..32], &second);
    }
}
