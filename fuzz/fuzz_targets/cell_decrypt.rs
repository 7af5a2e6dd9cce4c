//! Fuzz target for Secure Cell decryption
//!
//! Tests that every cell mode rejects arbitrary ciphertexts and tokens
//! without panicking.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use ward_cell::{ContextImprint, Seal, TokenProtect};

#[derive(Debug, Arbitrary)]
struct CellInput {
    key: [u8; 32],
    data: Vec<u8>,
    token: Vec<u8>,
    context: Vec<u8>,
}

fuzz_target!(|input: CellInput| {
    if let Ok(cell) = Seal::new(input.key) {
        let _ = cell.decrypt(&input.data, &input.context);
    }

    if let Ok(cell) = TokenProtect::new(input.key) {
        let _ = cell.decrypt(&input.data, &input.token, &input.context);
    }

    if let Ok(cell) = ContextImprint::new(input.key) {
        if let Ok(ciphertext) = cell.encrypt(&input.data, &input.context) {
            assert_eq!(cell.decrypt(&ciphertext, &input.context).ok(), Some(input.data.clone()));
        }
    }
});
