//! Fuzz target for Secure Session input
//!
//! Feeds arbitrary bytes to a server waiting for a connection request and to
//! a client waiting for the server's reply.

#![no_main]

use std::sync::OnceLock;

use libfuzzer_sys::fuzz_target;
use ward_session::SecureSession;
use ward_soter::{KeyPair, PublicKey};

fn keys() -> &'static (KeyPair, KeyPair) {
    static KEYS: OnceLock<(KeyPair, KeyPair)> = OnceLock::new();
    KEYS.get_or_init(|| (KeyPair::generate_ec(), KeyPair::generate_ec()))
}

fn session(id: &[u8], pair: &KeyPair, peer: &KeyPair) -> Option<SecureSession> {
    let peer_key: PublicKey = peer.public_key().clone();
    SecureSession::new(id, pair.private_key().as_bytes(), move |_: &[u8]| Some(peer_key.clone())).ok()
}

fuzz_target!(|data: &[u8]| {
    let (client_keys, server_keys) = keys();

    if let Some(mut server) = session(b"server", server_keys, client_keys) {
        let _ = server.unwrap(data);
    }

    if let Some(mut client) = session(b"client", client_keys, server_keys) {
        if client.connect_request().is_ok() {
            let _ = client.unwrap(data);
        }
    }
});
