//! Shared helpers for WARD integration tests and benchmarks.

use tracing_subscriber::EnvFilter;
use ward_session::{SecureSession, Unwrapped};
use ward_soter::{KeyPair, PublicKey};

/// Install a test-writer subscriber once; `RUST_LOG` selects the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A named long-term key pair.
pub struct Identity {
    /// Identity announced in the handshake
    pub id: Vec<u8>,
    /// Long-term signing keys
    pub keys: KeyPair,
}

impl Identity {
    /// Fresh identity with a new EC key pair.
    pub fn new(id: &str) -> Self {
        Self {
            id: id.as_bytes().to_vec(),
            keys: KeyPair::generate_ec(),
        }
    }

    /// Serialized private key.
    pub fn private_key(&self) -> &[u8] {
        self.keys.private_key().as_bytes()
    }

    /// Session for this identity that trusts `peers`.
    pub fn session(&self, peers: &[&Identity]) -> SecureSession {
        SecureSession::new(&self.id, self.private_key(), directory(peers))
            .expect("valid identity")
    }
}

/// Resolver closure over a fixed set of identities.
pub fn directory(peers: &[&Identity]) -> impl FnMut(&[u8]) -> Option<PublicKey> + Send + 'static {
    let known: Vec<(Vec<u8>, PublicKey)> = peers
        .iter()
        .map(|p| (p.id.clone(), p.keys.public_key().clone()))
        .collect();
    move |id: &[u8]| {
        known
            .iter()
            .find(|(known_id, _)| known_id.as_slice() == id)
            .map(|(_, key)| key.clone())
    }
}

/// Drive a handshake through `unwrap` only, the way a read loop would.
///
/// Returns the number of messages exchanged.
pub fn run_handshake(client: &mut SecureSession, server: &mut SecureSession) -> usize {
    let mut in_flight = client.connect_request().expect("connect request");
    let mut messages = 1;
    let mut to_server = true;

    loop {
        let receiver = if to_server { &mut *server } else { &mut *client };
        match receiver.unwrap(&in_flight).expect("handshake step") {
            Unwrapped::Forward(reply) => {
                in_flight = reply;
                messages += 1;
                to_server = !to_server;
            }
            Unwrapped::Data(data) => {
                assert!(data.is_empty(), "no application data during handshake");
                return messages;
            }
        }
    }
}
