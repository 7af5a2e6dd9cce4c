//! Secure Session state machine.
//!
//! A session starts `Idle`. The side that calls
//! [`SecureSession::connect_request`] becomes the client; the side that
//! receives the request becomes the server. Both move to `Negotiating` and
//! then to `Established` once the key confirmation has been checked.
//!
//! The peer's long-term public key is looked up through the resolver closure
//! given at construction. An unknown identity or a signature that does not
//! verify is reported as [`SessionError::Callback`].

use std::fmt;

use tracing::{debug, warn};
use ward_soter::container::Container;
use ward_soter::{KeyKind, KeyPair, PrivateKey, PublicKey};
use zeroize::Zeroizing;

use crate::handshake::{self, ClientFinish, KeyExchange, MASTER_KEY_SIZE, MasterKey, Transcript};
use crate::transport::Transport;
use crate::{SessionConfig, SessionError};

/// Saved session container tag.
const SAVED_TAG: [u8; 4] = *b"TSSC";

/// session id, role, master key, outbound and inbound sequence numbers
const SAVED_SIZE: usize = 4 + 4 + MASTER_KEY_SIZE + 4 + 4;

type Resolver = Box<dyn FnMut(&[u8]) -> Option<PublicKey> + Send>;
type Observer = Box<dyn FnMut(SessionState) + Send>;

/// Externally visible session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// Nothing sent or received yet
    Idle,
    /// Handshake in progress
    Negotiating,
    /// Keys agreed, application data can flow
    Established,
}

/// Result of [`SecureSession::unwrap`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unwrapped {
    /// Handshake message that must be sent to the peer
    Forward(Vec<u8>),
    /// Application data; empty when the call just completed the handshake
    Data(Vec<u8>),
}

impl Unwrapped {
    /// Whether the payload must be relayed to the peer.
    #[must_use]
    pub fn forward_to_peer(&self) -> bool {
        matches!(self, Self::Forward(_))
    }

    /// Payload bytes.
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        match self {
            Self::Forward(bytes) | Self::Data(bytes) => bytes,
        }
    }

    /// Take the payload.
    #[must_use]
    pub fn into_payload(self) -> Vec<u8> {
        match self {
            Self::Forward(bytes) | Self::Data(bytes) => bytes,
        }
    }
}

/// Peer as seen by the server between its reply and the client's finish.
struct Peer {
    id: Vec<u8>,
    ephemeral: PublicKey,
    sign_key: PublicKey,
}

enum Phase {
    Idle,
    /// Client sent the connect request.
    AwaitingServerKey,
    /// Server answered with its ephemeral key.
    AwaitingClientFinish(Peer),
    /// Client sent its signature and key confirmation.
    AwaitingServerFinish { session_id: u32, master: MasterKey },
    Established(Transport),
}

/// One end of a Secure Session.
///
/// Owned by a single task: operations take `&mut self`. The session is
/// `Send` but not `Sync`.
pub struct SecureSession {
    id: Vec<u8>,
    identity: PrivateKey,
    ephemeral: KeyPair,
    resolver: Resolver,
    observer: Option<Observer>,
    config: SessionConfig,
    remote_id: Option<Vec<u8>>,
    phase: Phase,
}

impl SecureSession {
    /// Create an idle session.
    ///
    /// `id` is the identity announced to the peer, `private_key` the
    /// long-term `REC2` signing key, and `resolver` maps a peer identity to
    /// its long-term public key.
    ///
    /// # Errors
    ///
    /// - [`SessionError::MissingId`] if `id` is empty
    /// - [`SessionError::MissingKey`] if `private_key` is empty
    /// - [`SessionError::InvalidParameter`] if the key is not a valid EC
    ///   private key (RSA keys are rejected here)
    pub fn new<F>(id: impl AsRef<[u8]>, private_key: &[u8], resolver: F) -> Result<Self, SessionError>
    where
        F: FnMut(&[u8]) -> Option<PublicKey> + Send + 'static,
    {
        let id = id.as_ref();
        if id.is_empty() {
            return Err(SessionError::MissingId);
        }
        if private_key.is_empty() {
            return Err(SessionError::MissingKey);
        }
        if KeyKind::of(private_key) != Some(KeyKind::EcPrivate) {
            return Err(SessionError::InvalidParameter("expected an EC private key"));
        }
        let identity = PrivateKey::from_bytes(private_key)
            .map_err(|_| SessionError::InvalidParameter("malformed private key"))?;

        Ok(Self {
            id: id.to_vec(),
            identity,
            ephemeral: KeyPair::generate_ec(),
            resolver: Box::new(resolver),
            observer: None,
            config: SessionConfig::default(),
            remote_id: None,
            phase: Phase::Idle,
        })
    }

    /// Call `observer` on every state transition.
    #[must_use]
    pub fn with_state_observer<F>(mut self, observer: F) -> Self
    where
        F: FnMut(SessionState) + Send + 'static,
    {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Override the transport tolerances.
    #[must_use]
    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        if let Phase::Established(transport) = &mut self.phase {
            transport.set_config(config);
        }
        self
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        match self.phase {
            Phase::Idle => SessionState::Idle,
            Phase::Established(_) => SessionState::Established,
            _ => SessionState::Negotiating,
        }
    }

    /// Whether application data can be exchanged.
    #[must_use]
    pub fn is_established(&self) -> bool {
        matches!(self.phase, Phase::Established(_))
    }

    /// Authenticated identity of the peer.
    ///
    /// Sessions restored with [`SecureSession::load`] do not know it.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidState`] before the peer signature was
    /// verified.
    pub fn remote_id(&self) -> Result<&[u8], SessionError> {
        self.remote_id.as_deref().ok_or(SessionError::InvalidState)
    }

    fn transition(&mut self, state: SessionState) {
        debug!(?state, "secure session state changed");
        if let Some(observer) = self.observer.as_mut() {
            observer(state);
        }
    }

    fn resolve(&mut self, peer_id: &[u8]) -> Result<PublicKey, SessionError> {
        (self.resolver)(peer_id).ok_or_else(|| {
            warn!(peer_id_len = peer_id.len(), "no public key for peer id");
            SessionError::Callback("unknown peer id")
        })
    }

    fn verify_peer(sign_key: &PublicKey, parts: &[&[u8]], signature: &[u8]) -> Result<(), SessionError> {
        sign_key.verify(parts, signature).map_err(|_| {
            warn!("peer signature rejected");
            SessionError::Callback("peer signature rejected")
        })
    }

    /// Start the handshake as the client.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidState`] unless the session is idle.
    pub fn connect_request(&mut self) -> Result<Vec<u8>, SessionError> {
        if !matches!(self.phase, Phase::Idle) {
            return Err(SessionError::InvalidState);
        }

        let own = self.ephemeral.public_key();
        let signature = self.identity.sign(&[own.as_bytes()]);
        let request = KeyExchange::encode(&self.id, own, &signature)?;

        self.phase = Phase::AwaitingServerKey;
        self.transition(SessionState::Negotiating);
        Ok(request)
    }

    /// Process one handshake message.
    ///
    /// Returns the reply to send to the peer, or `None` when the handshake
    /// completed without anything left to send. A failed step leaves the
    /// session where it was.
    ///
    /// # Errors
    ///
    /// - [`SessionError::InvalidParameter`] for malformed messages
    /// - [`SessionError::Callback`] if the peer identity is rejected
    /// - [`SessionError::Fail`] if the key confirmation does not match
    /// - [`SessionError::InvalidState`] once established
    pub fn negotiate(&mut self, message: &[u8]) -> Result<Option<Vec<u8>>, SessionError> {
        if message.is_empty() {
            return Err(SessionError::InvalidParameter("empty message"));
        }
        match self.phase {
            Phase::Idle => self.accept(message).map(Some),
            Phase::AwaitingServerKey => self.proceed_client(message).map(Some),
            Phase::AwaitingClientFinish(_) => self.finish_server(message).map(Some),
            Phase::AwaitingServerFinish { .. } => self.finish_client(message).map(|()| None),
            Phase::Established(_) => Err(SessionError::InvalidState),
        }
    }

    fn accept(&mut self, message: &[u8]) -> Result<Vec<u8>, SessionError> {
        let request = KeyExchange::decode(message)?;
        let sign_key = self.resolve(&request.id)?;
        Self::verify_peer(&sign_key, &[request.ephemeral.as_bytes()], &request.signature)?;

        let own = self.ephemeral.public_key();
        let signature = self.identity.sign(&[
            own.as_bytes(),
            request.ephemeral.as_bytes(),
            &self.id,
            &request.id,
        ]);
        let reply = KeyExchange::encode(&self.id, own, &signature)?;

        self.remote_id = Some(request.id.clone());
        self.phase = Phase::AwaitingClientFinish(Peer {
            id: request.id,
            ephemeral: request.ephemeral,
            sign_key,
        });
        self.transition(SessionState::Negotiating);
        Ok(reply)
    }

    fn proceed_client(&mut self, message: &[u8]) -> Result<Vec<u8>, SessionError> {
        let response = KeyExchange::decode(message)?;
        let sign_key = self.resolve(&response.id)?;

        let own = self.ephemeral.public_key().as_bytes();
        let peer = response.ephemeral.as_bytes();
        Self::verify_peer(&sign_key, &[peer, own, &response.id, &self.id], &response.signature)?;

        let session_id = Transcript {
            client_ephemeral: own,
            server_ephemeral: peer,
            client_id: &self.id,
            server_id: &response.id,
        }
        .session_id();
        let shared = self.ephemeral.private_key().agree(&response.ephemeral);
        let master = handshake::master_key(shared.as_slice(), session_id);

        let signature = self.identity.sign(&[own, peer, &self.id, &response.id]);
        let mac = handshake::confirmation(master.as_slice(), peer, session_id);
        let reply = ClientFinish::encode(&signature, &mac)?;

        self.remote_id = Some(response.id);
        self.phase = Phase::AwaitingServerFinish { session_id, master };
        Ok(reply)
    }

    fn finish_server(&mut self, message: &[u8]) -> Result<Vec<u8>, SessionError> {
        let Phase::AwaitingClientFinish(peer) = &self.phase else {
            return Err(SessionError::InvalidState);
        };
        let finish = ClientFinish::decode(message)?;

        let own = self.ephemeral.public_key().as_bytes();
        let client = peer.ephemeral.as_bytes();
        Self::verify_peer(&peer.sign_key, &[client, own, &peer.id, &self.id], &finish.signature)?;

        let session_id = Transcript {
            client_ephemeral: client,
            server_ephemeral: own,
            client_id: &peer.id,
            server_id: &self.id,
        }
        .session_id();
        let shared = self.ephemeral.private_key().agree(&peer.ephemeral);
        let master = handshake::master_key(shared.as_slice(), session_id);

        if !handshake::verify_confirmation(master.as_slice(), own, session_id, &finish.mac) {
            warn!("client key confirmation mismatch");
            return Err(SessionError::Fail);
        }
        let mac = handshake::confirmation(master.as_slice(), client, session_id);
        let reply = handshake::encode_server_finish(&mac)?;

        self.phase = Phase::Established(Transport::new(session_id, false, master, self.config));
        self.transition(SessionState::Established);
        Ok(reply)
    }

    fn finish_client(&mut self, message: &[u8]) -> Result<(), SessionError> {
        let Phase::AwaitingServerFinish { session_id, master } = &self.phase else {
            return Err(SessionError::InvalidState);
        };
        let mac = handshake::decode_server_finish(message)?;

        let own = self.ephemeral.public_key().as_bytes();
        if !handshake::verify_confirmation(master.as_slice(), own, *session_id, &mac) {
            warn!("server key confirmation mismatch");
            return Err(SessionError::Fail);
        }

        let transport = Transport::new(*session_id, true, master.clone(), self.config);
        self.phase = Phase::Established(transport);
        self.transition(SessionState::Established);
        Ok(())
    }

    /// Single entry point for everything received from the peer.
    ///
    /// While negotiating the message drives the handshake and the reply comes
    /// back as [`Unwrapped::Forward`]. Once established it is decrypted into
    /// [`Unwrapped::Data`]. The call that completes the handshake on the
    /// client returns empty data.
    ///
    /// # Errors
    ///
    /// Handshake errors as in [`SecureSession::negotiate`]. For transport
    /// messages: [`SessionError::InvalidParameter`] for a foreign session id,
    /// a bad length, a sequence number outside the window or a stale
    /// timestamp; [`SessionError::Fail`] if authentication fails.
    pub fn unwrap(&mut self, message: &[u8]) -> Result<Unwrapped, SessionError> {
        if let Phase::Established(transport) = &mut self.phase {
            return transport.unwrap(message).map(Unwrapped::Data);
        }
        Ok(match self.negotiate(message)? {
            Some(reply) => Unwrapped::Forward(reply),
            None => Unwrapped::Data(Vec::new()),
        })
    }

    /// Encrypt application data for the peer.
    ///
    /// # Errors
    ///
    /// - [`SessionError::InvalidState`] before the session is established
    /// - [`SessionError::InvalidParameter`] for an empty message
    /// - [`SessionError::NoMemory`] if the message does not fit a 32-bit length
    pub fn wrap(&mut self, data: &[u8]) -> Result<Vec<u8>, SessionError> {
        match &mut self.phase {
            Phase::Established(transport) => transport.wrap(data),
            _ => Err(SessionError::InvalidState),
        }
    }

    /// Serialize an established session into a `TSSC` container.
    ///
    /// # Security
    ///
    /// The output contains the session master key.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidState`] before the session is established.
    pub fn save(&self) -> Result<Vec<u8>, SessionError> {
        let Phase::Established(transport) = &self.phase else {
            return Err(SessionError::InvalidState);
        };
        let (out_seq, in_seq) = transport.sequence_numbers();

        let mut payload = Vec::with_capacity(SAVED_SIZE);
        payload.extend_from_slice(&transport.session_id().to_be_bytes());
        payload.extend_from_slice(&u32::from(transport.is_client()).to_be_bytes());
        payload.extend_from_slice(transport.master());
        payload.extend_from_slice(&out_seq.to_be_bytes());
        payload.extend_from_slice(&in_seq.to_be_bytes());

        Ok(Container::new(SAVED_TAG, payload).to_bytes())
    }

    /// Restore an established session saved with [`SecureSession::save`].
    ///
    /// Message keys are derived again from the saved master key; sequence
    /// numbers continue where they stopped.
    ///
    /// # Errors
    ///
    /// Construction errors as in [`SecureSession::new`], and
    /// [`SessionError::InvalidParameter`] if `state` is not a saved session.
    pub fn load<F>(state: &[u8], id: impl AsRef<[u8]>, private_key: &[u8], resolver: F) -> Result<Self, SessionError>
    where
        F: FnMut(&[u8]) -> Option<PublicKey> + Send + 'static,
    {
        let mut session = Self::new(id, private_key, resolver)?;

        let (container, _) = Container::parse_tagged(state, &SAVED_TAG)
            .ok_or(SessionError::InvalidParameter("malformed session state"))?;
        let saved = container.payload();
        if saved.len() != SAVED_SIZE {
            return Err(SessionError::InvalidParameter("malformed session state"));
        }

        let word = |at: usize| u32::from_be_bytes([saved[at], saved[at + 1], saved[at + 2], saved[at + 3]]);
        let session_id = word(0);
        let is_client = word(4) != 0;
        let mut master = Zeroizing::new([0u8; MASTER_KEY_SIZE]);
        master.copy_from_slice(&saved[8..8 + MASTER_KEY_SIZE]);
        let out_seq = word(8 + MASTER_KEY_SIZE);
        let in_seq = word(12 + MASTER_KEY_SIZE);

        let mut transport = Transport::new(session_id, is_client, master, session.config);
        transport.set_sequence_numbers(out_seq, in_seq);
        session.phase = Phase::Established(transport);

        debug!(is_client, "secure session restored");
        Ok(session)
    }
}

impl fmt::Debug for SecureSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureSession")
            .field("id", &String::from_utf8_lossy(&self.id))
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct Party {
        id: &'static [u8],
        keys: KeyPair,
    }

    fn party(id: &'static [u8]) -> Party {
        Party {
            id,
            keys: KeyPair::generate_ec(),
        }
    }

    fn directory(parties: &[&Party]) -> impl FnMut(&[u8]) -> Option<PublicKey> + Send + 'static {
        let known: Vec<(Vec<u8>, PublicKey)> = parties
            .iter()
            .map(|p| (p.id.to_vec(), p.keys.public_key().clone()))
            .collect();
        move |id: &[u8]| known.iter().find(|(k, _)| k == id).map(|(_, key)| key.clone())
    }

    fn session(me: &Party, peers: &[&Party]) -> SecureSession {
        SecureSession::new(me.id, me.keys.private_key().as_bytes(), directory(peers)).unwrap()
    }

    fn establish(client: &mut SecureSession, server: &mut SecureSession) {
        let mut to_server = client.connect_request().unwrap();
        loop {
            let reply = server.unwrap(&to_server).unwrap();
            assert!(reply.forward_to_peer());
            match client.unwrap(reply.payload()).unwrap() {
                Unwrapped::Forward(next) => to_server = next,
                Unwrapped::Data(data) => {
                    assert!(data.is_empty());
                    break;
                }
            }
        }
    }

    fn pair() -> (SecureSession, SecureSession) {
        let alice = party(b"alice");
        let bob = party(b"bob");
        (session(&alice, &[&bob]), session(&bob, &[&alice]))
    }

    #[test]
    fn test_handshake_establishes_both_sides() {
        let (mut client, mut server) = pair();
        assert_eq!(client.state(), SessionState::Idle);

        establish(&mut client, &mut server);

        assert!(client.is_established());
        assert!(server.is_established());
        assert_eq!(client.remote_id().unwrap(), b"bob");
        assert_eq!(server.remote_id().unwrap(), b"alice");
    }

    #[test]
    fn test_handshake_step_by_step() {
        let (mut client, mut server) = pair();

        let request = client.connect_request().unwrap();
        assert_eq!(client.state(), SessionState::Negotiating);
        assert_eq!(client.remote_id(), Err(SessionError::InvalidState));

        let server_key = server.negotiate(&request).unwrap().unwrap();
        assert_eq!(server.state(), SessionState::Negotiating);

        let client_finish = client.negotiate(&server_key).unwrap().unwrap();
        assert_eq!(client.state(), SessionState::Negotiating);

        let server_finish = server.negotiate(&client_finish).unwrap().unwrap();
        assert!(server.is_established());

        assert_eq!(client.negotiate(&server_finish).unwrap(), None);
        assert!(client.is_established());
    }

    #[test]
    fn test_transport_both_directions() {
        let (mut client, mut server) = pair();
        establish(&mut client, &mut server);

        let wrapped = client.wrap(b"ping").unwrap();
        assert_eq!(server.unwrap(&wrapped).unwrap(), Unwrapped::Data(b"ping".to_vec()));

        let wrapped = server.wrap(b"pong").unwrap();
        let unwrapped = client.unwrap(&wrapped).unwrap();
        assert!(!unwrapped.forward_to_peer());
        assert_eq!(unwrapped.into_payload(), b"pong");
    }

    #[test]
    fn test_state_observer() {
        let alice = party(b"alice");
        let bob = party(b"bob");
        let seen = Arc::new(Mutex::new(Vec::new()));

        let log = Arc::clone(&seen);
        let mut client = session(&alice, &[&bob]).with_state_observer(move |s| log.lock().unwrap().push(s));
        let mut server = session(&bob, &[&alice]);
        establish(&mut client, &mut server);

        assert_eq!(
            *seen.lock().unwrap(),
            [SessionState::Negotiating, SessionState::Established]
        );
    }

    #[test]
    fn test_construction_errors() {
        let keys = KeyPair::generate_ec();
        let key = keys.private_key().as_bytes();
        let none = |_: &[u8]| None;

        assert_eq!(SecureSession::new(b"", key, none).unwrap_err(), SessionError::MissingId);
        assert_eq!(SecureSession::new(b"id", b"", none).unwrap_err(), SessionError::MissingKey);

        let rsa = Container::new(*b"RRA1", vec![0x42; 64]).to_bytes();
        assert!(matches!(
            SecureSession::new(b"id", &rsa, none),
            Err(SessionError::InvalidParameter(_))
        ));
        assert!(matches!(
            SecureSession::new(b"id", keys.public_key().as_bytes(), none),
            Err(SessionError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_unknown_peer_is_callback_error() {
        let alice = party(b"alice");
        let bob = party(b"bob");
        let mut client = session(&alice, &[&bob]);
        let mut server = session(&bob, &[]);

        let request = client.connect_request().unwrap();
        assert_eq!(
            server.unwrap(&request),
            Err(SessionError::Callback("unknown peer id"))
        );
        assert_eq!(server.state(), SessionState::Idle);
    }

    #[test]
    fn test_wrong_peer_key_is_callback_error() {
        let alice = party(b"alice");
        let bob = party(b"bob");
        let impostor = Party {
            id: b"alice",
            keys: KeyPair::generate_ec(),
        };
        let mut client = session(&alice, &[&bob]);
        let mut server = session(&bob, &[&impostor]);

        let request = client.connect_request().unwrap();
        assert_eq!(
            server.negotiate(&request),
            Err(SessionError::Callback("peer signature rejected"))
        );
    }

    #[test]
    fn test_tampered_key_confirmation_fails() {
        let (mut client, mut server) = pair();
        let request = client.connect_request().unwrap();
        let server_key = server.negotiate(&request).unwrap().unwrap();
        let client_finish = client.negotiate(&server_key).unwrap().unwrap();

        let (container, _) = Container::parse(&client_finish).unwrap();
        let mut payload = container.payload().to_vec();
        let last = payload.len() - 1;
        payload[last] ^= 0x01;
        let forged = Container::new(*b"TSPM", payload).to_bytes();

        assert_eq!(server.negotiate(&forged), Err(SessionError::Fail));
        assert_eq!(server.state(), SessionState::Negotiating);

        // The genuine message still completes the handshake.
        assert!(server.negotiate(&client_finish).unwrap().is_some());
        assert!(server.is_established());
    }

    #[test]
    fn test_state_errors() {
        let (mut client, mut server) = pair();
        assert_eq!(client.wrap(b"early"), Err(SessionError::InvalidState));
        assert_eq!(client.save(), Err(SessionError::InvalidState));

        client.connect_request().unwrap();
        assert_eq!(client.connect_request(), Err(SessionError::InvalidState));
        assert_eq!(
            server.negotiate(b""),
            Err(SessionError::InvalidParameter("empty message"))
        );
        assert!(matches!(
            server.negotiate(b"garbage"),
            Err(SessionError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_negotiate_after_established() {
        let (mut client, mut server) = pair();
        establish(&mut client, &mut server);
        let wrapped = client.wrap(b"data").unwrap();
        assert_eq!(server.negotiate(&wrapped), Err(SessionError::InvalidState));
    }

    #[test]
    fn test_save_and_load_continue_transport() {
        let alice = party(b"alice");
        let bob = party(b"bob");
        let mut client = session(&alice, &[&bob]);
        let mut server = session(&bob, &[&alice]);
        establish(&mut client, &mut server);

        let first = client.wrap(b"before save").unwrap();
        server.unwrap(&first).unwrap();

        let saved = client.save().unwrap();
        assert_eq!(&saved[..4], b"TSSC");
        assert_eq!(saved.len(), 12 + SAVED_SIZE);

        let mut restored =
            SecureSession::load(&saved, alice.id, alice.keys.private_key().as_bytes(), directory(&[&bob])).unwrap();
        assert!(restored.is_established());
        assert_eq!(restored.remote_id(), Err(SessionError::InvalidState));

        let second = restored.wrap(b"after load").unwrap();
        assert_eq!(server.unwrap(&second).unwrap().into_payload(), b"after load");

        let reply = server.wrap(b"welcome back").unwrap();
        assert_eq!(restored.unwrap(&reply).unwrap().into_payload(), b"welcome back");
    }

    #[test]
    fn test_load_rejects_garbage() {
        let keys = KeyPair::generate_ec();
        let key = keys.private_key().as_bytes();
        let bogus = Container::new(SAVED_TAG, vec![0u8; SAVED_SIZE - 1]).to_bytes();

        assert!(matches!(
            SecureSession::load(&bogus, b"id", key, |_: &[u8]| None),
            Err(SessionError::InvalidParameter(_))
        ));
        assert!(matches!(
            SecureSession::load(b"not a session", b"id", key, |_: &[u8]| None),
            Err(SessionError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_session_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<SecureSession>();
    }
}
