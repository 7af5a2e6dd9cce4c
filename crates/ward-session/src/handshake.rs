//! Handshake messages and key schedule.
//!
//! Every handshake message is a `TSPM` container:
//!
//! ```text
//! 1. client → server   TSPM{ TSID(client id) ‖ E_c ‖ sig_c(E_c) }
//! 2. server → client   TSPM{ TSID(server id) ‖ E_s ‖ sig_s(E_s ‖ E_c ‖ sid ‖ cid) }
//! 3. client → server   TSPM{ sig_c(E_c ‖ E_s ‖ cid ‖ sid) ‖ HMAC(master, E_s ‖ session id) }
//! 4. server → client   TSPM{ HMAC(master, E_c ‖ session id) }
//! ```
//!
//! `E_c` and `E_s` are ephemeral `UEC2` containers. Signatures are made with
//! the long-term keys and cover the serialized containers byte for byte.

use ward_soter::container::Container;
use ward_soter::keys::{EC_PUBLIC_TAG, PublicKey};
use ward_soter::signatures::Signature;
use ward_soter::{HMAC_SHA256_SIZE, kdf, mac};
use zeroize::Zeroizing;

use crate::SessionError;

/// Protocol message container tag.
pub(crate) const PROTO_TAG: [u8; 4] = *b"TSPM";

/// Identity container tag.
pub(crate) const ID_TAG: [u8; 4] = *b"TSID";

const SESSION_ID_LABEL: &str = "Themis secure session unique identifier";
const MASTER_KEY_LABEL: &str = "Themis secure session master key";

/// Session master key size.
pub(crate) const MASTER_KEY_SIZE: usize = 32;

/// Session master key.
pub(crate) type MasterKey = Zeroizing<[u8; MASTER_KEY_SIZE]>;

fn proto(payload: Vec<u8>) -> Result<Vec<u8>, SessionError> {
    if payload.len() > ward_soter::container::MAX_PAYLOAD_SIZE {
        return Err(SessionError::NoMemory);
    }
    Ok(Container::new(PROTO_TAG, payload).to_bytes())
}

fn open_proto(message: &[u8]) -> Result<Container, SessionError> {
    Container::parse_tagged(message, &PROTO_TAG)
        .map(|(container, _)| container)
        .ok_or(SessionError::InvalidParameter("not a handshake message"))
}

/// Messages 1 and 2: identity, ephemeral key and signature.
#[derive(Debug)]
pub(crate) struct KeyExchange {
    pub id: Vec<u8>,
    pub ephemeral: PublicKey,
    pub signature: Vec<u8>,
}

impl KeyExchange {
    pub fn encode(id: &[u8], ephemeral: &PublicKey, signature: &Signature) -> Result<Vec<u8>, SessionError> {
        if id.len() > ward_soter::container::MAX_PAYLOAD_SIZE {
            return Err(SessionError::NoMemory);
        }
        let mut payload = Container::new(ID_TAG, id.to_vec()).to_bytes();
        payload.extend_from_slice(ephemeral.as_bytes());
        payload.extend_from_slice(signature.as_bytes());
        proto(payload)
    }

    pub fn decode(message: &[u8]) -> Result<Self, SessionError> {
        let container = open_proto(message)?;
        let payload = container.payload();

        let (id, rest) = Container::parse_tagged(payload, &ID_TAG)
            .ok_or(SessionError::InvalidParameter("malformed peer id"))?;
        let (_, signature) = Container::parse_tagged(rest, &EC_PUBLIC_TAG)
            .ok_or(SessionError::InvalidParameter("malformed ephemeral key"))?;
        let key_len = rest.len() - signature.len();
        let ephemeral = PublicKey::from_bytes(&rest[..key_len])
            .map_err(|_| SessionError::InvalidParameter("malformed ephemeral key"))?;

        if signature.is_empty() {
            return Err(SessionError::InvalidParameter("missing signature"));
        }

        Ok(Self {
            id: id.into_payload(),
            ephemeral,
            signature: signature.to_vec(),
        })
    }
}

/// Message 3: client signature and key confirmation.
#[derive(Debug)]
pub(crate) struct ClientFinish {
    pub signature: Vec<u8>,
    pub mac: [u8; HMAC_SHA256_SIZE],
}

impl ClientFinish {
    pub fn encode(signature: &Signature, mac: &[u8; HMAC_SHA256_SIZE]) -> Result<Vec<u8>, SessionError> {
        let mut payload = signature.as_bytes().to_vec();
        payload.extend_from_slice(mac);
        proto(payload)
    }

    pub fn decode(message: &[u8]) -> Result<Self, SessionError> {
        let container = open_proto(message)?;
        let payload = container.payload();
        if payload.len() <= HMAC_SHA256_SIZE {
            return Err(SessionError::InvalidParameter("truncated key confirmation"));
        }

        let split = payload.len() - HMAC_SHA256_SIZE;
        let mut mac = [0u8; HMAC_SHA256_SIZE];
        mac.copy_from_slice(&payload[split..]);
        Ok(Self {
            signature: payload[..split].to_vec(),
            mac,
        })
    }
}

/// Message 4: server key confirmation.
pub(crate) fn encode_server_finish(mac: &[u8; HMAC_SHA256_SIZE]) -> Result<Vec<u8>, SessionError> {
    proto(mac.to_vec())
}

pub(crate) fn decode_server_finish(message: &[u8]) -> Result<Vec<u8>, SessionError> {
    Ok(open_proto(message)?.into_payload())
}

/// Transcript shared by both sides, ordered client first.
pub(crate) struct Transcript<'a> {
    pub client_ephemeral: &'a [u8],
    pub server_ephemeral: &'a [u8],
    pub client_id: &'a [u8],
    pub server_id: &'a [u8],
}

impl Transcript<'_> {
    /// Session identifier, carried big-endian in every transport message.
    pub fn session_id(&self) -> u32 {
        let id: [u8; 4] = kdf::derive_key(
            &[],
            SESSION_ID_LABEL,
            &[
                self.client_ephemeral,
                self.server_ephemeral,
                self.client_id,
                self.server_id,
            ],
        );
        u32::from_be_bytes(id)
    }
}

pub(crate) fn master_key(shared_secret: &[u8], session_id: u32) -> MasterKey {
    Zeroizing::new(kdf::derive_key(
        shared_secret,
        MASTER_KEY_LABEL,
        &[&session_id.to_be_bytes()],
    ))
}

/// Key confirmation over one side's ephemeral key.
pub(crate) fn confirmation(master: &[u8], ephemeral: &[u8], session_id: u32) -> [u8; HMAC_SHA256_SIZE] {
    mac::hmac_sha256(master, &[ephemeral, &session_id.to_be_bytes()])
}

pub(crate) fn verify_confirmation(master: &[u8], ephemeral: &[u8], session_id: u32, tag: &[u8]) -> bool {
    mac::verify_hmac_sha256(master, &[ephemeral, &session_id.to_be_bytes()], tag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ward_soter::KeyPair;

    #[test]
    fn test_key_exchange_layout() {
        let long_term = KeyPair::generate_ec();
        let ephemeral = KeyPair::generate_ec();
        let signature = long_term.private_key().sign(&[ephemeral.public_key().as_bytes()]);

        let message = KeyExchange::encode(b"client", ephemeral.public_key(), &signature).unwrap();
        assert_eq!(&message[..4], b"TSPM");
        assert_eq!(&message[12..16], b"TSID");

        let decoded = KeyExchange::decode(&message).unwrap();
        assert_eq!(decoded.id, b"client");
        assert_eq!(&decoded.ephemeral, ephemeral.public_key());
        assert_eq!(decoded.signature, signature.as_bytes());
    }

    #[test]
    fn test_key_exchange_rejects_garbage() {
        assert!(matches!(
            KeyExchange::decode(b"definitely not a container"),
            Err(SessionError::InvalidParameter(_))
        ));

        let only_id = proto(Container::new(ID_TAG, b"id".to_vec()).to_bytes()).unwrap();
        assert!(matches!(
            KeyExchange::decode(&only_id),
            Err(SessionError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_key_exchange_requires_signature() {
        let ephemeral = KeyPair::generate_ec();
        let mut payload = Container::new(ID_TAG, b"id".to_vec()).to_bytes();
        payload.extend_from_slice(ephemeral.public_key().as_bytes());
        let message = proto(payload).unwrap();

        assert_eq!(
            KeyExchange::decode(&message).unwrap_err(),
            SessionError::InvalidParameter("missing signature")
        );
    }

    #[test]
    fn test_client_finish_split() {
        let pair = KeyPair::generate_ec();
        let signature = pair.private_key().sign(&[b"transcript"]);
        let mac = [0x5A; HMAC_SHA256_SIZE];

        let message = ClientFinish::encode(&signature, &mac).unwrap();
        let decoded = ClientFinish::decode(&message).unwrap();
        assert_eq!(decoded.signature, signature.as_bytes());
        assert_eq!(decoded.mac, mac);

        let short = proto(vec![0; HMAC_SHA256_SIZE]).unwrap();
        assert!(ClientFinish::decode(&short).is_err());
    }

    #[test]
    fn test_session_id_depends_on_order() {
        let forward = Transcript {
            client_ephemeral: b"ec",
            server_ephemeral: b"es",
            client_id: b"client",
            server_id: b"server",
        };
        let swapped = Transcript {
            client_ephemeral: b"es",
            server_ephemeral: b"ec",
            client_id: b"server",
            server_id: b"client",
        };
        assert_eq!(forward.session_id(), forward.session_id());
        assert_ne!(forward.session_id(), swapped.session_id());
    }

    #[test]
    fn test_confirmation_binds_session_id() {
        let master = [7u8; MASTER_KEY_SIZE];
        let tag = confirmation(&master, b"ephemeral", 42);
        assert!(verify_confirmation(&master, b"ephemeral", 42, &tag));
        assert!(!verify_confirmation(&master, b"ephemeral", 43, &tag));
        assert!(!verify_confirmation(&master, b"other", 42, &tag));
    }
}
