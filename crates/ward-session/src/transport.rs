//! Established-session message protection.
//!
//! ```text
//! +----------------+--------+----------------------------------------------+---------+
//! | session id (4) | iv(16) | AES-256-GCM( len(4) ‖ seq(4) ‖ ts(8) ‖ data ) | tag(16) |
//! +----------------+--------+----------------------------------------------+---------+
//! ```
//!
//! All integers are big-endian. `len` counts `seq`, `ts` and the payload.
//! The receiver accepts sequence numbers within a window around the last
//! accepted one and timestamps within a clock skew of its own clock.

use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{trace, warn};
use ward_soter::aead::{AeadKey, LONG_NONCE_SIZE, LongNonce, TAG_SIZE};
use ward_soter::kdf;

use crate::handshake::{MASTER_KEY_SIZE, MasterKey};
use crate::{SessionConfig, SessionError};

const CLIENT_KEY_LABEL: &str = "Themis secure session client key";
const SERVER_KEY_LABEL: &str = "Themis secure session server key";
const CLIENT_SEQ_LABEL: &str = "Themis secure session client initial sequence number";
const SERVER_SEQ_LABEL: &str = "Themis secure session server initial sequence number";

/// Encrypted header: length, sequence number, timestamp.
const HEADER_SIZE: usize = 4 + 4 + 8;

/// Bytes a wrapped message adds to its payload.
pub const WRAP_OVERHEAD: usize = 4 + LONG_NONCE_SIZE + HEADER_SIZE + TAG_SIZE;

fn unix_now() -> Result<u64, SessionError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|_| SessionError::Fail)
}

/// Distance between two sequence numbers on the 32-bit circle.
fn seq_distance(a: u32, b: u32) -> u32 {
    a.wrapping_sub(b).min(b.wrapping_sub(a))
}

/// Keys and counters of an established session.
pub(crate) struct Transport {
    session_id: u32,
    is_client: bool,
    master: MasterKey,
    out_key: AeadKey,
    in_key: AeadKey,
    out_seq: u32,
    in_seq: u32,
    config: SessionConfig,
}

impl Transport {
    /// Derive directional keys and initial counters from the master key.
    pub fn new(session_id: u32, is_client: bool, master: MasterKey, config: SessionConfig) -> Self {
        let (out_label, in_label, out_seq_label, in_seq_label) = if is_client {
            (CLIENT_KEY_LABEL, SERVER_KEY_LABEL, CLIENT_SEQ_LABEL, SERVER_SEQ_LABEL)
        } else {
            (SERVER_KEY_LABEL, CLIENT_KEY_LABEL, SERVER_SEQ_LABEL, CLIENT_SEQ_LABEL)
        };

        let context = session_id.to_be_bytes();
        let derive_seq = |label: &str| u32::from_be_bytes(kdf::derive_key(master.as_slice(), label, &[&context]));

        Self {
            session_id,
            is_client,
            out_key: AeadKey::new(kdf::derive_key(master.as_slice(), out_label, &[&context])),
            in_key: AeadKey::new(kdf::derive_key(master.as_slice(), in_label, &[&context])),
            out_seq: derive_seq(out_seq_label),
            in_seq: derive_seq(in_seq_label),
            master,
            config,
        }
    }

    pub fn session_id(&self) -> u32 {
        self.session_id
    }

    pub fn is_client(&self) -> bool {
        self.is_client
    }

    pub fn master(&self) -> &[u8; MASTER_KEY_SIZE] {
        &self.master
    }

    pub fn sequence_numbers(&self) -> (u32, u32) {
        (self.out_seq, self.in_seq)
    }

    pub fn set_config(&mut self, config: SessionConfig) {
        self.config = config;
    }

    pub fn set_sequence_numbers(&mut self, out_seq: u32, in_seq: u32) {
        self.out_seq = out_seq;
        self.in_seq = in_seq;
    }

    pub fn wrap(&mut self, payload: &[u8]) -> Result<Vec<u8>, SessionError> {
        self.wrap_at(payload, unix_now()?)
    }

    pub(crate) fn wrap_at(&mut self, payload: &[u8], now: u64) -> Result<Vec<u8>, SessionError> {
        if payload.is_empty() {
            return Err(SessionError::InvalidParameter("empty message"));
        }
        let declared = u32::try_from(payload.len() + HEADER_SIZE - 4).map_err(|_| SessionError::NoMemory)?;

        let mut plaintext = Vec::with_capacity(HEADER_SIZE + payload.len());
        plaintext.extend_from_slice(&declared.to_be_bytes());
        plaintext.extend_from_slice(&self.out_seq.to_be_bytes());
        plaintext.extend_from_slice(&now.to_be_bytes());
        plaintext.extend_from_slice(payload);

        let iv = LongNonce::random().map_err(|_| SessionError::Fail)?;
        let sealed = self
            .out_key
            .encrypt_long(&iv, &plaintext, &[])
            .map_err(|_| SessionError::Fail)?;

        let mut out = Vec::with_capacity(WRAP_OVERHEAD + payload.len());
        out.extend_from_slice(&self.session_id.to_be_bytes());
        out.extend_from_slice(iv.as_bytes());
        out.extend_from_slice(&sealed);

        trace!(seq = self.out_seq, len = payload.len(), "wrapped message");
        self.out_seq = self.out_seq.wrapping_add(1);
        Ok(out)
    }

    pub fn unwrap(&mut self, message: &[u8]) -> Result<Vec<u8>, SessionError> {
        self.unwrap_at(message, unix_now()?)
    }

    pub(crate) fn unwrap_at(&mut self, message: &[u8], now: u64) -> Result<Vec<u8>, SessionError> {
        if message.len() < WRAP_OVERHEAD {
            return Err(SessionError::InvalidParameter("wrapped message too short"));
        }

        let (id, rest) = message.split_at(4);
        if id != self.session_id.to_be_bytes() {
            return Err(SessionError::InvalidParameter("session id mismatch"));
        }

        let (iv, sealed) = rest.split_at(LONG_NONCE_SIZE);
        let iv = LongNonce::from_slice(iv).ok_or(SessionError::Fail)?;
        let plaintext = self
            .in_key
            .decrypt_long(&iv, sealed, &[])
            .map_err(|_| SessionError::Fail)?;

        let mut field = [0u8; 4];
        field.copy_from_slice(&plaintext[..4]);
        let declared = u32::from_be_bytes(field) as usize;
        field.copy_from_slice(&plaintext[4..8]);
        let seq = u32::from_be_bytes(field);
        let mut ts = [0u8; 8];
        ts.copy_from_slice(&plaintext[8..HEADER_SIZE]);
        let ts = u64::from_be_bytes(ts);

        if declared != plaintext.len() - 4 {
            return Err(SessionError::InvalidParameter("declared length mismatch"));
        }

        if seq_distance(seq, self.in_seq) > self.config.seq_window {
            warn!(seq, expected = self.in_seq, "sequence number outside window");
            return Err(SessionError::InvalidParameter("sequence number outside window"));
        }

        if ts.abs_diff(now) > self.config.max_clock_skew_secs {
            warn!(ts, now, "timestamp outside clock skew");
            return Err(SessionError::InvalidParameter("timestamp outside clock skew"));
        }

        self.in_seq = seq;
        trace!(seq, len = plaintext.len() - HEADER_SIZE, "unwrapped message");
        Ok(plaintext[HEADER_SIZE..].to_vec())
    }
}
