//! Soter containers.
//!
//! A container is the framing used for keys, protocol messages and saved
//! session state:
//!
//! ```text
//! +--------+-----------------+----------------+-----------+
//! | tag(4) | length(4, BE)   | checksum(4)    | payload   |
//! +--------+-----------------+----------------+-----------+
//! ```
//!
//! `length` counts the 12-byte header too. The checksum is CRC-32C over the
//! whole container with the checksum field zeroed, stored big-endian (the
//! raw CRC register byte-reversed).

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::constant_time::verify_4;
use crate::{CONTAINER_HEADER_SIZE, CONTAINER_TAG_SIZE};

/// Largest payload whose total length still fits the 32-bit length field.
pub const MAX_PAYLOAD_SIZE: usize = u32::MAX as usize - CONTAINER_HEADER_SIZE;

const CRC32C_POLY: u32 = 0x82F6_3B78;

const CRC32C_TABLE: [u32; 256] = {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u32;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 1 != 0 {
                (crc >> 1) ^ CRC32C_POLY
            } else {
                crc >> 1
            };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
};

/// Incremental reflected CRC-32C (Castagnoli).
#[derive(Clone, Copy)]
struct Crc32c(u32);

impl Crc32c {
    fn new() -> Self {
        Self(0xFFFF_FFFF)
    }

    fn update(&mut self, data: &[u8]) {
        for &byte in data {
            let index = ((self.0 ^ u32::from(byte)) & 0xFF) as usize;
            self.0 = CRC32C_TABLE[index] ^ (self.0 >> 8);
        }
    }

    fn finish(self) -> u32 {
        !self.0
    }
}

/// CRC-32C of a buffer.
#[must_use]
pub fn crc32c(data: &[u8]) -> u32 {
    let mut crc = Crc32c::new();
    crc.update(data);
    crc.finish()
}

fn checksum(tag: &[u8; CONTAINER_TAG_SIZE], length: [u8; 4], payload: &[u8]) -> [u8; 4] {
    let mut crc = Crc32c::new();
    crc.update(tag);
    crc.update(&length);
    crc.update(&[0u8; 4]);
    crc.update(payload);
    crc.finish().to_be_bytes()
}

/// A tagged, checksummed byte container.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Container {
    tag: [u8; CONTAINER_TAG_SIZE],
    payload: Vec<u8>,
}

impl Container {
    /// Create a container.
    ///
    /// # Panics
    ///
    /// Panics if the payload is larger than [`MAX_PAYLOAD_SIZE`].
    #[must_use]
    pub fn new(tag: [u8; CONTAINER_TAG_SIZE], payload: impl Into<Vec<u8>>) -> Self {
        let payload = payload.into();
        assert!(
            payload.len() <= MAX_PAYLOAD_SIZE,
            "container payload of {} bytes does not fit a 32-bit length",
            payload.len()
        );
        Self { tag, payload }
    }

    /// Create a container from a tag slice.
    ///
    /// # Panics
    ///
    /// Panics if `tag` is not exactly 4 bytes, or the payload is larger than
    /// [`MAX_PAYLOAD_SIZE`].
    #[must_use]
    pub fn with_tag(tag: &[u8], payload: impl Into<Vec<u8>>) -> Self {
        let Ok(tag) = <[u8; CONTAINER_TAG_SIZE]>::try_from(tag) else {
            panic!("container tag must be exactly 4 bytes, got {}", tag.len());
        };
        Self::new(tag, payload)
    }

    /// Container tag.
    #[must_use]
    pub fn tag(&self) -> &[u8; CONTAINER_TAG_SIZE] {
        &self.tag
    }

    /// Container payload.
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Take the payload out of the container.
    #[must_use]
    pub fn into_payload(mut self) -> Vec<u8> {
        std::mem::take(&mut self.payload)
    }

    /// Total serialized size, header included.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        CONTAINER_HEADER_SIZE + self.payload.len()
    }

    /// Append the serialized container to `out`.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        // Bounded by MAX_PAYLOAD_SIZE at construction.
        let length = (self.encoded_len() as u32).to_be_bytes();
        out.reserve(self.encoded_len());
        out.extend_from_slice(&self.tag);
        out.extend_from_slice(&length);
        out.extend_from_slice(&checksum(&self.tag, length, &self.payload));
        out.extend_from_slice(&self.payload);
    }

    /// Serialize the container.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.write_to(&mut out);
        out
    }

    /// Parse a container from the front of `buf`.
    ///
    /// Returns the container and the unconsumed tail, or `None` if `buf` is
    /// too short, the declared length is inconsistent, or the checksum does
    /// not match.
    #[must_use]
    pub fn parse(buf: &[u8]) -> Option<(Self, &[u8])> {
        if buf.len() < CONTAINER_HEADER_SIZE {
            return None;
        }

        let mut tag = [0u8; CONTAINER_TAG_SIZE];
        tag.copy_from_slice(&buf[..4]);
        let mut length = [0u8; 4];
        length.copy_from_slice(&buf[4..8]);
        let mut stored = [0u8; 4];
        stored.copy_from_slice(&buf[8..12]);

        let total = u32::from_be_bytes(length) as usize;
        if total < CONTAINER_HEADER_SIZE || total > buf.len() {
            return None;
        }

        let payload = &buf[CONTAINER_HEADER_SIZE..total];
        if !verify_4(&checksum(&tag, length, payload), &stored) {
            return None;
        }

        Some((
            Self {
                tag,
                payload: payload.to_vec(),
            },
            &buf[total..],
        ))
    }

    /// Parse a container and require a specific tag.
    #[must_use]
    pub fn parse_tagged<'a>(buf: &'a [u8], tag: &[u8; CONTAINER_TAG_SIZE]) -> Option<(Self, &'a [u8])> {
        Self::parse(buf).filter(|(container, _)| container.tag == *tag)
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("tag", &String::from_utf8_lossy(&self.tag))
            .field("payload_len", &self.payload.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc32c_check_value() {
        assert_eq!(crc32c(b"123456789"), 0xE306_9283);
        assert_eq!(crc32c(b""), 0);
    }

    #[test]
    fn test_roundtrip_with_remainder() {
        let container = Container::new(*b"TEST", b"payload".to_vec());
        let mut wire = container.to_bytes();
        wire.extend_from_slice(b"tail");

        let (parsed, rest) = Container::parse(&wire).unwrap();
        assert_eq!(parsed.tag(), b"TEST");
        assert_eq!(parsed.payload(), b"payload");
        assert_eq!(rest, b"tail");
    }

    #[test]
    fn test_header_layout() {
        let wire = Container::new(*b"UEC2", vec![0xAB; 3]).to_bytes();
        assert_eq!(&wire[..4], b"UEC2");
        assert_eq!(&wire[4..8], &15u32.to_be_bytes());
        assert_eq!(wire.len(), 15);

        let mut zeroed = wire.clone();
        zeroed[8..12].fill(0);
        assert_eq!(&wire[8..12], &crc32c(&zeroed).to_be_bytes());
    }

    #[test]
    fn test_empty_payload() {
        let wire = Container::new(*b"NONE", Vec::new()).to_bytes();
        assert_eq!(wire.len(), CONTAINER_HEADER_SIZE);
        let (parsed, rest) = Container::parse(&wire).unwrap();
        assert!(parsed.payload().is_empty());
        assert!(rest.is_empty());
    }

    #[test]
    fn test_parse_rejects_short_buffer() {
        assert!(Container::parse(&[0u8; 11]).is_none());
        assert!(Container::parse(&[]).is_none());
    }

    #[test]
    fn test_parse_rejects_corrupted_checksum() {
        let mut wire = Container::new(*b"TEST", b"data".to_vec()).to_bytes();
        wire[9] ^= 0x01;
        assert!(Container::parse(&wire).is_none());
    }

    #[test]
    fn test_parse_rejects_corrupted_payload() {
        let mut wire = Container::new(*b"TEST", b"data".to_vec()).to_bytes();
        let last = wire.len() - 1;
        wire[last] ^= 0x01;
        assert!(Container::parse(&wire).is_none());
    }

    #[test]
    fn test_parse_rejects_bad_length() {
        let mut wire = Container::new(*b"TEST", b"data".to_vec()).to_bytes();
        wire[4..8].copy_from_slice(&100u32.to_be_bytes());
        assert!(Container::parse(&wire).is_none());

        wire[4..8].copy_from_slice(&4u32.to_be_bytes());
        assert!(Container::parse(&wire).is_none());
    }

    #[test]
    fn test_parse_tagged() {
        let wire = Container::new(*b"TSID", b"id".to_vec()).to_bytes();
        assert!(Container::parse_tagged(&wire, b"TSID").is_some());
        assert!(Container::parse_tagged(&wire, b"TSPM").is_none());
    }

    #[test]
    fn test_into_payload() {
        let container = Container::with_tag(b"TEST", b"abc".to_vec());
        assert_eq!(container.into_payload(), b"abc");
    }

    #[test]
    #[should_panic(expected = "container tag must be exactly 4 bytes")]
    fn test_with_tag_rejects_short_tag() {
        let _ = Container::with_tag(b"ABC", Vec::new());
    }

    #[test]
    fn test_debug_hides_payload() {
        let container = Container::new(*b"REC2", vec![0x42; 32]);
        let debug = format!("{container:?}");
        assert!(debug.contains("REC2"));
        assert!(debug.contains("32"));
        assert!(!debug.contains("42, 42"));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn concatenated_containers_parse_in_order(
                first in prop::collection::vec(any::<u8>(), 0..64),
                second in prop::collection::vec(any::<u8>(), 0..64),
            ) {
                let mut wire = Container::new(*b"ONE_", first.clone()).to_bytes();
                Container::new(*b"TWO_", second.clone()).write_to(&mut wire);

                let (a, rest) = Container::parse(&wire).unwrap();
                let (b, rest) = Container::parse(rest).unwrap();
                prop_assert_eq!(a.payload(), &first[..]);
                prop_assert_eq!(b.payload(), &second[..]);
                prop_assert!(rest.is_empty());
            }
        }
    }
}
