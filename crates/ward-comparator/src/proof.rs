//! Non-interactive zero-knowledge proofs used by the comparator.
//!
//! All proofs are Fiat-Shamir transformed Schnorr protocols over the
//! Ristretto group. Challenges are SHA-512 over the statement points, then
//! the commitments, then a one-byte position label, so a proof is bound to
//! what it proves and a proof made for one protocol step never verifies in
//! another.
//!
//! | Proof | Statement | Size |
//! |-------|-----------|------|
//! | [`Knowledge`] | know `x` with `X = x·B` | 64 |
//! | [`DoubleBase`] | know `r, y` with `P = r·g3`, `Q = r·B + y·g2` | 96 |
//! | [`Equality`] | know `x` with `X = x·B`, `R = x·A` | 64 |

use curve25519_dalek::constants::RISTRETTO_BASEPOINT_POINT;
use curve25519_dalek::ristretto::RistrettoPoint;
use curve25519_dalek::scalar::Scalar;
use sha2::{Digest, Sha512};
use zeroize::Zeroizing;

use crate::ComparatorError;
use crate::ELEMENT_SIZE;

/// Uniformly random scalar from the OS generator.
pub(crate) fn random_scalar() -> Result<Scalar, ComparatorError> {
    let mut wide = Zeroizing::new([0u8; 64]);
    getrandom::getrandom(wide.as_mut_slice()).map_err(|_| ComparatorError::RandomFailed)?;
    Ok(Scalar::from_bytes_mod_order_wide(&wide))
}

/// `points` lists the statement first, then the commitments.
fn challenge(points: &[&RistrettoPoint], pos: u8) -> Scalar {
    let mut hasher = Sha512::new();
    for point in points {
        hasher.update(point.compress().as_bytes());
    }
    hasher.update([pos]);
    Scalar::from_hash(hasher)
}

fn read_scalar(bytes: &[u8]) -> Option<Scalar> {
    let array: [u8; ELEMENT_SIZE] = bytes.try_into().ok()?;
    Option::from(Scalar::from_canonical_bytes(array))
}

fn base() -> RistrettoPoint {
    RISTRETTO_BASEPOINT_POINT
}

/// Proof of knowledge of a discrete logarithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Knowledge {
    c: Scalar,
    d: Scalar,
}

impl Knowledge {
    pub const SIZE: usize = 2 * ELEMENT_SIZE;

    pub fn prove(pos: u8, x: &Scalar) -> Result<Self, ComparatorError> {
        let k = Zeroizing::new(random_scalar()?);
        let x_point = RistrettoPoint::mul_base(x);
        let c = challenge(&[&x_point, &RistrettoPoint::mul_base(&k)], pos);
        Ok(Self { c, d: *k - c * x })
    }

    pub fn verify(&self, pos: u8, x_point: &RistrettoPoint) -> bool {
        let commitment = RistrettoPoint::mul_base(&self.d) + self.c * x_point;
        challenge(&[x_point, &commitment], pos) == self.c
    }

    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self.c.as_bytes());
        out.extend_from_slice(self.d.as_bytes());
    }

    /// `None` for non-canonical scalars, which can never verify.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != Self::SIZE {
            return None;
        }
        Some(Self {
            c: read_scalar(&bytes[..ELEMENT_SIZE])?,
            d: read_scalar(&bytes[ELEMENT_SIZE..])?,
        })
    }
}

/// Proof that `P` and `Q` were built from the same `r` and the secret `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DoubleBase {
    c: Scalar,
    d1: Scalar,
    d2: Scalar,
}

impl DoubleBase {
    pub const SIZE: usize = 3 * ELEMENT_SIZE;

    pub fn prove(
        pos: u8,
        r: &Scalar,
        y: &Scalar,
        g2: &RistrettoPoint,
        g3: &RistrettoPoint,
    ) -> Result<Self, ComparatorError> {
        let k1 = Zeroizing::new(random_scalar()?);
        let k2 = Zeroizing::new(random_scalar()?);
        let p = r * g3;
        let q = RistrettoPoint::mul_base(r) + y * g2;
        let r1 = *k1 * g3;
        let r2 = RistrettoPoint::mul_base(&k1) + *k2 * g2;
        let c = challenge(&[&p, &q, &r1, &r2], pos);
        Ok(Self {
            c,
            d1: *k1 - c * r,
            d2: *k2 - c * y,
        })
    }

    pub fn verify(
        &self,
        pos: u8,
        g2: &RistrettoPoint,
        g3: &RistrettoPoint,
        p: &RistrettoPoint,
        q: &RistrettoPoint,
    ) -> bool {
        let r1 = self.d1 * g3 + self.c * p;
        let r2 = self.d1 * base() + self.d2 * g2 + self.c * q;
        challenge(&[p, q, &r1, &r2], pos) == self.c
    }

    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self.c.as_bytes());
        out.extend_from_slice(self.d1.as_bytes());
        out.extend_from_slice(self.d2.as_bytes());
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != Self::SIZE {
            return None;
        }
        Some(Self {
            c: read_scalar(&bytes[..ELEMENT_SIZE])?,
            d1: read_scalar(&bytes[ELEMENT_SIZE..2 * ELEMENT_SIZE])?,
            d2: read_scalar(&bytes[2 * ELEMENT_SIZE..])?,
        })
    }
}

/// Proof that `X = x·B` and `R = x·A` share the exponent `x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Equality {
    c: Scalar,
    d: Scalar,
}

impl Equality {
    pub const SIZE: usize = 2 * ELEMENT_SIZE;

    pub fn prove(pos: u8, x: &Scalar, a: &RistrettoPoint) -> Result<Self, ComparatorError> {
        let k = Zeroizing::new(random_scalar()?);
        let x_point = RistrettoPoint::mul_base(x);
        let r = x * a;
        let r1 = RistrettoPoint::mul_base(&k);
        let r2 = *k * a;
        let c = challenge(&[&x_point, &r, &r1, &r2], pos);
        Ok(Self { c, d: *k - c * x })
    }

    pub fn verify(
        &self,
        pos: u8,
        x_point: &RistrettoPoint,
        a: &RistrettoPoint,
        r: &RistrettoPoint,
    ) -> bool {
        let r1 = RistrettoPoint::mul_base(&self.d) + self.c * x_point;
        let r2 = self.d * a + self.c * r;
        challenge(&[x_point, r, &r1, &r2], pos) == self.c
    }

    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self.c.as_bytes());
        out.extend_from_slice(self.d.as_bytes());
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != Self::SIZE {
            return None;
        }
        Some(Self {
            c: read_scalar(&bytes[..ELEMENT_SIZE])?,
            d: read_scalar(&bytes[ELEMENT_SIZE..])?,
        })
    }
}
