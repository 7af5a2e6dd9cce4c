//! Comparator state machine.

use std::mem;

use curve25519_dalek::ristretto::{CompressedRistretto, RistrettoPoint};
use curve25519_dalek::scalar::Scalar;
use curve25519_dalek::traits::{Identity, IsIdentity};
use sha2::{Digest, Sha512};
use tracing::{debug, trace, warn};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::proof::{DoubleBase, Equality, Knowledge, random_scalar};
use crate::{ComparatorError, ELEMENT_SIZE};

/// Elements in the initiator's first message.
pub const STEP1_ELEMENTS: usize = 6;
/// Elements in the responder's first message.
pub const STEP2_ELEMENTS: usize = 11;
/// Elements in the initiator's second message.
pub const STEP3_ELEMENTS: usize = 8;
/// Elements in the responder's final message.
pub const STEP4_ELEMENTS: usize = 3;

/// Outcome of a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonResult {
    /// The protocol has not finished on this side
    NotReady,
    /// Both secrets are equal
    Match,
    /// Secrets differ, or the peer misbehaved
    NoMatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// Collecting secrets
    Idle,
    /// Initiator sent step 1
    Started,
    /// Responder sent step 2
    Responded,
    /// Initiator sent step 3
    Confirmed,
    Finished,
}

#[derive(Zeroize, ZeroizeOnDrop)]
struct Secrets {
    y: Scalar,
    x2: Scalar,
    x3: Scalar,
    r: Scalar,
}

impl Default for Secrets {
    fn default() -> Self {
        Self {
            y: Scalar::ZERO,
            x2: Scalar::ZERO,
            x3: Scalar::ZERO,
            r: Scalar::ZERO,
        }
    }
}

struct Points {
    g2: RistrettoPoint,
    g3: RistrettoPoint,
    /// Peer's `G3`
    g3_peer: RistrettoPoint,
    p: RistrettoPoint,
    p_peer: RistrettoPoint,
    q: RistrettoPoint,
    /// `Qa - Qb`
    q_diff: RistrettoPoint,
}

impl Default for Points {
    fn default() -> Self {
        let identity = RistrettoPoint::identity();
        Self {
            g2: identity,
            g3: identity,
            g3_peer: identity,
            p: identity,
            p_peer: identity,
            q: identity,
            q_diff: identity,
        }
    }
}

/// Splits a message into exactly `N` group-element-sized chunks.
struct Elements<'a> {
    chunks: Vec<&'a [u8]>,
}

impl<'a> Elements<'a> {
    fn parse(message: &'a [u8], count: usize) -> Result<Self, ComparatorError> {
        if message.len() != count * ELEMENT_SIZE {
            return Err(ComparatorError::InvalidMessage);
        }
        Ok(Self {
            chunks: message.chunks_exact(ELEMENT_SIZE).collect(),
        })
    }

    fn point(&self, index: usize) -> Result<RistrettoPoint, ComparatorError> {
        let bytes: [u8; ELEMENT_SIZE] = self.chunks[index]
            .try_into()
            .map_err(|_| ComparatorError::InvalidMessage)?;
        CompressedRistretto(bytes)
            .decompress()
            .ok_or(ComparatorError::InvalidMessage)
    }

    fn span(&self, index: usize, len: usize) -> Vec<u8> {
        self.chunks[index..index + len].concat()
    }
}

fn put(out: &mut Vec<u8>, point: &RistrettoPoint) {
    out.extend_from_slice(point.compress().as_bytes());
}

/// Zero-knowledge comparison of two secrets.
///
/// Both parties append their secrets, one calls [`begin`](Self::begin) and
/// the two then pass messages to [`proceed`](Self::proceed) until it returns
/// an empty buffer. Neither side learns anything about the other's secret
/// beyond whether they are equal.
///
/// ```ignore
/// let mut alice = SecureComparator::new();
/// let mut bob = SecureComparator::new();
/// alice.append_secret(b"shared")?;
/// bob.append_secret(b"shared")?;
///
/// let step1 = alice.begin()?;
/// let step2 = bob.proceed(&step1)?;
/// let step3 = alice.proceed(&step2)?;
/// let step4 = bob.proceed(&step3)?;
/// assert!(alice.proceed(&step4)?.is_empty());
/// assert_eq!(alice.result(), ComparisonResult::Match);
/// ```
///
/// A comparator is single use. An invalid proof from the peer yields a
/// [`ComparisonResult::NoMatch`] verdict on both sides; the exchange still
/// runs to the end so both sides finish.
pub struct SecureComparator {
    hasher: Sha512,
    has_secret: bool,
    step: Step,
    /// Set when a proof fails or a degenerate element shows up
    poisoned: bool,
    verdict: ComparisonResult,
    secrets: Secrets,
    points: Points,
}

impl Default for SecureComparator {
    fn default() -> Self {
        Self::new()
    }
}

impl SecureComparator {
    /// Create a comparator with no secret.
    #[must_use]
    pub fn new() -> Self {
        Self {
            hasher: Sha512::new(),
            has_secret: false,
            step: Step::Idle,
            poisoned: false,
            verdict: ComparisonResult::NotReady,
            secrets: Secrets::default(),
            points: Points::default(),
        }
    }

    /// Append data to the secret. May be called repeatedly before the
    /// comparison starts; the secret is the concatenation of all parts.
    ///
    /// # Errors
    ///
    /// [`ComparatorError::InvalidParameter`] for empty data,
    /// [`ComparatorError::InvalidState`] once the comparison has started.
    pub fn append_secret(&mut self, secret: &[u8]) -> Result<(), ComparatorError> {
        if secret.is_empty() {
            return Err(ComparatorError::InvalidParameter("secret"));
        }
        if self.step != Step::Idle {
            return Err(ComparatorError::InvalidState);
        }
        self.hasher.update(secret);
        self.has_secret = true;
        Ok(())
    }

    /// Start the comparison as the initiator.
    ///
    /// # Errors
    ///
    /// [`ComparatorError::InvalidState`] if the comparison already started on
    /// either side, [`ComparatorError::MissingSecret`] without a secret.
    pub fn begin(&mut self) -> Result<Vec<u8>, ComparatorError> {
        if self.step != Step::Idle {
            return Err(ComparatorError::InvalidState);
        }
        self.load_secret()?;
        self.initiator_step1()
    }

    /// Process a peer message and return the reply. An empty reply means
    /// this side is finished and has nothing more to send.
    ///
    /// # Errors
    ///
    /// [`ComparatorError::InvalidParameter`] for an empty message,
    /// [`ComparatorError::InvalidState`] after completion,
    /// [`ComparatorError::InvalidMessage`] for malformed input and
    /// [`ComparatorError::MissingSecret`] when responding without a secret.
    pub fn proceed(&mut self, message: &[u8]) -> Result<Vec<u8>, ComparatorError> {
        if message.is_empty() {
            return Err(ComparatorError::InvalidParameter("message"));
        }
        trace!(step = ?self.step, len = message.len(), "comparator message");
        match self.step {
            Step::Idle => {
                if !self.has_secret {
                    return Err(ComparatorError::MissingSecret);
                }
                self.responder_step2(message)
            }
            Step::Started => self.initiator_step3(message),
            Step::Responded => self.responder_step4(message),
            Step::Confirmed => self.initiator_step5(message),
            Step::Finished => Err(ComparatorError::InvalidState),
        }
    }

    /// Comparison verdict, [`ComparisonResult::NotReady`] until finished.
    #[must_use]
    pub fn result(&self) -> ComparisonResult {
        self.verdict
    }

    /// Whether this side has completed the protocol.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.step == Step::Finished
    }

    fn load_secret(&mut self) -> Result<(), ComparatorError> {
        if !self.has_secret {
            return Err(ComparatorError::MissingSecret);
        }
        self.secrets.y = Scalar::from_hash(mem::take(&mut self.hasher));
        Ok(())
    }

    fn check(&mut self, pos: u8, valid: bool) {
        if !valid {
            warn!(pos, "peer comparator proof rejected");
            self.poisoned = true;
        }
    }

    fn check_generators(&mut self) {
        if self.points.g2.is_identity() || self.points.g3.is_identity() {
            warn!("degenerate comparator generator");
            self.poisoned = true;
        }
    }

    fn finish(&mut self, rab: &RistrettoPoint) {
        let matched = !self.poisoned
            && !rab.is_identity()
            && *rab == self.points.p - self.points.p_peer;
        self.verdict = if matched {
            ComparisonResult::Match
        } else {
            ComparisonResult::NoMatch
        };
        self.secrets.zeroize();
        self.step = Step::Finished;
        debug!(verdict = ?self.verdict, "comparison finished");
    }

    /// Build `P = r·g3` and `Q = r·B + y·g2` with a fresh `r`.
    ///
    /// A poisoned side commits to a random secret instead, which drives the
    /// peer's verdict to `NoMatch` as well.
    fn commit(&mut self) -> Result<(), ComparatorError> {
        if self.poisoned {
            self.secrets.y = random_scalar()?;
        }
        self.secrets.r = random_scalar()?;
        self.points.p = self.secrets.r * self.points.g3;
        self.points.q =
            RistrettoPoint::mul_base(&self.secrets.r) + self.secrets.y * self.points.g2;
        Ok(())
    }

    /// `G2a ‖ proof ‖ G3a ‖ proof`
    fn initiator_step1(&mut self) -> Result<Vec<u8>, ComparatorError> {
        self.secrets.x2 = random_scalar()?;
        self.secrets.x3 = random_scalar()?;

        let mut out = Vec::with_capacity(STEP1_ELEMENTS * ELEMENT_SIZE);
        put(&mut out, &RistrettoPoint::mul_base(&self.secrets.x2));
        Knowledge::prove(1, &self.secrets.x2)?.write_to(&mut out);
        put(&mut out, &RistrettoPoint::mul_base(&self.secrets.x3));
        Knowledge::prove(2, &self.secrets.x3)?.write_to(&mut out);

        self.step = Step::Started;
        debug!("comparison started");
        Ok(out)
    }

    /// `G2b ‖ proof ‖ G3b ‖ proof ‖ Pb ‖ Qb ‖ proof`
    fn responder_step2(&mut self, message: &[u8]) -> Result<Vec<u8>, ComparatorError> {
        let input = Elements::parse(message, STEP1_ELEMENTS)?;
        let g2a = input.point(0)?;
        let g3a = input.point(3)?;
        self.load_secret()?;

        let valid = Knowledge::from_bytes(&input.span(1, 2)).is_some_and(|p| p.verify(1, &g2a));
        self.check(1, valid);
        let valid = Knowledge::from_bytes(&input.span(4, 2)).is_some_and(|p| p.verify(2, &g3a));
        self.check(2, valid);

        self.secrets.x2 = random_scalar()?;
        self.secrets.x3 = random_scalar()?;
        self.points.g2 = self.secrets.x2 * g2a;
        self.points.g3 = self.secrets.x3 * g3a;
        self.points.g3_peer = g3a;
        self.check_generators();
        self.commit()?;

        let mut out = Vec::with_capacity(STEP2_ELEMENTS * ELEMENT_SIZE);
        put(&mut out, &RistrettoPoint::mul_base(&self.secrets.x2));
        Knowledge::prove(3, &self.secrets.x2)?.write_to(&mut out);
        put(&mut out, &RistrettoPoint::mul_base(&self.secrets.x3));
        Knowledge::prove(4, &self.secrets.x3)?.write_to(&mut out);
        put(&mut out, &self.points.p);
        put(&mut out, &self.points.q);
        DoubleBase::prove(
            5,
            &self.secrets.r,
            &self.secrets.y,
            &self.points.g2,
            &self.points.g3,
        )?
        .write_to(&mut out);

        self.step = Step::Responded;
        Ok(out)
    }

    /// `Pa ‖ Qa ‖ proof ‖ Ra ‖ proof`
    fn initiator_step3(&mut self, message: &[u8]) -> Result<Vec<u8>, ComparatorError> {
        let input = Elements::parse(message, STEP2_ELEMENTS)?;
        let g2b = input.point(0)?;
        let g3b = input.point(3)?;
        let pb = input.point(6)?;
        let qb = input.point(7)?;

        let valid = Knowledge::from_bytes(&input.span(1, 2)).is_some_and(|p| p.verify(3, &g2b));
        self.check(3, valid);
        let valid = Knowledge::from_bytes(&input.span(4, 2)).is_some_and(|p| p.verify(4, &g3b));
        self.check(4, valid);

        self.points.g2 = self.secrets.x2 * g2b;
        self.points.g3 = self.secrets.x3 * g3b;
        self.points.g3_peer = g3b;
        self.points.p_peer = pb;
        self.check_generators();

        let valid = DoubleBase::from_bytes(&input.span(8, 3))
            .is_some_and(|p| p.verify(5, &self.points.g2, &self.points.g3, &pb, &qb));
        self.check(5, valid);

        self.commit()?;
        self.points.q_diff = self.points.q - qb;
        let ra = self.secrets.x3 * self.points.q_diff;

        let mut out = Vec::with_capacity(STEP3_ELEMENTS * ELEMENT_SIZE);
        put(&mut out, &self.points.p);
        put(&mut out, &self.points.q);
        DoubleBase::prove(
            6,
            &self.secrets.r,
            &self.secrets.y,
            &self.points.g2,
            &self.points.g3,
        )?
        .write_to(&mut out);
        put(&mut out, &ra);
        Equality::prove(7, &self.secrets.x3, &self.points.q_diff)?.write_to(&mut out);

        self.step = Step::Confirmed;
        Ok(out)
    }

    /// `Rb ‖ proof`, then the responder is finished.
    fn responder_step4(&mut self, message: &[u8]) -> Result<Vec<u8>, ComparatorError> {
        let input = Elements::parse(message, STEP3_ELEMENTS)?;
        let pa = input.point(0)?;
        let qa = input.point(1)?;
        let ra = input.point(5)?;

        let valid = DoubleBase::from_bytes(&input.span(2, 3))
            .is_some_and(|p| p.verify(6, &self.points.g2, &self.points.g3, &pa, &qa));
        self.check(6, valid);

        self.points.q_diff = qa - self.points.q;
        let valid = Equality::from_bytes(&input.span(6, 2))
            .is_some_and(|p| p.verify(7, &self.points.g3_peer, &self.points.q_diff, &ra));
        self.check(7, valid);

        let rb = if self.poisoned {
            random_scalar()? * self.points.q_diff
        } else {
            self.secrets.x3 * self.points.q_diff
        };
        let rab = self.secrets.x3 * ra;

        let mut out = Vec::with_capacity(STEP4_ELEMENTS * ELEMENT_SIZE);
        put(&mut out, &rb);
        Equality::prove(8, &self.secrets.x3, &self.points.q_diff)?.write_to(&mut out);

        // Responder compares Pa - Pb, so swap roles of own and peer P.
        self.points.p_peer = self.points.p;
        self.points.p = pa;
        self.finish(&rab);
        Ok(out)
    }

    /// Final verification, nothing to send.
    fn initiator_step5(&mut self, message: &[u8]) -> Result<Vec<u8>, ComparatorError> {
        let input = Elements::parse(message, STEP4_ELEMENTS)?;
        let rb = input.point(0)?;

        let valid = Equality::from_bytes(&input.span(1, 2))
            .is_some_and(|p| p.verify(8, &self.points.g3_peer, &self.points.q_diff, &rb));
        self.check(8, valid);

        let rab = self.secrets.x3 * rb;
        self.finish(&rab);
        Ok(Vec::new())
    }
}
