//! Core types for beacon proof verification
//!
//! Field elements and BN254 points use raw big-endian byte layouts matching
//! the alt_bn128 precompile format. Beacon values (BLS12-381 points) travel
//! as circuit signals: every base-field element is split into 55-bit limbs.

use core::fmt;

/// Number of limbs per BLS12-381 base-field element.
pub const LIMBS_PER_FP: usize = 7;

/// Bit width of a single limb.
pub const LIMB_BITS: u32 = 55;

/// Width of a field element on the verifier boundary.
pub const FIELD_BYTES: usize = 32;

/// A 64-byte G1 point (uncompressed, big-endian x || y).
pub type G1Bytes = [u8; 64];

/// A 128-byte G2 point (uncompressed, big-endian, EIP-197 coordinate order).
pub type G2Bytes = [u8; 128];

/// 256-bit unsigned integer, stored big-endian.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FieldElement(pub [u8; FIELD_BYTES]);

impl FieldElement {
    pub const ZERO: FieldElement = FieldElement([0u8; FIELD_BYTES]);

    pub fn from_u64(value: u64) -> Self {
        let mut bytes = [0u8; FIELD_BYTES];
        bytes[24..].copy_from_slice(&value.to_be_bytes());
        FieldElement(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; FIELD_BYTES] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }

    /// Number of significant bits.
    pub fn bits(&self) -> u32 {
        for (i, &byte) in self.0.iter().enumerate() {
            if byte != 0 {
                return ((FIELD_BYTES - i) as u32) * 8 - byte.leading_zeros();
            }
        }
        0
    }

    /// True if `self < modulus`.
    pub fn is_below(&self, modulus: &FieldElement) -> bool {
        self.0 < modulus.0
    }
}

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldElement(0x{})", hex::encode(self.0))
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// BN254 G1 point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct G1Point {
    pub x: FieldElement,
    pub y: FieldElement,
}

impl G1Point {
    pub fn new(x: FieldElement, y: FieldElement) -> Self {
        Self { x, y }
    }

    pub fn to_bytes(&self) -> G1Bytes {
        let mut out = [0u8; 64];
        out[..32].copy_from_slice(&self.x.0);
        out[32..].copy_from_slice(&self.y.0);
        out
    }

    pub fn from_bytes(bytes: &G1Bytes) -> Self {
        let mut x = [0u8; 32];
        let mut y = [0u8; 32];
        x.copy_from_slice(&bytes[..32]);
        y.copy_from_slice(&bytes[32..]);
        Self {
            x: FieldElement(x),
            y: FieldElement(y),
        }
    }
}

/// Quadratic extension field element `c0 + c1 * u`, stored as the pair
/// `(first, second)` in whatever order the producer emitted it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Fp2 {
    pub first: FieldElement,
    pub second: FieldElement,
}

impl Fp2 {
    pub fn new(first: FieldElement, second: FieldElement) -> Self {
        Self { first, second }
    }

    pub fn swapped(&self) -> Self {
        Self {
            first: self.second,
            second: self.first,
        }
    }
}

/// BN254 G2 point.
///
/// Provers (snarkjs) emit Fp2 coordinates as `(c0, c1)`; the alt_bn128
/// precompile and the Groth16 verifier read them as `(c1, c0)`. Use
/// [`G2Point::swap_coordinates`] exactly once when crossing that boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct G2Point {
    pub x: Fp2,
    pub y: Fp2,
}

impl G2Point {
    pub fn new(x: Fp2, y: Fp2) -> Self {
        Self { x, y }
    }

    /// Reverse the inner pair of both coordinates. Involution.
    pub fn swap_coordinates(&self) -> Self {
        Self {
            x: self.x.swapped(),
            y: self.y.swapped(),
        }
    }

    /// Serialize as `x.first || x.second || y.first || y.second`.
    pub fn to_bytes(&self) -> G2Bytes {
        let mut out = [0u8; 128];
        out[..32].copy_from_slice(&self.x.first.0);
        out[32..64].copy_from_slice(&self.x.second.0);
        out[64..96].copy_from_slice(&self.y.first.0);
        out[96..].copy_from_slice(&self.y.second.0);
        out
    }
}

/// A BLS12-381 base-field element split into 55-bit limbs, least
/// significant limb first.
pub type LimbedFp = [FieldElement; LIMBS_PER_FP];

/// Federation public key as circuit signals: `[x, y]`.
pub type PublicKeyLimbs = [LimbedFp; 2];

/// BLS12-381 G2 point as circuit signals: `[[x.c0, x.c1], [y.c0, y.c1]]`.
pub type G2Limbs = [[LimbedFp; 2]; 2];

/// Beacon round number.
pub type BeaconRound = u64;

/// Randomness recorded for a round.
pub type Randomness = [u8; 32];

/// Groth16 proof in verifier order (`b` already coordinate-swapped).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Groth16Proof {
    pub a: G1Point,
    pub b: G2Point,
    pub c: G1Point,
}

/// Recorded randomness for a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundRecord {
    pub round: BeaconRound,
    pub randomness: Randomness,
}

/// BN254 scalar field modulus (r)
/// r = 21888242871839275222246405745257275088548364400416034343698204186575808495617
pub const FR_MODULUS: FieldElement = FieldElement([
    0x30, 0x64, 0x4e, 0x72, 0xe1, 0x31, 0xa0, 0x29, 0xb8, 0x50, 0x45, 0xb6, 0x81, 0x81, 0x58, 0x5d,
    0x28, 0x33, 0xe8, 0x48, 0x79, 0xb9, 0x70, 0x91, 0x43, 0xe1, 0xf5, 0x93, 0xf0, 0x00, 0x00, 0x01,
]);

/// BN254 base field modulus (q)
/// q = 21888242871839275222246405745257275088696311157297823662689037894645226208583
pub const FQ_MODULUS: FieldElement = FieldElement([
    0x30, 0x64, 0x4e, 0x72, 0xe1, 0x31, 0xa0, 0x29, 0xb8, 0x50, 0x45, 0xb6, 0x81, 0x81, 0x58, 0x5d,
    0x97, 0x81, 0x6a, 0x91, 0x68, 0x71, 0xca, 0x8d, 0x3c, 0x20, 0x8c, 0x16, 0xd8, 0x7c, 0xfd, 0x47,
]);
