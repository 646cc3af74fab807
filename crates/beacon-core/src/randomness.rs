//! Randomness derivation
//!
//! `randomness = keccak256(limb_0 || limb_1 || ... || limb_27)` over the
//! signature's limbs as 32-byte big-endian words, in circuit order. This is
//! the `abi.encode` layout of a `uint256[7][2][2]`.

use crate::types::{G2Limbs, Randomness};
use sha3::{Digest, Keccak256};

/// Canonical byte encoding of a limbed signature.
pub fn encode_signature(signature: &G2Limbs) -> Vec<u8> {
    signature
        .iter()
        .flatten()
        .flatten()
        .flat_map(|limb| limb.0)
        .collect()
}

/// Derive the round randomness from a verified signature.
pub fn derive_randomness(signature: &G2Limbs) -> Randomness {
    let mut hasher = Keccak256::new();
    hasher.update(encode_signature(signature));
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FieldElement, LIMBS_PER_FP};

    fn signature(seed: u64) -> G2Limbs {
        let mut sig = [[[FieldElement::ZERO; LIMBS_PER_FP]; 2]; 2];
        let mut n = seed;
        for limb in sig.iter_mut().flatten().flatten() {
            *limb = FieldElement::from_u64(n);
            n += 1;
        }
        sig
    }

    #[test]
    fn test_encoding_layout() {
        let encoded = encode_signature(&signature(100));
        assert_eq!(encoded.len(), 28 * 32);
        assert_eq!(encoded[31], 100);
        assert_eq!(encoded[27 * 32 + 31], 127);
    }

    #[test]
    fn test_matches_direct_keccak() {
        let sig = signature(1);
        let expected = Keccak256::digest(encode_signature(&sig));
        assert_eq!(derive_randomness(&sig).as_slice(), expected.as_slice());
    }

    #[test]
    fn test_distinct_signatures_distinct_randomness() {
        assert_ne!(derive_randomness(&signature(1)), derive_randomness(&signature(2)));
    }
}
