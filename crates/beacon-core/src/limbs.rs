//! 55x7 limb decomposition of BLS12-381 base-field elements
//!
//! The pairing circuit takes every Fp coordinate as seven 55-bit limbs,
//! least significant first: `v = sum(limb[i] << (55 * i))`. 7 * 55 = 385
//! bits covers the 381-bit modulus.

use crate::errors::CodecError;
use crate::types::{FieldElement, LimbedFp, LIMBS_PER_FP, LIMB_BITS};

/// Byte width of a BLS12-381 base-field element.
pub const FP_BYTES: usize = 48;

const LIMB_MASK: u64 = (1u64 << LIMB_BITS) - 1;

/// Check that every limb fits in 55 bits.
pub fn check_limbs(limbs: &LimbedFp) -> Result<(), CodecError> {
    for (index, limb) in limbs.iter().enumerate() {
        if limb.bits() > LIMB_BITS {
            return Err(CodecError::LimbOutOfRange { index });
        }
    }
    Ok(())
}

/// Split a big-endian integer of at most 48 bytes into limbs.
pub fn split_be_bytes(bytes: &[u8]) -> Result<LimbedFp, CodecError> {
    if bytes.len() > FP_BYTES {
        return Err(CodecError::Overflow);
    }

    let mut words = [0u64; LIMBS_PER_FP];
    for bit in 0..(bytes.len() * 8) {
        let byte = bytes[bytes.len() - 1 - bit / 8];
        if (byte >> (bit % 8)) & 1 == 1 {
            words[bit / LIMB_BITS as usize] |= 1u64 << (bit % LIMB_BITS as usize);
        }
    }

    Ok(words.map(FieldElement::from_u64))
}

/// Recombine limbs into a 48-byte big-endian integer.
pub fn join_be_bytes(limbs: &LimbedFp) -> Result<[u8; FP_BYTES], CodecError> {
    check_limbs(limbs)?;

    let mut out = [0u8; FP_BYTES];
    for (index, limb) in limbs.iter().enumerate() {
        let word = u64::from_be_bytes(limb.0[24..].try_into().map_err(|_| CodecError::Overflow)?)
            & LIMB_MASK;
        for offset in 0..LIMB_BITS as usize {
            if (word >> offset) & 1 == 0 {
                continue;
            }
            let bit = index * LIMB_BITS as usize + offset;
            if bit >= FP_BYTES * 8 {
                return Err(CodecError::Overflow);
            }
            out[FP_BYTES - 1 - bit / 8] |= 1 << (bit % 8);
        }
    }
    Ok(out)
}

/// Limbs of the x coordinate of a ZCash-style compressed G1 point.
///
/// The top three bits of the first byte carry the compression, infinity
/// and sign flags.
pub fn compressed_g1_x(bytes: &[u8]) -> Result<LimbedFp, CodecError> {
    let mut x: [u8; FP_BYTES] = bytes.try_into().map_err(|_| CodecError::CompressedLength {
        expected: FP_BYTES,
        actual: bytes.len(),
    })?;
    x[0] &= 0x1f;
    split_be_bytes(&x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_small_value() {
        let limbs = split_be_bytes(&[0x01, 0x00]).unwrap();
        assert_eq!(limbs[0], FieldElement::from_u64(256));
        assert!(limbs[1..].iter().all(|l| l.is_zero()));
    }

    #[test]
    fn test_split_crosses_limb_boundary() {
        // 2^55 lands in limb 1
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&(1u64 << 55).to_be_bytes());
        let limbs = split_be_bytes(&bytes).unwrap();
        assert_eq!(limbs[0], FieldElement::ZERO);
        assert_eq!(limbs[1], FieldElement::from_u64(1));
    }

    #[test]
    fn test_join_inverts_split() {
        let mut bytes = [0u8; FP_BYTES];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = (i as u8).wrapping_mul(37).wrapping_add(11);
        }
        bytes[0] &= 0x1f; // keep below 2^381
        let limbs = split_be_bytes(&bytes).unwrap();
        check_limbs(&limbs).unwrap();
        assert_eq!(join_be_bytes(&limbs).unwrap(), bytes);
    }

    #[test]
    fn test_rejects_wide_limb() {
        let mut limbs = [FieldElement::ZERO; LIMBS_PER_FP];
        limbs[3] = FieldElement::from_u64(1 << 55);
        assert_eq!(
            check_limbs(&limbs),
            Err(CodecError::LimbOutOfRange { index: 3 })
        );
    }

    #[test]
    fn test_rejects_oversized_input() {
        assert_eq!(split_be_bytes(&[1u8; 49]), Err(CodecError::Overflow));
    }

    #[test]
    fn test_compressed_g1_x_drops_flags() {
        let mut bytes = [0u8; FP_BYTES];
        bytes[0] = 0xa0;
        bytes[FP_BYTES - 1] = 0x05;
        let limbs = compressed_g1_x(&bytes).unwrap();
        assert_eq!(limbs[0], FieldElement::from_u64(5));
        assert!(limbs[1..].iter().all(|l| l.is_zero()));
        assert_eq!(
            compressed_g1_x(&bytes[1..]),
            Err(CodecError::CompressedLength {
                expected: FP_BYTES,
                actual: FP_BYTES - 1
            })
        );
    }

    #[test]
    fn test_top_limb_above_384_bits() {
        // limb 6 covers bits 330..385; bit 384 does not fit in 48 bytes
        let mut limbs = [FieldElement::ZERO; LIMBS_PER_FP];
        limbs[6] = FieldElement::from_u64(1 << 54);
        assert_eq!(join_be_bytes(&limbs), Err(CodecError::Overflow));
    }
}
