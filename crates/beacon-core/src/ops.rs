//! BN254 point helpers on alt_bn128 big-endian encodings

use crate::errors::Bn254Error;
use crate::types::{G1Bytes, FQ_MODULUS};

/// Negates a G1 point: (x, y) -> (x, q - y). The identity maps to itself.
pub fn g1_neg(point: &G1Bytes) -> Result<G1Bytes, Bn254Error> {
    let p = FQ_MODULUS.0;
    let mut result = *point;

    let y = &point[32..64];
    if y.iter().all(|&b| b == 0) {
        return Ok(result);
    }
    if y >= &p[..] {
        return Err(Bn254Error::InvalidG1);
    }

    // q - y, big-endian
    let mut borrow = 0i16;
    for i in (0..32).rev() {
        let diff = p[i] as i16 - y[i] as i16 - borrow;
        if diff < 0 {
            result[32 + i] = (diff + 256) as u8;
            borrow = 1;
        } else {
            result[32 + i] = diff as u8;
            borrow = 0;
        }
    }

    Ok(result)
}
