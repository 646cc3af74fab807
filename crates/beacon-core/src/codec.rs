//! Field element codec
//!
//! Converts the decimal strings produced by snarkjs (`proof.json`,
//! `public.json`, `verification_key.json`) into fixed-width big-endian field
//! elements, and renders them as the `0x`-prefixed 64-digit hex words the
//! verifier calldata ABI expects.
//!
//! Arithmetic is done on 4 x 64-bit little-endian limbs. Nothing here wraps:
//! a value that does not fit is rejected.

use crate::errors::CodecError;
use crate::types::{FieldElement, FIELD_BYTES};

/// Convert a 32-byte big-endian element to 4 x u64 limbs (little-endian limbs)
#[inline]
fn to_limbs(fe: &FieldElement) -> [u64; 4] {
    let b = &fe.0;
    let mut limbs = [0u64; 4];
    for (i, limb) in limbs.iter_mut().enumerate() {
        let start = FIELD_BYTES - 8 * (i + 1);
        let mut word = [0u8; 8];
        word.copy_from_slice(&b[start..start + 8]);
        *limb = u64::from_be_bytes(word);
    }
    limbs
}

/// Convert 4 x u64 limbs (little-endian) to a 32-byte big-endian element
#[inline]
fn from_limbs(limbs: &[u64; 4]) -> FieldElement {
    let mut out = [0u8; FIELD_BYTES];
    for (i, limb) in limbs.iter().enumerate() {
        let start = FIELD_BYTES - 8 * (i + 1);
        out[start..start + 8].copy_from_slice(&limb.to_be_bytes());
    }
    FieldElement(out)
}

/// Parse a non-negative base-10 integer into a 256-bit field element.
pub fn parse_decimal(input: &str) -> Result<FieldElement, CodecError> {
    if input.is_empty() {
        return Err(CodecError::Empty);
    }

    let mut limbs = [0u64; 4];
    for (position, c) in input.chars().enumerate() {
        let digit = c
            .to_digit(10)
            .ok_or(CodecError::InvalidDigit { digit: c, position })?;

        // limbs = limbs * 10 + digit
        let mut carry = digit as u128;
        for limb in limbs.iter_mut() {
            let wide = (*limb as u128) * 10 + carry;
            *limb = wide as u64;
            carry = wide >> 64;
        }
        if carry != 0 {
            return Err(CodecError::Overflow);
        }
    }

    Ok(from_limbs(&limbs))
}

/// Parse a decimal string and require it to be below `modulus`.
pub fn parse_decimal_in_field(
    input: &str,
    modulus: &FieldElement,
) -> Result<FieldElement, CodecError> {
    let value = parse_decimal(input)?;
    if !value.is_below(modulus) {
        return Err(CodecError::NotInField {
            value: input.to_string(),
        });
    }
    Ok(value)
}

/// Decimal string to the canonical `0x` + 64 hex digit form.
pub fn to_canonical_hex(decimal: &str) -> Result<String, CodecError> {
    parse_decimal(decimal).map(|fe| to_hex(&fe))
}

/// Render as `0x` followed by 64 lowercase hex digits.
pub fn to_hex(fe: &FieldElement) -> String {
    format!("0x{}", hex::encode(fe.0))
}

/// Parse a hex string (optionally `0x`-prefixed, up to 64 digits).
pub fn from_hex(input: &str) -> Result<FieldElement, CodecError> {
    let digits = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input);
    if digits.is_empty() {
        return Err(CodecError::Empty);
    }
    if digits.len() > 2 * FIELD_BYTES {
        return Err(CodecError::InvalidHexLength(digits.len()));
    }
    if let Some((position, digit)) = digits.chars().enumerate().find(|(_, c)| !c.is_ascii_hexdigit())
    {
        return Err(CodecError::InvalidDigit { digit, position });
    }

    let padded = format!("{:0>64}", digits);
    let mut out = [0u8; FIELD_BYTES];
    hex::decode_to_slice(padded, &mut out).map_err(|_| CodecError::InvalidHexLength(digits.len()))?;
    Ok(FieldElement(out))
}

/// Render as a base-10 string without leading zeros.
pub fn to_decimal(fe: &FieldElement) -> String {
    let mut limbs = to_limbs(fe);
    if limbs == [0u64; 4] {
        return "0".to_string();
    }

    let mut digits = Vec::with_capacity(78);
    while limbs != [0u64; 4] {
        // limbs, rem = divmod(limbs, 10)
        let mut rem = 0u128;
        for limb in limbs.iter_mut().rev() {
            let cur = (rem << 64) | (*limb as u128);
            *limb = (cur / 10) as u64;
            rem = cur % 10;
        }
        digits.push(b'0' + rem as u8);
    }
    digits.reverse();
    // Only ASCII digits were pushed
    digits.into_iter().map(char::from).collect()
}
