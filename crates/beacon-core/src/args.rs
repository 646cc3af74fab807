//! Verifier argument construction
//!
//! ## Public signal layout (BLS signature circuit, 55x7 limbs)
//!
//! | signals    | value                                   |
//! |------------|-----------------------------------------|
//! | `[0..14)`  | federation public key `[x, y]`          |
//! | `[14..42)` | signature `[[x.c0, x.c1], [y.c0, y.c1]]`|
//! | `[42..70)` | message hash point, same shape          |
//!
//! Each group of 7 consecutive signals is one limbed Fp element.
//!
//! The public-input vector is passed to the verifier exactly as the circuit
//! emitted it. The only reordering is inside the proof's `b` point, whose Fp2
//! coordinates are swapped from prover order `(c0, c1)` to verifier order
//! `(c1, c0)`.

use crate::codec::to_hex;
use crate::errors::{BeaconError, CodecError, Result};
use crate::limbs::check_limbs;
use crate::types::{
    FieldElement, G1Point, G2Limbs, G2Point, Groth16Proof, LimbedFp, PublicKeyLimbs, FQ_MODULUS,
    LIMBS_PER_FP,
};

/// Number of signals in a limbed public key.
pub const PUBLIC_KEY_SIGNALS: usize = 2 * LIMBS_PER_FP;

/// Number of signals in a limbed G2 point.
pub const G2_SIGNALS: usize = 4 * LIMBS_PER_FP;

/// Public signals of the BLS signature circuit: key, signature, message hash.
pub const BEACON_PUBLIC_INPUTS: usize = PUBLIC_KEY_SIGNALS + 2 * G2_SIGNALS;

/// Offsets of the named sub-vectors within the public signal list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SignalLayout {
    pub public_key_offset: usize,
    pub signature_offset: usize,
    pub message_hash_offset: usize,
    pub num_public_inputs: usize,
}

impl SignalLayout {
    /// Layout of the BLS12-381 signature verification circuit.
    pub const BLS_55X7: SignalLayout = SignalLayout {
        public_key_offset: 0,
        signature_offset: PUBLIC_KEY_SIGNALS,
        message_hash_offset: PUBLIC_KEY_SIGNALS + G2_SIGNALS,
        num_public_inputs: BEACON_PUBLIC_INPUTS,
    };

    /// Fail unless the verifying key expects exactly this many inputs.
    pub fn validate_against(&self, verifier_inputs: usize) -> Result<()> {
        if verifier_inputs != self.num_public_inputs {
            return Err(BeaconError::PublicInputArity {
                expected: self.num_public_inputs,
                actual: verifier_inputs,
            });
        }
        Ok(())
    }
}

impl Default for SignalLayout {
    fn default() -> Self {
        Self::BLS_55X7
    }
}

/// Groth16 proof in prover (snarkjs) coordinate order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct RawProof {
    pub a: G1Point,
    pub b: G2Point,
    pub c: G1Point,
}

impl RawProof {
    /// Swap `b` into verifier order; `a` and `c` pass through.
    pub fn to_verifier_order(&self) -> Groth16Proof {
        Groth16Proof {
            a: self.a,
            b: self.b.swap_coordinates(),
            c: self.c,
        }
    }
}

/// Named views over the public signal list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BeaconSignals {
    pub public_key: PublicKeyLimbs,
    pub signature: G2Limbs,
    pub message_hash: G2Limbs,
}

/// Everything the verifier capability consumes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProofArguments {
    pub proof: Groth16Proof,
    pub public_inputs: Vec<FieldElement>,
}

impl ProofArguments {
    /// Hex words in calldata order: `(a, b, c, inputs)`.
    pub fn to_hex_words(&self) -> ([String; 2], [[String; 2]; 2], [String; 2], Vec<String>) {
        let Groth16Proof { a, b, c } = &self.proof;
        (
            [to_hex(&a.x), to_hex(&a.y)],
            [
                [to_hex(&b.x.first), to_hex(&b.x.second)],
                [to_hex(&b.y.first), to_hex(&b.y.second)],
            ],
            [to_hex(&c.x), to_hex(&c.y)],
            self.public_inputs.iter().map(to_hex).collect(),
        )
    }
}

/// Builds verifier-ready arguments from raw proof material.
#[derive(Clone, Copy, Debug, Default)]
pub struct ArgumentBuilder {
    layout: SignalLayout,
}

impl ArgumentBuilder {
    pub fn new(layout: SignalLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &SignalLayout {
        &self.layout
    }

    /// Normalize a prover-order proof and its public signals.
    pub fn build(&self, raw: &RawProof, public_signals: &[FieldElement]) -> Result<ProofArguments> {
        self.prepare(raw, public_signals).map(|(arguments, _)| arguments)
    }

    /// [`build`](Self::build), also returning the named signal parts.
    pub fn prepare(
        &self,
        raw: &RawProof,
        public_signals: &[FieldElement],
    ) -> Result<(ProofArguments, BeaconSignals)> {
        // Validates arity and limb ranges
        let signals = self.split(public_signals)?;

        for coordinate in [
            &raw.a.x,
            &raw.a.y,
            &raw.b.x.first,
            &raw.b.x.second,
            &raw.b.y.first,
            &raw.b.y.second,
            &raw.c.x,
            &raw.c.y,
        ] {
            if !coordinate.is_below(&FQ_MODULUS) {
                return Err(CodecError::NotInField {
                    value: to_hex(coordinate),
                }
                .into());
            }
        }

        let arguments = ProofArguments {
            proof: raw.to_verifier_order(),
            public_inputs: public_signals.to_vec(),
        };
        Ok((arguments, signals))
    }

    /// Split the flat signal list into its named parts.
    pub fn split(&self, public_signals: &[FieldElement]) -> Result<BeaconSignals> {
        self.layout.validate_against(public_signals.len())?;

        let public_key = [
            read_fp(public_signals, self.layout.public_key_offset)?,
            read_fp(public_signals, self.layout.public_key_offset + LIMBS_PER_FP)?,
        ];

        Ok(BeaconSignals {
            public_key,
            signature: read_g2(public_signals, self.layout.signature_offset)?,
            message_hash: read_g2(public_signals, self.layout.message_hash_offset)?,
        })
    }

    /// Rebuild the flat public-input vector from named parts.
    pub fn assemble(
        &self,
        public_key: &PublicKeyLimbs,
        signature: &G2Limbs,
        message_hash: &G2Limbs,
    ) -> Result<Vec<FieldElement>> {
        let mut inputs = vec![FieldElement::ZERO; self.layout.num_public_inputs];

        write_fp(&mut inputs, self.layout.public_key_offset, &public_key[0])?;
        write_fp(
            &mut inputs,
            self.layout.public_key_offset + LIMBS_PER_FP,
            &public_key[1],
        )?;
        write_g2(&mut inputs, self.layout.signature_offset, signature)?;
        write_g2(&mut inputs, self.layout.message_hash_offset, message_hash)?;

        Ok(inputs)
    }
}

fn window(len: usize, offset: usize, width: usize) -> Result<core::ops::Range<usize>> {
    let end = offset + width;
    if end > len {
        return Err(BeaconError::PublicInputArity {
            expected: end,
            actual: len,
        });
    }
    Ok(offset..end)
}

fn read_fp(signals: &[FieldElement], offset: usize) -> Result<LimbedFp> {
    let range = window(signals.len(), offset, LIMBS_PER_FP)?;
    let mut limbs = [FieldElement::ZERO; LIMBS_PER_FP];
    limbs.copy_from_slice(&signals[range]);
    check_limbs(&limbs)?;
    Ok(limbs)
}

fn read_g2(signals: &[FieldElement], offset: usize) -> Result<G2Limbs> {
    let at = |i: usize| read_fp(signals, offset + i * LIMBS_PER_FP);
    Ok([[at(0)?, at(1)?], [at(2)?, at(3)?]])
}

fn write_fp(inputs: &mut [FieldElement], offset: usize, limbs: &LimbedFp) -> Result<()> {
    check_limbs(limbs)?;
    let range = window(inputs.len(), offset, LIMBS_PER_FP)?;
    inputs[range].copy_from_slice(limbs);
    Ok(())
}

fn write_g2(inputs: &mut [FieldElement], offset: usize, point: &G2Limbs) -> Result<()> {
    for (i, fp) in point.iter().flatten().enumerate() {
        write_fp(inputs, offset + i * LIMBS_PER_FP, fp)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Fp2;

    fn signals() -> Vec<FieldElement> {
        (0..70u64).map(|i| FieldElement::from_u64(i * 1000 + 7)).collect()
    }

    fn fe(v: u64) -> FieldElement {
        FieldElement::from_u64(v)
    }

    fn raw_proof() -> RawProof {
        RawProof {
            a: G1Point::new(fe(1), fe(2)),
            b: G2Point::new(Fp2::new(fe(3), fe(4)), Fp2::new(fe(5), fe(6))),
            c: G1Point::new(fe(7), fe(8)),
        }
    }

    #[test]
    fn test_layout_constants() {
        let layout = SignalLayout::BLS_55X7;
        assert_eq!(layout.public_key_offset, 0);
        assert_eq!(layout.signature_offset, 14);
        assert_eq!(layout.message_hash_offset, 42);
        assert_eq!(layout.num_public_inputs, 70);
    }

    #[test]
    fn test_build_swaps_only_b() {
        let builder = ArgumentBuilder::default();
        let args = builder.build(&raw_proof(), &signals()).unwrap();

        assert_eq!(args.proof.a, G1Point::new(fe(1), fe(2)));
        assert_eq!(args.proof.c, G1Point::new(fe(7), fe(8)));
        assert_eq!(args.proof.b.x, Fp2::new(fe(4), fe(3)));
        assert_eq!(args.proof.b.y, Fp2::new(fe(6), fe(5)));
        assert_eq!(args.public_inputs, signals());
    }

    #[test]
    fn test_build_rejects_wrong_arity() {
        let builder = ArgumentBuilder::default();
        let mut short = signals();
        short.pop();
        assert!(matches!(
            builder.build(&raw_proof(), &short),
            Err(BeaconError::PublicInputArity {
                expected: 70,
                actual: 69
            })
        ));
    }

    #[test]
    fn test_build_rejects_coordinate_outside_base_field() {
        let mut raw = raw_proof();
        raw.b.y.second = FQ_MODULUS;
        assert!(matches!(
            ArgumentBuilder::default().build(&raw, &signals()),
            Err(BeaconError::MalformedInput(CodecError::NotInField { .. }))
        ));
    }

    #[test]
    fn test_prepare_returns_split_parts() {
        let builder = ArgumentBuilder::default();
        let (args, parts) = builder.prepare(&raw_proof(), &signals()).unwrap();
        assert_eq!(args, builder.build(&raw_proof(), &signals()).unwrap());
        assert_eq!(parts, builder.split(&signals()).unwrap());
    }

    #[test]
    fn test_split_matches_offsets() {
        let builder = ArgumentBuilder::default();
        let parts = builder.split(&signals()).unwrap();
        assert_eq!(parts.public_key[0][0], fe(7));
        assert_eq!(parts.public_key[1][0], fe(7 * 1000 + 7));
        assert_eq!(parts.signature[0][0][0], fe(14 * 1000 + 7));
        assert_eq!(parts.signature[1][1][6], fe(41 * 1000 + 7));
        assert_eq!(parts.message_hash[0][0][0], fe(42 * 1000 + 7));
        assert_eq!(parts.message_hash[1][1][6], fe(69 * 1000 + 7));
    }

    #[test]
    fn test_assemble_inverts_split() {
        let builder = ArgumentBuilder::default();
        let parts = builder.split(&signals()).unwrap();
        let rebuilt = builder
            .assemble(&parts.public_key, &parts.signature, &parts.message_hash)
            .unwrap();
        assert_eq!(rebuilt, signals());
    }

    #[test]
    fn test_split_rejects_wide_limb() {
        let mut s = signals();
        s[20] = fe(1 << 56);
        assert!(matches!(
            ArgumentBuilder::default().split(&s),
            Err(BeaconError::MalformedInput(CodecError::LimbOutOfRange { .. }))
        ));
    }

    #[test]
    fn test_hex_words() {
        let args = ArgumentBuilder::default()
            .build(&raw_proof(), &signals())
            .unwrap();
        let (a, b, c, inputs) = args.to_hex_words();
        assert!(a[0].ends_with('1'));
        assert!(b[0][0].ends_with('4'));
        assert!(c[1].ends_with('8'));
        assert_eq!(inputs.len(), 70);
        assert!(inputs.iter().all(|w| w.len() == 66));
    }
}
