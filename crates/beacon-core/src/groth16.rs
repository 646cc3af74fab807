//! Groth16 verification over BN254
//!
//! The verifier is a capability: the engine only needs
//! `verify_proof(a, b, c, inputs) -> bool`. [`Groth16Verifier`] checks a
//! snarkjs verifying key with `groth16-solana`, which evaluates
//!
//! `e(-A, B) · e(vk_x, gamma) · e(C, delta) · e(alpha, beta) == 1`
//!
//! where `vk_x = IC[0] + Σ inputs[i] · IC[i + 1]`, on the alt_bn128
//! primitives (syscalls on-chain, native code elsewhere).

use crate::args::BEACON_PUBLIC_INPUTS;
use crate::errors::Bn254Error;
use crate::ops::g1_neg;
use crate::types::{FieldElement, G1Bytes, G1Point, G2Point, Groth16Proof, FR_MODULUS};
use groth16_solana::errors::Groth16Error;
use groth16_solana::groth16::{Groth16Verifier as PairingVerifier, Groth16Verifyingkey};

/// Verifier capability consumed by the engine.
///
/// Implementations must be pure: same arguments, same answer.
pub trait ProofVerifier {
    /// Number of public inputs the verifying key commits to.
    fn num_public_inputs(&self) -> usize;

    /// `Ok(false)` for a well-formed but invalid proof; `Err` only when the
    /// arguments cannot be evaluated at all.
    fn verify_proof(
        &self,
        proof: &Groth16Proof,
        public_inputs: &[FieldElement],
    ) -> Result<bool, Bn254Error>;
}

/// Groth16 verifying key. G2 points are in verifier order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifyingKey {
    pub alpha: G1Point,
    pub beta: G2Point,
    pub gamma: G2Point,
    pub delta: G2Point,
    /// IC[0] plus one point per public input
    pub ic: Vec<G1Point>,
}

impl VerifyingKey {
    pub fn num_public_inputs(&self) -> usize {
        self.ic.len().saturating_sub(1)
    }
}

/// Groth16 verifier for a circuit with `N` public inputs.
#[derive(Clone, Debug)]
pub struct Groth16Verifier<const N: usize> {
    vk: VerifyingKey,
    ic: Vec<G1Bytes>,
}

/// Verifier for the BLS signature circuit's 70 public signals.
pub type BeaconVerifier = Groth16Verifier<BEACON_PUBLIC_INPUTS>;

impl<const N: usize> Groth16Verifier<N> {
    /// Fails with `InputCount` unless the key has exactly `N + 1` IC points.
    pub fn new(vk: VerifyingKey) -> Result<Self, Bn254Error> {
        if vk.ic.len() != N + 1 {
            return Err(Bn254Error::InputCount {
                expected: N,
                actual: vk.num_public_inputs(),
            });
        }
        let ic = vk.ic.iter().map(G1Point::to_bytes).collect();
        Ok(Self { vk, ic })
    }

    pub fn verifying_key(&self) -> &VerifyingKey {
        &self.vk
    }

    fn pairing_key(&self) -> Groth16Verifyingkey<'_> {
        Groth16Verifyingkey {
            nr_pubinputs: N,
            vk_alpha_g1: self.vk.alpha.to_bytes(),
            vk_beta_g2: self.vk.beta.to_bytes(),
            vk_gamme_g2: self.vk.gamma.to_bytes(),
            vk_delta_g2: self.vk.delta.to_bytes(),
            vk_ic: &self.ic,
        }
    }
}

impl<const N: usize> ProofVerifier for Groth16Verifier<N> {
    fn num_public_inputs(&self) -> usize {
        N
    }

    fn verify_proof(
        &self,
        proof: &Groth16Proof,
        public_inputs: &[FieldElement],
    ) -> Result<bool, Bn254Error> {
        if public_inputs.len() != N {
            return Err(Bn254Error::InputCount {
                expected: N,
                actual: public_inputs.len(),
            });
        }
        if public_inputs.iter().any(|x| !x.is_below(&FR_MODULUS)) {
            return Err(Bn254Error::InputNotInField);
        }

        let mut inputs = [[0u8; 32]; N];
        for (slot, input) in inputs.iter_mut().zip(public_inputs) {
            *slot = input.0;
        }

        // groth16-solana takes A already negated
        let neg_a = g1_neg(&proof.a.to_bytes())?;
        let b = proof.b.to_bytes();
        let c = proof.c.to_bytes();
        let vk = self.pairing_key();

        let mut verifier = PairingVerifier::<N>::new(&neg_a, &b, &c, &inputs, &vk)
            .map_err(|e| Bn254Error::SyscallError(format!("{:?}", e)))?;

        match verifier.verify() {
            Ok(()) => Ok(true),
            Err(Groth16Error::ProofVerificationFailed) => Ok(false),
            Err(e) => Err(Bn254Error::SyscallError(format!("{:?}", e))),
        }
    }
}
