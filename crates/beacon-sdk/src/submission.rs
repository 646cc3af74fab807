//! Prover output to engine submission

use crate::error::Result;
use crate::snarkjs::{read_proof, read_public_signals};
use beacon_core::{
    ArgumentBuilder, BeaconEngine, BeaconParams, BeaconRound, BeaconSignals, FieldElement,
    ProofArguments, ProofVerifier, RawProof, RoundLedger, RoundRecord,
};
use std::path::Path;

/// A proof with its public signals, normalized for the verifier
#[derive(Debug, Clone)]
pub struct Submission {
    pub arguments: ProofArguments,
    pub signals: BeaconSignals,
}

impl Submission {
    pub fn new(raw: &RawProof, public_signals: &[FieldElement]) -> Result<Self> {
        let (arguments, signals) = ArgumentBuilder::default().prepare(raw, public_signals)?;
        Ok(Self { arguments, signals })
    }

    /// Load `proof.json` and `public.json`
    pub fn from_files(proof: impl AsRef<Path>, public: impl AsRef<Path>) -> Result<Self> {
        let raw = read_proof(proof)?;
        let signals = read_public_signals(public)?;
        Self::new(&raw, &signals)
    }

    /// Whether the proof was generated for this beacon's public key
    pub fn matches_key(&self, params: &BeaconParams) -> bool {
        &self.signals.public_key == params.public_key()
    }

    /// Check against an engine for `round` without recording
    pub fn verify<V, L>(
        &self,
        engine: &BeaconEngine<V, L>,
        round: BeaconRound,
        now: u64,
    ) -> beacon_core::Result<bool>
    where
        V: ProofVerifier,
        L: RoundLedger,
    {
        engine.verify_beacon_proof(
            round,
            &self.signals.signature,
            &self.signals.message_hash,
            &self.arguments.proof,
            now,
        )
    }

    /// Submit to an engine for `round`
    pub fn record<V, L>(
        &self,
        engine: &mut BeaconEngine<V, L>,
        round: BeaconRound,
        now: u64,
    ) -> beacon_core::Result<RoundRecord>
    where
        V: ProofVerifier,
        L: RoundLedger,
    {
        if !self.matches_key(engine.params()) {
            log::warn!("round {}: proof public key differs from beacon key", round);
        }
        engine.record_beacon_proof(
            round,
            &self.signals.signature,
            &self.signals.message_hash,
            &self.arguments.proof,
            now,
        )
    }
}
