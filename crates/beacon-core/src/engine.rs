//! Beacon verification engine
//!
//! ## Submission pipeline
//!
//! 1. **Window**: reject rounds ahead of `expected_round(now)` by more than
//!    the configured tolerance; optionally reject rounds older than the
//!    lookback bound.
//! 2. **Conflict short-circuit**: a round already holding a different
//!    randomness fails before the pairing check.
//! 3. **Public inputs**: `public_key || signature || message_hash` in
//!    circuit layout.
//! 4. **Verify**: the only expensive step. `false` leaves state untouched.
//! 5. **Record**: write-once insert into the ledger.
//! 6. **Emit**: fresh records are appended to the event log.
//!
//! [`BeaconEngine::verify_beacon_proof`] runs steps 1, 3 and 4 only and
//! reports the verifier's answer.
//!
//! Every round moves from "unrecorded" to "recorded" at most once; the
//! engine keeps no other state between calls.

use crate::args::{ArgumentBuilder, SignalLayout};
use crate::errors::{BeaconError, Result};
use crate::groth16::ProofVerifier;
use crate::ledger::{check_conflict, RecordStatus, RoundLedger};
use crate::params::BeaconParams;
use crate::randomness::derive_randomness;
use crate::types::{BeaconRound, G2Limbs, Groth16Proof, Randomness, RoundRecord};
use std::time::Instant;

/// Round acceptance policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct EngineConfig {
    /// How many rounds past `expected_round(now)` are still accepted.
    pub max_future_rounds: u64,
    /// Oldest accepted round, as a distance behind `expected_round(now)`.
    /// `None` accepts any past round.
    pub max_lookback: Option<u64>,
}

/// Observable output of the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BeaconEvent {
    RandomnessRecorded(RoundRecord),
}

pub struct BeaconEngine<V, L> {
    verifier: V,
    params: BeaconParams,
    config: EngineConfig,
    ledger: L,
    builder: ArgumentBuilder,
    events: Vec<BeaconEvent>,
}

impl<V, L> BeaconEngine<V, L>
where
    V: ProofVerifier,
    L: RoundLedger,
{
    /// Fails with `PublicInputArity` if the verifier's key does not match
    /// the circuit signal layout.
    pub fn new(verifier: V, params: BeaconParams, config: EngineConfig, ledger: L) -> Result<Self> {
        let layout = SignalLayout::BLS_55X7;
        layout.validate_against(verifier.num_public_inputs())?;

        Ok(Self {
            verifier,
            params,
            config,
            ledger,
            builder: ArgumentBuilder::new(layout),
            events: Vec::new(),
        })
    }

    /// Check a beacon proof without recording anything.
    ///
    /// Applies the round window, then verifies `proof` against the public
    /// key, `signature` and `message_hash`. Returns `Ok(false)` for a proof
    /// the verifier rejects. Ledger and event log are never touched.
    pub fn verify_beacon_proof(
        &self,
        round: BeaconRound,
        signature: &G2Limbs,
        message_hash: &G2Limbs,
        proof: &Groth16Proof,
        now: u64,
    ) -> Result<bool> {
        self.check_window(round, now)?;
        self.verify_signals(round, signature, message_hash, proof)
    }

    /// Verify a beacon proof and record its randomness.
    ///
    /// `proof` must already be in verifier order (see
    /// [`ArgumentBuilder::build`]). Resubmitting an already recorded round
    /// with the same signature succeeds without changing the ledger.
    pub fn record_beacon_proof(
        &mut self,
        round: BeaconRound,
        signature: &G2Limbs,
        message_hash: &G2Limbs,
        proof: &Groth16Proof,
        now: u64,
    ) -> Result<RoundRecord> {
        self.check_window(round, now)?;

        let randomness = derive_randomness(signature);
        if let Some(stored) = self.ledger.get(round) {
            check_conflict(round, &stored, &randomness)?;
        }

        if !self.verify_signals(round, signature, message_hash, proof)? {
            log::warn!("round {}: proof rejected", round);
            return Err(BeaconError::InvalidProof);
        }

        let record = RoundRecord { round, randomness };
        match self.ledger.record_if_absent(round, randomness)? {
            RecordStatus::Recorded => {
                log::info!(
                    "round {}: recorded randomness {}",
                    round,
                    hex::encode(randomness)
                );
                self.events.push(BeaconEvent::RandomnessRecorded(record));
            }
            RecordStatus::AlreadyRecorded => {
                log::debug!("round {}: already recorded", round);
            }
        }

        Ok(record)
    }

    fn verify_signals(
        &self,
        round: BeaconRound,
        signature: &G2Limbs,
        message_hash: &G2Limbs,
        proof: &Groth16Proof,
    ) -> Result<bool> {
        let public_inputs =
            self.builder
                .assemble(self.params.public_key(), signature, message_hash)?;

        let started = Instant::now();
        let valid = self.verifier.verify_proof(proof, &public_inputs)?;
        log::debug!(
            "round {}: proof verification took {:?}",
            round,
            started.elapsed()
        );
        Ok(valid)
    }

    fn check_window(&self, round: BeaconRound, now: u64) -> Result<()> {
        let expected = self.params.expected_round(now);

        if round > expected.saturating_add(self.config.max_future_rounds) {
            return Err(BeaconError::PrematureRound {
                round,
                expected,
                tolerance: self.config.max_future_rounds,
            });
        }
        if let Some(max_lookback) = self.config.max_lookback {
            if expected.saturating_sub(round) > max_lookback {
                return Err(BeaconError::StaleRound {
                    round,
                    expected,
                    max_lookback,
                });
            }
        }
        Ok(())
    }

    pub fn latest_round(&self) -> Option<BeaconRound> {
        self.ledger.latest_round()
    }

    pub fn randomness_for(&self, round: BeaconRound) -> Option<Randomness> {
        self.ledger.get(round)
    }

    pub fn verifier(&self) -> &V {
        &self.verifier
    }

    pub fn params(&self) -> &BeaconParams {
        &self.params
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Take all events emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<BeaconEvent> {
        std::mem::take(&mut self.events)
    }
}
