//! Groth16-verified BLS randomness beacon
//!
//! Records drand-style beacon randomness once per round, after checking a
//! Groth16 proof that the federation's BLS signature over the round is valid.
//!
//! ## Pipeline
//!
//! ```text
//! snarkjs decimals ──codec──▶ FieldElement ──ArgumentBuilder──▶ (a, b, c, inputs)
//!                                                                   │
//!                              BeaconEngine ◀───────────────────────┘
//!                      window ▶ conflict ▶ verify ▶ RoundLedger ▶ event
//! ```
//!
//! The proof's `b` point is the only value whose coordinates are reordered:
//! Fp2 pairs go from prover order `(c0, c1)` to verifier order `(c1, c0)`.

pub mod args;
pub mod codec;
pub mod engine;
pub mod errors;
pub mod groth16;
pub mod ledger;
pub mod limbs;
pub mod ops;
pub mod params;
pub mod randomness;
pub mod types;

pub use args::{
    ArgumentBuilder, BeaconSignals, ProofArguments, RawProof, SignalLayout, BEACON_PUBLIC_INPUTS,
};
pub use engine::{BeaconEngine, BeaconEvent, EngineConfig};
pub use errors::{BeaconError, Bn254Error, CodecError, Result};
pub use groth16::{BeaconVerifier, Groth16Verifier, ProofVerifier, VerifyingKey};
pub use ledger::{MemoryLedger, RecordStatus, RoundLedger};
pub use params::BeaconParams;
pub use randomness::derive_randomness;
pub use types::*;
