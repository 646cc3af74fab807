//! Rust SDK for recording Groth16-verified beacon randomness
//!
//! Loads snarkjs artifacts, keeps the round ledger in a JSON file and wires
//! both into a [`beacon_core::BeaconEngine`].
//!
//! # Example
//!
//! ```ignore
//! use beacon_sdk::{load_verifier, preset, FileLedger, Submission};
//! use beacon_core::{BeaconEngine, EngineConfig};
//!
//! let params = preset("drand-testnet")?.params()?;
//! let verifier = load_verifier("verification_key.json")?;
//! let ledger = FileLedger::open("ledger.json")?;
//! let mut engine = BeaconEngine::new(verifier, params, EngineConfig::default(), ledger)?;
//!
//! let submission = Submission::from_files("proof.json", "public.json")?;
//! let record = submission.record(&mut engine, 8762363, now)?;
//! println!("round {} -> {}", record.round, hex::encode(record.randomness));
//! ```

mod error;
mod file_ledger;
pub mod snarkjs;
mod submission;
mod types;

pub use error::{Result, SdkError};
pub use file_ledger::FileLedger;
pub use snarkjs::{load_verifier, read_proof, read_public_signals, read_verifying_key};
pub use submission::Submission;
pub use types::*;
