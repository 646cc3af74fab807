//! Error types for beacon proof verification and recording

use crate::types::BeaconRound;
use thiserror::Error;

/// Top-level error for a beacon submission
///
/// Every variant aborts the submission before any ledger write.
#[derive(Debug, Error)]
pub enum BeaconError {
    #[error("Malformed input: {0}")]
    MalformedInput(#[from] CodecError),

    #[error("Public input arity mismatch: expected {expected}, got {actual}")]
    PublicInputArity { expected: usize, actual: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Round {round} is premature: expected round is {expected} (tolerance {tolerance})")]
    PrematureRound {
        round: BeaconRound,
        expected: BeaconRound,
        tolerance: u64,
    },

    #[error("Round {round} is older than the lookback window ({max_lookback} rounds behind {expected})")]
    StaleRound {
        round: BeaconRound,
        expected: BeaconRound,
        max_lookback: u64,
    },

    #[error("Invalid proof")]
    InvalidProof,

    #[error("Conflicting record for round {round}: stored {stored}, submitted {submitted}")]
    ConflictingRecord {
        round: BeaconRound,
        stored: String,
        submitted: String,
    },

    #[error("Verifier error: {0}")]
    Verifier(#[from] Bn254Error),

    #[error("Ledger storage error: {0}")]
    Storage(String),
}

impl BeaconError {
    /// Whether a caller may resubmit later (or with a corrected proof).
    ///
    /// Conflicts and configuration errors are never retryable and should
    /// halt the submitting infrastructure.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            BeaconError::PrematureRound { .. } | BeaconError::InvalidProof
        )
    }
}

/// Decimal / hex field element decoding errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("Empty input")]
    Empty,

    #[error("Invalid digit {digit:?} at position {position}")]
    InvalidDigit { digit: char, position: usize },

    #[error("Value does not fit in 256 bits")]
    Overflow,

    #[error("Value {value} is not below the field modulus")]
    NotInField { value: String },

    #[error("Limb {index} exceeds 55 bits")]
    LimbOutOfRange { index: usize },

    #[error("Invalid hex length: expected at most 64 digits, got {0}")]
    InvalidHexLength(usize),

    #[error("Compressed point must be {expected} bytes, got {actual}")]
    CompressedLength { expected: usize, actual: usize },
}

/// BN254 operation errors
#[derive(Debug, Error)]
pub enum Bn254Error {
    #[error("Syscall error: {0}")]
    SyscallError(String),

    #[error("Invalid G1 point")]
    InvalidG1,

    #[error("Verifying key expects {expected} public inputs, got {actual}")]
    InputCount { expected: usize, actual: usize },

    #[error("Public input not in scalar field")]
    InputNotInField,
}

pub type Result<T> = core::result::Result<T, BeaconError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_policy() {
        assert!(BeaconError::InvalidProof.is_retryable());
        assert!(BeaconError::PrematureRound {
            round: 10,
            expected: 5,
            tolerance: 0
        }
        .is_retryable());
        assert!(!BeaconError::ConflictingRecord {
            round: 1,
            stored: "aa".into(),
            submitted: "bb".into()
        }
        .is_retryable());
        assert!(!BeaconError::PublicInputArity {
            expected: 70,
            actual: 69
        }
        .is_retryable());
    }
}
