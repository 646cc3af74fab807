//! Error types for the beacon SDK

use beacon_core::{BeaconError, Bn254Error, CodecError};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading artifacts or recording rounds
#[derive(Error, Debug)]
pub enum SdkError {
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Malformed snarkjs artifact: {0}")]
    Artifact(String),

    #[error("Invalid field element: {0}")]
    Codec(#[from] CodecError),

    #[error("Invalid verifying key: {0}")]
    VerifyingKey(#[from] Bn254Error),

    #[error("Unknown beacon preset: {0}")]
    UnknownPreset(String),

    #[error(transparent)]
    Beacon(#[from] BeaconError),
}

impl SdkError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, SdkError>;
