//! snarkjs artifact loading
//!
//! Reads `proof.json`, `public.json` and `verification_key.json` as emitted
//! by `snarkjs groth16 prove` / `zkey export verificationkey`. Points are
//! projective triples with `z = 1`; G2 coordinates come in prover order
//! `(c0, c1)`.
//!
//! The proof keeps prover order ([`RawProof`]); the verifying key is swapped
//! into verifier order on load, since it is only ever consumed by the
//! pairing check.

use crate::error::{Result, SdkError};
use beacon_core::codec::parse_decimal_in_field;
use beacon_core::{
    BeaconVerifier, FieldElement, Fp2, G1Point, G2Point, RawProof, VerifyingKey, FQ_MODULUS,
    FR_MODULUS,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// `proof.json`
#[derive(Debug, Clone, Deserialize)]
pub struct ProofJson {
    pub pi_a: Vec<String>,
    pub pi_b: Vec<Vec<String>>,
    pub pi_c: Vec<String>,
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub curve: Option<String>,
}

/// `verification_key.json`
#[derive(Debug, Clone, Deserialize)]
pub struct VerificationKeyJson {
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub curve: Option<String>,
    #[serde(rename = "nPublic")]
    pub n_public: usize,
    pub vk_alpha_1: Vec<String>,
    pub vk_beta_2: Vec<Vec<String>>,
    pub vk_gamma_2: Vec<Vec<String>>,
    pub vk_delta_2: Vec<Vec<String>>,
    #[serde(rename = "IC")]
    pub ic: Vec<Vec<String>>,
}

impl ProofJson {
    /// Decode into a prover-order proof.
    pub fn to_raw(&self) -> Result<RawProof> {
        check_header(self.protocol.as_deref(), self.curve.as_deref())?;
        Ok(RawProof {
            a: g1(&self.pi_a, "pi_a")?,
            b: g2(&self.pi_b, "pi_b")?,
            c: g1(&self.pi_c, "pi_c")?,
        })
    }
}

impl VerificationKeyJson {
    /// Decode into a verifying key with G2 points in verifier order.
    pub fn to_verifying_key(&self) -> Result<VerifyingKey> {
        check_header(self.protocol.as_deref(), self.curve.as_deref())?;
        if self.ic.len() != self.n_public + 1 {
            return Err(SdkError::Artifact(format!(
                "IC has {} points, expected nPublic + 1 = {}",
                self.ic.len(),
                self.n_public + 1
            )));
        }

        let ic = self
            .ic
            .iter()
            .enumerate()
            .map(|(i, point)| g1(point, &format!("IC[{}]", i)))
            .collect::<Result<Vec<_>>>()?;

        Ok(VerifyingKey {
            alpha: g1(&self.vk_alpha_1, "vk_alpha_1")?,
            beta: g2(&self.vk_beta_2, "vk_beta_2")?.swap_coordinates(),
            gamma: g2(&self.vk_gamma_2, "vk_gamma_2")?.swap_coordinates(),
            delta: g2(&self.vk_delta_2, "vk_delta_2")?.swap_coordinates(),
            ic,
        })
    }
}

/// Decode `public.json` entries; each must be below the scalar field modulus.
pub fn parse_public_signals<S: AsRef<str>>(signals: &[S]) -> Result<Vec<FieldElement>> {
    signals
        .iter()
        .map(|s| parse_decimal_in_field(s.as_ref(), &FR_MODULUS).map_err(SdkError::from))
        .collect()
}

pub fn read_proof(path: impl AsRef<Path>) -> Result<RawProof> {
    read_json::<ProofJson>(path.as_ref())?.to_raw()
}

pub fn read_public_signals(path: impl AsRef<Path>) -> Result<Vec<FieldElement>> {
    let signals: Vec<String> = read_json(path.as_ref())?;
    parse_public_signals(&signals)
}

pub fn read_verifying_key(path: impl AsRef<Path>) -> Result<VerifyingKey> {
    read_json::<VerificationKeyJson>(path.as_ref())?.to_verifying_key()
}

/// Load `verification_key.json` as a verifier for the beacon circuit
pub fn load_verifier(path: impl AsRef<Path>) -> Result<BeaconVerifier> {
    Ok(BeaconVerifier::new(read_verifying_key(path)?)?)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|e| SdkError::io(path, e))?;
    serde_json::from_str(&content).map_err(|e| SdkError::json(path, e))
}

fn check_header(protocol: Option<&str>, curve: Option<&str>) -> Result<()> {
    if let Some(protocol) = protocol {
        if protocol != "groth16" {
            return Err(SdkError::Artifact(format!(
                "unsupported protocol {:?}",
                protocol
            )));
        }
    }
    if let Some(curve) = curve {
        if curve != "bn128" && curve != "bn254" {
            return Err(SdkError::Artifact(format!("unsupported curve {:?}", curve)));
        }
    }
    Ok(())
}

fn coordinate(value: &str) -> Result<FieldElement> {
    Ok(parse_decimal_in_field(value, &FQ_MODULUS)?)
}

fn g1(point: &[String], name: &str) -> Result<G1Point> {
    match point {
        [x, y] => Ok(G1Point::new(coordinate(x)?, coordinate(y)?)),
        [x, y, z] if z == "1" => Ok(G1Point::new(coordinate(x)?, coordinate(y)?)),
        [_, _, z] => Err(SdkError::Artifact(format!(
            "{}: expected affine point (z = 1), got z = {}",
            name, z
        ))),
        _ => Err(SdkError::Artifact(format!(
            "{}: expected 2 or 3 coordinates, got {}",
            name,
            point.len()
        ))),
    }
}

fn fp2(pair: &[String], name: &str) -> Result<Fp2> {
    match pair {
        [c0, c1] => Ok(Fp2::new(coordinate(c0)?, coordinate(c1)?)),
        _ => Err(SdkError::Artifact(format!(
            "{}: expected an Fp2 pair, got {} values",
            name,
            pair.len()
        ))),
    }
}

fn g2(point: &[Vec<String>], name: &str) -> Result<G2Point> {
    match point {
        [x, y] => Ok(G2Point::new(fp2(x, name)?, fp2(y, name)?)),
        [x, y, z] if z.len() == 2 && z[0] == "1" && z[1] == "0" => {
            Ok(G2Point::new(fp2(x, name)?, fp2(y, name)?))
        }
        [_, _, _] => Err(SdkError::Artifact(format!(
            "{}: expected affine point (z = [1, 0])",
            name
        ))),
        _ => Err(SdkError::Artifact(format!(
            "{}: expected 2 or 3 coordinates, got {}",
            name,
            point.len()
        ))),
    }
}
