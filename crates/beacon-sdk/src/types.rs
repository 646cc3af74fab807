//! Beacon presets and public key helpers

use crate::error::{Result, SdkError};
use beacon_core::codec::parse_decimal;
use beacon_core::limbs::compressed_g1_x;
use beacon_core::{BeaconParams, FieldElement, PublicKeyLimbs, LIMBS_PER_FP};

/// Name of the preset used when nothing else is configured
pub const DEFAULT_PRESET: &str = "drand-testnet";

/// Built-in beacon network parameters
#[derive(Debug, Clone, Copy)]
pub struct BeaconPreset {
    pub name: &'static str,
    /// Unix timestamp of round 0
    pub genesis_time: u64,
    /// Seconds per round
    pub period: u64,
    /// Federation public key as published, compressed G1 hex
    pub public_key_hex: &'static str,
    /// Federation public key, 55x7 decimal limbs per coordinate
    pub public_key: [[&'static str; LIMBS_PER_FP]; 2],
}

/// drand unchained testnet
pub const DRAND_TESTNET: BeaconPreset = BeaconPreset {
    name: "drand-testnet",
    genesis_time: 1651677099,
    period: 3,
    public_key_hex: "8200fc249deb0148eb918d6e213980c5d01acd7fc251900d9260136da3b54836ce125172399ddc69c4e3e11429b62c11",
    public_key: [
        [
            "28113499409755153",
            "9821332782502793",
            "15356694772791369",
            "5221032786067611",
            "6768993040652284",
            "11572850342085671",
            "141008224877248",
        ],
        [
            "33461492476086130",
            "35811493041037339",
            "24227159288510945",
            "26544002735666944",
            "5294409699107852",
            "22752247623743245",
            "194806786582404",
        ],
    ],
};

pub const PRESETS: &[BeaconPreset] = &[DRAND_TESTNET];

/// Look up a built-in preset by name
pub fn preset(name: &str) -> Result<&'static BeaconPreset> {
    PRESETS
        .iter()
        .find(|p| p.name == name)
        .ok_or_else(|| SdkError::UnknownPreset(name.to_string()))
}

impl BeaconPreset {
    /// Limbed public key, checked against the published compressed key
    pub fn public_key(&self) -> Result<PublicKeyLimbs> {
        let key = parse_public_key(&self.public_key[0][..], &self.public_key[1][..])?;
        let compressed = hex::decode(self.public_key_hex)
            .map_err(|e| SdkError::Artifact(format!("{}: public key hex: {}", self.name, e)))?;
        if compressed_g1_x(&compressed)? != key[0] {
            return Err(SdkError::Artifact(format!(
                "{}: limbed public key does not match {}",
                self.name, self.public_key_hex
            )));
        }
        Ok(key)
    }

    /// Beacon parameters for this network
    pub fn params(&self) -> Result<BeaconParams> {
        Ok(BeaconParams::new(
            self.public_key()?,
            self.genesis_time,
            self.period,
            None,
        )?)
    }
}

/// Parse the two limbed coordinates of a public key from decimal strings
pub fn parse_public_key<S: AsRef<str>>(x: &[S], y: &[S]) -> Result<PublicKeyLimbs> {
    Ok([parse_coordinate(x)?, parse_coordinate(y)?])
}

fn parse_coordinate<S: AsRef<str>>(limbs: &[S]) -> Result<[FieldElement; LIMBS_PER_FP]> {
    if limbs.len() != LIMBS_PER_FP {
        return Err(SdkError::Artifact(format!(
            "public key coordinate needs {} limbs, got {}",
            LIMBS_PER_FP,
            limbs.len()
        )));
    }
    let mut out = [FieldElement::ZERO; LIMBS_PER_FP];
    for (slot, limb) in out.iter_mut().zip(limbs) {
        *slot = parse_decimal(limb.as_ref())?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drand_testnet_preset() {
        let params = preset("drand-testnet").unwrap().params().unwrap();
        assert_eq!(params.genesis_time(), 1651677099);
        assert_eq!(params.period(), 3);
        assert_eq!(params.expected_round(1651677099 + 8762363 * 3), 8762363);
        assert_eq!(
            params.public_key()[1][6],
            FieldElement::from_u64(194806786582404)
        );
    }

    #[test]
    fn test_preset_key_must_match_compressed_hex() {
        let mut tampered = DRAND_TESTNET;
        tampered.public_key[0][0] = "28113499409755154";
        assert!(matches!(tampered.public_key(), Err(SdkError::Artifact(_))));

        tampered = DRAND_TESTNET;
        tampered.public_key_hex = "8200fc";
        assert!(matches!(tampered.public_key(), Err(SdkError::Codec(_))));
    }

    #[test]
    fn test_unknown_preset() {
        assert!(matches!(
            preset("mainnet"),
            Err(SdkError::UnknownPreset(name)) if name == "mainnet"
        ));
    }

    #[test]
    fn test_public_key_shape() {
        let short = ["1", "2", "3"];
        let full = ["1"; LIMBS_PER_FP];
        assert!(parse_public_key(&short[..], &full[..]).is_err());
        assert!(parse_public_key(&full[..], &full[..]).is_ok());
    }
}
