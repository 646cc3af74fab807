//! Beacon parameters
//!
//! Immutable configuration of the randomness federation: its public key,
//! genesis time and round period. Rounds are derived from wall-clock time as
//! `ceil((now - genesis) / period)`.

use crate::errors::{BeaconError, Result};
use crate::limbs::check_limbs;
use crate::types::{BeaconRound, PublicKeyLimbs};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BeaconParams {
    public_key: PublicKeyLimbs,
    genesis_time: u64,
    period: u64,
}

impl BeaconParams {
    /// Construct parameters.
    ///
    /// When `reference_now` is given, a genesis time in the future relative
    /// to it is rejected.
    pub fn new(
        public_key: PublicKeyLimbs,
        genesis_time: u64,
        period: u64,
        reference_now: Option<u64>,
    ) -> Result<Self> {
        if period == 0 {
            return Err(BeaconError::InvalidParameter(
                "period must be positive".to_string(),
            ));
        }
        if let Some(now) = reference_now {
            if genesis_time > now {
                return Err(BeaconError::InvalidParameter(format!(
                    "genesis time {} is in the future (now {})",
                    genesis_time, now
                )));
            }
        }
        for coordinate in &public_key {
            check_limbs(coordinate)?;
        }

        Ok(Self {
            public_key,
            genesis_time,
            period,
        })
    }

    pub fn public_key(&self) -> &PublicKeyLimbs {
        &self.public_key
    }

    pub fn genesis_time(&self) -> u64 {
        self.genesis_time
    }

    pub fn period(&self) -> u64 {
        self.period
    }

    /// Round expected to be signed at `timestamp`. Zero at or before genesis.
    pub fn expected_round(&self, timestamp: u64) -> BeaconRound {
        let elapsed = timestamp.saturating_sub(self.genesis_time);
        elapsed.div_ceil(self.period)
    }

    /// Earliest timestamp at which `round` is the expected round.
    ///
    /// Round 0 is expected from genesis; round `r >= 1` from
    /// `genesis + (r - 1) * period + 1`, the first second after round `r - 1`.
    pub fn round_time(&self, round: BeaconRound) -> Option<u64> {
        let Some(previous) = round.checked_sub(1) else {
            return Some(self.genesis_time);
        };
        previous
            .checked_mul(self.period)
            .and_then(|offset| offset.checked_add(self.genesis_time))
            .and_then(|t| t.checked_add(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FieldElement, LIMBS_PER_FP};

    const GENESIS: u64 = 1651677099;
    const PERIOD: u64 = 3;

    fn key() -> PublicKeyLimbs {
        [[FieldElement::from_u64(1); LIMBS_PER_FP]; 2]
    }

    fn params() -> BeaconParams {
        BeaconParams::new(key(), GENESIS, PERIOD, None).unwrap()
    }

    #[test]
    fn test_expected_round_at_round_boundary() {
        let round = 8762363;
        assert_eq!(params().expected_round(GENESIS + round * PERIOD), round);
    }

    #[test]
    fn test_expected_round_rounds_up() {
        let p = params();
        assert_eq!(p.expected_round(GENESIS), 0);
        assert_eq!(p.expected_round(GENESIS + 1), 1);
        assert_eq!(p.expected_round(GENESIS + 3), 1);
        assert_eq!(p.expected_round(GENESIS + 4), 2);
    }

    #[test]
    fn test_expected_round_before_genesis() {
        assert_eq!(params().expected_round(GENESIS - 100), 0);
    }

    #[test]
    fn test_round_time() {
        let p = params();
        assert_eq!(p.round_time(0), Some(GENESIS));
        assert_eq!(p.round_time(1), Some(GENESIS + 1));
        assert_eq!(p.round_time(8762363), Some(GENESIS + 8762362 * 3 + 1));
        assert_eq!(p.round_time(u64::MAX), None);
    }

    #[test]
    fn test_round_time_is_first_second_of_round() {
        let p = params();
        for round in [1, 2, 42, 8762363] {
            let t = p.round_time(round).unwrap();
            assert_eq!(p.expected_round(t), round);
            assert_eq!(p.expected_round(t - 1), round - 1);
        }
        // Still expected up to the next boundary
        let t = p.round_time(42).unwrap();
        assert_eq!(p.expected_round(t + PERIOD - 1), 42);
        assert_eq!(p.expected_round(t + PERIOD), 43);
    }

    #[test]
    fn test_zero_period_rejected() {
        assert!(matches!(
            BeaconParams::new(key(), GENESIS, 0, None),
            Err(BeaconError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_future_genesis_rejected() {
        assert!(matches!(
            BeaconParams::new(key(), GENESIS, PERIOD, Some(GENESIS - 1)),
            Err(BeaconError::InvalidParameter(_))
        ));
        assert!(BeaconParams::new(key(), GENESIS, PERIOD, Some(GENESIS)).is_ok());
    }

    #[test]
    fn test_accessors() {
        let p = params();
        assert_eq!(p.genesis_time(), GENESIS);
        assert_eq!(p.period(), PERIOD);
        assert_eq!(p.public_key(), &key());
    }
}
