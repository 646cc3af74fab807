//! Round ledger
//!
//! Write-once mapping from beacon round to recorded randomness. A round can
//! be recorded with one value only; resubmitting the same value is a no-op,
//! a different value is a conflict.

use crate::errors::{BeaconError, Result};
use crate::types::{BeaconRound, Randomness};
use std::collections::BTreeMap;

/// Outcome of [`RoundLedger::record_if_absent`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordStatus {
    Recorded,
    AlreadyRecorded,
}

pub trait RoundLedger {
    /// Store `randomness` for `round` unless already present.
    ///
    /// Fails with `ConflictingRecord` if a different value is stored. A
    /// failed call leaves the ledger unchanged.
    fn record_if_absent(
        &mut self,
        round: BeaconRound,
        randomness: Randomness,
    ) -> Result<RecordStatus>;

    fn get(&self, round: BeaconRound) -> Option<Randomness>;

    /// Highest recorded round. Never decreases.
    fn latest_round(&self) -> Option<BeaconRound>;
}

/// Check a stored value against a candidate.
pub fn check_conflict(
    round: BeaconRound,
    stored: &Randomness,
    submitted: &Randomness,
) -> Result<()> {
    if stored != submitted {
        return Err(BeaconError::ConflictingRecord {
            round,
            stored: hex::encode(stored),
            submitted: hex::encode(submitted),
        });
    }
    Ok(())
}

/// In-memory ledger.
#[derive(Clone, Debug, Default)]
pub struct MemoryLedger {
    records: BTreeMap<BeaconRound, Randomness>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Recorded entries in ascending round order.
    pub fn iter(&self) -> impl Iterator<Item = (BeaconRound, Randomness)> + '_ {
        self.records.iter().map(|(r, v)| (*r, *v))
    }
}

impl FromIterator<(BeaconRound, Randomness)> for MemoryLedger {
    fn from_iter<I: IntoIterator<Item = (BeaconRound, Randomness)>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl RoundLedger for MemoryLedger {
    fn record_if_absent(
        &mut self,
        round: BeaconRound,
        randomness: Randomness,
    ) -> Result<RecordStatus> {
        if let Some(stored) = self.records.get(&round) {
            check_conflict(round, stored, &randomness)?;
            return Ok(RecordStatus::AlreadyRecorded);
        }
        self.records.insert(round, randomness);
        Ok(RecordStatus::Recorded)
    }

    fn get(&self, round: BeaconRound) -> Option<Randomness> {
        self.records.get(&round).copied()
    }

    fn latest_round(&self) -> Option<BeaconRound> {
        self.records.keys().next_back().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_once() {
        let mut ledger = MemoryLedger::new();
        assert!(ledger.is_empty());
        assert_eq!(
            ledger.record_if_absent(5, [1u8; 32]).unwrap(),
            RecordStatus::Recorded
        );
        assert_eq!(ledger.get(5), Some([1u8; 32]));
        assert_eq!(ledger.get(6), None);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_same_value_is_noop() {
        let mut ledger = MemoryLedger::new();
        ledger.record_if_absent(5, [1u8; 32]).unwrap();
        assert_eq!(
            ledger.record_if_absent(5, [1u8; 32]).unwrap(),
            RecordStatus::AlreadyRecorded
        );
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_different_value_conflicts() {
        let mut ledger = MemoryLedger::new();
        ledger.record_if_absent(5, [1u8; 32]).unwrap();
        let err = ledger.record_if_absent(5, [2u8; 32]).unwrap_err();
        assert!(matches!(err, BeaconError::ConflictingRecord { round: 5, .. }));
        assert_eq!(ledger.get(5), Some([1u8; 32]));
    }

    #[test]
    fn test_latest_round_is_monotonic() {
        let mut ledger = MemoryLedger::new();
        assert_eq!(ledger.latest_round(), None);
        ledger.record_if_absent(10, [1u8; 32]).unwrap();
        assert_eq!(ledger.latest_round(), Some(10));
        // catch-up of an older round does not move latest backwards
        ledger.record_if_absent(3, [2u8; 32]).unwrap();
        assert_eq!(ledger.latest_round(), Some(10));
        ledger.record_if_absent(11, [3u8; 32]).unwrap();
        assert_eq!(ledger.latest_round(), Some(11));
    }

    #[test]
    fn test_iter_is_ordered() {
        let ledger: MemoryLedger = [(9, [9u8; 32]), (2, [2u8; 32])].into_iter().collect();
        let rounds: Vec<_> = ledger.iter().map(|(r, _)| r).collect();
        assert_eq!(rounds, vec![2, 9]);
    }
}
