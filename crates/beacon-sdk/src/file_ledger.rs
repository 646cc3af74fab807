//! JSON file-backed round ledger
//!
//! The whole ledger is rewritten on every new record: a snapshot with the
//! new entry is written to a sibling temp file and renamed over the old one,
//! then the in-memory map is updated. A failed write leaves both the file
//! and the in-memory state unchanged.

use crate::error::{Result, SdkError};
use beacon_core::{
    BeaconError, BeaconRound, MemoryLedger, Randomness, RecordStatus, RoundLedger,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Serialize, Deserialize)]
struct LedgerFile {
    records: Vec<LedgerEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct LedgerEntry {
    round: BeaconRound,
    randomness: String,
}

impl LedgerEntry {
    fn new(round: BeaconRound, randomness: &Randomness) -> Self {
        Self {
            round,
            randomness: format!("0x{}", hex::encode(randomness)),
        }
    }

    fn decode(&self) -> Result<Randomness> {
        let digits = self
            .randomness
            .strip_prefix("0x")
            .unwrap_or(&self.randomness);
        let mut out = [0u8; 32];
        hex::decode_to_slice(digits, &mut out).map_err(|e| {
            SdkError::Artifact(format!("round {}: bad randomness: {}", self.round, e))
        })?;
        Ok(out)
    }
}

/// Round ledger persisted as a JSON file
#[derive(Debug)]
pub struct FileLedger {
    path: PathBuf,
    records: MemoryLedger,
}

impl FileLedger {
    /// Open a ledger file, starting empty if it does not exist yet
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            log::debug!("ledger {:?} not found, starting empty", path);
            return Ok(Self {
                path,
                records: MemoryLedger::new(),
            });
        }

        let content = fs::read_to_string(&path).map_err(|e| SdkError::io(&path, e))?;
        let file: LedgerFile =
            serde_json::from_str(&content).map_err(|e| SdkError::json(&path, e))?;

        let mut records = MemoryLedger::new();
        for entry in &file.records {
            // Duplicate entries must agree
            records.record_if_absent(entry.round, entry.decode()?)?;
        }
        log::debug!("loaded {} rounds from {:?}", records.len(), path);

        Ok(Self { path, records })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Recorded entries in ascending round order
    pub fn iter(&self) -> impl Iterator<Item = (BeaconRound, Randomness)> + '_ {
        self.records.iter()
    }

    fn persist(&self, extra: (BeaconRound, Randomness)) -> beacon_core::Result<()> {
        let mut records: Vec<LedgerEntry> = self
            .records
            .iter()
            .map(|(round, randomness)| LedgerEntry::new(round, &randomness))
            .collect();
        records.push(LedgerEntry::new(extra.0, &extra.1));
        records.sort_by_key(|entry| entry.round);

        let json = serde_json::to_string_pretty(&LedgerFile { records })
            .map_err(|e| storage_error("encoding", &self.path, e))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| storage_error("creating", parent, e))?;
            }
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| storage_error("writing", &tmp, e))?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            if let Err(cleanup) = fs::remove_file(&tmp) {
                log::warn!("leaving {:?} behind: {}", tmp, cleanup);
            }
            return Err(storage_error("renaming", &tmp, e));
        }
        Ok(())
    }
}

fn storage_error(action: &str, path: &Path, err: impl std::fmt::Display) -> BeaconError {
    BeaconError::Storage(format!("{} {:?}: {}", action, path, err))
}

impl RoundLedger for FileLedger {
    fn record_if_absent(
        &mut self,
        round: BeaconRound,
        randomness: Randomness,
    ) -> beacon_core::Result<RecordStatus> {
        if self.records.get(round).is_some() {
            return self.records.record_if_absent(round, randomness);
        }

        self.persist((round, randomness))?;
        self.records.record_if_absent(round, randomness)
    }

    fn get(&self, round: BeaconRound) -> Option<Randomness> {
        self.records.get(round)
    }

    fn latest_round(&self) -> Option<BeaconRound> {
        self.records.latest_round()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = FileLedger::open(dir.path().join("ledger.json")).unwrap();
        assert!(ledger.is_empty());
        assert_eq!(ledger.latest_round(), None);
    }

    #[test]
    fn test_records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("ledger.json");

        let mut ledger = FileLedger::open(&path).unwrap();
        assert_eq!(
            ledger.record_if_absent(7, [1u8; 32]).unwrap(),
            RecordStatus::Recorded
        );
        assert_eq!(
            ledger.record_if_absent(3, [2u8; 32]).unwrap(),
            RecordStatus::Recorded
        );

        let reopened = FileLedger::open(&path).unwrap();
        assert_eq!(reopened.len(), 2);
        assert_eq!(reopened.get(7), Some([1u8; 32]));
        assert_eq!(reopened.latest_round(), Some(7));
        assert_eq!(
            reopened.iter().map(|(r, _)| r).collect::<Vec<_>>(),
            vec![3, 7]
        );
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_conflict_does_not_touch_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        let mut ledger = FileLedger::open(&path).unwrap();
        ledger.record_if_absent(5, [1u8; 32]).unwrap();
        let before = fs::read_to_string(&path).unwrap();

        assert!(matches!(
            ledger.record_if_absent(5, [9u8; 32]),
            Err(BeaconError::ConflictingRecord { round: 5, .. })
        ));
        assert_eq!(
            ledger.record_if_absent(5, [1u8; 32]).unwrap(),
            RecordStatus::AlreadyRecorded
        );
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn test_failed_write_leaves_ledger_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        let mut ledger = FileLedger::open(&path).unwrap();
        ledger.record_if_absent(1, [1u8; 32]).unwrap();

        let tmp = path.with_extension("json.tmp");
        fs::create_dir(&tmp).unwrap();

        match ledger.record_if_absent(2, [2u8; 32]) {
            Err(BeaconError::Storage(msg)) => assert!(msg.contains("ledger.json.tmp")),
            other => panic!("expected storage error, got {:?}", other),
        }
        assert_eq!(ledger.get(2), None);
        assert_eq!(ledger.latest_round(), Some(1));
        assert_eq!(FileLedger::open(&path).unwrap().len(), 1);
    }

    #[test]
    fn test_failed_rename_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        let mut ledger = FileLedger::open(&path).unwrap();

        // A directory at the ledger path makes the rename fail
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), b"x").unwrap();

        match ledger.record_if_absent(4, [4u8; 32]) {
            Err(BeaconError::Storage(msg)) => {
                assert!(msg.starts_with("renaming"));
                assert!(msg.contains("ledger.json.tmp"));
            }
            other => panic!("expected storage error, got {:?}", other),
        }
        assert!(!path.with_extension("json.tmp").exists());
        assert_eq!(ledger.get(4), None);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_contradictory_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        let a = format!("0x{}", "11".repeat(32));
        let b = format!("0x{}", "22".repeat(32));
        fs::write(
            &path,
            format!(
                r#"{{"records": [{{"round": 1, "randomness": "{}"}}, {{"round": 1, "randomness": "{}"}}]}}"#,
                a, b
            ),
        )
        .unwrap();

        assert!(matches!(
            FileLedger::open(&path),
            Err(SdkError::Beacon(BeaconError::ConflictingRecord { round: 1, .. }))
        ));
    }
}
