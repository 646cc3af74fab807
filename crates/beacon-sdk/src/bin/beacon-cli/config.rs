//! Configuration handling for beacon-cli
//!
//! Priority: CLI flags > environment variables > config file > presets

use anyhow::{Context, Result};
use beacon_core::{BeaconParams, EngineConfig};
use beacon_sdk::{parse_public_key, preset, DEFAULT_PRESET};
use serde::Deserialize;
use std::{
    collections::HashMap,
    fs,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

/// Resolved configuration for CLI commands
pub struct Config {
    pub beacon: String,
    pub params: BeaconParams,
    pub engine: EngineConfig,
    pub ledger_path: PathBuf,
    pub vk_path: Option<PathBuf>,
    pub quiet: bool,
    pub json_output: bool,
}

impl Config {
    /// Load configuration from file, environment, and CLI args
    pub fn load(common: &super::CommonArgs) -> Result<Self> {
        // Try to load config file
        let file_config = ConfigFile::load()?;
        let defaults = file_config.as_ref().and_then(|c| c.default.as_ref());

        let beacon = common
            .beacon
            .clone()
            .or_else(|| defaults.and_then(|d| d.beacon.clone()))
            .unwrap_or_else(|| DEFAULT_PRESET.to_string());

        let params = resolve_beacon(&beacon, file_config.as_ref())?;

        let engine = EngineConfig {
            max_future_rounds: common
                .max_future_rounds
                .or_else(|| defaults.and_then(|d| d.max_future_rounds))
                .unwrap_or(0),
            max_lookback: common
                .max_lookback
                .or_else(|| defaults.and_then(|d| d.max_lookback)),
        };

        let ledger_path = common
            .ledger
            .clone()
            .or_else(|| defaults.and_then(|d| d.ledger.as_deref()).map(expand_tilde))
            .unwrap_or_else(|| default_ledger_path(&beacon));

        let vk_path = common.vk.clone().or_else(|| {
            defaults
                .and_then(|d| d.verification_key.as_deref())
                .map(expand_tilde)
        });

        Ok(Self {
            beacon,
            params,
            engine,
            ledger_path,
            vk_path,
            quiet: common.quiet,
            json_output: common.output == super::OutputFormat::Json,
        })
    }

    /// Get verification key path or error
    pub fn require_vk_path(&self) -> Result<&PathBuf> {
        self.vk_path.as_ref().context(
            "No verification key configured. Use --vk, set BEACON_VK, or configure in ~/.config/beacon-cli/config.toml",
        )
    }
}

/// Current Unix time in seconds
pub fn unix_now() -> Result<u64> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("System clock is before the Unix epoch")?
        .as_secs())
}

/// Configuration file structure
#[derive(Debug, Deserialize)]
struct ConfigFile {
    default: Option<DefaultConfig>,
    beacons: Option<HashMap<String, BeaconConfig>>,
}

#[derive(Debug, Deserialize)]
struct DefaultConfig {
    beacon: Option<String>,
    ledger: Option<String>,
    verification_key: Option<String>,
    max_future_rounds: Option<u64>,
    max_lookback: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct BeaconConfig {
    genesis_time: u64,
    period: u64,
    public_key: [Vec<String>; 2],
}

impl ConfigFile {
    /// `None` when no config file exists; a present but invalid file is an error
    fn load() -> Result<Option<Self>> {
        let Some(path) = config_file_path() else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: ConfigFile = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {:?}", path))?;
        Ok(Some(config))
    }

    fn beacon(&self, name: &str) -> Option<&BeaconConfig> {
        self.beacons.as_ref().and_then(|b| b.get(name))
    }
}

/// Resolve beacon name to its parameters
fn resolve_beacon(name: &str, config: Option<&ConfigFile>) -> Result<BeaconParams> {
    // Check config file first
    if let Some(beacon) = config.and_then(|c| c.beacon(name)) {
        let [x, y] = &beacon.public_key;
        let public_key = parse_public_key(x.as_slice(), y.as_slice())
            .with_context(|| format!("Invalid public key for beacon {:?}", name))?;
        return BeaconParams::new(public_key, beacon.genesis_time, beacon.period, None)
            .with_context(|| format!("Invalid parameters for beacon {:?}", name));
    }

    // Built-in presets
    Ok(preset(name)?.params()?)
}

/// Get config file path
fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("beacon-cli").join("config.toml"))
}

/// Default ledger location, one file per beacon
fn default_ledger_path(beacon: &str) -> PathBuf {
    let file = format!("{}.json", beacon);
    match dirs::data_dir() {
        Some(dir) => dir.join("beacon-cli").join(file),
        None => PathBuf::from(file),
    }
}

/// Expand ~ to home directory
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
