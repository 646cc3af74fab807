//! Record command - verify a beacon proof and store its randomness

use crate::config::{unix_now, Config};
use crate::CommonArgs;
use anyhow::{Context, Result};
use beacon_core::{BeaconEngine, BeaconEvent};
use beacon_sdk::{load_verifier, FileLedger, Submission};
use clap::Args;
use console::style;
use std::path::PathBuf;

#[derive(Args)]
pub struct RecordArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Beacon round the proof is for
    #[arg(long)]
    round: u64,

    /// Path to the snarkjs proof.json
    #[arg(long)]
    proof: PathBuf,

    /// Path to the snarkjs public.json
    #[arg(long)]
    public: PathBuf,

    /// Unix timestamp to check the round against (defaults to now)
    #[arg(long)]
    now: Option<u64>,
}

pub fn run(config: &Config, args: RecordArgs) -> Result<()> {
    let vk_path = config.require_vk_path()?;
    let verifier = load_verifier(vk_path).context("Failed to load verification key")?;

    let submission = Submission::from_files(&args.proof, &args.public)
        .context("Failed to build verifier arguments")?;

    let ledger = FileLedger::open(&config.ledger_path)?;
    let mut engine = BeaconEngine::new(verifier, config.params.clone(), config.engine, ledger)?;

    let now = match args.now {
        Some(ts) => ts,
        None => unix_now()?,
    };

    if !config.quiet && !config.json_output {
        println!(
            "{} Verifying round {} for {}...",
            style("→").cyan().bold(),
            args.round,
            config.beacon
        );
        println!("  Ledger: {:?}", config.ledger_path);
        println!();
    }

    match submission.record(&mut engine, args.round, now) {
        Ok(record) => {
            let fresh = engine
                .drain_events()
                .iter()
                .any(|BeaconEvent::RandomnessRecorded(r)| r == &record);
            let randomness = hex::encode(record.randomness);

            if config.json_output {
                let json = serde_json::json!({
                    "round": record.round,
                    "randomness": format!("0x{}", randomness),
                    "new": fresh,
                });
                println!("{}", json);
            } else if config.quiet {
                println!("0x{}", randomness);
            } else {
                if fresh {
                    println!("{} Randomness recorded", style("✓").green().bold());
                } else {
                    println!("{} Round already recorded", style("✓").green().bold());
                }
                println!();
                println!("  Round: {}", record.round);
                println!("  Randomness: 0x{}", randomness);
            }
            Ok(())
        }
        Err(e) => {
            if config.json_output {
                let json = serde_json::json!({
                    "round": args.round,
                    "error": e.to_string(),
                    "retryable": e.is_retryable(),
                });
                println!("{}", json);
            } else if !config.quiet && e.is_retryable() {
                println!("  {} safe to retry later", style("→").dim());
            }
            Err(e.into())
        }
    }
}
