//! Verify command - check a beacon proof without touching the ledger

use crate::config::{unix_now, Config};
use crate::CommonArgs;
use anyhow::{Context, Result};
use beacon_core::BeaconEngine;
use beacon_sdk::{load_verifier, FileLedger, Submission};
use clap::Args;
use console::style;
use std::path::PathBuf;

#[derive(Args)]
pub struct VerifyArgs {
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

pub fn run(config: &Config, args: VerifyArgs) -> Result<()> {
    let vk_path = config.require_vk_path()?;
    let verifier = load_verifier(vk_path).context("Failed to load verification key")?;

    let submission = Submission::from_files(&args.proof, &args.public)
        .context("Failed to build verifier arguments")?;

    let ledger = FileLedger::open(&config.ledger_path)?;
    let engine = BeaconEngine::new(verifier, config.params.clone(), config.engine, ledger)?;

    let now = match args.now {
        Some(ts) => ts,
        None => unix_now()?,
    };

    let valid = submission.verify(&engine, args.round, now)?;
    let key_matches = submission.matches_key(engine.params());

    if config.json_output {
        let json = serde_json::json!({
            "round": args.round,
            "valid": valid,
            "key_matches": key_matches,
        });
        println!("{}", json);
    } else if config.quiet {
        println!("{}", valid);
    } else if valid {
        println!("{} Proof valid for round {}", style("✓").green().bold(), args.round);
    } else {
        println!("{} Proof rejected for round {}", style("✗").red().bold(), args.round);
        if !key_matches {
            println!("  {} proof was made for a different public key", style("→").dim());
        }
    }

    if !valid {
        anyhow::bail!("Proof did not verify");
    }
    Ok(())
}
