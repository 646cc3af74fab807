//! beacon-cli - record Groth16-verified beacon randomness
//!
//! Encodes snarkjs proofs for the verifier, computes beacon rounds, and
//! verifies proofs into a local round ledger.

mod commands;
mod config;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use commands::{encode, randomness, record, round, verify};
use console::style;
use std::path::PathBuf;

/// CLI for recording verified beacon randomness
#[derive(Parser)]
#[command(name = "beacon-cli")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Common options shared across commands
#[derive(Args, Clone)]
pub struct CommonArgs {
    /// Beacon network (built-in preset or a [beacons.<name>] config entry)
    #[arg(short, long, env = "BEACON_NETWORK")]
    pub beacon: Option<String>,

    /// Path to the round ledger file
    #[arg(short, long, env = "BEACON_LEDGER")]
    pub ledger: Option<PathBuf>,

    /// Path to the snarkjs verification_key.json
    #[arg(long, env = "BEACON_VK")]
    pub vk: Option<PathBuf>,

    /// Rounds ahead of the current round still accepted
    #[arg(long, env = "BEACON_MAX_FUTURE_ROUNDS")]
    pub max_future_rounds: Option<u64>,

    /// Oldest accepted round, in rounds behind the current one
    #[arg(long, env = "BEACON_MAX_LOOKBACK")]
    pub max_lookback: Option<u64>,

    /// Output format (human, json)
    #[arg(long, default_value = "human")]
    pub output: OutputFormat,

    /// Quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert snarkjs proof.json/public.json into verifier arguments
    Encode(encode::EncodeArgs),

    /// Show the current round or the time of a given round
    Round(round::RoundArgs),

    /// Check a proof without recording it
    Verify(verify::VerifyArgs),

    /// Verify a proof and record its round randomness
    Record(record::RecordArgs),

    /// Look up recorded randomness
    Randomness(randomness::RandomnessArgs),
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Encode(args) => {
            let config = config::Config::load(&args.common)?;
            encode::run(&config, args)
        }
        Commands::Round(args) => {
            let config = config::Config::load(&args.common)?;
            round::run(&config, args)
        }
        Commands::Verify(args) => {
            let config = config::Config::load(&args.common)?;
            verify::run(&config, args)
        }
        Commands::Record(args) => {
            let config = config::Config::load(&args.common)?;
            record::run(&config, args)
        }
        Commands::Randomness(args) => {
            let config = config::Config::load(&args.common)?;
            randomness::run(&config, args)
        }
    };

    // Handle errors nicely
    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
