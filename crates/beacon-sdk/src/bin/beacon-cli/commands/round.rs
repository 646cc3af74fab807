//! Round command - map between wall-clock time and beacon rounds

use crate::config::{unix_now, Config};
use crate::CommonArgs;
use anyhow::{Context, Result};
use beacon_core::limbs::join_be_bytes;
use clap::Args;
use console::style;

#[derive(Args)]
pub struct RoundArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Unix timestamp to evaluate (defaults to now)
    #[arg(long)]
    at: Option<u64>,

    /// Also show when this round becomes the expected round
    #[arg(long)]
    round: Option<u64>,
}

pub fn run(config: &Config, args: RoundArgs) -> Result<()> {
    let now = match args.at {
        Some(ts) => ts,
        None => unix_now()?,
    };
    let current = config.params.expected_round(now);
    let round_time = args
        .round
        .map(|round| {
            config
                .params
                .round_time(round)
                .with_context(|| format!("Round {} is out of range", round))
        })
        .transpose()?;
    let key_x = join_be_bytes(&config.params.public_key()[0]).context("Invalid public key limbs")?;
    let key_x = format!("0x{}", hex::encode(key_x));

    if config.json_output {
        let json = serde_json::json!({
            "beacon": config.beacon,
            "public_key_x": key_x,
            "timestamp": now,
            "expected_round": current,
            "round": args.round,
            "round_time": round_time,
        });
        println!("{}", json);
    } else if config.quiet {
        println!("{}", current);
    } else {
        println!("  Beacon: {}", config.beacon);
        println!(
            "  Genesis: {} (period {}s)",
            config.params.genesis_time(),
            config.params.period()
        );
        println!("  Public key x: {}", key_x);
        println!("  Timestamp: {}", now);
        println!("  Expected round: {}", style(current).cyan().bold());
        if let (Some(round), Some(time)) = (args.round, round_time) {
            let status = if time <= now {
                style("reached").green()
            } else {
                style("pending").yellow()
            };
            println!("  Round {} at: {} ({})", round, time, status);
        }
    }

    Ok(())
}
