//! Randomness command - read recorded rounds from the ledger

use crate::config::Config;
use crate::CommonArgs;
use anyhow::Result;
use beacon_core::RoundLedger;
use beacon_sdk::FileLedger;
use clap::Args;
use console::style;

#[derive(Args)]
pub struct RandomnessArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Round to look up (defaults to the latest recorded round)
    #[arg(long)]
    round: Option<u64>,

    /// List every recorded round
    #[arg(long, conflicts_with = "round")]
    all: bool,
}

pub fn run(config: &Config, args: RandomnessArgs) -> Result<()> {
    let ledger = FileLedger::open(&config.ledger_path)?;

    if args.all {
        if config.json_output {
            let records: Vec<_> = ledger
                .iter()
                .map(|(round, randomness)| {
                    serde_json::json!({
                        "round": round,
                        "randomness": format!("0x{}", hex::encode(randomness)),
                    })
                })
                .collect();
            println!("{}", serde_json::Value::Array(records));
        } else {
            for (round, randomness) in ledger.iter() {
                println!("{} 0x{}", round, hex::encode(randomness));
            }
        }
        return Ok(());
    }

    let Some(round) = args.round.or_else(|| ledger.latest_round()) else {
        anyhow::bail!("No rounds recorded in {:?}", config.ledger_path);
    };
    let Some(randomness) = ledger.get(round) else {
        anyhow::bail!("Round {} is not recorded", round);
    };
    let randomness = hex::encode(randomness);

    if config.json_output {
        let json = serde_json::json!({
            "round": round,
            "randomness": format!("0x{}", randomness),
            "latest": ledger.latest_round() == Some(round),
        });
        println!("{}", json);
    } else if config.quiet {
        println!("0x{}", randomness);
    } else {
        println!("  Round: {}", style(round).cyan().bold());
        println!("  Randomness: 0x{}", randomness);
        println!("  Recorded rounds: {}", ledger.len());
    }

    Ok(())
}
