//! Encode command - snarkjs artifacts to verifier arguments

use crate::config::Config;
use crate::CommonArgs;
use anyhow::{Context, Result};
use beacon_sdk::Submission;
use clap::Args;
use console::style;
use std::path::PathBuf;

#[derive(Args)]
pub struct EncodeArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Path to the snarkjs proof.json
    #[arg(long)]
    proof: PathBuf,

    /// Path to the snarkjs public.json
    #[arg(long)]
    public: PathBuf,
}

pub fn run(config: &Config, args: EncodeArgs) -> Result<()> {
    let submission = Submission::from_files(&args.proof, &args.public)
        .context("Failed to build verifier arguments")?;
    let (a, b, c, inputs) = submission.arguments.to_hex_words();

    if config.json_output {
        let json = serde_json::json!({
            "a": a,
            "b": b,
            "c": c,
            "inputs": inputs,
        });
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    if !submission.matches_key(&config.params) {
        eprintln!(
            "{} public key in {:?} does not match beacon {}",
            style("warning:").yellow().bold(),
            args.public,
            config.beacon
        );
    }

    if config.quiet {
        println!("{}", serde_json::to_string(&(a, b, c, inputs))?);
        return Ok(());
    }

    println!("{} Verifier arguments", style("✓").green().bold());
    println!();
    println!("  a: [{}, {}]", a[0], a[1]);
    println!("  b: [[{}, {}],", b[0][0], b[0][1]);
    println!("      [{}, {}]]", b[1][0], b[1][1]);
    println!("  c: [{}, {}]", c[0], c[1]);
    println!("  inputs: {} signals", inputs.len());
    for (i, input) in inputs.iter().enumerate() {
        println!("    [{:>2}] {}", i, input);
    }

    Ok(())
}
