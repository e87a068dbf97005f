//! synth-runner: headless dataset generator.
//!
//! Usage:
//!   synth-runner --seed 12345 --out-dir ./out
//!   synth-runner --config generator.json --clients 200 --transactions 5000
//!   synth-runner --as-of 2024-01-15 --no-bom --summary-json summary.json

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::env;
use std::path::Path;
use synthledger_core::{
    config::GeneratorConfig,
    output::{self, OutputOptions},
    pipeline::{Pipeline, RunSummary},
};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let out_dir = flag_value(&args, "--out-dir").unwrap_or(".");
    let no_bom = args.iter().any(|a| a == "--no-bom");
    let summary_json = flag_value(&args, "--summary-json");

    let mut config = match flag_value(&args, "--config") {
        Some(path) => GeneratorConfig::load(path)?,
        None => GeneratorConfig::default(),
    };
    config.num_clients = parse_arg(&args, "--clients", config.num_clients);
    config.num_transactions = parse_arg(&args, "--transactions", config.num_transactions);

    let as_of = match flag_value(&args, "--as-of") {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .with_context(|| format!("--as-of expects YYYY-MM-DD, got {raw}"))?,
        None => chrono::Local::now().date_naive(),
    };

    println!("synthledger synth-runner");
    println!("  seed:          {seed}");
    println!("  clients:       {}", config.num_clients);
    println!("  transactions:  {}", config.num_transactions);
    println!("  window:        {} .. {}", config.window_start, config.window_end);
    println!("  as_of:         {as_of}");
    println!("  out_dir:       {out_dir}");
    println!();

    let mut pipeline = Pipeline::new(config, seed);
    let dataset = pipeline.run(as_of)?;

    let options = OutputOptions {
        utf8_bom: !no_bom,
        ..OutputOptions::default()
    };
    let written = output::write_dataset(Path::new(out_dir), &dataset, &options)?;
    log::info!("runner: seed {seed} finished, dataset in {out_dir}");

    let summary = dataset.summary();
    print_summary(&summary);
    if let Some(path) = summary_json {
        std::fs::write(path, serde_json::to_string_pretty(&summary)?)
            .with_context(|| format!("Cannot write {path}"))?;
        println!("  summary file:      {path}");
    }
    println!();
    println!("  clients file:      {}", written.clients.display());
    println!("  transactions file: {}", written.transactions.display());
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!("=== RUN SUMMARY ===");
    println!("  clients:              {}", summary.clients);
    println!("  transactions:         {}", summary.transactions);
    println!("  volume:               {:.2}", summary.transaction_volume);
    println!("  without receipts:     {}", summary.clients_without_receipts);
    println!("  mean distinct payers: {:.2}", summary.mean_distinct_payers);

    println!();
    println!("=== LIFECYCLE ===");
    for (stage, count) in &summary.lifecycle_counts {
        println!("  {:<22} {count}", stage.label());
    }

    println!();
    println!("=== DEPENDENCY ===");
    for (tier, count) in &summary.dependency_counts {
        println!("  {:<22} {count}", tier.label());
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
