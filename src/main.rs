// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::{bail, Context as _, Result};
use std::env;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use the_chainwood::config::{load_and_validate_config, RuntimeBuilder};
use the_chainwood::engine::ChainStatus;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <chains.yaml> [chain-id ...]", args[0]);
        eprintln!("Example: {} demo/chains.yaml greet", args[0]);
        eprintln!("With no chain ids every chain in the file is consumed, in file order.");
        std::process::exit(1);
    }

    let config_file = &args[1];
    let config = load_and_validate_config(config_file)
        .with_context(|| format!("loading {}", config_file))?;
    let engine = RuntimeBuilder::from_config(&config)?;

    let chain_ids: Vec<String> = if args.len() > 2 {
        args[2..].to_vec()
    } else {
        config.chains.iter().map(|c| c.id.clone()).collect()
    };
    if chain_ids.is_empty() {
        bail!("{} declares no chains", config_file);
    }

    println!("🔗 Chainwood");
    println!("Config file: {}", config_file);
    println!("Chains: {:?}", chain_ids);

    for chain_id in &chain_ids {
        println!("\n{}", "─".repeat(80));
        let start_time = Instant::now();
        let report = engine.consume(chain_id).await;

        let verdict = match (&report.status, report.failures.is_empty()) {
            (ChainStatus::NotFound, _) => "⚠️  not declared (or already consumed)".to_string(),
            (ChainStatus::Stopped { event_name, .. }, _) => format!("⏹  stopped by '{}'", event_name),
            (ChainStatus::Completed, true) => "✅ completed".to_string(),
            (ChainStatus::Completed, false) => {
                format!("⚠️  completed with {} failed step(s)", report.failures.len())
            }
        };
        println!("Chain '{}': {} in {:?}", chain_id, verdict, start_time.elapsed());
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}
