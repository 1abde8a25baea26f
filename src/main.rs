// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::{bail, Context};
use std::env;
use tracing_subscriber::EnvFilter;

use the_layercake::config::{load_and_validate_config, ChainBuilder, ComponentRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: {} <chain-file> <input>", args[0]);
        eprintln!("Example: {} chains/greeting.yaml \"hello world\"", args[0]);
        bail!("expected a chain file and an input value");
    }
    let chain_file = &args[1];
    let input = &args[2];

    let registry = ComponentRegistry::with_text_builtins();
    let config = load_and_validate_config(chain_file, &registry)
        .with_context(|| format!("failed to load chain from {chain_file}"))?;
    let pipeline = ChainBuilder::new(&registry)
        .build(&config)
        .with_context(|| format!("failed to build chain '{}'", config.name))?;

    let output = pipeline
        .run(input.clone())
        .await
        .with_context(|| format!("chain '{}' rejected the input", config.name))?;

    println!("{output}");
    Ok(())
}
