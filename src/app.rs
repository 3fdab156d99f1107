// Declare modules
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod formatter;
pub mod hasher;
pub mod input_list;
pub mod models;
pub mod scanner;

use anyhow::{Context, Result};
use clap::Parser;
use std::collections::HashSet;
use std::time::Instant;

use self::cli::Cli;
use self::config::resolve_config;
use self::formatter::OutputGenerator;
use self::input_list::hash_input;
use self::models::Digest;
use self::scanner::{create_scanner, ScanOptions};

/// Initializes components and orchestrates data flow.
pub fn run() -> Result<()> {
    // 1. Parse Args
    let args = Cli::parse();
    init_logging(args.verbose);

    // 2. Resolve Configuration (base path, presets, default filters)
    let config = resolve_config(args)?;
    let started = Instant::now();

    let mut seen = HashSet::new();
    for input in &config.inputs {
        if !seen.insert(input) {
            log::warn!(
                "Input {} is listed more than once; repeated inputs cancel out of the hash.",
                input.display()
            );
        }
    }

    // 3. Build Scanner
    let options = ScanOptions::new(&config.base).follow_symlinks(config.follow_symlinks);
    let mut scanner = create_scanner(&config.scanner, options);

    // 4. Hash Inputs
    let mut total: Digest = 0;
    let mut results = Vec::with_capacity(config.inputs.len());
    for input in &config.inputs {
        let digest = hash_input(input, &config.base, &config.defaults, scanner.as_mut())
            .context(format!("Failed to hash input {}", input.display()))?;
        results.push((input.as_path(), digest));
        total ^= digest;
    }

    if config.verbose {
        log::info!("\n{}", OutputGenerator::generate_breakdown(&results));
    }

    // 5. Print to Stdout
    println!("{}", OutputGenerator::digest_to_hex(total));

    if config.print_time {
        eprintln!("Elapsed: {:.3?}", started.elapsed());
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}
