// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! critnet-sweep: run a parameter grid and write one spike record per combination.
//!
//! `--single <topology>` runs one network instead, using `[simulation]` efficacy and the
//! `[thalamus]` scale in place of the grid.
//!
//! Settings come from `critnet_configuration.toml` (when found), then `CRITNET_*` environment
//! variables, then the flags below. Per-crate debug logging uses `--debug-<crate>` or
//! `CRITNET_DEBUG`.

use anyhow::{Context, Result};
use clap::Parser;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{info, warn};

use critnet::config::{
    apply_cli_overrides, apply_environment_overrides, load_config, validate_config, ConfigError,
    CritnetConfig,
};
use critnet::observability::{debug_flags_help, init_logging, parse_debug_flags};
use critnet::sweep::{run_single, run_sweep, SUMMARY_FILE_NAME};

/// Stochastic spiking network parameter sweep
#[derive(Parser, Debug)]
#[command(name = "critnet-sweep", version, author, long_about = None, after_help = debug_flags_help())]
struct Args {
    /// Path to the configuration file (searched for when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory receiving spike records and summary.json
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Base seed; combination i runs with seed + i
    #[arg(long)]
    seed: Option<u64>,

    /// Neurons per network
    #[arg(long)]
    neurons: Option<usize>,

    /// Repetitions of the full grid
    #[arg(long)]
    repetitions: Option<usize>,

    /// Default log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Worker threads (defaults to one per core)
    #[arg(long)]
    threads: Option<usize>,

    /// Run one network on this topology instead of the grid
    #[arg(long, value_name = "TOPOLOGY")]
    single: Option<String>,

    /// Inhibitory fraction for --single
    #[arg(long, default_value_t = 0.2, requires = "single")]
    proportion_inhib: f64,
}

impl Args {
    fn overrides(&self) -> HashMap<String, String> {
        let mut cli = HashMap::new();
        if let Some(dir) = &self.output_dir {
            cli.insert("output_dir".to_string(), dir.display().to_string());
        }
        if let Some(seed) = self.seed {
            cli.insert("seed".to_string(), seed.to_string());
        }
        if let Some(neurons) = self.neurons {
            cli.insert("neurons".to_string(), neurons.to_string());
        }
        if let Some(repetitions) = self.repetitions {
            cli.insert("repetitions".to_string(), repetitions.to_string());
        }
        if let Some(level) = &self.log_level {
            cli.insert("log_level".to_string(), level.clone());
        }
        cli
    }
}

fn resolve_config(args: &Args) -> Result<(CritnetConfig, Option<String>)> {
    let cli = args.overrides();
    match load_config(args.config.as_deref(), Some(&cli)) {
        Ok(config) => Ok((config, None)),
        Err(ConfigError::FileNotFound(searched)) if args.config.is_none() => {
            let mut config = CritnetConfig::default();
            apply_environment_overrides(&mut config);
            apply_cli_overrides(&mut config, &cli);
            Ok((config, Some(searched)))
        }
        Err(e) => Err(e).context("Failed to load configuration"),
    }
}

fn main() -> Result<()> {
    let debug_flags = parse_debug_flags();
    // `--debug-*` flags are open-ended, so clap never sees them
    let args = Args::parse_from(std::env::args().filter(|a| !a.starts_with("--debug-")));

    let (config, missing_file) = resolve_config(&args)?;
    validate_config(&config).context("Invalid configuration")?;

    let log_dir = config.logging.file_logging.then(|| {
        config
            .logging
            .log_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("./logs"))
    });
    let _logging = init_logging(&debug_flags, &config.logging.level, log_dir)?;

    if let Some(searched) = missing_file {
        warn!(target: "critnet-sweep", "[SWEEP] No configuration file, using defaults. {}", searched);
    }

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure the worker pool")?;
    }

    if let Some(topology) = &args.single {
        let summary =
            run_single(&config, topology, args.proportion_inhib).context("Single run failed")?;
        info!(
            target: "critnet-sweep",
            "[SWEEP] Wrote {} ({} spikes, {} avalanches)",
            summary.file.display(),
            summary.spikes,
            summary.avalanches
        );
        return Ok(());
    }

    let summaries = run_sweep(&config).context("Sweep failed")?;
    info!(
        target: "critnet-sweep",
        "[SWEEP] Wrote {} spike records and {}",
        summaries.len(),
        config.sweep.output_dir.join(SUMMARY_FILE_NAME).display()
    );
    Ok(())
}
