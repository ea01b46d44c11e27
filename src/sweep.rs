// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Parameter sweeps
//!
//! The cartesian product
//! `repetitions × proportion_inhib × synaptic_efficacy × omega × topologies`
//! is enumerated in that nesting order. Each combination generates its own topology, runs
//! the configured schedule on its own engine and writes one spike record. Combinations share
//! nothing, so they run in parallel on the rayon pool.
//!
//! Combination `i` is seeded with `base_seed + i`; the same stream drives topology
//! generation and then the engine.

use std::path::{Path, PathBuf};

use critnet_analysis::{log_binned_density, AnalysisError, AvalancheStats, LogBinnedDensity};
use critnet_config::CritnetConfig;
use critnet_connectivity::{AvgStrength, Topology, TopologyError};
use critnet_npu_engine::{
    HistoryVariable, Network, NetworkError, NetworkOptions, NetworkParameters, Schedule,
    ThalamicWeights, DEFAULT_THALAMIC_SCALE,
};
use critnet_serialization::{save_spike_record, RecordKey, SpikeRecord, SpikeRecordError};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Bins used for the size distribution in run summaries
pub const SIZE_DENSITY_BINS: usize = 20;

/// File written next to the spike records
pub const SUMMARY_FILE_NAME: &str = "summary.json";

#[derive(Error, Debug)]
pub enum SweepError {
    #[error("Topology generation failed for combination {index}: {source}")]
    Topology {
        index: usize,
        #[source]
        source: TopologyError,
    },

    #[error("Simulation failed for combination {index}: {source}")]
    Network {
        index: usize,
        #[source]
        source: NetworkError,
    },

    #[error("Invalid sweep schedule: {0}")]
    Schedule(NetworkError),

    #[error("Invalid sweep topology: {0}")]
    Grid(TopologyError),

    #[error("Invalid history configuration: {0}")]
    History(NetworkError),

    #[error("Analysis failed for combination {index}: {source}")]
    Analysis {
        index: usize,
        #[source]
        source: AnalysisError,
    },

    #[error("Failed to write spike record: {0}")]
    Record(#[from] SpikeRecordError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write summary: {0}")]
    Summary(#[from] serde_json::Error),
}

pub type SweepResult<T> = Result<T, SweepError>;

/// One point of the parameter grid
#[derive(Debug, Clone, PartialEq)]
pub struct Combination {
    /// Position in enumeration order
    pub index: usize,
    pub repetition: usize,
    pub topology: Topology,
    pub proportion_inhib: f64,
    pub synaptic_efficacy: f64,
    pub omega: f64,
}

impl Combination {
    pub fn record_key(&self) -> RecordKey {
        RecordKey {
            repetition: self.repetition,
            topology: self.topology.name().to_string(),
            omega: self.omega,
            proportion_inhib: self.proportion_inhib,
            synaptic_efficacy: self.synaptic_efficacy,
        }
    }
}

/// Outcome of one combination, as written to `summary.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub key: RecordKey,
    pub seed: u64,
    pub file: PathBuf,
    pub neurons: usize,
    pub steps: usize,
    pub spikes: usize,
    pub avalanches: usize,
    pub mean_size: Option<f64>,
    pub mean_duration: Option<f64>,
    pub size_density: LogBinnedDensity,
}

/// Enumerate the sweep grid.
pub fn combinations(config: &CritnetConfig) -> Result<Vec<Combination>, TopologyError> {
    let sweep = &config.sweep;
    let topo = &config.topology;
    let topologies = sweep
        .topologies
        .iter()
        .map(|name| Topology::from_name(name, topo.k, topo.rewire, topo.k_out_max))
        .collect::<Result<Vec<_>, _>>()?;

    let mut grid = Vec::with_capacity(sweep.combination_count());
    for repetition in 0..sweep.repetitions {
        for &proportion_inhib in &sweep.proportion_inhib {
            for &synaptic_efficacy in &sweep.synaptic_efficacy {
                for &omega in &sweep.omega {
                    for &topology in &topologies {
                        grid.push(Combination {
                            index: grid.len(),
                            repetition,
                            topology,
                            proportion_inhib,
                            synaptic_efficacy,
                            omega,
                        });
                    }
                }
            }
        }
    }
    Ok(grid)
}

/// A one-point grid built from the `[simulation]` efficacy and the `[thalamus]` scale.
///
/// An absent thalamic scale falls back to the engine default of `8 / n` per neuron.
pub fn single_combination(
    config: &CritnetConfig,
    topology: Topology,
    proportion_inhib: f64,
) -> Combination {
    Combination {
        index: 0,
        repetition: 0,
        topology,
        proportion_inhib,
        synaptic_efficacy: config.simulation.synaptic_efficacy,
        omega: config.thalamus.omega.unwrap_or(DEFAULT_THALAMIC_SCALE),
    }
}

/// Variables named by `simulation.history`, with spikes always first.
pub fn recorded_variables(config: &CritnetConfig) -> SweepResult<Vec<HistoryVariable>> {
    let mut variables = vec![HistoryVariable::Spikes];
    variables.extend(
        HistoryVariable::parse_list(&config.simulation.history).map_err(SweepError::History)?,
    );
    Ok(variables)
}

/// Generate the combination's topology and run the schedule on a fresh engine.
///
/// The returned network holds every variable listed in `simulation.history`.
pub fn simulate_network(
    config: &CritnetConfig,
    schedule: &Schedule,
    combination: &Combination,
    seed: u64,
) -> SweepResult<Network> {
    let index = combination.index;
    let history = recorded_variables(config)?;
    let mut rng = StdRng::seed_from_u64(seed);

    let generated = combination
        .topology
        .generate(
            config.topology.neurons,
            combination.proportion_inhib,
            AvgStrength::from(config.topology.avg_strength),
            &mut rng,
        )
        .map_err(|source| SweepError::Topology { index, source })?;

    let parameters = NetworkParameters {
        synaptic_efficacy: combination.synaptic_efficacy,
        ..config.simulation.parameters()
    };
    let options = NetworkOptions::default()
        .with_parameters(parameters)
        .with_thalamic_weights(ThalamicWeights::Scalar(combination.omega))
        .with_history(history);

    let mut network = Network::with_rng(generated.into_weights(), options, rng)
        .map_err(|source| SweepError::Network { index, source })?;
    network
        .run_schedule(schedule)
        .map_err(|source| SweepError::Network { index, source })?;
    Ok(network)
}

/// Generate, simulate and analyse one combination without touching the filesystem.
pub fn simulate_combination(
    config: &CritnetConfig,
    schedule: &Schedule,
    combination: &Combination,
    seed: u64,
) -> SweepResult<(SpikeRecord, AvalancheStats)> {
    let index = combination.index;
    let network = simulate_network(config, schedule, combination, seed)?;

    let spikes = network
        .spike_history()
        .map_err(|source| SweepError::Network { index, source })?;
    let stats = AvalancheStats::from_spike_matrix(spikes.view())
        .map_err(|source| SweepError::Analysis { index, source })?;
    let record = SpikeRecord::from_dense(combination.record_key(), Some(seed), spikes.view())?;

    Ok((record, stats))
}

/// Run one combination and write its spike record into `output_dir`.
pub fn run_combination(
    config: &CritnetConfig,
    schedule: &Schedule,
    combination: &Combination,
    seed: u64,
    output_dir: &Path,
) -> SweepResult<RunSummary> {
    let (record, stats) = simulate_combination(config, schedule, combination, seed)?;
    let file = output_dir.join(record.key.file_name());
    save_spike_record(&record, &file)?;

    let size_density = log_binned_density(&stats.sizes, SIZE_DENSITY_BINS).map_err(|source| {
        SweepError::Analysis {
            index: combination.index,
            source,
        }
    })?;

    debug!(
        target: "critnet-sweep",
        "[SWEEP] #{} {} p={} eff={} omega={}: {} spikes, {} avalanches",
        combination.index,
        combination.topology,
        combination.proportion_inhib,
        combination.synaptic_efficacy,
        combination.omega,
        record.spike_count(),
        stats.count
    );

    Ok(RunSummary {
        key: record.key.clone(),
        seed,
        file,
        neurons: record.neurons,
        steps: record.steps,
        spikes: record.spike_count(),
        avalanches: stats.count,
        mean_size: stats.mean_size(),
        mean_duration: stats.mean_duration(),
        size_density,
    })
}

/// Run the whole sweep described by `config` and write `summary.json`.
///
/// `config` is expected to have passed `critnet_config::validate_config`. A missing seed is
/// replaced by one drawn from the OS so every record stays reproducible.
pub fn run_sweep(config: &CritnetConfig) -> SweepResult<Vec<RunSummary>> {
    let schedule = Schedule::new(&config.schedule.durations, &config.schedule.probabilities)
        .map_err(SweepError::Schedule)?;
    let grid = combinations(config).map_err(SweepError::Grid)?;
    let base_seed = config.simulation.seed.unwrap_or_else(rand::random);
    let output_dir = &config.sweep.output_dir;
    std::fs::create_dir_all(output_dir)?;

    if config.thalamus.omega.is_some() {
        warn!(
            target: "critnet-sweep",
            "[SWEEP] thalamus.omega applies to single runs; the sweep uses sweep.omega"
        );
    }
    if recorded_variables(config)?
        .iter()
        .any(|&var| var != HistoryVariable::Spikes)
    {
        warn!(
            target: "critnet-sweep",
            "[SWEEP] Recording {:?} for every combination; only spikes are written to disk",
            config.simulation.history
        );
    }

    info!(
        target: "critnet-sweep",
        "[SWEEP] {} combinations, {} steps each, base seed {}, writing to {}",
        grid.len(),
        schedule.total_steps(),
        base_seed,
        output_dir.display()
    );

    let summaries = grid
        .par_iter()
        .map(|combination| {
            let seed = base_seed.wrapping_add(combination.index as u64);
            run_combination(config, &schedule, combination, seed, output_dir)
        })
        .collect::<SweepResult<Vec<_>>>()?;

    let summary_path = output_dir.join(SUMMARY_FILE_NAME);
    let file = std::io::BufWriter::new(std::fs::File::create(&summary_path)?);
    serde_json::to_writer_pretty(file, &summaries)?;

    info!(
        target: "critnet-sweep",
        "[SWEEP] Completed {} runs, {} total avalanches",
        summaries.len(),
        summaries.iter().map(|s| s.avalanches).sum::<usize>()
    );
    Ok(summaries)
}

/// Run the configured schedule once on a single topology and write its spike record.
///
/// Uses `simulation.synaptic_efficacy`, `thalamus.omega` and `simulation.seed` (drawn from
/// the OS when absent) instead of the sweep grid.
pub fn run_single(
    config: &CritnetConfig,
    topology: &str,
    proportion_inhib: f64,
) -> SweepResult<RunSummary> {
    let schedule = Schedule::new(&config.schedule.durations, &config.schedule.probabilities)
        .map_err(SweepError::Schedule)?;
    let topo = &config.topology;
    let topology = Topology::from_name(topology, topo.k, topo.rewire, topo.k_out_max)
        .map_err(SweepError::Grid)?;
    let combination = single_combination(config, topology, proportion_inhib);
    let seed = config.simulation.seed.unwrap_or_else(rand::random);
    let output_dir = &config.sweep.output_dir;
    std::fs::create_dir_all(output_dir)?;

    info!(
        target: "critnet-sweep",
        "[SWEEP] Single run {} p={} eff={} omega={}, seed {}",
        combination.topology,
        combination.proportion_inhib,
        combination.synaptic_efficacy,
        combination.omega,
        seed
    );
    run_combination(config, &schedule, &combination, seed, output_dir)
}
