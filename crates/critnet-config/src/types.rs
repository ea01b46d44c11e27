// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! Each section maps onto a table in `critnet_configuration.toml`. Every field has a default,
//! so a partial (or empty) file is always valid TOML for [`CritnetConfig`].

use critnet_npu_neural::NetworkParameters;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CritnetConfig {
    pub simulation: SimulationConfig,
    pub thalamus: ThalamusConfig,
    pub schedule: ScheduleConfig,
    pub topology: TopologyConfig,
    pub sweep: SweepConfig,
    pub logging: LoggingConfig,
}

/// Neuron and synapse parameters shared by every run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Recovery time constant (steps)
    pub tau_r: f64,
    /// Depression time constant (steps)
    pub tau_d: f64,
    /// Fraction of the potential lost per step
    pub leakage: f64,
    /// Default synaptic efficacy when not swept
    pub synaptic_efficacy: f64,
    /// Base seed; `None` draws from OS entropy
    pub seed: Option<u64>,
    /// Variables recorded every step, by name (`spikes`, `potential`, `v`, `s`, ...)
    pub history: Vec<String>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let defaults = NetworkParameters::default();
        Self {
            tau_r: defaults.tau_r,
            tau_d: defaults.tau_d,
            leakage: defaults.leakage,
            synaptic_efficacy: defaults.synaptic_efficacy,
            seed: None,
            history: vec!["spikes".to_string()],
        }
    }
}

impl SimulationConfig {
    /// Engine-facing parameter value
    pub fn parameters(&self) -> NetworkParameters {
        NetworkParameters {
            tau_r: self.tau_r,
            tau_d: self.tau_d,
            leakage: self.leakage,
            synaptic_efficacy: self.synaptic_efficacy,
        }
    }
}

/// Thalamic weight policy for single runs
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ThalamusConfig {
    /// Scale `x` giving `x / n` per neuron; absent means `8 / n`
    pub omega: Option<f64>,
}

/// Phase list, paired element-wise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub durations: Vec<usize>,
    pub probabilities: Vec<f64>,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            durations: vec![100, 100, 100, 200, 10000],
            probabilities: vec![0.00005, 0.0005, 0.005, 0.01, 0.005],
        }
    }
}

/// Topology generator parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopologyConfig {
    pub neurons: usize,
    /// Ring degree for lattice and small-world
    pub k: usize,
    /// Fraction of edges rewired in small-world
    pub rewire: f64,
    /// Largest out-degree drawn for scale-free
    pub k_out_max: usize,
    /// Explicit target mean weight; absent uses the per-topology automatic target
    pub avg_strength: Option<f64>,
}

impl Default for TopologyConfig {
    fn default() -> Self {
        Self {
            neurons: 500,
            k: 4,
            rewire: 0.1,
            k_out_max: 100,
            avg_strength: None,
        }
    }
}

/// Parameter grid for `critnet-sweep`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub repetitions: usize,
    pub proportion_inhib: Vec<f64>,
    pub synaptic_efficacy: Vec<f64>,
    pub omega: Vec<f64>,
    pub topologies: Vec<String>,
    pub output_dir: PathBuf,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            repetitions: 3,
            proportion_inhib: vec![0.1, 0.2, 0.3],
            synaptic_efficacy: vec![0.1, 0.275, 0.45, 0.625, 0.8],
            omega: vec![0.1, 0.35, 1.26, 4.47, 15.85],
            topologies: vec![
                "full".to_string(),
                "small_world".to_string(),
                "scale_free".to_string(),
            ],
            output_dir: PathBuf::from("data"),
        }
    }
}

impl SweepConfig {
    /// Number of runs in the cartesian product
    pub fn combination_count(&self) -> usize {
        self.repetitions
            * self.proportion_inhib.len()
            * self.synaptic_efficacy.len()
            * self.omega.len()
            * self.topologies.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Directory for run folders when file logging is on; defaults to `./logs`
    pub log_dir: Option<PathBuf>,
    pub file_logging: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: None,
            file_logging: false,
        }
    }
}
