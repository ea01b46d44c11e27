// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Network Engine
//!
//! Owns the live state of one stochastic spiking network and advances it one discrete step
//! at a time.
//!
//! ## State
//! - `v` membrane potential, `s` spikes, `s_thalamus` thalamic spikes (length n)
//! - `W` live weights and `W0` baseline (n × n, row = postsynaptic, column = presynaptic)
//! - `omega` live thalamic weights and `omega0` baseline (length n)
//! - `r` thalamic drive probability, set by each phase and kept until overwritten
//!
//! ## Step
//! ```text
//! 1. emit spikes      s = v ≥ U[0,1),  v[s] = 0          n draws
//! 2. propagate        flux = W · s
//! 3. thalamic input   s_th = U[0,1) < r, ext = s_th ⊙ omega   n draws
//! 4. membrane         u = v + efficacy · flux + ext,  v = u - leakage · u
//! 5. plasticity       W, omega recover toward W0, omega0 and depress where used
//! 6. record history   deep copies of the selected variables
//! ```
//!
//! The order is fixed; given the same seed and inputs every run is bit-identical.
//!
//! Per-step tracing is off by default. Enable with `CRITNET_TRACE_DYNAMICS=1`, optionally
//! restricted to one neuron with `CRITNET_TRACE_NEURON=<index>`.

use std::sync::OnceLock;

use critnet_npu_neural::{
    depress_and_recover_vector, depress_and_recover_weights, emit_spikes, external_input,
    propagate_spikes, synaptic_input, thalamic_spikes, update_membrane, HistoryVariable,
    NetworkError, NetworkParameters, Result,
};
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, trace};

use crate::history::{HistoryArray, HistoryRecorder, StateView};
use crate::schedule::{validate_drive_probability, Schedule};

/// Thalamic weight per neuron when none is supplied, divided by n
pub const DEFAULT_THALAMIC_SCALE: f64 = 8.0;

struct DynamicsTraceCfg {
    enabled: bool,
    neuron_filter: Option<usize>,
}

fn dynamics_trace_cfg() -> &'static DynamicsTraceCfg {
    static CFG: OnceLock<DynamicsTraceCfg> = OnceLock::new();
    CFG.get_or_init(|| {
        let enabled = std::env::var("CRITNET_TRACE_DYNAMICS")
            .ok()
            .as_deref()
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let neuron_filter = std::env::var("CRITNET_TRACE_NEURON")
            .ok()
            .and_then(|v| v.parse().ok());

        DynamicsTraceCfg {
            enabled,
            neuron_filter,
        }
    })
}

/// Initial thalamic weights
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ThalamicWeights {
    /// `8 / n` for every neuron
    #[default]
    Default,
    /// `x / n` for every neuron
    Scalar(f64),
    /// Explicit per-neuron weights (length n, strictly positive)
    PerNeuron(Array1<f64>),
}

impl ThalamicWeights {
    fn resolve(&self, n: usize) -> Result<Array1<f64>> {
        let omega = match self {
            ThalamicWeights::Default => Array1::from_elem(n, DEFAULT_THALAMIC_SCALE / n as f64),
            ThalamicWeights::Scalar(x) => Array1::from_elem(n, x / n as f64),
            ThalamicWeights::PerNeuron(values) => {
                if values.len() != n {
                    return Err(NetworkError::ShapeMismatch {
                        what: "thalamic weights",
                        expected: vec![n],
                        actual: vec![values.len()],
                    });
                }
                values.clone()
            }
        };
        if let Some(bad) = omega.iter().find(|x| !(x.is_finite() && **x > 0.0)) {
            return Err(NetworkError::invalid(
                "thalamic_weights",
                format!("must be finite and strictly positive, got {bad}"),
            ));
        }
        Ok(omega)
    }
}

/// Construction options for [`Network`]
#[derive(Debug, Clone)]
pub struct NetworkOptions {
    /// Initial membrane potential; all zero when `None`
    pub initial_potential: Option<Array1<f64>>,
    pub thalamic_weights: ThalamicWeights,
    pub parameters: NetworkParameters,
    /// Variables snapshotted after every step
    pub history: Vec<HistoryVariable>,
    /// Seed for the engine's random source; drawn from the OS when `None`
    pub seed: Option<u64>,
}

impl Default for NetworkOptions {
    fn default() -> Self {
        Self {
            initial_potential: None,
            thalamic_weights: ThalamicWeights::Default,
            parameters: NetworkParameters::default(),
            history: vec![HistoryVariable::Spikes],
            seed: None,
        }
    }
}

impl NetworkOptions {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_history(mut self, history: Vec<HistoryVariable>) -> Self {
        self.history = history;
        self
    }

    pub fn with_parameters(mut self, parameters: NetworkParameters) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_thalamic_weights(mut self, thalamic_weights: ThalamicWeights) -> Self {
        self.thalamic_weights = thalamic_weights;
        self
    }

    pub fn with_initial_potential(mut self, potential: Array1<f64>) -> Self {
        self.initial_potential = Some(potential);
        self
    }
}

/// Statistics of one completed phase
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseSummary {
    pub steps: usize,
    pub drive_probability: f64,
    /// Total spikes emitted during the phase
    pub spikes: u64,
    /// Total thalamic spikes delivered during the phase
    pub thalamic_spikes: u64,
}

/// A stochastic spiking network with short-term synaptic depression
#[derive(Debug, Clone)]
pub struct Network {
    weights: Array2<f64>,
    baseline_weights: Array2<f64>,
    thalamic_weights: Array1<f64>,
    baseline_thalamic_weights: Array1<f64>,
    potential: Array1<f64>,
    spikes: Array1<bool>,
    thalamic_spikes: Array1<bool>,
    drive_probability: f64,
    parameters: NetworkParameters,
    history: HistoryRecorder,
    steps_run: u64,
    rng: StdRng,
}

impl Network {
    /// Build a network seeded from `options.seed` (or OS entropy).
    pub fn new(weights: Array2<f64>, options: NetworkOptions) -> Result<Self> {
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(weights, options, rng)
    }

    /// Build a network that draws from a caller-provided random source.
    ///
    /// Every input is validated before anything is stored.
    pub fn with_rng(weights: Array2<f64>, options: NetworkOptions, rng: StdRng) -> Result<Self> {
        let n = validate_weights(&weights)?;
        options.parameters.validate()?;

        let potential = match options.initial_potential {
            Some(v) if v.len() != n => {
                return Err(NetworkError::ShapeMismatch {
                    what: "initial potential",
                    expected: vec![n],
                    actual: vec![v.len()],
                })
            }
            Some(v) if v.iter().any(|x| !x.is_finite()) => {
                return Err(NetworkError::invalid(
                    "initial_potential",
                    "must contain only finite values",
                ))
            }
            Some(v) => v,
            None => Array1::zeros(n),
        };
        let thalamic_weights = options.thalamic_weights.resolve(n)?;
        let history = HistoryRecorder::new(n, &options.history);

        info!(
            target: "critnet-npu-engine",
            "[NETWORK] Built network: {} neurons, {} synapses, history {:?}",
            n,
            weights.iter().filter(|w| **w != 0.0).count(),
            history.variables()
        );

        Ok(Self {
            baseline_weights: weights.clone(),
            weights,
            baseline_thalamic_weights: thalamic_weights.clone(),
            thalamic_weights,
            potential,
            spikes: Array1::from_elem(n, false),
            thalamic_spikes: Array1::from_elem(n, false),
            drive_probability: 0.0,
            parameters: options.parameters,
            history,
            steps_run: 0,
            rng,
        })
    }

    /// Advance one step at the current drive probability.
    pub fn step(&mut self) {
        let params = self.parameters;

        // 1. Spike emission (resets firing neurons to 0)
        self.spikes = emit_spikes(&mut self.potential, &mut self.rng);

        // 2. Propagation
        let flux = propagate_spikes(&self.weights, &self.spikes);

        // 3. Thalamic input
        self.thalamic_spikes = thalamic_spikes(
            self.potential.len(),
            self.drive_probability,
            &mut self.rng,
        );
        let external = external_input(&self.thalamic_spikes, &self.thalamic_weights);

        // 4. Membrane update, leakage last
        let input = synaptic_input(&flux, params.synaptic_efficacy) + &external;
        update_membrane(&mut self.potential, &input, params.leakage);

        // 5. Plasticity with this step's spike vectors
        depress_and_recover_weights(
            &mut self.weights,
            &self.baseline_weights,
            &self.spikes,
            params.recovery_rate(),
            params.depression_rate(),
        );
        depress_and_recover_vector(
            &mut self.thalamic_weights,
            &self.baseline_thalamic_weights,
            &self.thalamic_spikes,
            params.recovery_rate(),
            params.depression_rate(),
        );

        self.steps_run += 1;
        self.trace_step();

        // 6. History
        self.history.record(&StateView {
            potential: &self.potential,
            spikes: &self.spikes,
            thalamic_weights: &self.thalamic_weights,
            weights: &self.weights,
            thalamic_spikes: &self.thalamic_spikes,
            drive_probability: self.drive_probability,
        });
    }

    /// Run `steps` steps at drive probability `r`; `r` stays in effect afterwards.
    pub fn run_phase(&mut self, drive_probability: f64, steps: usize) -> Result<PhaseSummary> {
        validate_drive_probability(drive_probability)?;
        self.drive_probability = drive_probability;

        let mut summary = PhaseSummary {
            steps,
            drive_probability,
            spikes: 0,
            thalamic_spikes: 0,
        };
        for _ in 0..steps {
            self.step();
            summary.spikes += count_true(&self.spikes);
            summary.thalamic_spikes += count_true(&self.thalamic_spikes);
        }

        debug!(
            target: "critnet-npu-engine",
            "[PHASE] r={} steps={} spikes={} thalamic={} mean_v={:.6}",
            drive_probability,
            steps,
            summary.spikes,
            summary.thalamic_spikes,
            self.potential.mean().unwrap_or(0.0)
        );
        Ok(summary)
    }

    /// Run every phase of `schedule` back to back without resetting state.
    pub fn run_schedule(&mut self, schedule: &Schedule) -> Result<Vec<PhaseSummary>> {
        info!(
            target: "critnet-npu-engine",
            "[SCHEDULE] Running {} phases, {} steps",
            schedule.len(),
            schedule.total_steps()
        );
        schedule
            .phases()
            .iter()
            .map(|phase| self.run_phase(phase.drive_probability, phase.steps))
            .collect()
    }

    /// Validate parallel lists, then run them as a schedule.
    pub fn run_schedule_lists(
        &mut self,
        durations: &[usize],
        probabilities: &[f64],
    ) -> Result<Vec<PhaseSummary>> {
        let schedule = Schedule::new(durations, probabilities)?;
        self.run_schedule(&schedule)
    }

    /// All snapshots of `var`, stacked by step
    pub fn history(&self, var: HistoryVariable) -> Result<HistoryArray> {
        self.history.stacked(var)
    }

    /// Look up a variable by name (`"s"`, `"spikes"`, `"W"`, ...).
    pub fn history_by_name(&self, name: &str) -> Result<HistoryArray> {
        self.history(name.parse()?)
    }

    /// Spike history as n × T
    pub fn spike_history(&self) -> Result<Array2<bool>> {
        self.history(HistoryVariable::Spikes).map(|h| {
            h.into_bool()
                .unwrap_or_else(|| Array2::from_elem((self.neuron_count(), 0), false))
        })
    }

    /// Potential history as n × T
    pub fn potential_history(&self) -> Result<Array2<f64>> {
        self.history(HistoryVariable::Potential).map(|h| {
            h.into_float()
                .unwrap_or_else(|| Array2::zeros((self.neuron_count(), 0)))
        })
    }

    /// Population spike total per recorded step
    pub fn spike_counts(&self) -> Result<Array1<f64>> {
        self.history.spike_counts()
    }

    pub fn recorded_variables(&self) -> &[HistoryVariable] {
        self.history.variables()
    }

    pub fn potential(&self) -> &Array1<f64> {
        &self.potential
    }

    pub fn spikes(&self) -> &Array1<bool> {
        &self.spikes
    }

    pub fn weights(&self) -> &Array2<f64> {
        &self.weights
    }

    pub fn baseline_weights(&self) -> &Array2<f64> {
        &self.baseline_weights
    }

    pub fn thalamic_weights(&self) -> &Array1<f64> {
        &self.thalamic_weights
    }

    pub fn baseline_thalamic_weights(&self) -> &Array1<f64> {
        &self.baseline_thalamic_weights
    }

    pub fn thalamic_spikes(&self) -> &Array1<bool> {
        &self.thalamic_spikes
    }

    pub fn drive_probability(&self) -> f64 {
        self.drive_probability
    }

    pub fn steps_run(&self) -> u64 {
        self.steps_run
    }

    pub fn neuron_count(&self) -> usize {
        self.potential.len()
    }

    pub fn parameters(&self) -> &NetworkParameters {
        &self.parameters
    }

    fn trace_step(&self) {
        let cfg = dynamics_trace_cfg();
        if !cfg.enabled {
            return;
        }
        match cfg.neuron_filter {
            Some(i) if i < self.neuron_count() => trace!(
                target: "critnet-npu-trace",
                "[DYN] step={} neuron={} v={:.6} s={} s_th={} omega={:.6}",
                self.steps_run,
                i,
                self.potential[i],
                self.spikes[i],
                self.thalamic_spikes[i],
                self.thalamic_weights[i]
            ),
            Some(_) => {}
            None => trace!(
                target: "critnet-npu-trace",
                "[DYN] step={} r={} spikes={} thalamic={}",
                self.steps_run,
                self.drive_probability,
                count_true(&self.spikes),
                count_true(&self.thalamic_spikes)
            ),
        }
    }
}

fn count_true(flags: &Array1<bool>) -> u64 {
    flags.iter().filter(|&&x| x).count() as u64
}

/// Square, finite, zero diagonal. Returns n.
fn validate_weights(weights: &Array2<f64>) -> Result<usize> {
    let (rows, cols) = weights.dim();
    if rows != cols {
        return Err(NetworkError::ShapeMismatch {
            what: "weight matrix",
            expected: vec![rows, rows],
            actual: vec![rows, cols],
        });
    }
    if rows == 0 {
        return Err(NetworkError::invalid(
            "weights",
            "network must have at least one neuron",
        ));
    }
    if weights.iter().any(|w| !w.is_finite()) {
        return Err(NetworkError::invalid(
            "weights",
            "must contain only finite values",
        ));
    }
    if let Some(i) = (0..rows).find(|&i| weights[[i, i]] != 0.0) {
        return Err(NetworkError::invalid(
            "weights",
            format!("self-connection on neuron {i}; the diagonal must be zero"),
        ));
    }
    Ok(rows)
}
