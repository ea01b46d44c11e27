// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # History Recorder
//!
//! Append-only per-variable logs, one snapshot per simulated step. The set of recorded
//! variables is fixed when the recorder is built.
//!
//! Every snapshot is an owned deep copy: the engine mutates `v`, `W` and `omega` in place
//! each step, so a log entry must never share storage with live state.

use ahash::AHashMap;
use critnet_npu_neural::{HistoryVariable, NetworkError, Result};
use ndarray::{Array1, Array2, Array3};

/// Borrowed view of the state at the end of a step
pub(crate) struct StateView<'a> {
    pub potential: &'a Array1<f64>,
    pub spikes: &'a Array1<bool>,
    pub thalamic_weights: &'a Array1<f64>,
    pub weights: &'a Array2<f64>,
    pub thalamic_spikes: &'a Array1<bool>,
    pub drive_probability: f64,
}

#[derive(Debug, Clone)]
enum Log {
    Real(Vec<Array1<f64>>),
    Flags(Vec<Array1<bool>>),
    Matrices(Vec<Array2<f64>>),
    Scalars(Vec<f64>),
}

impl Log {
    fn for_variable(var: HistoryVariable) -> Self {
        match var {
            HistoryVariable::Potential | HistoryVariable::ThalamicWeights => Log::Real(Vec::new()),
            HistoryVariable::Spikes | HistoryVariable::ThalamicSpikes => Log::Flags(Vec::new()),
            HistoryVariable::Weights => Log::Matrices(Vec::new()),
            HistoryVariable::DriveProbability => Log::Scalars(Vec::new()),
        }
    }

    fn len(&self) -> usize {
        match self {
            Log::Real(v) => v.len(),
            Log::Flags(v) => v.len(),
            Log::Matrices(v) => v.len(),
            Log::Scalars(v) => v.len(),
        }
    }
}

/// Recorded snapshots stacked along the step axis
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryArray {
    /// Real vectors as n × T (column t is step t)
    Float(Array2<f64>),
    /// Boolean vectors as n × T
    Bool(Array2<bool>),
    /// Weight matrices as T × n × n
    Matrices(Array3<f64>),
    /// Scalars as length T
    Scalars(Array1<f64>),
}

impl HistoryArray {
    /// Number of recorded steps
    pub fn steps(&self) -> usize {
        match self {
            HistoryArray::Float(a) => a.ncols(),
            HistoryArray::Bool(a) => a.ncols(),
            HistoryArray::Matrices(a) => a.shape()[0],
            HistoryArray::Scalars(a) => a.len(),
        }
    }

    pub fn into_float(self) -> Option<Array2<f64>> {
        match self {
            HistoryArray::Float(a) => Some(a),
            _ => None,
        }
    }

    pub fn into_bool(self) -> Option<Array2<bool>> {
        match self {
            HistoryArray::Bool(a) => Some(a),
            _ => None,
        }
    }

    pub fn into_matrices(self) -> Option<Array3<f64>> {
        match self {
            HistoryArray::Matrices(a) => Some(a),
            _ => None,
        }
    }

    pub fn into_scalars(self) -> Option<Array1<f64>> {
        match self {
            HistoryArray::Scalars(a) => Some(a),
            _ => None,
        }
    }
}

/// Per-variable append-only logs
#[derive(Debug, Clone)]
pub struct HistoryRecorder {
    neuron_count: usize,
    variables: Vec<HistoryVariable>,
    logs: AHashMap<HistoryVariable, Log>,
}

impl HistoryRecorder {
    /// Duplicate variables are recorded once.
    pub fn new(neuron_count: usize, variables: &[HistoryVariable]) -> Self {
        let mut unique = Vec::with_capacity(variables.len());
        let mut logs = AHashMap::with_capacity(variables.len());
        for &var in variables {
            if !logs.contains_key(&var) {
                logs.insert(var, Log::for_variable(var));
                unique.push(var);
            }
        }
        Self {
            neuron_count,
            variables: unique,
            logs,
        }
    }

    /// Variables recorded, in the order first requested
    pub fn variables(&self) -> &[HistoryVariable] {
        &self.variables
    }

    pub fn is_recording(&self, var: HistoryVariable) -> bool {
        self.logs.contains_key(&var)
    }

    /// Number of snapshots held for `var` (0 when not recorded)
    pub fn len(&self, var: HistoryVariable) -> usize {
        self.logs.get(&var).map_or(0, Log::len)
    }

    /// Append one deep-copied snapshot of every recorded variable.
    pub(crate) fn record(&mut self, state: &StateView<'_>) {
        for (var, log) in self.logs.iter_mut() {
            match (var, log) {
                (HistoryVariable::Potential, Log::Real(v)) => v.push(state.potential.clone()),
                (HistoryVariable::ThalamicWeights, Log::Real(v)) => {
                    v.push(state.thalamic_weights.clone())
                }
                (HistoryVariable::Spikes, Log::Flags(v)) => v.push(state.spikes.clone()),
                (HistoryVariable::ThalamicSpikes, Log::Flags(v)) => {
                    v.push(state.thalamic_spikes.clone())
                }
                (HistoryVariable::Weights, Log::Matrices(v)) => v.push(state.weights.clone()),
                (HistoryVariable::DriveProbability, Log::Scalars(v)) => {
                    v.push(state.drive_probability)
                }
                // Logs are created by Log::for_variable, so the pairing above is exhaustive.
                _ => {}
            }
        }
    }

    /// Stack every snapshot of `var` into one array ordered by step.
    pub fn stacked(&self, var: HistoryVariable) -> Result<HistoryArray> {
        let log = self
            .logs
            .get(&var)
            .ok_or(NetworkError::HistoryNotRecorded(var))?;
        let n = self.neuron_count;
        Ok(match log {
            Log::Real(snapshots) => {
                HistoryArray::Float(Array2::from_shape_fn((n, snapshots.len()), |(i, t)| {
                    snapshots[t][i]
                }))
            }
            Log::Flags(snapshots) => {
                HistoryArray::Bool(Array2::from_shape_fn((n, snapshots.len()), |(i, t)| {
                    snapshots[t][i]
                }))
            }
            Log::Matrices(snapshots) => HistoryArray::Matrices(Array3::from_shape_fn(
                (snapshots.len(), n, n),
                |(t, i, j)| snapshots[t][[i, j]],
            )),
            Log::Scalars(values) => HistoryArray::Scalars(Array1::from_vec(values.clone())),
        })
    }

    /// Population spike total per recorded step
    pub fn spike_counts(&self) -> Result<Array1<f64>> {
        match self.logs.get(&HistoryVariable::Spikes) {
            Some(Log::Flags(snapshots)) => Ok(snapshots
                .iter()
                .map(|s| s.iter().filter(|&&fired| fired).count() as f64)
                .collect()),
            _ => Err(NetworkError::HistoryNotRecorded(HistoryVariable::Spikes)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn view<'a>(
        v: &'a Array1<f64>,
        s: &'a Array1<bool>,
        w: &'a Array2<f64>,
        r: f64,
    ) -> StateView<'a> {
        StateView {
            potential: v,
            spikes: s,
            thalamic_weights: v,
            weights: w,
            thalamic_spikes: s,
            drive_probability: r,
        }
    }

    #[test]
    fn test_snapshots_are_deep_copies() {
        let mut recorder = HistoryRecorder::new(2, &[HistoryVariable::Potential]);
        let mut v = array![0.1, 0.2];
        let s = array![false, true];
        let w = Array2::zeros((2, 2));
        recorder.record(&view(&v, &s, &w, 0.0));
        v[0] = 9.0;
        recorder.record(&view(&v, &s, &w, 0.0));

        let stacked = recorder
            .stacked(HistoryVariable::Potential)
            .unwrap()
            .into_float()
            .unwrap();
        assert_eq!(stacked.shape(), &[2, 2]);
        assert_eq!(stacked[[0, 0]], 0.1);
        assert_eq!(stacked[[0, 1]], 9.0);
    }

    #[test]
    fn test_unrecorded_variable_is_an_error() {
        let recorder = HistoryRecorder::new(3, &[HistoryVariable::Spikes]);
        assert_eq!(
            recorder.stacked(HistoryVariable::Weights),
            Err(NetworkError::HistoryNotRecorded(HistoryVariable::Weights))
        );
    }

    #[test]
    fn test_empty_selection_records_nothing() {
        let mut recorder = HistoryRecorder::new(2, &[]);
        let v = array![0.0, 0.0];
        let s = array![false, false];
        let w = Array2::zeros((2, 2));
        recorder.record(&view(&v, &s, &w, 0.5));
        assert!(recorder.variables().is_empty());
        assert!(recorder.stacked(HistoryVariable::Spikes).is_err());
    }

    #[test]
    fn test_matrix_and_scalar_stacking() {
        let mut recorder = HistoryRecorder::new(
            2,
            &[
                HistoryVariable::Weights,
                HistoryVariable::DriveProbability,
                HistoryVariable::Weights,
            ],
        );
        assert_eq!(recorder.variables().len(), 2);
        let v = array![0.0, 0.0];
        let s = array![true, false];
        let w = array![[0.0, 0.5], [0.25, 0.0]];
        recorder.record(&view(&v, &s, &w, 0.01));
        recorder.record(&view(&v, &s, &w, 0.02));

        let matrices = recorder
            .stacked(HistoryVariable::Weights)
            .unwrap()
            .into_matrices()
            .unwrap();
        assert_eq!(matrices.shape(), &[2, 2, 2]);
        assert_eq!(matrices[[1, 1, 0]], 0.25);

        let rs = recorder
            .stacked(HistoryVariable::DriveProbability)
            .unwrap()
            .into_scalars()
            .unwrap();
        assert_eq!(rs, array![0.01, 0.02]);
        assert_eq!(recorder.len(HistoryVariable::Weights), 2);
    }

    #[test]
    fn test_spike_counts_per_step() {
        let mut recorder = HistoryRecorder::new(3, &[HistoryVariable::Spikes]);
        let v = array![0.0, 0.0, 0.0];
        let w = Array2::zeros((3, 3));
        recorder.record(&view(&v, &array![true, true, false], &w, 0.0));
        recorder.record(&view(&v, &array![false, false, false], &w, 0.0));
        assert_eq!(recorder.spike_counts().unwrap(), array![2.0, 0.0]);
    }
}
