// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Sparse spike records
//!
//! A recorded spike history is an n × T boolean matrix that is almost entirely false, so it
//! is stored in coordinate form: one `(row, col)` pair per spike, in row-major order.

use ndarray::{Array1, Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::{Result, SpikeRecordError};

/// Parameter combination a record was produced under
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordKey {
    /// Repetition index within the sweep
    pub repetition: usize,
    /// Topology name (`full`, `lattice`, `small_world`, `scale_free`)
    pub topology: String,
    /// Thalamic weight scale
    pub omega: f64,
    pub proportion_inhib: f64,
    pub synaptic_efficacy: f64,
}

impl RecordKey {
    /// `s{repetition}_W{topology}_omg{omega}_p{proportion_inhib}_eff{synaptic_efficacy}.spk`
    pub fn file_name(&self) -> String {
        format!(
            "s{}_W{}_omg{}_p{}_eff{}.{}",
            self.repetition,
            self.topology,
            self.omega,
            self.proportion_inhib,
            self.synaptic_efficacy,
            crate::FILE_EXTENSION
        )
    }
}

/// Spike matrix in coordinate (COO) form with its sweep key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpikeRecord {
    pub key: RecordKey,
    /// Seed the engine ran with, when known
    pub seed: Option<u64>,
    /// Number of neurons (rows)
    pub neurons: usize,
    /// Number of recorded steps (columns)
    pub steps: usize,
    /// Neuron index of every spike
    pub rows: Vec<u32>,
    /// Step index of every spike, parallel to `rows`
    pub cols: Vec<u32>,
}

impl SpikeRecord {
    /// Compress a dense n × T spike matrix.
    pub fn from_dense(
        key: RecordKey,
        seed: Option<u64>,
        spikes: ArrayView2<'_, bool>,
    ) -> Result<Self> {
        let (neurons, steps) = spikes.dim();
        if u32::try_from(neurons).is_err() || u32::try_from(steps).is_err() {
            return Err(SpikeRecordError::TooLarge { neurons, steps });
        }
        let (rows, cols): (Vec<u32>, Vec<u32>) = spikes
            .indexed_iter()
            .filter(|(_, &fired)| fired)
            .map(|((i, t), _)| (i as u32, t as u32))
            .unzip();
        Ok(Self {
            key,
            seed,
            neurons,
            steps,
            rows,
            cols,
        })
    }

    /// Expand back to an n × T matrix.
    pub fn to_dense(&self) -> Result<Array2<bool>> {
        self.check_bounds()?;
        let mut dense = Array2::from_elem((self.neurons, self.steps), false);
        for (&i, &t) in self.rows.iter().zip(&self.cols) {
            dense[[i as usize, t as usize]] = true;
        }
        Ok(dense)
    }

    /// Population spike count per step
    pub fn activity(&self) -> Result<Array1<f64>> {
        self.check_bounds()?;
        let mut activity = Array1::zeros(self.steps);
        for &t in &self.cols {
            activity[t as usize] += 1.0;
        }
        Ok(activity)
    }

    pub fn spike_count(&self) -> usize {
        self.rows.len()
    }

    /// Fraction of (neuron, step) cells that spiked
    pub fn density(&self) -> f64 {
        let cells = self.neurons * self.steps;
        if cells == 0 {
            0.0
        } else {
            self.spike_count() as f64 / cells as f64
        }
    }

    /// Coordinates must be parallel and inside the declared shape.
    pub(crate) fn check_bounds(&self) -> Result<()> {
        if self.rows.len() != self.cols.len() {
            return Err(SpikeRecordError::Corrupt(format!(
                "{} row indices but {} column indices",
                self.rows.len(),
                self.cols.len()
            )));
        }
        let out_of_range = self
            .rows
            .iter()
            .zip(&self.cols)
            .find(|(&i, &t)| i as usize >= self.neurons || t as usize >= self.steps);
        if let Some((&i, &t)) = out_of_range {
            return Err(SpikeRecordError::Corrupt(format!(
                "spike at ({i}, {t}) outside shape ({}, {})",
                self.neurons, self.steps
            )));
        }
        Ok(())
    }
}
