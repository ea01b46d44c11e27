// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Avalanche Detection
//!
//! ```text
//! activity  a[0..T]               population spikes per step
//! padded    [0, a[0], ..., a[T-1]]  so the record starts quiescent
//! active    padded[t] >= 1
//! events    t where active[t] != active[t-1]
//! ```
//!
//! Events pair up as (start, end). An odd event count means the record ends inside an
//! avalanche; that last, unterminated avalanche is dropped because its size and duration
//! are not known yet.
//!
//! For each pair: `duration = end - start`, `size = sum(padded[start..end])`.

use ndarray::{ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, AnalysisResult};

/// One complete avalanche
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Avalanche {
    /// First active step, indexed in the original (unpadded) record
    pub start: usize,
    /// Number of active steps
    pub duration: usize,
    /// Total activity over the avalanche
    pub size: f64,
}

/// Find every complete avalanche in a per-step activity series.
pub fn detect_avalanches(activity: &[f64]) -> AnalysisResult<Vec<Avalanche>> {
    if let Some((step, &value)) = activity
        .iter()
        .enumerate()
        .find(|(_, a)| !(a.is_finite() && **a >= 0.0))
    {
        return Err(AnalysisError::InvalidActivity { step, value });
    }

    let padded: Vec<f64> = std::iter::once(0.0).chain(activity.iter().copied()).collect();
    let events: Vec<usize> = (1..padded.len())
        .filter(|&t| (padded[t] >= 1.0) != (padded[t - 1] >= 1.0))
        .collect();

    // chunks_exact drops a trailing unpaired event
    Ok(events
        .chunks_exact(2)
        .map(|pair| {
            let (start, end) = (pair[0], pair[1]);
            Avalanche {
                start: start - 1,
                duration: end - start,
                size: padded[start..end].iter().sum(),
            }
        })
        .collect())
}

/// Count, sizes and durations of the complete avalanches in a record
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AvalancheStats {
    pub count: usize,
    /// Sizes in order of occurrence
    pub sizes: Vec<f64>,
    /// Durations in order of occurrence, parallel to `sizes`
    pub durations: Vec<usize>,
}

impl AvalancheStats {
    /// Statistics of a per-step activity series (one non-negative value per step).
    pub fn from_activity(activity: &[f64]) -> AnalysisResult<Self> {
        let avalanches = detect_avalanches(activity)?;
        Ok(Self {
            count: avalanches.len(),
            sizes: avalanches.iter().map(|a| a.size).collect(),
            durations: avalanches.iter().map(|a| a.duration).collect(),
        })
    }

    /// Statistics of an n × T spike matrix, summing over neurons per step.
    pub fn from_spike_matrix(spikes: ArrayView2<'_, bool>) -> AnalysisResult<Self> {
        let activity: Vec<f64> = spikes
            .axis_iter(Axis(1))
            .map(|step| step.iter().filter(|&&s| s).count() as f64)
            .collect();
        Self::from_activity(&activity)
    }

    /// Statistics of an n × T count matrix, summing over rows per step.
    pub fn from_count_matrix(counts: ArrayView2<'_, f64>) -> AnalysisResult<Self> {
        let activity = counts.sum_axis(Axis(0));
        Self::from_activity(&activity.to_vec())
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn mean_size(&self) -> Option<f64> {
        (!self.sizes.is_empty()).then(|| self.sizes.iter().sum::<f64>() / self.sizes.len() as f64)
    }

    pub fn mean_duration(&self) -> Option<f64> {
        (!self.durations.is_empty())
            .then(|| self.durations.iter().sum::<usize>() as f64 / self.durations.len() as f64)
    }

    pub fn max_size(&self) -> Option<f64> {
        self.sizes.iter().copied().reduce(f64::max)
    }

    /// Durations as reals, for log binning
    pub fn durations_f64(&self) -> Vec<f64> {
        self.durations.iter().map(|&d| d as f64).collect()
    }
}
