// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Log-binned event densities
//!
//! Histogram of `log10(events)` over equal-width bins spanning `[min, max]`, reported with
//! bin starts mapped back to linear scale. Used for size and duration distributions, which
//! are expected to follow power laws near criticality.

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, AnalysisResult};

/// Counts per logarithmic bin
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LogBinnedDensity {
    /// Left edge of each bin, `10^edge`
    pub bin_starts: Vec<f64>,
    pub counts: Vec<usize>,
}

impl LogBinnedDensity {
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Total number of binned events
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Bin `events` into `bins` equal-width bins in log10 space.
///
/// The last bin includes the maximum. When every event has the same value the range is
/// widened to `log10(x) ± 0.5`.
pub fn log_binned_density(events: &[f64], bins: usize) -> AnalysisResult<LogBinnedDensity> {
    if bins == 0 {
        return Err(AnalysisError::InvalidBinCount);
    }
    if events.is_empty() {
        return Ok(LogBinnedDensity::default());
    }
    if let Some((index, &value)) = events
        .iter()
        .enumerate()
        .find(|(_, e)| !(e.is_finite() && **e > 0.0))
    {
        return Err(AnalysisError::NonPositiveEvent { index, value });
    }

    let logs: Vec<f64> = events.iter().map(|e| e.log10()).collect();
    let mut lo = logs.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = logs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;

    let mut counts = vec![0usize; bins];
    for &x in &logs {
        let bin = (((x - lo) / width) as usize).min(bins - 1);
        counts[bin] += 1;
    }
    let bin_starts = (0..bins)
        .map(|b| 10f64.powf(lo + b as f64 * width))
        .collect();

    Ok(LogBinnedDensity { bin_starts, counts })
}
