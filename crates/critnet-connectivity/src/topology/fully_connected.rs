// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Fully connected baseline
//!
//! ```text
//! 1. W ~ U[0,1)^(n×n)                     n² draws, row-major
//! 2. inhibitory[j] = U[0,1) < p           n draws
//! 3. W[:, j] = -W[:, j] for inhibitory j
//! 4. W = W × (avg_strength / mean(W))     signed mean, diagonal included
//! 5. diag(W) = 0
//! ```
//!
//! Structured topologies mask this matrix, so they share its draws and sign assignment.

use ndarray::{Array1, Array2};
use rand::Rng;
use tracing::info;

use super::{validate_inhibitory_proportion, validate_neuron_count};
use crate::types::{AvgStrength, GeneratedTopology, TopologyError, TopologyResult};

/// Dense random network with mean weight `avg_strength` (1/n when automatic).
pub fn fully_connected<R: Rng + ?Sized>(
    n: usize,
    proportion_inhib: f64,
    avg_strength: AvgStrength,
    rng: &mut R,
) -> TopologyResult<GeneratedTopology> {
    validate_neuron_count(n)?;
    validate_inhibitory_proportion(proportion_inhib)?;
    let target = avg_strength.resolve(1.0 / n as f64)?;

    let topology = base_weights(n, proportion_inhib, target, rng)?;
    info!(
        target: "critnet-connectivity",
        "[TOPOLOGY] full: n={} inhibitory={} avg_strength={:.6}",
        n,
        topology.inhibitory_count(),
        target
    );
    Ok(topology)
}

/// Steps 1-5 with an already resolved target. Inputs must be validated by the caller.
pub(crate) fn base_weights<R: Rng + ?Sized>(
    n: usize,
    proportion_inhib: f64,
    target: f64,
    rng: &mut R,
) -> TopologyResult<GeneratedTopology> {
    let mut weights = Array2::from_shape_fn((n, n), |_| rng.gen::<f64>());
    let inhibitory = Array1::from_shape_fn(n, |_| rng.gen::<f64>() < proportion_inhib);

    for (j, _) in inhibitory.iter().enumerate().filter(|(_, &inhib)| inhib) {
        weights.column_mut(j).mapv_inplace(|w| -w);
    }

    let mean = weights.mean().unwrap_or(0.0);
    if !(mean.is_finite() && mean > 0.0) {
        return Err(TopologyError::DegenerateTopology {
            reason: format!(
                "signed mean weight is {mean}; cannot rescale to {target} without flipping signs"
            ),
        });
    }
    weights *= target / mean;

    weights.diag_mut().fill(0.0);
    Ok(GeneratedTopology {
        weights,
        inhibitory,
    })
}
