// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Small-world network (ring lattice with rewiring)
//!
//! A fraction `rewire` of the lattice's nonzero entries, picked without replacement, is
//! moved to a new random postsynaptic row. Each moved entry keeps its presynaptic column
//! and its weight, so the sign assignment survives. New rows never equal the column.

use rand::seq::index::sample;
use rand::Rng;
use tracing::info;

use super::lattice::lattice;
use crate::types::{AvgStrength, GeneratedTopology, TopologyError, TopologyResult};

/// Lattice of degree `k` with `round(rewire × edges)` edges rewired.
pub fn small_world<R: Rng + ?Sized>(
    n: usize,
    k: usize,
    rewire: f64,
    proportion_inhib: f64,
    avg_strength: AvgStrength,
    rng: &mut R,
) -> TopologyResult<GeneratedTopology> {
    if !(0.0..=1.0).contains(&rewire) {
        return Err(TopologyError::invalid(
            "rewire",
            format!("must be within [0, 1], got {rewire}"),
        ));
    }
    let base = lattice(n, k, proportion_inhib, avg_strength, rng)?;

    // Row-major order of the nonzero entries
    let edges: Vec<(usize, usize)> = base
        .weights
        .indexed_iter()
        .filter(|(_, &w)| w != 0.0)
        .map(|(idx, _)| idx)
        .collect();
    let amount = (rewire * edges.len() as f64).round() as usize;
    let chosen: Vec<(usize, usize)> = sample(rng, edges.len(), amount)
        .into_iter()
        .map(|e| edges[e])
        .collect();

    let mut weights = base.weights.clone();
    for &(row, col) in &chosen {
        weights[[row, col]] = 0.0;
    }
    for &(row, col) in &chosen {
        // Uniform over the n - 1 rows other than `col`
        let draw = rng.gen_range(0..n - 1);
        let new_row = if draw >= col { draw + 1 } else { draw };
        weights[[new_row, col]] = base.weights[[row, col]];
    }

    info!(
        target: "critnet-connectivity",
        "[TOPOLOGY] small_world: n={} k={} rewired={}/{}",
        n,
        k,
        amount,
        edges.len()
    );
    Ok(GeneratedTopology {
        weights,
        inhibitory: base.inhibitory,
    })
}
