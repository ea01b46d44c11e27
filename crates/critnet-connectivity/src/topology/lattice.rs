// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Ring lattice
//!
//! Neuron `i` projects to its `k` nearest neighbours on a ring: offsets
//! `-floor(k/2) ..= ceil(k/2)` excluding 0, wrapped mod n. Weights come from the fully
//! connected baseline, so k_in == k_out == k.

use ndarray::Array2;
use rand::Rng;
use tracing::info;

use super::fully_connected::base_weights;
use super::{validate_degree, validate_inhibitory_proportion, validate_neuron_count};
use crate::types::{AvgStrength, GeneratedTopology, TopologyResult};

/// Ring lattice with `k` outgoing connections per neuron (mean weight 1/k when automatic).
pub fn lattice<R: Rng + ?Sized>(
    n: usize,
    k: usize,
    proportion_inhib: f64,
    avg_strength: AvgStrength,
    rng: &mut R,
) -> TopologyResult<GeneratedTopology> {
    validate_neuron_count(n)?;
    validate_degree("k", k, n)?;
    validate_inhibitory_proportion(proportion_inhib)?;
    let target = avg_strength.resolve(1.0 / k as f64)?;

    let mut topology = base_weights(n, proportion_inhib, target, rng)?;
    topology.weights *= &lattice_mask(n, k);

    info!(
        target: "critnet-connectivity",
        "[TOPOLOGY] lattice: n={} k={} inhibitory={} avg_strength={:.6}",
        n,
        k,
        topology.inhibitory_count(),
        target
    );
    Ok(topology)
}

/// Ring neighbours of `i` (never `i` itself)
pub(crate) fn nearest_neighbors(i: usize, k: usize, n: usize) -> impl Iterator<Item = usize> {
    let left = (k / 2) as isize;
    let right = k.div_ceil(2) as isize;
    let (i, n) = (i as isize, n as isize);
    (-left..=right)
        .filter(|&offset| offset != 0)
        .map(move |offset| (i + offset).rem_euclid(n) as usize)
}

/// 1.0 at `[neighbor, i]` for every neuron `i`
fn lattice_mask(n: usize, k: usize) -> Array2<f64> {
    let mut mask = Array2::zeros((n, n));
    for i in 0..n {
        for target in nearest_neighbors(i, k, n) {
            mask[[target, i]] = 1.0;
        }
    }
    mask
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_neighbors_even_k() {
        let mut nb: Vec<usize> = nearest_neighbors(0, 4, 10).collect();
        nb.sort_unstable();
        assert_eq!(nb, vec![1, 2, 8, 9]);
    }

    #[test]
    fn test_neighbors_odd_k_lean_right() {
        let mut nb: Vec<usize> = nearest_neighbors(5, 3, 10).collect();
        nb.sort_unstable();
        assert_eq!(nb, vec![4, 6, 7]);
    }

    #[test]
    fn test_every_column_has_k_entries() {
        let mut rng = StdRng::seed_from_u64(17);
        let t = lattice(20, 4, 0.0, AvgStrength::Auto, &mut rng).unwrap();
        for column in t.weights.columns() {
            assert_eq!(column.iter().filter(|&&w| w != 0.0).count(), 4);
        }
        for row in t.weights.rows() {
            assert_eq!(row.iter().filter(|&&w| w != 0.0).count(), 4);
        }
    }

    #[test]
    fn test_degree_must_fit_ring() {
        let mut rng = StdRng::seed_from_u64(17);
        assert!(lattice(5, 5, 0.0, AvgStrength::Auto, &mut rng).is_err());
        assert!(lattice(5, 0, 0.0, AvgStrength::Auto, &mut rng).is_err());
        assert!(lattice(5, 4, 0.0, AvgStrength::Auto, &mut rng).is_ok());
    }
}
