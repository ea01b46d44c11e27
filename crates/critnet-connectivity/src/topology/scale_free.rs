// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Scale-free network
//!
//! ```text
//! k_out[i] ~ P(k) ∝ k^-2,  k ∈ [2, k_out_max]          n draws
//! base     = fully connected baseline (mean 1/mean(k_out) when automatic)
//! targets  = k_out[i] rows j ≠ i without replacement,  P(j) ∝ 1 / ring_distance(i, j)
//! W[j, i]  = base[j, i] for every chosen target j
//! ```

use ndarray::{Array1, Array2};
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;

use super::fully_connected::base_weights;
use super::{validate_inhibitory_proportion, validate_neuron_count};
use crate::types::{AvgStrength, GeneratedTopology, TopologyError, TopologyResult};

/// Smallest out-degree a neuron can draw
pub const MIN_OUT_DEGREE: usize = 2;

/// Scale-free network with out-degrees bounded by `k_out_max`.
pub fn scale_free<R: Rng + ?Sized>(
    n: usize,
    k_out_max: usize,
    proportion_inhib: f64,
    avg_strength: AvgStrength,
    rng: &mut R,
) -> TopologyResult<GeneratedTopology> {
    validate_neuron_count(n)?;
    if k_out_max < MIN_OUT_DEGREE || k_out_max >= n {
        return Err(TopologyError::invalid(
            "k_out_max",
            format!(
                "must be within [{MIN_OUT_DEGREE}, n - 1 = {}], got {k_out_max}",
                n.saturating_sub(1)
            ),
        ));
    }
    validate_inhibitory_proportion(proportion_inhib)?;

    let k_out = draw_out_degrees(n, k_out_max, rng)?;
    let mean_k = k_out.iter().sum::<usize>() as f64 / n as f64;
    let target = avg_strength.resolve(1.0 / mean_k)?;

    let base = base_weights(n, proportion_inhib, target, rng)?;
    let mut weights = Array2::zeros((n, n));
    for (source, &degree) in k_out.iter().enumerate() {
        let candidates: Vec<usize> = (0..n).filter(|&j| j != source).collect();
        let chosen = candidates.choose_multiple_weighted(rng, degree, |&j| {
            1.0 / ring_distance(source, j, n) as f64
        })?;
        for &target_row in chosen {
            weights[[target_row, source]] = base.weights[[target_row, source]];
        }
    }

    info!(
        target: "critnet-connectivity",
        "[TOPOLOGY] scale_free: n={} k_out_max={} mean_k_out={:.3} inhibitory={}",
        n,
        k_out_max,
        mean_k,
        base.inhibitory.iter().filter(|&&x| x).count()
    );
    Ok(GeneratedTopology {
        weights,
        inhibitory: base.inhibitory,
    })
}

/// Out-degree per neuron with `P(k) ∝ k^-2`
pub fn draw_out_degrees<R: Rng + ?Sized>(
    n: usize,
    k_out_max: usize,
    rng: &mut R,
) -> TopologyResult<Array1<usize>> {
    let ks: Vec<usize> = (MIN_OUT_DEGREE..=k_out_max).collect();
    let dist = WeightedIndex::new(ks.iter().map(|&k| (k as f64).powi(-2)))?;
    Ok(Array1::from_shape_fn(n, |_| ks[dist.sample(rng)]))
}

/// Distance between `i` and `j` on a ring of `n` neurons
#[inline]
pub fn ring_distance(i: usize, j: usize, n: usize) -> usize {
    let d = i.abs_diff(j);
    d.min(n - d)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_ring_distance_wraps() {
        assert_eq!(ring_distance(0, 9, 10), 1);
        assert_eq!(ring_distance(2, 7, 10), 5);
        assert_eq!(ring_distance(3, 4, 10), 1);
    }

    #[test]
    fn test_out_degree_matches_draws() {
        let n = 60;
        let mut a = StdRng::seed_from_u64(31);
        let mut b = StdRng::seed_from_u64(31);
        let t = scale_free(n, 20, 0.0, AvgStrength::Auto, &mut a).unwrap();
        let degrees = draw_out_degrees(n, 20, &mut b).unwrap();
        for (i, column) in t.weights.columns().into_iter().enumerate() {
            assert_eq!(column.iter().filter(|&&w| w != 0.0).count(), degrees[i]);
        }
    }

    #[test]
    fn test_small_degrees_dominate() {
        let mut rng = StdRng::seed_from_u64(4);
        let degrees = draw_out_degrees(5000, 100, &mut rng).unwrap();
        let twos = degrees.iter().filter(|&&k| k == 2).count() as f64 / 5000.0;
        // P(2) = 0.25 / (pi^2/6 - 1 - tail) ≈ 0.39
        assert!(twos > 0.3 && twos < 0.5, "fraction of k=2 was {twos}");
        assert!(degrees.iter().all(|&k| (2..=100).contains(&k)));
    }

    #[test]
    fn test_k_out_max_bounds() {
        let mut rng = StdRng::seed_from_u64(4);
        assert!(scale_free(10, 1, 0.1, AvgStrength::Auto, &mut rng).is_err());
        assert!(scale_free(10, 10, 0.1, AvgStrength::Auto, &mut rng).is_err());
        assert!(scale_free(10, 9, 0.0, AvgStrength::Auto, &mut rng).is_ok());
    }
}
