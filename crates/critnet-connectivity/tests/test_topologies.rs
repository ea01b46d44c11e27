// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Property-based tests for the topology invariants
//!
//! For every generator and valid input: the matrix is n × n, its diagonal is exactly zero,
//! and each column's sign matches the neuron's inhibitory flag.

use critnet_connectivity::*;
use ndarray::Array2;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn check_invariants(
    n: usize,
    result: TopologyResult<GeneratedTopology>,
) -> Result<(), TestCaseError> {
    let topology = match result {
        Ok(t) => t,
        // A draw whose signed mean is not positive is rejected rather than rescaled
        Err(TopologyError::DegenerateTopology { .. }) => return Ok(()),
        Err(e) => return Err(TestCaseError::fail(format!("unexpected error: {e}"))),
    };
    prop_assert_eq!(topology.weights.dim(), (n, n));
    prop_assert_eq!(topology.inhibitory.len(), n);
    for i in 0..n {
        prop_assert_eq!(topology.weights[[i, i]], 0.0);
    }
    for (j, column) in topology.weights.columns().into_iter().enumerate() {
        if topology.inhibitory[j] {
            prop_assert!(
                column.iter().all(|&w| w <= 0.0),
                "inhibitory column {} has a positive weight",
                j
            );
        } else {
            prop_assert!(
                column.iter().all(|&w| w >= 0.0),
                "excitatory column {} has a negative weight",
                j
            );
        }
    }
    prop_assert!(topology.weights.iter().all(|w| w.is_finite()));
    Ok(())
}

fn size_and_degree() -> impl Strategy<Value = (usize, usize)> {
    (2usize..40).prop_flat_map(|n| (Just(n), 1..n))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_fully_connected_invariants(n in 1usize..40, p in 0.0f64..0.5, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        check_invariants(n, fully_connected(n, p, AvgStrength::Auto, &mut rng))?;
    }

    #[test]
    fn test_lattice_invariants((n, k) in size_and_degree(), p in 0.0f64..0.5, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        check_invariants(n, lattice(n, k, p, AvgStrength::Auto, &mut rng))?;
    }

    #[test]
    fn test_small_world_invariants(
        (n, k) in size_and_degree(),
        rewire in 0.0f64..=1.0,
        p in 0.0f64..0.5,
        seed in any::<u64>()
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        check_invariants(n, small_world(n, k, rewire, p, AvgStrength::Auto, &mut rng))?;
    }

    #[test]
    fn test_scale_free_invariants(
        (n, k_out_max) in (3usize..40).prop_flat_map(|n| (Just(n), 2..n)),
        p in 0.0f64..0.5,
        seed in any::<u64>()
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        check_invariants(n, scale_free(n, k_out_max, p, AvgStrength::Auto, &mut rng))?;
    }

    #[test]
    fn test_inhibitory_majority_always_rejected(p in 0.5f64..1.0, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        prop_assert_eq!(
            fully_connected(10, p, AvgStrength::Auto, &mut rng),
            Err(TopologyError::InvalidInhibitoryProportion(p))
        );
    }
}

#[test]
fn test_same_seed_same_matrix() {
    for topology in [
        Topology::Full,
        Topology::Lattice { k: 4 },
        Topology::SmallWorld { k: 4, rewire: 0.1 },
        Topology::ScaleFree { k_out_max: 50 },
    ] {
        let mut a = StdRng::seed_from_u64(99);
        let mut b = StdRng::seed_from_u64(99);
        let wa = topology.generate(100, 0.2, AvgStrength::Auto, &mut a).unwrap();
        let wb = topology.generate(100, 0.2, AvgStrength::Auto, &mut b).unwrap();
        assert_eq!(wa, wb, "{topology} is not reproducible");
    }
}

#[test]
fn test_lattice_mean_weight_targets_one_over_k() {
    // A lattice is the baseline drawn with target 1/k, masked to the ring neighbours
    let n = 200;
    let mut a = StdRng::seed_from_u64(12);
    let mut b = StdRng::seed_from_u64(12);
    let lat = lattice(n, 4, 0.0, AvgStrength::Auto, &mut a).unwrap();
    let full = fully_connected(n, 0.0, AvgStrength::Value(0.25), &mut b).unwrap();
    let expected: Array2<f64> = Array2::from_shape_fn((n, n), |(i, j)| {
        if lat.weights[[i, j]] != 0.0 {
            full.weights[[i, j]]
        } else {
            0.0
        }
    });
    assert_eq!(lat.weights, expected);
    assert_eq!(lat.synapse_count(), n * 4);
}

#[test]
fn test_degenerate_mean_is_reported() {
    // With n = 1 and every neuron inhibitory the signed mean is negative
    let mut rng = StdRng::seed_from_u64(0);
    let mut saw_degenerate = false;
    for _ in 0..200 {
        if let Err(TopologyError::DegenerateTopology { .. }) =
            fully_connected(1, 0.49, AvgStrength::Auto, &mut rng)
        {
            saw_degenerate = true;
            break;
        }
    }
    assert!(saw_degenerate);
}

#[test]
fn test_small_world_keeps_edge_count_bounded() {
    let mut rng = StdRng::seed_from_u64(3);
    let t = small_world(500, 4, 0.1, 0.2, AvgStrength::Auto, &mut rng).unwrap();
    // Collisions can only merge edges
    assert!(t.synapse_count() <= 2000);
    assert!(t.synapse_count() > 1900);
}
