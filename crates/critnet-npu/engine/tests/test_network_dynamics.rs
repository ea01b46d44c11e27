// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Network Dynamics Tests
//!
//! End-to-end behaviour of the engine: construction checks, step order consequences,
//! phase/schedule continuity, history isolation and seeded determinism.

use critnet_connectivity::{fully_connected, AvgStrength};
use critnet_npu_engine::*;
use ndarray::{array, Array1, Array2};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn random_network_weights(n: usize, seed: u64) -> Array2<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    fully_connected(n, 0.1, AvgStrength::Auto, &mut rng)
        .expect("valid topology")
        .weights
}

fn all_variables() -> Vec<HistoryVariable> {
    HistoryVariable::ALL.to_vec()
}

#[test]
fn test_default_potential_is_zero_with_matching_shape() {
    let net = Network::new(random_network_weights(30, 1), NetworkOptions::default()).unwrap();
    assert_eq!(net.potential().len(), 30);
    assert_eq!(net.spikes().len(), 30);
    assert!(net.potential().iter().all(|&v| v == 0.0));
    assert_eq!(net.neuron_count(), 30);
}

#[test]
fn test_initial_potential_shape_mismatch_rejected() {
    let options = NetworkOptions::default().with_initial_potential(Array1::zeros(29));
    let err = Network::new(random_network_weights(30, 1), options).unwrap_err();
    assert_eq!(
        err,
        NetworkError::ShapeMismatch {
            what: "initial potential",
            expected: vec![30],
            actual: vec![29],
        }
    );
}

#[test]
fn test_unknown_history_name_fails_at_parse() {
    let err = HistoryVariable::parse_list(&["s", "membrane"]).unwrap_err();
    assert_eq!(
        err,
        NetworkError::UnknownHistoryVariable("membrane".to_string())
    );
}

#[test]
fn test_unrequested_history_is_an_error() {
    let mut net = Network::new(
        random_network_weights(10, 2),
        NetworkOptions::default().with_seed(3),
    )
    .unwrap();
    net.run_phase(0.1, 5).unwrap();
    assert!(matches!(
        net.history(HistoryVariable::Potential),
        Err(NetworkError::HistoryNotRecorded(HistoryVariable::Potential))
    ));
    assert!(net.history_by_name("bogus").is_err());
    assert_eq!(net.spike_history().unwrap().dim(), (10, 5));
}

#[test]
fn test_spiking_neurons_reset_to_exactly_zero() {
    // No synapses and no drive: the only change in a step is the reset itself
    let weights = Array2::zeros((3, 3));
    let options = NetworkOptions::default()
        .with_seed(4)
        .with_initial_potential(array![1.0, 1.5, 0.0])
        .with_history(vec![HistoryVariable::Potential, HistoryVariable::Spikes]);
    let mut net = Network::new(weights, options).unwrap();
    net.step();

    assert_eq!(net.spikes(), &array![true, true, false]);
    assert_eq!(net.potential(), &array![0.0, 0.0, 0.0]);
}

#[test]
fn test_history_snapshots_are_isolated_from_live_state() {
    let options = NetworkOptions::default()
        .with_seed(11)
        .with_history(all_variables());
    let mut net = Network::new(random_network_weights(20, 5), options).unwrap();

    net.run_phase(0.5, 1).unwrap();
    let v_after_first = net.potential().clone();
    let w_after_first = net.weights().clone();
    let omega_after_first = net.thalamic_weights().clone();

    net.run_phase(0.5, 10).unwrap();
    assert_ne!(net.weights(), &w_after_first);

    let v_hist = net.potential_history().unwrap();
    assert_eq!(v_hist.column(0), v_after_first);

    let w_hist = net
        .history(HistoryVariable::Weights)
        .unwrap()
        .into_matrices()
        .unwrap();
    assert_eq!(w_hist.shape(), &[11, 20, 20]);
    assert_eq!(w_hist.index_axis(ndarray::Axis(0), 0), w_after_first);

    let omega_hist = net
        .history(HistoryVariable::ThalamicWeights)
        .unwrap()
        .into_float()
        .unwrap();
    assert_eq!(omega_hist.column(0), omega_after_first);

    let rs = net
        .history(HistoryVariable::DriveProbability)
        .unwrap()
        .into_scalars()
        .unwrap();
    assert_eq!(rs.len(), 11);
    assert!(rs.iter().all(|&r| r == 0.5));
}

#[test]
fn test_history_is_append_only_and_ordered() {
    let options = NetworkOptions::default()
        .with_seed(8)
        .with_history(vec![HistoryVariable::Potential]);
    let mut net = Network::new(random_network_weights(15, 6), options).unwrap();
    net.run_phase(0.2, 7).unwrap();
    let first = net.potential_history().unwrap();
    net.run_phase(0.4, 5).unwrap();
    let second = net.potential_history().unwrap();

    assert_eq!(second.ncols(), 12);
    for t in 0..7 {
        assert_eq!(second.column(t), first.column(t));
    }
    assert_eq!(second.column(11), *net.potential());
}

#[test]
fn test_split_phases_match_single_phase() {
    let weights = random_network_weights(40, 12);
    let options = NetworkOptions::default()
        .with_seed(2024)
        .with_history(vec![HistoryVariable::Potential, HistoryVariable::Spikes]);

    let mut single = Network::new(weights.clone(), options.clone()).unwrap();
    single.run_phase(0.05, 300).unwrap();

    let mut split = Network::new(weights, options).unwrap();
    split.run_schedule_lists(&[120, 180], &[0.05, 0.05]).unwrap();

    assert_eq!(single.spike_history().unwrap(), split.spike_history().unwrap());
    assert_eq!(
        single.potential_history().unwrap(),
        split.potential_history().unwrap()
    );
    assert_eq!(single.weights(), split.weights());
    assert_eq!(single.thalamic_weights(), split.thalamic_weights());
}

#[test]
fn test_same_seed_is_bit_identical() {
    let weights = random_network_weights(50, 21);
    let options = NetworkOptions::default()
        .with_seed(77)
        .with_history(vec![HistoryVariable::Potential, HistoryVariable::Spikes]);

    let mut a = Network::new(weights.clone(), options.clone()).unwrap();
    let mut b = Network::new(weights, options).unwrap();
    a.run_schedule(&Schedule::new(&[50, 100], &[0.01, 0.1]).unwrap())
        .unwrap();
    b.run_schedule(&Schedule::new(&[50, 100], &[0.01, 0.1]).unwrap())
        .unwrap();

    assert_eq!(a.spike_history().unwrap(), b.spike_history().unwrap());
    assert_eq!(a.potential_history().unwrap(), b.potential_history().unwrap());
}

#[test]
fn test_different_seeds_diverge() {
    let weights = random_network_weights(50, 21);
    let mut a = Network::new(weights.clone(), NetworkOptions::default().with_seed(1)).unwrap();
    let mut b = Network::new(weights, NetworkOptions::default().with_seed(2)).unwrap();
    a.run_phase(0.1, 200).unwrap();
    b.run_phase(0.1, 200).unwrap();
    assert_ne!(a.spike_history().unwrap(), b.spike_history().unwrap());
}

#[test]
fn test_schedule_length_mismatch_runs_nothing() {
    let mut net = Network::new(random_network_weights(10, 3), NetworkOptions::default()).unwrap();
    let err = net.run_schedule_lists(&[10, 10, 10], &[0.1, 0.2]).unwrap_err();
    assert_eq!(
        err,
        NetworkError::ScheduleLengthMismatch {
            durations: 3,
            probabilities: 2
        }
    );
    assert_eq!(net.steps_run(), 0);
}

#[test]
fn test_weights_keep_zero_diagonal_and_sign() {
    let weights = random_network_weights(25, 9);
    let options = NetworkOptions::default().with_seed(10);
    let mut net = Network::new(weights.clone(), options).unwrap();
    net.run_phase(0.2, 500).unwrap();

    for ((i, j), &w0) in weights.indexed_iter() {
        let w = net.weights()[[i, j]];
        if i == j {
            assert_eq!(w, 0.0);
        }
        assert!(w * w0 >= 0.0, "sign flipped at ({i}, {j})");
    }
    assert!(net.thalamic_weights().iter().all(|&x| x > 0.0));
}

#[test]
fn test_overshooting_plasticity_rates_rejected_before_construction() {
    let weights = array![[0.0, 0.5], [0.5, 0.0]];
    let options = NetworkOptions::default()
        .with_initial_potential(array![1.0, 1.0])
        .with_parameters(NetworkParameters {
            tau_d: 0.5,
            ..Default::default()
        })
        .with_seed(3);
    let err = Network::new(weights, options).unwrap_err();
    assert!(matches!(
        err,
        NetworkError::InvalidConfiguration { parameter: "tau_d", .. }
    ));
}

#[test]
fn test_boundary_plasticity_rates_keep_signs() {
    let weights = array![[0.0, 0.5], [-0.5, 0.0]];
    let options = NetworkOptions::default()
        .with_initial_potential(array![1.0, 1.0])
        .with_parameters(NetworkParameters {
            tau_r: 2.0,
            tau_d: 2.0,
            ..Default::default()
        })
        .with_seed(3);
    let mut net = Network::new(weights.clone(), options).unwrap();
    net.run_phase(1.0, 50).unwrap();

    for ((i, j), &w0) in weights.indexed_iter() {
        let w = net.weights()[[i, j]];
        assert!(w * w0 >= 0.0, "sign flipped at ({i}, {j})");
        if w0 != 0.0 {
            assert!(w != 0.0, "weight at ({i}, {j}) collapsed to zero");
        }
    }
    assert!(net.thalamic_weights().iter().all(|&x| x > 0.0));
}

#[test]
fn test_spike_counts_match_spike_history() {
    let mut net = Network::new(
        random_network_weights(30, 4),
        NetworkOptions::default().with_seed(13),
    )
    .unwrap();
    let summaries = net.run_schedule(&Schedule::ramp().unwrap()).unwrap();
    let counts = net.spike_counts().unwrap();
    assert_eq!(counts.len(), 10_500);

    let total: f64 = counts.sum();
    let summarized: u64 = summaries.iter().map(|s| s.spikes).sum();
    assert_eq!(total as u64, summarized);

    let from_history = net.spike_history().unwrap().mapv(|s| s as u8 as f64).sum();
    assert_eq!(from_history, total);
}
