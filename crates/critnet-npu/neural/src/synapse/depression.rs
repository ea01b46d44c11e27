// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Short-Term Depression and Recovery
//!
//! Both the weight matrix and the thalamic weights follow the same rule:
//!
//! ```text
//! x(t+1) = x + (x0 - x) / tau_r - [source fired] × x / tau_d
//! ```
//!
//! The recovery term pulls every entry back toward its baseline; the depression term is
//! proportional to the current (possibly already depressed) value and only applies where
//! the source neuron spiked this step. For `W` the source is the presynaptic neuron, i.e.
//! the column. Zero entries stay zero, so the diagonal and the topology are preserved.

use ndarray::{Array1, Array2, Zip};

/// Update `weights` in place; column `j` is depressed iff `spikes[j]`.
pub fn depress_and_recover_weights(
    weights: &mut Array2<f64>,
    baseline: &Array2<f64>,
    spikes: &Array1<bool>,
    recovery_rate: f64,
    depression_rate: f64,
) {
    Zip::indexed(weights)
        .and(baseline)
        .for_each(|(_, source), w, &w0| {
            let current = *w;
            let depression = if spikes[source] {
                depression_rate * current
            } else {
                0.0
            };
            *w = current + recovery_rate * (w0 - current) - depression;
        });
}

/// Update a per-neuron vector in place; entry `i` is depressed iff `fired[i]`.
pub fn depress_and_recover_vector(
    values: &mut Array1<f64>,
    baseline: &Array1<f64>,
    fired: &Array1<bool>,
    recovery_rate: f64,
    depression_rate: f64,
) {
    Zip::from(values)
        .and(baseline)
        .and(fired)
        .for_each(|x, &x0, &used| {
            let current = *x;
            let depression = if used { depression_rate * current } else { 0.0 };
            *x = current + recovery_rate * (x0 - current) - depression;
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_presynaptic_column_is_depressed() {
        let w0 = array![[0.0, 1.0], [1.0, 0.0]];
        let mut w = w0.clone();
        depress_and_recover_weights(&mut w, &w0, &array![false, true], 0.0, 0.5);
        // Column 1 (neuron 1 fired) halves, column 0 untouched
        assert_eq!(w, array![[0.0, 0.5], [1.0, 0.0]]);
    }

    #[test]
    fn test_recovery_toward_baseline() {
        let w0 = array![[0.0, 1.0], [-1.0, 0.0]];
        let mut w = array![[0.0, 0.5], [-0.5, 0.0]];
        depress_and_recover_weights(&mut w, &w0, &array![false, false], 0.1, 0.05);
        assert!((w[[0, 1]] - 0.55).abs() < 1e-12);
        assert!((w[[1, 0]] + 0.55).abs() < 1e-12);
        assert_eq!(w[[0, 0]], 0.0);
        assert_eq!(w[[1, 1]], 0.0);
    }

    #[test]
    fn test_depression_is_proportional_to_current_value() {
        let w0 = array![[0.0, 0.8], [0.0, 0.0]];
        let mut w = array![[0.0, 0.4], [0.0, 0.0]];
        depress_and_recover_weights(&mut w, &w0, &array![false, true], 0.0, 0.25);
        assert!((w[[0, 1]] - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_zero_entries_stay_zero() {
        let w0 = array![[0.0, 0.0, 0.3], [0.2, 0.0, 0.0], [0.0, -0.7, 0.0]];
        let mut w = w0.clone();
        for step in 0..50 {
            let spikes = array![step % 2 == 0, step % 3 == 0, true];
            depress_and_recover_weights(&mut w, &w0, &spikes, 1.0 / 400.0, 1.0 / 20.0);
        }
        for ((i, j), &x) in w0.indexed_iter() {
            if x == 0.0 {
                assert_eq!(w[[i, j]], 0.0);
            }
        }
    }

    #[test]
    fn test_thalamic_vector_update() {
        let omega0 = array![0.016, 0.016];
        let mut omega = omega0.clone();
        depress_and_recover_vector(&mut omega, &omega0, &array![true, false], 1.0 / 400.0, 0.05);
        assert!((omega[0] - 0.016 * 0.95).abs() < 1e-15);
        assert_eq!(omega[1], 0.016);
    }
}
