// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Spike Propagation
//!
//! Rows of `W` are postsynaptic (output) neurons, columns are presynaptic (input)
//! neurons, so the flux delivered to every neuron is `W · s`. Inhibitory sources carry
//! negative columns, which makes the sign of each contribution implicit.

use ndarray::{Array1, Array2};

/// Neurotransmitter flux `W · s`.
///
/// Accumulates the columns of the spiking presynaptic neurons; with sparse activity this
/// touches far fewer entries than a dense product.
pub fn propagate_spikes(weights: &Array2<f64>, spikes: &Array1<bool>) -> Array1<f64> {
    let mut flux = Array1::zeros(weights.nrows());
    for (source, _) in spikes.iter().enumerate().filter(|(_, &fired)| fired) {
        flux += &weights.column(source);
    }
    flux
}

/// Potential change caused by synaptic flux
#[inline]
pub fn synaptic_input(flux: &Array1<f64>, synaptic_efficacy: f64) -> Array1<f64> {
    flux * synaptic_efficacy
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_flux_matches_dense_product() {
        let w = array![[0.0, 0.5, -0.2], [0.1, 0.0, -0.3], [0.4, 0.6, 0.0]];
        let s = array![true, false, true];
        let flux = propagate_spikes(&w, &s);
        let dense = w.dot(&s.mapv(|x| if x { 1.0 } else { 0.0 }));
        for (a, b) in flux.iter().zip(dense.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
        // Row 1 receives +0.1 from neuron 0 and -0.3 from inhibitory neuron 2
        assert!((flux[1] + 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_no_spikes_no_flux() {
        let w = array![[0.0, 1.0], [1.0, 0.0]];
        let flux = propagate_spikes(&w, &array![false, false]);
        assert_eq!(flux, array![0.0, 0.0]);
    }

    #[test]
    fn test_synaptic_input_scales_by_efficacy() {
        let dv = synaptic_input(&array![1.0, -2.0], 0.3);
        assert!((dv[0] - 0.3).abs() < 1e-12);
        assert!((dv[1] + 0.6).abs() < 1e-12);
    }
}
