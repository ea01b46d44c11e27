// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Thalamic Drive
//!
//! Exogenous, population-wide input: each neuron independently receives a thalamic spike
//! with probability `r`, delivering its (plastic) thalamic weight `omega`.

use ndarray::{Array1, Zip};
use rand::Rng;

/// Draw one uniform value per neuron; a thalamic spike occurs where `draw < r`.
pub fn thalamic_spikes<R: Rng + ?Sized>(
    neuron_count: usize,
    drive_probability: f64,
    rng: &mut R,
) -> Array1<bool> {
    Array1::from_shape_fn(neuron_count, |_| rng.gen::<f64>() < drive_probability)
}

/// External input `s_thalamus ⊙ omega`
pub fn external_input(thalamic_spikes: &Array1<bool>, omega: &Array1<f64>) -> Array1<f64> {
    Zip::from(thalamic_spikes)
        .and(omega)
        .map_collect(|&fired, &weight| if fired { weight } else { 0.0 })
}
