// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Membrane Dynamics
//!
//! Probabilistic integrate-and-fire without a threshold: the membrane potential itself is
//! the firing probability.
//!
//! ```text
//! Spike emission (per neuron, one uniform draw u ∈ [0, 1)):
//!     s = v ≥ u
//!     if s: v = 0
//!
//! Membrane update (v is the post-reset potential of this step):
//!     u      = v + dv
//!     v(t+1) = u - leakage × u
//!     dv     = synaptic_efficacy × (W · s) + s_thalamus ⊙ omega
//! ```

use ndarray::{Array1, Zip};
use rand::Rng;

/// Draw one uniform value per neuron and fire wherever `potential >= draw`.
///
/// Firing neurons are reset to exactly 0 in place. Exactly `potential.len()` draws are
/// consumed regardless of the outcome, so the random stream stays aligned across runs.
pub fn emit_spikes<R: Rng + ?Sized>(potential: &mut Array1<f64>, rng: &mut R) -> Array1<bool> {
    let mut spikes = Array1::from_elem(potential.len(), false);
    for (fired, v) in spikes.iter_mut().zip(potential.iter_mut()) {
        let draw: f64 = rng.gen();
        if *v >= draw {
            *fired = true;
            *v = 0.0;
        }
    }
    spikes
}

/// Integrate this step's input and apply leakage.
///
/// `potential` must hold the post-reset values from [`emit_spikes`]. Leakage is the last
/// transformation and is proportional to the updated, pre-leakage potential, never to the
/// value carried in from the previous step.
pub fn update_membrane(potential: &mut Array1<f64>, input: &Array1<f64>, leakage: f64) {
    Zip::from(potential).and(input).for_each(|v, &dv| {
        let updated = *v + dv;
        *v = updated - leakage * updated;
    });
}
