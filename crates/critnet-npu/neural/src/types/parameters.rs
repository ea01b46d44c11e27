// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Fixed simulation parameters of a network instance

use serde::{Deserialize, Serialize};

use super::error::{NetworkError, Result};

/// Parameters fixed for the lifetime of a network.
///
/// The thalamic firing probability `r` is not here: it is set per phase and persists
/// as engine state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkParameters {
    /// Recovery time constant: weights relax toward baseline at rate `1 / tau_r` per step
    pub tau_r: f64,

    /// Depression time constant: a used synapse loses `1 / tau_d` of its current value
    pub tau_d: f64,

    /// Fraction of membrane potential lost per step (0.0-1.0), i.e. 1 / tau_m
    pub leakage: f64,

    /// Gain converting neurotransmitter flux into potential change
    pub synaptic_efficacy: f64,
}

impl NetworkParameters {
    /// Default parameters with a custom synaptic efficacy
    pub fn with_efficacy(synaptic_efficacy: f64) -> Self {
        Self {
            synaptic_efficacy,
            ..Self::default()
        }
    }

    /// Reject parameters that would let a plasticity update push a weight past zero.
    ///
    /// A synapse whose source fired is scaled by `1 - 1/tau_r - 1/tau_d` before the
    /// recovery term is added, so that factor must stay non-negative.
    pub fn validate(&self) -> Result<()> {
        if !(self.tau_r.is_finite() && self.tau_r >= 1.0) {
            return Err(NetworkError::invalid(
                "tau_r",
                format!("must be finite and >= 1, got {}", self.tau_r),
            ));
        }
        if !(self.tau_d.is_finite() && self.tau_d >= 1.0) {
            return Err(NetworkError::invalid(
                "tau_d",
                format!("must be finite and >= 1, got {}", self.tau_d),
            ));
        }
        if self.recovery_rate() + self.depression_rate() > 1.0 {
            return Err(NetworkError::invalid(
                "tau_d",
                format!(
                    "1/tau_r + 1/tau_d must not exceed 1, got {}",
                    self.recovery_rate() + self.depression_rate()
                ),
            ));
        }
        if !(0.0..=1.0).contains(&self.leakage) {
            return Err(NetworkError::invalid(
                "leakage",
                format!("must be in [0, 1], got {}", self.leakage),
            ));
        }
        if !self.synaptic_efficacy.is_finite() {
            return Err(NetworkError::invalid(
                "synaptic_efficacy",
                format!("must be finite, got {}", self.synaptic_efficacy),
            ));
        }
        Ok(())
    }

    #[inline]
    pub fn recovery_rate(&self) -> f64 {
        1.0 / self.tau_r
    }

    #[inline]
    pub fn depression_rate(&self) -> f64 {
        1.0 / self.tau_d
    }
}

impl Default for NetworkParameters {
    fn default() -> Self {
        Self {
            tau_r: 400.0,
            tau_d: 20.0,
            leakage: 0.2,
            synaptic_efficacy: 0.3,
        }
    }
}
