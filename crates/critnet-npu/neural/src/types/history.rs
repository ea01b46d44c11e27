// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Recordable state variables
//!
//! The set is closed: callers pick from this enum (or parse one of the accepted names),
//! so an unknown variable fails when the network is built rather than on first retrieval.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::NetworkError;

/// A state variable that can be snapshotted after every step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryVariable {
    /// Membrane potential `v` (length n)
    Potential,
    /// Spike indicator `s` (length n)
    Spikes,
    /// Live thalamic weights `omega` (length n)
    ThalamicWeights,
    /// Live weight matrix `W` (n × n). Memory grows with n² per step.
    Weights,
    /// Thalamic spike indicator `s_thalamus` (length n)
    ThalamicSpikes,
    /// Thalamic firing probability `r` in effect for the step (scalar)
    DriveProbability,
}

impl HistoryVariable {
    pub const ALL: [HistoryVariable; 6] = [
        HistoryVariable::Potential,
        HistoryVariable::Spikes,
        HistoryVariable::ThalamicWeights,
        HistoryVariable::Weights,
        HistoryVariable::ThalamicSpikes,
        HistoryVariable::DriveProbability,
    ];

    /// Canonical name, also accepted by `FromStr`
    pub fn name(self) -> &'static str {
        match self {
            HistoryVariable::Potential => "potential",
            HistoryVariable::Spikes => "spikes",
            HistoryVariable::ThalamicWeights => "thalamic_weights",
            HistoryVariable::Weights => "weights",
            HistoryVariable::ThalamicSpikes => "thalamic_spikes",
            HistoryVariable::DriveProbability => "drive_probability",
        }
    }

    /// Short state-field symbol (`v`, `s`, `omega`, `W`, `s_thalamus`, `r`)
    pub fn symbol(self) -> &'static str {
        match self {
            HistoryVariable::Potential => "v",
            HistoryVariable::Spikes => "s",
            HistoryVariable::ThalamicWeights => "omega",
            HistoryVariable::Weights => "W",
            HistoryVariable::ThalamicSpikes => "s_thalamus",
            HistoryVariable::DriveProbability => "r",
        }
    }

    /// Parse a list of names, failing on the first unknown one
    pub fn parse_list<S: AsRef<str>>(names: &[S]) -> Result<Vec<HistoryVariable>, NetworkError> {
        names.iter().map(|n| n.as_ref().parse()).collect()
    }
}

impl fmt::Display for HistoryVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HistoryVariable {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        HistoryVariable::ALL
            .into_iter()
            .find(|var| var.name() == trimmed || var.symbol() == trimmed)
            .ok_or_else(|| NetworkError::UnknownHistoryVariable(trimmed.to_string()))
    }
}
