// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Core types for topology generation.
*/

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Result type for topology generation
pub type TopologyResult<T> = Result<T, TopologyError>;

/// Errors that can occur while generating a weight matrix
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TopologyError {
    #[error("Inhibitory proportion must be in [0, 0.5), got {0}")]
    InvalidInhibitoryProportion(f64),

    #[error("Invalid parameter `{parameter}`: {reason}")]
    InvalidParameter {
        parameter: &'static str,
        reason: String,
    },

    #[error("Degenerate topology: {reason}")]
    DegenerateTopology { reason: String },

    #[error("Unknown topology: {0}")]
    UnknownTopology(String),

    #[error("Weighted sampling failed: {0}")]
    Sampling(#[from] rand::distributions::WeightedError),
}

impl TopologyError {
    pub(crate) fn invalid(parameter: &'static str, reason: impl Into<String>) -> Self {
        TopologyError::InvalidParameter {
            parameter,
            reason: reason.into(),
        }
    }
}

/// Target mean of the signed weight matrix
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvgStrength {
    /// Scale with the topology: 1/n, 1/k or 1/mean(k_out)
    #[default]
    Auto,
    /// Explicit positive target
    Value(f64),
}

impl AvgStrength {
    pub(crate) fn resolve(self, auto: f64) -> TopologyResult<f64> {
        match self {
            AvgStrength::Auto => Ok(auto),
            AvgStrength::Value(v) if v.is_finite() && v > 0.0 => Ok(v),
            AvgStrength::Value(v) => Err(TopologyError::invalid(
                "avg_strength",
                format!("must be finite and > 0, got {v}"),
            )),
        }
    }
}

impl From<Option<f64>> for AvgStrength {
    fn from(value: Option<f64>) -> Self {
        value.map_or(AvgStrength::Auto, AvgStrength::Value)
    }
}

/// A generated weight matrix together with the sign assignment used to build it
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedTopology {
    /// n × n, row = postsynaptic, column = presynaptic, zero diagonal
    pub weights: Array2<f64>,
    /// `inhibitory[j]` is true when every outgoing weight of neuron `j` is ≤ 0
    pub inhibitory: Array1<bool>,
}

impl GeneratedTopology {
    pub fn neuron_count(&self) -> usize {
        self.weights.nrows()
    }

    /// Number of nonzero entries
    pub fn synapse_count(&self) -> usize {
        self.weights.iter().filter(|w| **w != 0.0).count()
    }

    pub fn inhibitory_count(&self) -> usize {
        self.inhibitory.iter().filter(|&&x| x).count()
    }

    pub fn into_weights(self) -> Array2<f64> {
        self.weights
    }
}
