// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for network construction, scheduling and history retrieval

use super::history::HistoryVariable;

/// Errors raised by the network engine.
///
/// Every variant is produced before any state is mutated.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NetworkError {
    #[error("Invalid configuration for `{parameter}`: {reason}")]
    InvalidConfiguration {
        parameter: &'static str,
        reason: String,
    },

    #[error("Shape mismatch for {what}: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        what: &'static str,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error(
        "Schedule length mismatch: {durations} durations vs {probabilities} drive probabilities"
    )]
    ScheduleLengthMismatch {
        durations: usize,
        probabilities: usize,
    },

    #[error("History variable `{0}` was not requested at construction")]
    HistoryNotRecorded(HistoryVariable),

    #[error("Unknown history variable: {0}")]
    UnknownHistoryVariable(String),
}

impl NetworkError {
    pub fn invalid(parameter: &'static str, reason: impl Into<String>) -> Self {
        NetworkError::InvalidConfiguration {
            parameter,
            reason: reason.into(),
        }
    }
}

/// Result type for network operations
pub type Result<T> = std::result::Result<T, NetworkError>;
