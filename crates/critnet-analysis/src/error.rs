// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/// Result type for analysis operations
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Errors raised by the analyzers
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    #[error("Activity at step {step} must be finite and non-negative, got {value}")]
    InvalidActivity { step: usize, value: f64 },

    #[error("Event {index} must be finite and positive for log binning, got {value}")]
    NonPositiveEvent { index: usize, value: f64 },

    #[error("Bin count must be at least 1")]
    InvalidBinCount,
}
