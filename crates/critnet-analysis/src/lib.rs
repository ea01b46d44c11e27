// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # critnet Analysis
//!
//! Reduces a recorded spike train to discrete-event statistics:
//! - **Avalanches**: maximal runs of steps with nonzero population activity
//! - **Distributions**: log-binned histograms of avalanche sizes or durations

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod avalanche;
pub mod distribution;
pub mod error;

pub use avalanche::{detect_avalanches, Avalanche, AvalancheStats};
pub use distribution::{log_binned_density, LogBinnedDensity};
pub use error::{AnalysisError, AnalysisResult};
