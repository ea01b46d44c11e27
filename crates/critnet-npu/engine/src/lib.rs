// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # critnet Network Engine
//!
//! The stateful side of the simulator: a [`Network`] owns `v`, `s`, `W`, `omega` and their
//! baselines, steps them in a fixed order using the pure algorithms from
//! `critnet-npu-neural`, and records selected variables into a [`HistoryRecorder`].
//!
//! ```text
//! Schedule ──► run_phase(r, steps) ──► step() × steps ──► HistoryRecorder
//! ```
//!
//! Execution is single-threaded; run independent networks on separate threads if needed.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod history;
pub mod network;
pub mod schedule;

pub use history::{HistoryArray, HistoryRecorder};
pub use network::{Network, NetworkOptions, PhaseSummary, ThalamicWeights, DEFAULT_THALAMIC_SCALE};
pub use schedule::{Phase, Schedule};

pub use critnet_npu_neural::{HistoryVariable, NetworkError, NetworkParameters, Result};
