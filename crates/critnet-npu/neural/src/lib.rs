// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # critnet Neural Computation
//!
//! The per-step algorithms of the stochastic spiking network, as pure functions over
//! `ndarray` state:
//! - **Dynamics**: probabilistic spike emission with reset, membrane integration with leakage
//! - **Synapse**: spike propagation (`W · s`) and short-term depression/recovery
//! - **Thalamus**: stochastic external drive
//! - **Types**: parameters, recordable variables, errors
//!
//! The stateful engine lives in `critnet-npu-engine`; it calls these functions in a fixed
//! order every step. Keeping them here lets each sub-step be tested in isolation.
//!
//! ## Step order
//! ```text
//! 1. s, v      = emit_spikes(v)                       (one uniform draw per neuron)
//! 2. flux      = propagate_spikes(W, s)
//! 3. s_th, ext = thalamic_spikes(r), external_input(s_th, omega)   (one draw per neuron)
//! 4. v         = update_membrane(v, efficacy · flux + ext, leakage)
//! 5. W, omega  = depress_and_recover(...)
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod dynamics;
pub mod synapse;
pub mod thalamus;
pub mod types;

pub use dynamics::{emit_spikes, update_membrane};
pub use synapse::{
    depress_and_recover_vector, depress_and_recover_weights, propagate_spikes, synaptic_input,
};
pub use thalamus::{external_input, thalamic_spikes};
pub use types::{HistoryVariable, NetworkError, NetworkParameters, Result};
