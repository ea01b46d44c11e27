// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Synaptic algorithms: spike propagation and short-term depression/recovery

pub mod depression;
pub mod propagation;

pub use depression::{depress_and_recover_vector, depress_and_recover_weights};
pub use propagation::{propagate_spikes, synaptic_input};
