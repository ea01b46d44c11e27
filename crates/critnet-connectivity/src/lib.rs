// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # critnet Connectivity
//!
//! Generators for the weight matrix `W` consumed by the network engine. Rows are
//! postsynaptic neurons and columns presynaptic neurons (`output = W · input`).
//!
//! | Topology | Structure | Automatic mean weight |
//! |---|---|---|
//! | `full` | dense | 1/n |
//! | `lattice` | k ring neighbours | 1/k |
//! | `small_world` | lattice with a fraction of edges rewired | 1/k |
//! | `scale_free` | power-law out-degree, distance-weighted targets | 1/mean(k_out) |
//!
//! All generators take `&mut impl Rng`, so one seeded stream can drive both generation
//! and simulation.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod topology;
pub mod types;

pub use topology::{
    draw_out_degrees, fully_connected, lattice, ring_distance, scale_free, small_world, Topology,
};
pub use types::{AvgStrength, GeneratedTopology, TopologyError, TopologyResult};
