// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # critnet - stochastic spiking networks near criticality
//!
//! A network of probabilistic neurons with short-term synaptic depression, driven by random
//! thalamic input. Neurons fire with probability `min(v, 1)` of their membrane potential `v`;
//! spikes depress the synapses that carried them, and depressed synapses recover slowly. With
//! the right balance the network self-organises into neuronal avalanches whose sizes and
//! durations follow power laws.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use critnet::prelude::*;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let topology = small_world(500, 4, 0.1, 0.2, AvgStrength::Auto, &mut rng)?;
//!
//! let options = NetworkOptions::default()
//!     .with_thalamic_weights(ThalamicWeights::Scalar(1.26))
//!     .with_seed(7);
//! let mut network = Network::new(topology.into_weights(), options)?;
//! network.run_schedule(&Schedule::ramp()?)?;
//!
//! let stats = AvalancheStats::from_spike_matrix(network.spike_history()?.view())?;
//! println!("{} avalanches, mean size {:?}", stats.count, stats.mean_size());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  critnet-connectivity                                   │
//! │  (full, lattice, small-world, scale-free W)             │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  critnet-npu-engine  ←  critnet-npu-neural              │
//! │  (Network, phases, history)   (per-step algorithms)     │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  critnet-analysis, critnet-serialization                │
//! │  (avalanches, densities, spike records)                 │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! The [`sweep`] module and the `critnet-sweep` binary run whole parameter grids.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod sweep;

pub use critnet_analysis as analysis;
pub use critnet_config as config;
pub use critnet_connectivity as connectivity;
pub use critnet_npu_engine as engine;
pub use critnet_npu_neural as neural;
pub use critnet_observability as observability;
pub use critnet_serialization as serialization;

/// Common imports for building and running networks
pub mod prelude {
    pub use crate::analysis::{
        detect_avalanches, log_binned_density, Avalanche, AvalancheStats, LogBinnedDensity,
    };
    pub use crate::connectivity::{
        fully_connected, lattice, scale_free, small_world, AvgStrength, GeneratedTopology,
        Topology, TopologyError,
    };
    pub use crate::engine::{
        HistoryArray, HistoryVariable, Network, NetworkError, NetworkOptions, NetworkParameters,
        Phase, PhaseSummary, Schedule, ThalamicWeights,
    };
    pub use crate::serialization::{load_spike_record, save_spike_record, RecordKey, SpikeRecord};
}
