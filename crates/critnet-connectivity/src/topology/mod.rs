// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Topology generators
//!
//! Every generator returns an n × n matrix with a zero diagonal whose column `j` is
//! entirely ≤ 0 when neuron `j` is inhibitory and ≥ 0 otherwise. Structured topologies
//! mask the fully connected baseline.

pub mod fully_connected;
pub mod lattice;
pub mod scale_free;
pub mod small_world;

use core::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::types::{AvgStrength, GeneratedTopology, TopologyError, TopologyResult};

pub use fully_connected::fully_connected;
pub use lattice::lattice;
pub use scale_free::{draw_out_degrees, ring_distance, scale_free};
pub use small_world::small_world;

/// Topology policy with its structural parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Topology {
    Full,
    Lattice { k: usize },
    SmallWorld { k: usize, rewire: f64 },
    ScaleFree { k_out_max: usize },
}

impl Topology {
    /// Short name used in artifact file names
    pub fn name(&self) -> &'static str {
        match self {
            Topology::Full => "full",
            Topology::Lattice { .. } => "lattice",
            Topology::SmallWorld { .. } => "small_world",
            Topology::ScaleFree { .. } => "scale_free",
        }
    }

    /// Resolve a name to a topology, taking structural parameters from the arguments.
    pub fn from_name(name: &str, k: usize, rewire: f64, k_out_max: usize) -> TopologyResult<Self> {
        match name {
            "full" | "fully_connected" => Ok(Topology::Full),
            "lattice" => Ok(Topology::Lattice { k }),
            "small_world" => Ok(Topology::SmallWorld { k, rewire }),
            "scale_free" => Ok(Topology::ScaleFree { k_out_max }),
            other => Err(TopologyError::UnknownTopology(other.to_string())),
        }
    }

    pub fn generate<R: Rng + ?Sized>(
        &self,
        n: usize,
        proportion_inhib: f64,
        avg_strength: AvgStrength,
        rng: &mut R,
    ) -> TopologyResult<GeneratedTopology> {
        match *self {
            Topology::Full => fully_connected(n, proportion_inhib, avg_strength, rng),
            Topology::Lattice { k } => lattice(n, k, proportion_inhib, avg_strength, rng),
            Topology::SmallWorld { k, rewire } => {
                small_world(n, k, rewire, proportion_inhib, avg_strength, rng)
            }
            Topology::ScaleFree { k_out_max } => {
                scale_free(n, k_out_max, proportion_inhib, avg_strength, rng)
            }
        }
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub(crate) fn validate_neuron_count(n: usize) -> TopologyResult<()> {
    if n == 0 {
        return Err(TopologyError::invalid("n", "network needs at least one neuron"));
    }
    Ok(())
}

pub(crate) fn validate_inhibitory_proportion(p: f64) -> TopologyResult<()> {
    if !(0.0..0.5).contains(&p) {
        return Err(TopologyError::InvalidInhibitoryProportion(p));
    }
    Ok(())
}

pub(crate) fn validate_degree(parameter: &'static str, k: usize, n: usize) -> TopologyResult<()> {
    if k == 0 || k >= n {
        return Err(TopologyError::invalid(
            parameter,
            format!("must be within [1, n - 1 = {}], got {k}", n.saturating_sub(1)),
        ));
    }
    Ok(())
}
