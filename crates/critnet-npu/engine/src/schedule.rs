// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Stimulation schedules
//!
//! A schedule is an ordered list of phases, each a step count paired with a thalamic drive
//! probability. Phases run back to back on the same network without any reset.

use critnet_npu_neural::{NetworkError, Result};

const RAMP_DURATIONS: [usize; 5] = [100, 100, 100, 200, 10_000];
const RAMP_PROBABILITIES: [f64; 5] = [0.00005, 0.0005, 0.005, 0.01, 0.005];

/// One phase of a schedule
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Phase {
    pub steps: usize,
    pub drive_probability: f64,
}

impl Phase {
    pub fn new(steps: usize, drive_probability: f64) -> Result<Self> {
        validate_drive_probability(drive_probability)?;
        Ok(Self {
            steps,
            drive_probability,
        })
    }
}

/// Validated, ordered list of phases
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schedule {
    phases: Vec<Phase>,
}

impl Schedule {
    /// Build a schedule from parallel duration and drive-probability lists.
    pub fn new(durations: &[usize], probabilities: &[f64]) -> Result<Self> {
        if durations.len() != probabilities.len() {
            return Err(NetworkError::ScheduleLengthMismatch {
                durations: durations.len(),
                probabilities: probabilities.len(),
            });
        }
        let phases = durations
            .iter()
            .zip(probabilities)
            .map(|(&steps, &r)| Phase::new(steps, r))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { phases })
    }

    /// Default `[schedule]` drive ramp: a short warm-up at increasing drive,
    /// then a long phase at `r = 0.005`.
    pub fn ramp() -> Result<Self> {
        Self::new(&RAMP_DURATIONS, &RAMP_PROBABILITIES)
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    pub fn push(&mut self, phase: Phase) {
        self.phases.push(phase);
    }

    /// Total number of steps across all phases
    pub fn total_steps(&self) -> usize {
        self.phases.iter().map(|p| p.steps).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }
}

pub(crate) fn validate_drive_probability(r: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&r) {
        return Err(NetworkError::invalid(
            "drive_probability",
            format!("must be within [0, 1], got {r}"),
        ));
    }
    Ok(())
}
