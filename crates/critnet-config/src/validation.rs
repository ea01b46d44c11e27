// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! Range and consistency checks that serde cannot express. Every violation is collected so
//! a user sees all of them at once.

use crate::{ConfigError, ConfigResult, CritnetConfig};
use critnet_npu_neural::HistoryVariable;

/// Topology names accepted by `sweep.topologies`
pub const KNOWN_TOPOLOGIES: [&str; 4] = ["full", "lattice", "small_world", "scale_free"];

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validation errors that can occur during config validation
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    OutOfRange {
        field: String,
        value: f64,
        expected: &'static str,
    },
    LengthMismatch {
        first: &'static str,
        second: &'static str,
        lengths: (usize, usize),
    },
    EmptyList { field: &'static str },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfRange {
                field,
                value,
                expected,
            } => write!(f, "{} = {} is outside {}", field, value, expected),
            Self::LengthMismatch {
                first,
                second,
                lengths,
            } => write!(
                f,
                "{} has {} entries but {} has {}",
                first, lengths.0, second, lengths.1
            ),
            Self::EmptyList { field } => write!(f, "{} must not be empty", field),
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

/// Validate the complete configuration
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every violation
pub fn validate_config(config: &CritnetConfig) -> ConfigResult<()> {
    let errors = collect_validation_errors(config);
    if errors.is_empty() {
        return Ok(());
    }
    let error_messages = errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n");
    Err(ConfigError::ValidationError(format!(
        "Configuration validation failed:\n{}",
        error_messages
    )))
}

/// Every violation in `config`, empty when valid
pub fn collect_validation_errors(config: &CritnetConfig) -> Vec<ConfigValidationError> {
    let mut errors = Vec::new();
    validate_simulation(config, &mut errors);
    validate_schedule(config, &mut errors);
    validate_topology(config, &mut errors);
    validate_sweep(config, &mut errors);
    validate_logging(config, &mut errors);
    errors
}

fn check_range(
    errors: &mut Vec<ConfigValidationError>,
    field: impl Into<String>,
    value: f64,
    ok: bool,
    expected: &'static str,
) {
    if !ok || !value.is_finite() {
        errors.push(ConfigValidationError::OutOfRange {
            field: field.into(),
            value,
            expected,
        });
    }
}

fn validate_simulation(config: &CritnetConfig, errors: &mut Vec<ConfigValidationError>) {
    let sim = &config.simulation;
    check_range(errors, "simulation.tau_r", sim.tau_r, sim.tau_r >= 1.0, "[1, inf)");
    check_range(errors, "simulation.tau_d", sim.tau_d, sim.tau_d >= 1.0, "[1, inf)");
    let combined_rate = 1.0 / sim.tau_r + 1.0 / sim.tau_d;
    if sim.tau_r >= 1.0 && sim.tau_d >= 1.0 && combined_rate > 1.0 {
        errors.push(ConfigValidationError::OutOfRange {
            field: "simulation.tau_r, simulation.tau_d".to_string(),
            value: combined_rate,
            expected: "1/tau_r + 1/tau_d <= 1",
        });
    }
    check_range(
        errors,
        "simulation.leakage",
        sim.leakage,
        (0.0..=1.0).contains(&sim.leakage),
        "[0, 1]",
    );
    check_range(
        errors,
        "simulation.synaptic_efficacy",
        sim.synaptic_efficacy,
        sim.synaptic_efficacy >= 0.0,
        "[0, inf)",
    );
    if let Err(e) = HistoryVariable::parse_list(&sim.history) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "simulation.history".to_string(),
            reason: e.to_string(),
        });
    }
    if let Some(omega) = config.thalamus.omega {
        check_range(errors, "thalamus.omega", omega, omega > 0.0, "(0, inf)");
    }
}

fn validate_schedule(config: &CritnetConfig, errors: &mut Vec<ConfigValidationError>) {
    let schedule = &config.schedule;
    if schedule.durations.len() != schedule.probabilities.len() {
        errors.push(ConfigValidationError::LengthMismatch {
            first: "schedule.durations",
            second: "schedule.probabilities",
            lengths: (schedule.durations.len(), schedule.probabilities.len()),
        });
    }
    for (i, &r) in schedule.probabilities.iter().enumerate() {
        check_range(
            errors,
            format!("schedule.probabilities[{}]", i),
            r,
            (0.0..=1.0).contains(&r),
            "[0, 1]",
        );
    }
}

fn validate_topology(config: &CritnetConfig, errors: &mut Vec<ConfigValidationError>) {
    let topo = &config.topology;
    let n = topo.neurons;
    if n == 0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "topology.neurons".to_string(),
            reason: "must be at least 1".to_string(),
        });
        return;
    }
    let uses = |name: &str| config.sweep.topologies.iter().any(|t| t == name);
    if (uses("lattice") || uses("small_world")) && !(1..n).contains(&topo.k) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "topology.k".to_string(),
            reason: format!("{} is outside 1..={} for {} neurons", topo.k, n - 1, n),
        });
    }
    if uses("scale_free") && !(2..n).contains(&topo.k_out_max) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "topology.k_out_max".to_string(),
            reason: format!(
                "{} is outside 2..={} for {} neurons",
                topo.k_out_max,
                n.saturating_sub(1),
                n
            ),
        });
    }
    check_range(
        errors,
        "topology.rewire",
        topo.rewire,
        (0.0..=1.0).contains(&topo.rewire),
        "[0, 1]",
    );
    if let Some(avg) = topo.avg_strength {
        check_range(errors, "topology.avg_strength", avg, avg > 0.0, "(0, inf)");
    }
}

fn validate_sweep(config: &CritnetConfig, errors: &mut Vec<ConfigValidationError>) {
    let sweep = &config.sweep;
    if sweep.repetitions == 0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "sweep.repetitions".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    let lists: [(&'static str, usize); 4] = [
        ("sweep.proportion_inhib", sweep.proportion_inhib.len()),
        ("sweep.synaptic_efficacy", sweep.synaptic_efficacy.len()),
        ("sweep.omega", sweep.omega.len()),
        ("sweep.topologies", sweep.topologies.len()),
    ];
    for (field, len) in lists {
        if len == 0 {
            errors.push(ConfigValidationError::EmptyList { field });
        }
    }
    for (i, &p) in sweep.proportion_inhib.iter().enumerate() {
        check_range(
            errors,
            format!("sweep.proportion_inhib[{}]", i),
            p,
            (0.0..0.5).contains(&p),
            "[0, 0.5)",
        );
    }
    for (i, &eff) in sweep.synaptic_efficacy.iter().enumerate() {
        check_range(
            errors,
            format!("sweep.synaptic_efficacy[{}]", i),
            eff,
            eff >= 0.0,
            "[0, inf)",
        );
    }
    for (i, &omega) in sweep.omega.iter().enumerate() {
        check_range(errors, format!("sweep.omega[{}]", i), omega, omega > 0.0, "(0, inf)");
    }
    for name in &sweep.topologies {
        if !KNOWN_TOPOLOGIES.contains(&name.as_str()) {
            errors.push(ConfigValidationError::InvalidValue {
                field: "sweep.topologies".to_string(),
                reason: format!(
                    "unknown topology '{}', expected one of {}",
                    name,
                    KNOWN_TOPOLOGIES.join(", ")
                ),
            });
        }
    }
}

fn validate_logging(config: &CritnetConfig, errors: &mut Vec<ConfigValidationError>) {
    let level = config.logging.level.to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "logging.level".to_string(),
            reason: format!(
                "'{}' is not one of {}",
                config.logging.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }
}
