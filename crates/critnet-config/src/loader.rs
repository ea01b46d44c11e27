// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! Three tiers, later tiers win:
//! 1. TOML file
//! 2. Environment variables
//! 3. CLI arguments

use crate::{ConfigError, ConfigResult, CritnetConfig};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "critnet_configuration.toml";

/// Find the critnet configuration file
///
/// Search order:
/// 1. `CRITNET_CONFIG_PATH` environment variable
/// 2. Current working directory
/// 3. Up to five parent directories
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var("CRITNET_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by CRITNET_CONFIG_PATH not found: {}",
            path.display()
        )));
    }

    let mut search_paths = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));
        let mut current = cwd.as_path();
        for _ in 0..5 {
            match current.parent() {
                Some(parent) => {
                    search_paths.push(parent.join(CONFIG_FILE_NAME));
                    current = parent;
                }
                None => break,
            }
        }
    }

    if let Some(found) = search_paths.iter().find(|p| p.exists()) {
        return Ok(found.clone());
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "'{}' not found in any of these locations:\n{}\n\nSet CRITNET_CONFIG_PATH to specify a custom location.",
        CONFIG_FILE_NAME, search_list
    )))
}

/// Load configuration from a TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if the config file is not found or contains invalid TOML. Validation is
/// separate, see [`crate::validate_config`].
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<CritnetConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: CritnetConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config);
    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli);
    }

    Ok(config)
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `CRITNET_SEED` -> `simulation.seed`
/// - `CRITNET_LOG_LEVEL` -> `logging.level`
/// - `CRITNET_OUTPUT_DIR` -> `sweep.output_dir`
/// - `CRITNET_NEURONS` -> `topology.neurons`
///
/// Unparseable numeric values are ignored.
pub fn apply_environment_overrides(config: &mut CritnetConfig) {
    if let Ok(value) = env::var("CRITNET_SEED") {
        if let Ok(seed) = value.parse::<u64>() {
            config.simulation.seed = Some(seed);
        }
    }
    if let Ok(value) = env::var("CRITNET_LOG_LEVEL") {
        config.logging.level = value;
    }
    if let Ok(value) = env::var("CRITNET_OUTPUT_DIR") {
        config.sweep.output_dir = PathBuf::from(value);
    }
    if let Ok(value) = env::var("CRITNET_NEURONS") {
        if let Ok(neurons) = value.parse::<usize>() {
            config.topology.neurons = neurons;
        }
    }
}

/// Apply CLI argument overrides to configuration
///
/// Recognised keys: `seed`, `log_level`, `output_dir`, `neurons`, `repetitions`.
pub fn apply_cli_overrides(config: &mut CritnetConfig, cli_args: &HashMap<String, String>) {
    if let Some(value) = cli_args.get("seed") {
        if let Ok(seed) = value.parse::<u64>() {
            config.simulation.seed = Some(seed);
        }
    }
    if let Some(value) = cli_args.get("log_level") {
        config.logging.level = value.clone();
    }
    if let Some(value) = cli_args.get("output_dir") {
        config.sweep.output_dir = PathBuf::from(value);
    }
    if let Some(value) = cli_args.get("neurons") {
        if let Ok(neurons) = value.parse::<usize>() {
            config.topology.neurons = neurons;
        }
    }
    if let Some(value) = cli_args.get("repetitions") {
        if let Ok(repetitions) = value.parse::<usize>() {
            config.sweep.repetitions = repetitions;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::tempdir;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const OVERRIDE_VARS: [&str; 4] = [
        "CRITNET_SEED",
        "CRITNET_LOG_LEVEL",
        "CRITNET_OUTPUT_DIR",
        "CRITNET_NEURONS",
    ];

    fn clear_overrides() {
        for var in OVERRIDE_VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_find_config_file_env_var() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("custom_config.toml");
        File::create(&config_path).unwrap();

        env::set_var("CRITNET_CONFIG_PATH", config_path.to_str().unwrap());
        let result = find_config_file();
        env::remove_var("CRITNET_CONFIG_PATH");

        assert_eq!(result.unwrap(), config_path);
    }

    #[test]
    fn test_find_config_file_env_var_missing() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        env::set_var("CRITNET_CONFIG_PATH", dir.path().join("absent.toml"));
        let result = find_config_file();
        env::remove_var("CRITNET_CONFIG_PATH");

        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_minimal_config() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        clear_overrides();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);

        let mut file = File::create(&config_path).unwrap();
        writeln!(file, "[simulation]").unwrap();
        writeln!(file, "seed = 11").unwrap();
        writeln!(file, "history = [\"v\", \"s\"]").unwrap();
        writeln!(file, "[topology]").unwrap();
        writeln!(file, "neurons = 120").unwrap();

        let config = load_config(Some(&config_path), None).unwrap();

        assert_eq!(config.simulation.seed, Some(11));
        assert_eq!(config.simulation.history, vec!["v", "s"]);
        assert_eq!(config.topology.neurons, 120);
        assert_eq!(config.sweep, crate::SweepConfig::default());
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "[topology\nneurons = ").unwrap();

        assert!(matches!(
            load_config(Some(&config_path), None),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_environment_overrides() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let mut config = CritnetConfig::default();

        env::set_var("CRITNET_SEED", "1234");
        env::set_var("CRITNET_NEURONS", "not-a-number");
        env::set_var("CRITNET_OUTPUT_DIR", "/tmp/critnet-out");

        apply_environment_overrides(&mut config);
        clear_overrides();

        assert_eq!(config.simulation.seed, Some(1234));
        assert_eq!(config.topology.neurons, 500);
        assert_eq!(config.sweep.output_dir, PathBuf::from("/tmp/critnet-out"));
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = CritnetConfig::default();
        let mut cli_args = HashMap::new();
        cli_args.insert("neurons".to_string(), "80".to_string());
        cli_args.insert("repetitions".to_string(), "1".to_string());
        cli_args.insert("log_level".to_string(), "debug".to_string());

        apply_cli_overrides(&mut config, &cli_args);

        assert_eq!(config.topology.neurons, 80);
        assert_eq!(config.sweep.repetitions, 1);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_override_precedence() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);

        let mut file = File::create(&config_path).unwrap();
        writeln!(file, "[simulation]").unwrap();
        writeln!(file, "seed = 1").unwrap();
        writeln!(file, "[topology]").unwrap();
        writeln!(file, "neurons = 100").unwrap();

        env::set_var("CRITNET_SEED", "2");
        env::set_var("CRITNET_NEURONS", "200");

        let mut cli_args = HashMap::new();
        cli_args.insert("seed".to_string(), "3".to_string());

        let config = load_config(Some(&config_path), Some(&cli_args)).unwrap();
        clear_overrides();

        // CLI wins for seed, env wins for neurons
        assert_eq!(config.simulation.seed, Some(3));
        assert_eq!(config.topology.neurons, 200);
    }
}
