// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! This module implements the 3-tier configuration loading system:
//! 1. TOML file (base defaults)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::{ConfigError, ConfigResult, SanctumConfig};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration file name searched for in the working directory and its
/// ancestors.
pub const CONFIG_FILE_NAME: &str = "sanctum_configuration.toml";

/// Find the sanctum configuration file
///
/// Search order:
/// 1. `SANCTUM_CONFIG_PATH` environment variable
/// 2. Current working directory: `./sanctum_configuration.toml`
/// 3. Ancestor directories (searches up to 5 levels for the workspace root)
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any
/// location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    // 1. Check environment variable first
    if let Ok(env_path) = env::var("SANCTUM_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        } else {
            return Err(ConfigError::FileNotFound(format!(
                "Config file specified by SANCTUM_CONFIG_PATH not found: {}",
                path.display()
            )));
        }
    }

    // 2. Search in common locations
    let mut search_paths = Vec::new();

    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));

        let mut current = cwd.clone();
        for _ in 0..5 {
            if let Some(parent) = current.parent() {
                search_paths.push(parent.join(CONFIG_FILE_NAME));
                current = parent.to_path_buf();
            }
        }
    }

    for path in &search_paths {
        if path.exists() {
            return Ok(path.clone());
        }
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "Configuration file '{CONFIG_FILE_NAME}' not found in any of these locations:\n{search_list}\n\nSet SANCTUM_CONFIG_PATH environment variable to specify custom location."
    )))
}

/// Load configuration from TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for
///   config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Returns
///
/// Complete `SanctumConfig` with all overrides applied and validated
///
/// # Errors
///
/// Returns error if config file is not found, contains invalid TOML, or fails
/// validation
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<SanctumConfig> {
    let config_file = if let Some(path) = config_path {
        path.to_path_buf()
    } else {
        find_config_file()?
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: SanctumConfig = toml::from_str(&content)?;

    // Apply overrides in order
    apply_environment_overrides(&mut config);

    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli);
    }

    crate::validation::validate_config(&config)?;

    Ok(config)
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `SANCTUM_TARGET_HZ` -> `scheduler.target_hz`
/// - `SANCTUM_MIN_FREQUENCY_FLOOR` -> `scheduler.min_frequency_floor`
/// - `SANCTUM_QUEUE_CAPACITY` -> `queue.capacity`
/// - `SANCTUM_RECOVERY_PAUSE_MS` -> `degradation.recovery_pause_ms`
/// - `SANCTUM_LOG_LEVEL` -> `system.log_level`
/// - `SANCTUM_LOG_DIR` -> `logging.log_dir`
pub fn apply_environment_overrides(config: &mut SanctumConfig) {
    if let Ok(value) = env::var("SANCTUM_TARGET_HZ") {
        if let Ok(hz) = value.parse::<f64>() {
            config.scheduler.target_hz = hz;
        }
    }
    if let Ok(value) = env::var("SANCTUM_MIN_FREQUENCY_FLOOR") {
        if let Ok(hz) = value.parse::<f64>() {
            config.scheduler.min_frequency_floor = hz;
        }
    }
    if let Ok(value) = env::var("SANCTUM_QUEUE_CAPACITY") {
        if let Ok(capacity) = value.parse::<usize>() {
            config.queue.capacity = capacity;
        }
    }
    if let Ok(value) = env::var("SANCTUM_RECOVERY_PAUSE_MS") {
        if let Ok(ms) = value.parse::<u64>() {
            config.degradation.recovery_pause_ms = ms;
        }
    }
    if let Ok(value) = env::var("SANCTUM_LOG_LEVEL") {
        config.system.log_level = value;
    }
    if let Ok(value) = env::var("SANCTUM_LOG_DIR") {
        config.logging.log_dir = PathBuf::from(value);
    }
}

/// Apply CLI argument overrides (dotted keys, e.g. `scheduler.target_hz`)
pub fn apply_cli_overrides(config: &mut SanctumConfig, cli_args: &HashMap<String, String>) {
    for (key, value) in cli_args {
        match key.as_str() {
            "scheduler.target_hz" => {
                if let Ok(hz) = value.parse::<f64>() {
                    config.scheduler.target_hz = hz;
                }
            }
            "scheduler.min_frequency_floor" => {
                if let Ok(hz) = value.parse::<f64>() {
                    config.scheduler.min_frequency_floor = hz;
                }
            }
            "queue.capacity" => {
                if let Ok(capacity) = value.parse::<usize>() {
                    config.queue.capacity = capacity;
                }
            }
            "degradation.recovery_pause_ms" => {
                if let Ok(ms) = value.parse::<u64>() {
                    config.degradation.recovery_pause_ms = ms;
                }
            }
            "system.log_level" => {
                config.system.log_level = value.clone();
            }
            _ => {}
        }
    }
}
