// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! This module provides validation logic to ensure configuration values are
//! consistent, within valid ranges, and don't conflict with each other.

use crate::{ConfigResult, SanctumConfig};

/// Validation errors that can occur during config validation
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("{field} = {value} is outside valid range: {reason}")]
    OutOfRange {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid configuration value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Configuration validation failed:\n{0}")]
    Multiple(String),
}

fn out_of_range(field: &str, value: impl std::fmt::Display, reason: &str) -> ConfigValidationError {
    ConfigValidationError::OutOfRange {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Validate the complete configuration
///
/// Checks for:
/// - Frequency ordering (floor <= stress <= target, all positive)
/// - Queue capacity and timeout sanity
/// - Heuristic coefficients within their documented ranges
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` with details if validation fails
pub fn validate_config(config: &SanctumConfig) -> ConfigResult<()> {
    let mut errors = Vec::new();

    validate_frequencies(config, &mut errors);
    validate_queue(config, &mut errors);
    validate_heuristics(config, &mut errors);

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0).into()),
        _ => {
            let error_messages = errors
                .iter()
                .map(|e| format!("  - {e}"))
                .collect::<Vec<_>>()
                .join("\n");
            Err(ConfigValidationError::Multiple(error_messages).into())
        }
    }
}

fn validate_frequencies(config: &SanctumConfig, errors: &mut Vec<ConfigValidationError>) {
    let s = &config.scheduler;
    if s.min_frequency_floor <= 0.0 {
        errors.push(out_of_range(
            "scheduler.min_frequency_floor",
            s.min_frequency_floor,
            "must be positive",
        ));
    }
    if s.target_hz < s.min_frequency_floor {
        errors.push(out_of_range(
            "scheduler.target_hz",
            s.target_hz,
            "must be at least the frequency floor",
        ));
    }
    if s.stress_hz < s.min_frequency_floor || s.stress_hz > s.target_hz {
        errors.push(out_of_range(
            "scheduler.stress_hz",
            s.stress_hz,
            "must lie between the floor and the target",
        ));
    }
    if !(0.0..=1.0).contains(&s.cascade_threshold) {
        errors.push(out_of_range(
            "scheduler.cascade_threshold",
            s.cascade_threshold,
            "must be within 0.0-1.0",
        ));
    }
}

fn validate_queue(config: &SanctumConfig, errors: &mut Vec<ConfigValidationError>) {
    if config.queue.capacity == 0 {
        errors.push(out_of_range(
            "queue.capacity",
            config.queue.capacity,
            "must be at least 1",
        ));
    }
    if config.queue.dequeue_timeout_ms == 0 {
        errors.push(out_of_range(
            "queue.dequeue_timeout_ms",
            config.queue.dequeue_timeout_ms,
            "must be at least 1",
        ));
    }
}

fn validate_heuristics(config: &SanctumConfig, errors: &mut Vec<ConfigValidationError>) {
    let p = &config.pressure;
    for (field, weight) in [
        ("pressure.coherence_weight", p.coherence_weight),
        ("pressure.richness_weight", p.richness_weight),
        ("pressure.signature_weight", p.signature_weight),
        ("pressure.frequency_weight", p.frequency_weight),
    ] {
        if weight < 0.0 {
            errors.push(out_of_range(field, weight, "weights must be non-negative"));
        }
    }

    let z = &config.zones;
    if !(0.0..=1.0).contains(&z.activation_threshold) {
        errors.push(out_of_range(
            "zones.activation_threshold",
            z.activation_threshold,
            "must be within 0.0-1.0",
        ));
    }
    if !(0.0..=1.0).contains(&z.resonance_floor) {
        errors.push(out_of_range(
            "zones.resonance_floor",
            z.resonance_floor,
            "must be within 0.0-1.0",
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&SanctumConfig::default()).is_ok());
    }

    #[test]
    fn target_below_floor_is_rejected() {
        let mut config = SanctumConfig::default();
        config.scheduler.target_hz = 10.0;
        config.scheduler.stress_hz = 10.0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let mut config = SanctumConfig::default();
        config.queue.capacity = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn negative_weight_is_rejected() {
        let mut config = SanctumConfig::default();
        config.pressure.richness_weight = -0.2;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn multiple_failures_are_aggregated() {
        let mut config = SanctumConfig::default();
        config.queue.capacity = 0;
        config.zones.resonance_floor = 2.0;
        let err = validate_config(&config).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("queue.capacity"));
        assert!(message.contains("zones.resonance_floor"));
    }
}
