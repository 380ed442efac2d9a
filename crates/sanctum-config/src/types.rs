// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! This module defines all configuration structs that map to sections in
//! `sanctum_configuration.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SanctumConfig {
    pub system: SystemConfig,
    pub scheduler: SchedulerConfig,
    pub queue: QueueConfig,
    pub degradation: DegradationConfig,
    pub pressure: PressureConfig,
    pub zones: ZonesConfig,
    pub logging: LoggingConfig,
}

/// System-level configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SystemConfig {
    pub debug: bool,
    pub log_level: String,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            debug: false,
            log_level: "INFO".to_string(),
        }
    }
}

/// Heartbeat scheduler configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Target tick frequency in Hz.
    pub target_hz: f64,
    /// Minimum acceptable tick rate; slower cycles count as violations.
    pub min_frequency_floor: f64,
    /// Cycles slower than this (but above the floor) classify as stress.
    pub stress_hz: f64,
    /// Pressure level at which a steady cycle reports a building cascade.
    pub cascade_threshold: f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            target_hz: 90.0,
            min_frequency_floor: 30.0,
            stress_hz: 60.0,
            cascade_threshold: 0.7,
        }
    }
}

/// Injection queue configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Fixed capacity; the oldest entry is evicted beyond this.
    pub capacity: usize,
    /// Bounded wait inside the per-cycle dequeue, in milliseconds.
    pub dequeue_timeout_ms: u64,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            capacity: 10,
            dequeue_timeout_ms: 1,
        }
    }
}

/// Failure degradation configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DegradationConfig {
    /// Recovery pause slept at the floor tier after a failed cycle.
    pub recovery_pause_ms: u64,
    /// Consecutive steady cycles required before the target steps back up.
    pub recovery_steady_cycles: u32,
}

impl Default for DegradationConfig {
    fn default() -> Self {
        Self {
            recovery_pause_ms: 100,
            recovery_steady_cycles: 120,
        }
    }
}

/// Cascade pressure coefficients.
///
/// Historical operating defaults; only the monotonic shape of the estimate
/// is contractual.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PressureConfig {
    pub coherence_weight: f64,
    pub coherence_threshold: f64,
    pub richness_weight: f64,
    pub richness_threshold: f64,
    pub signature_weight: f64,
    pub frequency_weight: f64,
    pub frequency_threshold: f64,
}

impl Default for PressureConfig {
    fn default() -> Self {
        Self {
            coherence_weight: 0.3,
            coherence_threshold: 85.0,
            richness_weight: 0.2,
            richness_threshold: 0.8,
            signature_weight: 0.2,
            frequency_weight: 0.3,
            frequency_threshold: 88.0,
        }
    }
}

/// Boundary zone thresholds
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ZonesConfig {
    /// Payload channel level above which its zone latches.
    pub activation_threshold: f64,
    /// Mean external resonance below which the depletion zone latches.
    pub resonance_floor: f64,
}

impl Default for ZonesConfig {
    fn default() -> Self {
        Self {
            activation_threshold: 0.7,
            resonance_floor: 0.3,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Base directory for log runs.
    pub log_dir: PathBuf,
    /// Keep logs for N days.
    pub retention_days: u64,
    /// Keep N most recent runs.
    pub retention_runs: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("./logs"),
            retention_days: 30,
            retention_runs: 10,
        }
    }
}
