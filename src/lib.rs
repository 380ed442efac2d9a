// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Sanctum - Fixed-Rate Event-Processing Heartbeat
//!
//! Sanctum keeps a long-lived scheduler loop ticking at a target frequency
//! (90 Hz by default), feeding it asynchronously injected work envelopes
//! through a bounded lossy queue, degrading gracefully under repeated
//! failure, and exposing timing-accurate health metrics for polling.
//!
//! This umbrella crate re-exports the workspace components:
//!
//! - [`pulse`]: the scheduler core (envelope, injection queue, auxiliary
//!   processors, timing governor, degradation controller, loop runner)
//! - [`config`]: TOML configuration with environment and CLI overrides
//! - [`observability`]: logging bootstrap and per-crate debug flags
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sanctum::prelude::*;
//!
//! let mut runner = PulseRunner::new(PulseConfig::default());
//! let producer = runner.injection_handle();
//! runner.start()?;
//!
//! // ... producers inject envelopes from their own threads ...
//!
//! let snapshot = runner.snapshot();
//! println!("{:.1} Hz, status {:?}", snapshot.current_hz, snapshot.status);
//! runner.stop();
//! # drop(producer);
//! # Ok::<(), sanctum::pulse::PulseError>(())
//! ```

pub use sanctum_config as config;
pub use sanctum_observability as observability;
pub use sanctum_pulse as pulse;

use sanctum_config::SanctumConfig;
use sanctum_pulse::{PressureTuning, PulseConfig, ZoneTuning};

/// Commonly used items in one import.
pub mod prelude {
    pub use sanctum_config::{load_config, SanctumConfig};
    pub use sanctum_observability::{init_logging, parse_debug_flags, CrateDebugFlags};
    pub use sanctum_pulse::{
        EnergySystem, EventEnvelope, InjectionHandle, MetricsSnapshot, PulseConfig, PulseRunner,
        Status,
    };

    pub use crate::pulse_config_from;
}

/// Map the file-based configuration onto scheduler construction parameters.
pub fn pulse_config_from(config: &SanctumConfig) -> PulseConfig {
    PulseConfig {
        target_hz: config.scheduler.target_hz,
        min_frequency_floor: config.scheduler.min_frequency_floor,
        stress_hz: config.scheduler.stress_hz,
        queue_capacity: config.queue.capacity,
        dequeue_timeout_ms: config.queue.dequeue_timeout_ms,
        recovery_pause_ms: config.degradation.recovery_pause_ms,
        recovery_steady_cycles: config.degradation.recovery_steady_cycles,
        cascade_threshold: config.scheduler.cascade_threshold,
        pressure: PressureTuning {
            coherence_weight: config.pressure.coherence_weight,
            coherence_threshold: config.pressure.coherence_threshold,
            richness_weight: config.pressure.richness_weight,
            richness_threshold: config.pressure.richness_threshold,
            signature_weight: config.pressure.signature_weight,
            frequency_weight: config.pressure.frequency_weight,
            frequency_threshold: config.pressure.frequency_threshold,
        },
        zones: ZoneTuning {
            activation_threshold: config.zones.activation_threshold,
            resonance_floor: config.zones.resonance_floor,
        },
    }
}
