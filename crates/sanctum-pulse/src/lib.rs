// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
# sanctum-pulse

Fixed-rate event-processing heartbeat for the sanctuary runtime.

The scheduler loop ticks at a target frequency (default 90 Hz), accepts
asynchronously injected work envelopes through a bounded queue, degrades
gracefully under repeated cycle failure, and reports timing-accurate health
metrics.

## Architecture

- Producers call [`PulseRunner::inject`] (or clone an [`InjectionHandle`])
  from any thread; the queue evicts its oldest entry on overflow.
- One dedicated consumer thread runs the heartbeat loop: dequeue-or-synthesize,
  integrate with the energy system, run the auxiliary processors, close the
  cycle through the timing governor.
- Cycle failures step the target frequency down a fixed ladder
  (90 → 45 → 30 Hz); sustained steady cycles step it back up.
- [`PulseRunner::snapshot`] exposes a read-only metrics copy for polling.
*/

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod auxiliary;
pub mod degradation;
pub mod energy;
pub mod envelope;
pub mod injection_queue;
pub mod metrics;
pub mod runner;
pub mod scheduler;
pub mod state;
pub mod synthesizer;
pub mod timing;

pub use auxiliary::{AuxiliaryProcessor, AuxiliarySignal, PressureTuning, RecognitionField, ZoneTuning};
pub use degradation::DegradationController;
pub use energy::{EnergySystem, NeutralEnergySystem};
pub use envelope::{EventEnvelope, MIN_FREQUENCY_FLOOR};
pub use injection_queue::BoundedInjectionQueue;
pub use metrics::MetricsSnapshot;
pub use runner::{InjectionHandle, PulseRunner};
pub use scheduler::HeartbeatScheduler;
pub use state::{HeartbeatState, Status};
pub use synthesizer::EventSynthesizer;
pub use timing::TimingGovernor;

/// Scheduler construction parameters.
///
/// All knobs the loop needs at construction time. The heuristic pressure and
/// zone coefficients carry the historical defaults but are not load-bearing;
/// only their shape is contractual (see the tests beside each processor).
#[derive(Debug, Clone)]
pub struct PulseConfig {
    /// Target tick frequency in Hz.
    pub target_hz: f64,
    /// Minimum acceptable tick rate before a cycle counts as a violation.
    pub min_frequency_floor: f64,
    /// Cycles slower than this (but above the floor) classify as `Stress`.
    pub stress_hz: f64,
    /// Injection queue capacity (evict-oldest beyond this).
    pub queue_capacity: usize,
    /// Bounded wait inside `try_dequeue`, in milliseconds.
    pub dequeue_timeout_ms: u64,
    /// Recovery pause slept at the floor tier after a failed cycle.
    pub recovery_pause_ms: u64,
    /// Consecutive `Steady` cycles required before the target steps back up.
    pub recovery_steady_cycles: u32,
    /// Pressure at or above which an otherwise steady cycle reports
    /// `BuildingCascade`.
    pub cascade_threshold: f64,
    pub pressure: PressureTuning,
    pub zones: ZoneTuning,
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            target_hz: 90.0,
            min_frequency_floor: MIN_FREQUENCY_FLOOR,
            stress_hz: 60.0,
            queue_capacity: 10,
            dequeue_timeout_ms: 1,
            recovery_pause_ms: 100,
            recovery_steady_cycles: 120,
            cascade_threshold: 0.7,
            pressure: PressureTuning::default(),
            zones: ZoneTuning::default(),
        }
    }
}

/// Errors surfaced by the scheduler core.
#[derive(Debug, thiserror::Error)]
pub enum PulseError {
    #[error("energy system failure: {0}")]
    EnergySystem(String),

    #[error("heartbeat loop already running")]
    AlreadyRunning,

    #[error("failed to spawn heartbeat thread: {0}")]
    ThreadSpawn(String),
}

/// Result type for scheduler operations.
pub type PulseResult<T> = Result<T, PulseError>;
