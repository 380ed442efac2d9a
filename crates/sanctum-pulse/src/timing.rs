// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Cycle timing: effective-frequency measurement, health classification, and
end-of-cycle pacing.

The governor guarantees the loop's nominal period tracks the current target
frequency even though individual cycles vary in cost. It does not guarantee
hard real-time bounds; pacing is best-effort and violations are counted for
observability.
*/

use std::time::{Duration, Instant};

use tracing::warn;

use crate::state::{HeartbeatState, Status};

/// Lower bound on a cycle duration when computing effective frequency, so a
/// pathologically fast (or zero) measurement cannot divide by zero.
const MIN_MEASURABLE_SECS: f64 = 1e-9;

#[derive(Debug, Clone)]
pub struct TimingGovernor {
    floor_hz: f64,
    stress_hz: f64,
    cascade_threshold: f64,
}

impl TimingGovernor {
    pub fn new(floor_hz: f64, stress_hz: f64, cascade_threshold: f64) -> Self {
        Self {
            floor_hz,
            stress_hz,
            cascade_threshold,
        }
    }

    /// Effective frequency of a cycle with the given measured cost.
    pub fn effective_hz(elapsed: Duration) -> f64 {
        1.0 / elapsed.as_secs_f64().max(MIN_MEASURABLE_SECS)
    }

    /// Classify one cycle's measured duration against the floor and stress
    /// thresholds.
    pub fn classify(&self, elapsed: Duration) -> Status {
        let secs = elapsed.as_secs_f64();
        if secs > 1.0 / self.floor_hz {
            Status::FloorViolation
        } else if secs > 1.0 / self.stress_hz {
            Status::Stress
        } else {
            Status::Steady
        }
    }

    /// Remaining slice of the target interval after a cycle of the given
    /// cost. Zero when the cycle overran its budget.
    pub fn pacing_sleep(elapsed: Duration, target_hz: f64) -> Duration {
        let interval_sec = 1.0 / target_hz;
        if interval_sec > elapsed.as_secs_f64() {
            Duration::from_secs_f64(interval_sec - elapsed.as_secs_f64())
        } else {
            Duration::ZERO
        }
    }

    /// Close a successful cycle: update the measured rate, classify status
    /// (counting floor violations), and return the pacing sleep for the
    /// caller to honor.
    pub fn close_cycle(&self, cycle_start: Instant, state: &mut HeartbeatState) -> Duration {
        let elapsed = cycle_start.elapsed();
        state.current_hz = Self::effective_hz(elapsed);

        let mut status = self.classify(elapsed);
        if status == Status::FloorViolation {
            state.violation_count += 1;
            warn!(
                "[TIMING] cycle {} ran {:.2}ms, below the {:.0} Hz floor (violation #{})",
                state.cycle_count,
                elapsed.as_secs_f64() * 1000.0,
                self.floor_hz,
                state.violation_count
            );
        }
        if status == Status::Steady && state.pressure >= self.cascade_threshold {
            status = Status::BuildingCascade;
        }
        state.status = status;

        Self::pacing_sleep(elapsed, state.target_hz)
    }
}
