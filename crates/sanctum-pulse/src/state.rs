// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Scheduler-owned mutable state and the per-cycle health status.

use ahash::AHashMap;
use serde::Serialize;
use std::time::Instant;

use crate::auxiliary::boundary_zones::SOVEREIGNTY_ZONE;
use crate::auxiliary::RecognitionField;
use crate::envelope::EventEnvelope;

/// Health status computed each cycle from measured frequency relative to the
/// target and the frequency floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// No cycle has completed yet.
    Initializing,
    /// Cycle cost within the target budget.
    Steady,
    /// Cycle slower than the stress threshold but above the floor.
    Stress,
    /// Cycle slower than the floor interval.
    FloorViolation,
    /// Steady timing with cascade pressure at or above the threshold.
    BuildingCascade,
    /// Degraded to the floor tier; loop is in its recovery pause regime.
    SacredPause,
}

/// Mutable state owned exclusively by the heartbeat loop.
///
/// Created once at scheduler construction, mutated once per cycle. Observers
/// never touch this directly; they read [`crate::MetricsSnapshot`] copies.
#[derive(Debug)]
pub struct HeartbeatState {
    /// Measured frequency of the most recent cycle.
    pub current_hz: f64,
    /// Current pacing target. Degradation steps this down; sustained steady
    /// cycles step it back up toward the configured target.
    pub target_hz: f64,
    /// Strictly sequential cycle number.
    pub cycle_count: u64,
    /// Capture time of the most recently integrated envelope.
    pub last_event_time: Option<Instant>,
    /// Cycles whose measured duration exceeded the floor interval.
    pub violation_count: u64,
    /// Last integrated envelope (None before the first cycle).
    pub active_envelope: Option<EventEnvelope>,
    /// Resonance map returned by the energy system collaborator.
    pub external_resonance: AHashMap<String, f64>,
    /// Cascade pressure, 0.0-1.0.
    pub pressure: f64,
    /// Named boolean zones; the sovereignty zone is always true.
    pub active_zones: AHashMap<String, bool>,
    /// Recognition field derived for external observability.
    pub recognition: RecognitionField,
    pub status: Status,
    /// Consecutive `Steady` cycles at the current tier, for the
    /// ramp-back-up policy.
    pub steady_streak: u32,
}

impl HeartbeatState {
    pub fn new(target_hz: f64) -> Self {
        // The sovereignty zone holds from construction so the invariant is
        // visible even if the very first cycle fails.
        let mut active_zones = AHashMap::new();
        active_zones.insert(SOVEREIGNTY_ZONE.to_string(), true);

        Self {
            // Until a cycle has been measured, report the target as the
            // operating rate; the synthesizer claims this value on a cold
            // start.
            current_hz: target_hz,
            target_hz,
            cycle_count: 0,
            last_event_time: None,
            violation_count: 0,
            active_envelope: None,
            external_resonance: AHashMap::new(),
            pressure: 0.0,
            active_zones,
            recognition: RecognitionField::default(),
            status: Status::Initializing,
            steady_streak: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_reports_initializing_at_target_rate() {
        let state = HeartbeatState::new(90.0);
        assert_eq!(state.status, Status::Initializing);
        assert_eq!(state.current_hz, 90.0);
        assert_eq!(state.cycle_count, 0);
        assert!(state.active_envelope.is_none());
    }

    #[test]
    fn sovereignty_zone_present_before_first_cycle() {
        let state = HeartbeatState::new(90.0);
        assert_eq!(state.active_zones.get(SOVEREIGNTY_ZONE), Some(&true));
    }
}
