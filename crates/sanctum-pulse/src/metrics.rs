// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Read-only metrics snapshots for external observation.

use serde::Serialize;

use crate::state::{HeartbeatState, Status};

/// Defensive copy of the scheduler's externally relevant state, published
/// once per cycle. Poll-based; there is no push contract.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub current_hz: f64,
    pub target_hz: f64,
    pub status: Status,
    pub cycle_count: u64,
    pub violation_count: u64,
    pub pressure: f64,
    /// Number of zones currently latched true.
    pub active_zones_count: usize,
}

impl MetricsSnapshot {
    pub fn from_state(state: &HeartbeatState) -> Self {
        Self {
            current_hz: state.current_hz,
            target_hz: state.target_hz,
            status: state.status,
            cycle_count: state.cycle_count,
            violation_count: state.violation_count,
            pressure: state.pressure,
            active_zones_count: state.active_zones.values().filter(|v| **v).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_copies_state_without_aliasing() {
        let mut state = HeartbeatState::new(90.0);
        state.cycle_count = 7;
        state.pressure = 0.4;
        state.active_zones.insert("uncertainty".to_string(), true);
        state.active_zones.insert("intensity".to_string(), false);

        let snapshot = MetricsSnapshot::from_state(&state);
        assert_eq!(snapshot.cycle_count, 7);
        assert_eq!(snapshot.pressure, 0.4);
        // sovereignty + uncertainty latched, intensity not.
        assert_eq!(snapshot.active_zones_count, 2);

        // Mutating state afterwards does not affect the snapshot.
        state.cycle_count = 8;
        assert_eq!(snapshot.cycle_count, 7);
    }

    #[test]
    fn snapshot_serializes_for_external_consumers() {
        let state = HeartbeatState::new(90.0);
        let snapshot = MetricsSnapshot::from_state(&state);
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"status\":\"initializing\""));
        assert!(json.contains("\"target_hz\":90.0"));
    }
}
