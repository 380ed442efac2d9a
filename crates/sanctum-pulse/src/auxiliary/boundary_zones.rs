// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Boundary zone coordination.
//!
//! Maintains a fixed set of named boolean zones flagging conditions that need
//! special handling. The sovereignty zone is structurally invariant and never
//! disabled. Payload-driven zones latch true when the same-named payload
//! channel exceeds the activation threshold; the depletion zone latches when
//! external resonance falls below its floor. Latched zones stay set across
//! cycles until an explicit [`reset`](super::AuxiliaryProcessor::reset).

use ahash::AHashMap;

use super::{AuxiliaryProcessor, AuxiliarySignal};
use crate::envelope::EventEnvelope;
use crate::state::HeartbeatState;

/// Invariant zone: always true, regardless of inputs.
pub const SOVEREIGNTY_ZONE: &str = "sovereignty";

/// Zone latched when mean external resonance drops below the resonance floor.
pub const DEPLETION_ZONE: &str = "depletion";

/// Zones driven by the same-named payload channel.
const PAYLOAD_ZONES: &[&str] = &["uncertainty", "intensity"];

/// Activation thresholds for the zone set.
#[derive(Debug, Clone)]
pub struct ZoneTuning {
    /// Payload channel level above which its zone latches.
    pub activation_threshold: f64,
    /// Mean external resonance below which the depletion zone latches.
    pub resonance_floor: f64,
}

impl Default for ZoneTuning {
    fn default() -> Self {
        Self {
            activation_threshold: 0.7,
            resonance_floor: 0.3,
        }
    }
}

pub struct BoundaryZoneCoordinator {
    tuning: ZoneTuning,
    zones: AHashMap<String, bool>,
}

impl BoundaryZoneCoordinator {
    pub fn new(tuning: ZoneTuning) -> Self {
        Self {
            tuning,
            zones: Self::initial_zones(),
        }
    }

    fn initial_zones() -> AHashMap<String, bool> {
        let mut zones = AHashMap::new();
        zones.insert(SOVEREIGNTY_ZONE.to_string(), true);
        zones.insert(DEPLETION_ZONE.to_string(), false);
        for name in PAYLOAD_ZONES {
            zones.insert((*name).to_string(), false);
        }
        zones
    }
}

impl AuxiliaryProcessor for BoundaryZoneCoordinator {
    fn name(&self) -> &'static str {
        "boundary-zones"
    }

    /// The neutral signal retains whatever is already latched; zones only
    /// clear through an explicit reset.
    fn neutral(&self) -> AuxiliarySignal {
        AuxiliarySignal::Zones(self.zones.clone())
    }

    fn process(&mut self, envelope: &EventEnvelope, state: &HeartbeatState) -> AuxiliarySignal {
        for name in PAYLOAD_ZONES {
            if let Some(level) = envelope.payload.get(*name) {
                if *level > self.tuning.activation_threshold {
                    self.zones.insert((*name).to_string(), true);
                }
            }
        }

        // No resonance reading at all is not depletion.
        if !state.external_resonance.is_empty() {
            let mean = state.external_resonance.values().sum::<f64>()
                / state.external_resonance.len() as f64;
            if mean < self.tuning.resonance_floor {
                self.zones.insert(DEPLETION_ZONE.to_string(), true);
            }
        }

        self.zones.insert(SOVEREIGNTY_ZONE.to_string(), true);
        AuxiliarySignal::Zones(self.zones.clone())
    }

    fn reset(&mut self) {
        self.zones = Self::initial_zones();
    }
}
