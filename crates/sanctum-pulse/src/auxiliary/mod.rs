// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Auxiliary signal processors.

Three independent, pluggable scorers run once per cycle over the integrated
envelope and the prior state. Each is a total function from the scheduler's
point of view: arithmetic is clamped, missing inputs map to defaults, and
nothing here can fail a cycle. The scheduler holds them as a uniform list of
trait objects and applies whatever signals come back.
*/

pub mod boundary_zones;
pub mod cascade_pressure;
pub mod recognition_field;

pub use boundary_zones::{BoundaryZoneCoordinator, ZoneTuning, SOVEREIGNTY_ZONE};
pub use cascade_pressure::{CascadePressureEstimator, PressureTuning};
pub use recognition_field::{RecognitionField, RecognitionFieldGenerator};

use ahash::AHashMap;

use crate::envelope::EventEnvelope;
use crate::state::HeartbeatState;

/// Output of one auxiliary processor for one cycle.
#[derive(Debug, Clone)]
pub enum AuxiliarySignal {
    /// Cascade pressure, 0.0-1.0.
    Pressure(f64),
    /// Named boolean zones.
    Zones(AHashMap<String, bool>),
    /// Recognition field for external observability.
    Recognition(RecognitionField),
}

/// A pluggable per-cycle scorer.
///
/// Implementations must be total: no panics, no errors, no blocking. When a
/// processor has nothing meaningful to report it returns its
/// [`neutral`](AuxiliaryProcessor::neutral) signal.
pub trait AuxiliaryProcessor: Send {
    fn name(&self) -> &'static str;

    /// Signal the scheduler may substitute when the processor cannot produce
    /// one.
    fn neutral(&self) -> AuxiliarySignal;

    fn process(&mut self, envelope: &EventEnvelope, state: &HeartbeatState) -> AuxiliarySignal;

    /// Clear any latched internal state.
    fn reset(&mut self) {}
}

/// Clamp to [0.0, 1.0], mapping NaN to 0.0 so a degenerate input can never
/// poison downstream state.
pub(crate) fn clamp01(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// The standard processor set, in the order the scheduler runs them.
pub fn default_processors(
    pressure: PressureTuning,
    zones: ZoneTuning,
    floor_hz: f64,
) -> Vec<Box<dyn AuxiliaryProcessor>> {
    vec![
        Box::new(CascadePressureEstimator::new(pressure)),
        Box::new(BoundaryZoneCoordinator::new(zones)),
        Box::new(RecognitionFieldGenerator::new(floor_hz)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp01_handles_degenerate_values() {
        assert_eq!(clamp01(f64::NAN), 0.0);
        assert_eq!(clamp01(-3.0), 0.0);
        assert_eq!(clamp01(7.5), 1.0);
        assert_eq!(clamp01(0.42), 0.42);
    }

    #[test]
    fn default_set_contains_all_three_processors() {
        let processors =
            default_processors(PressureTuning::default(), ZoneTuning::default(), 30.0);
        let names: Vec<&str> = processors.iter().map(|p| p.name()).collect();
        assert_eq!(
            names,
            vec!["cascade-pressure", "boundary-zones", "recognition-field"]
        );
    }
}
