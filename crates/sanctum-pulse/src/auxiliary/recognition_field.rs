// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Recognition field: frequency-tracking strength plus derived health flags,
//! maintained for external observability only.

use super::{clamp01, AuxiliaryProcessor, AuxiliarySignal};
use crate::envelope::EventEnvelope;
use crate::state::HeartbeatState;

/// Derived observability signal: how closely the loop tracks its target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecognitionField {
    /// `current_hz / target_hz`, clamped to [0, 1].
    pub strength: f64,
    /// Measured rate at or above the frequency floor.
    pub floor_held: bool,
    /// An envelope has been integrated.
    pub envelope_present: bool,
    /// The current envelope carries a non-empty payload.
    pub payload_populated: bool,
}

impl Default for RecognitionField {
    fn default() -> Self {
        Self {
            strength: 0.0,
            floor_held: false,
            envelope_present: false,
            payload_populated: false,
        }
    }
}

pub struct RecognitionFieldGenerator {
    floor_hz: f64,
    last_field: RecognitionField,
}

impl RecognitionFieldGenerator {
    pub fn new(floor_hz: f64) -> Self {
        Self {
            floor_hz,
            last_field: RecognitionField::default(),
        }
    }

    /// Most recent field, for observers that poll the generator directly.
    pub fn field(&self) -> RecognitionField {
        self.last_field
    }
}

impl AuxiliaryProcessor for RecognitionFieldGenerator {
    fn name(&self) -> &'static str {
        "recognition-field"
    }

    fn neutral(&self) -> AuxiliarySignal {
        AuxiliarySignal::Recognition(RecognitionField::default())
    }

    fn process(&mut self, envelope: &EventEnvelope, state: &HeartbeatState) -> AuxiliarySignal {
        let strength = if state.target_hz > 0.0 {
            clamp01(state.current_hz / state.target_hz)
        } else {
            0.0
        };
        self.last_field = RecognitionField {
            strength,
            floor_held: state.current_hz >= self.floor_hz,
            envelope_present: true,
            payload_populated: !envelope.payload.is_empty(),
        };
        AuxiliarySignal::Recognition(self.last_field)
    }

    fn reset(&mut self) {
        self.last_field = RecognitionField::default();
    }
}
