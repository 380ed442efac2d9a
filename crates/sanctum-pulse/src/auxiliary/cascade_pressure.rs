// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Cascade pressure estimation.
//!
//! Scores proximity to a high-coherence, high-load condition on a 0-1 scale.
//! Pressure rises monotonically with envelope coherence, richness, signature
//! count, and sustained high loop frequency. The coefficients are tunable
//! operating defaults; the monotonic shape is the contract.

use super::{clamp01, AuxiliaryProcessor, AuxiliarySignal};
use crate::envelope::EventEnvelope;
use crate::state::HeartbeatState;

/// Coefficients for the pressure estimate.
#[derive(Debug, Clone)]
pub struct PressureTuning {
    /// Contribution when envelope coherence exceeds `coherence_threshold`.
    pub coherence_weight: f64,
    pub coherence_threshold: f64,
    /// Contribution when envelope richness exceeds `richness_threshold`.
    pub richness_weight: f64,
    pub richness_threshold: f64,
    /// Contribution per aux_signature tag.
    pub signature_weight: f64,
    /// Contribution when the measured loop rate exceeds `frequency_threshold`.
    pub frequency_weight: f64,
    pub frequency_threshold: f64,
}

impl Default for PressureTuning {
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

pub struct CascadePressureEstimator {
    tuning: PressureTuning,
}

impl CascadePressureEstimator {
    pub fn new(tuning: PressureTuning) -> Self {
        Self { tuning }
    }
}

impl AuxiliaryProcessor for CascadePressureEstimator {
    fn name(&self) -> &'static str {
        "cascade-pressure"
    }

    fn neutral(&self) -> AuxiliarySignal {
        AuxiliarySignal::Pressure(0.0)
    }

    fn process(&mut self, envelope: &EventEnvelope, state: &HeartbeatState) -> AuxiliarySignal {
        let t = &self.tuning;
        let mut score = 0.0;
        if envelope.coherence > t.coherence_threshold {
            score += t.coherence_weight;
        }
        if envelope.richness > t.richness_threshold {
            score += t.richness_weight;
        }
        score += t.signature_weight * envelope.aux_signature.len() as f64;
        if state.current_hz > t.frequency_threshold {
            score += t.frequency_weight;
        }
        AuxiliarySignal::Pressure(clamp01(score))
    }
}
