// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Event envelope: one unit of injected work entering a heartbeat cycle.

use ahash::AHashMap;
use serde_json::Value;
use std::time::Instant;

/// Default frequency floor (Hz). An envelope claiming a coherence below this
/// is not integrated.
pub const MIN_FREQUENCY_FLOOR: f64 = 30.0;

/// One unit of work consumed by a single scheduler cycle.
///
/// Envelopes are immutable after construction and integrated at most once.
/// External producers build them with [`EventEnvelope::new`]; the synthesizer
/// builds a minimal one whenever the injection queue is empty.
#[derive(Debug, Clone)]
pub struct EventEnvelope {
    /// Monotonic capture time.
    pub timestamp: Instant,
    /// Origin identifier (external producer or synthesizer).
    pub source_id: String,
    /// Named measurement channels. Must be non-empty to be valid.
    pub payload: AHashMap<String, f64>,
    /// Weighted sub-signals, 0.0-1.0 per entry.
    pub resonance: AHashMap<String, f64>,
    /// Information density in (0.0, 1.0]. Must be non-zero to be valid.
    pub richness: f64,
    /// Frequency (Hz) the source claims to be operating at.
    pub coherence: f64,
    /// Processor-specific tags. Empty when absent.
    pub aux_signature: AHashMap<String, Value>,
}

impl EventEnvelope {
    pub fn new(
        source_id: impl Into<String>,
        payload: AHashMap<String, f64>,
        resonance: AHashMap<String, f64>,
        richness: f64,
        coherence: f64,
    ) -> Self {
        Self {
            timestamp: Instant::now(),
            source_id: source_id.into(),
            payload,
            resonance,
            richness,
            coherence,
            aux_signature: AHashMap::new(),
        }
    }

    /// Attach processor-specific tags.
    pub fn with_signature(mut self, aux_signature: AHashMap<String, Value>) -> Self {
        self.aux_signature = aux_signature;
        self
    }

    /// An envelope is integrated only if its claimed coherence clears the
    /// frequency floor, it carries non-zero richness, and the payload is
    /// non-empty. Invalid envelopes are silently replaced by a synthesized
    /// one; validity failure is not an error.
    pub fn is_valid(&self, floor_hz: f64) -> bool {
        self.coherence >= floor_hz && self.richness > 0.0 && !self.payload.is_empty()
    }
}
