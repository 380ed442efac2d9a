// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Energy system collaborator boundary.
//!
//! The energy system is external to the scheduler core and is specified only
//! at this interface. A failure here is a cycle failure and feeds the
//! degradation ladder; an absent energy system is served by the neutral
//! implementation instead.

use ahash::AHashMap;

/// Resonance level reported on every channel by the neutral implementation.
pub const NEUTRAL_RESONANCE: f64 = 0.5;

/// External integrator consuming one envelope's signals per cycle.
///
/// Implementations must return within bounded time. Errors are strings so
/// external implementations carry no dependency on this crate's error types
/// (the scheduler wraps them at its own boundary).
pub trait EnergySystem: Send {
    fn process(
        &mut self,
        resonance: &AHashMap<String, f64>,
        payload: &AHashMap<String, f64>,
        coherence: f64,
    ) -> Result<AHashMap<String, f64>, String>;
}

/// Default collaborator: echoes the envelope's resonance channels back at the
/// neutral level. Used when no real energy system is attached, so the
/// scheduler degrades to neutral readings rather than failing permanently.
#[derive(Debug, Clone, Default)]
pub struct NeutralEnergySystem;

impl EnergySystem for NeutralEnergySystem {
    fn process(
        &mut self,
        resonance: &AHashMap<String, f64>,
        _payload: &AHashMap<String, f64>,
        _coherence: f64,
    ) -> Result<AHashMap<String, f64>, String> {
        let mut out: AHashMap<String, f64> = resonance
            .keys()
            .map(|k| (k.clone(), NEUTRAL_RESONANCE))
            .collect();
        if out.is_empty() {
            out.insert("baseline".to_string(), NEUTRAL_RESONANCE);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_system_reports_half_on_every_channel() {
        let mut system = NeutralEnergySystem;
        let mut resonance = AHashMap::new();
        resonance.insert("vitality".to_string(), 0.9);
        resonance.insert("warmth".to_string(), 0.2);

        let out = system
            .process(&resonance, &AHashMap::new(), 90.0)
            .unwrap();
        assert_eq!(out.len(), 2);
        assert!(out.values().all(|v| *v == NEUTRAL_RESONANCE));
    }

    #[test]
    fn neutral_system_never_returns_an_empty_map() {
        let mut system = NeutralEnergySystem;
        let out = system
            .process(&AHashMap::new(), &AHashMap::new(), 90.0)
            .unwrap();
        assert_eq!(out.get("baseline"), Some(&NEUTRAL_RESONANCE));
    }
}
