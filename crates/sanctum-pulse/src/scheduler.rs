// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Heartbeat cycle orchestration.

One cycle: dequeue-or-synthesize → integrate with the energy system → run the
auxiliary processors → update state → close timing. The whole sequence sits
behind a single failure boundary: any error is routed to the degradation
controller, the failed cycle's derived fields keep their prior values, and the
loop continues. The loop never terminates on failure.
*/

use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, error};

use crate::auxiliary::{default_processors, AuxiliaryProcessor, AuxiliarySignal};
use crate::degradation::DegradationController;
use crate::energy::{EnergySystem, NeutralEnergySystem};
use crate::envelope::EventEnvelope;
use crate::injection_queue::BoundedInjectionQueue;
use crate::state::{HeartbeatState, Status};
use crate::synthesizer::EventSynthesizer;
use crate::timing::TimingGovernor;
use crate::{PulseConfig, PulseError, PulseResult};

pub struct HeartbeatScheduler {
    config: PulseConfig,
    state: HeartbeatState,
    queue: BoundedInjectionQueue,
    synthesizer: EventSynthesizer,
    processors: Vec<Box<dyn AuxiliaryProcessor>>,
    energy: Box<dyn EnergySystem>,
    governor: TimingGovernor,
    degradation: DegradationController,
    dequeue_timeout: Duration,
}

impl HeartbeatScheduler {
    pub fn new(config: PulseConfig) -> Self {
        let state = HeartbeatState::new(config.target_hz);
        let queue = BoundedInjectionQueue::new(config.queue_capacity);
        let synthesizer = EventSynthesizer::new(config.min_frequency_floor);
        let processors = default_processors(
            config.pressure.clone(),
            config.zones.clone(),
            config.min_frequency_floor,
        );
        let governor = TimingGovernor::new(
            config.min_frequency_floor,
            config.stress_hz,
            config.cascade_threshold,
        );
        let degradation = DegradationController::new(
            config.min_frequency_floor,
            Duration::from_millis(config.recovery_pause_ms),
        );
        let dequeue_timeout = Duration::from_millis(config.dequeue_timeout_ms);

        Self {
            config,
            state,
            queue,
            synthesizer,
            processors,
            energy: Box::new(NeutralEnergySystem),
            governor,
            degradation,
            dequeue_timeout,
        }
    }

    /// Attach a real energy system in place of the neutral default.
    pub fn with_energy_system(mut self, energy: Box<dyn EnergySystem>) -> Self {
        self.energy = energy;
        self
    }

    /// Replace the processor set (rarely needed outside tests).
    pub fn with_processors(mut self, processors: Vec<Box<dyn AuxiliaryProcessor>>) -> Self {
        self.processors = processors;
        self
    }

    /// Shared handle producers use to inject envelopes.
    pub fn queue(&self) -> BoundedInjectionQueue {
        self.queue.clone()
    }

    pub fn state(&self) -> &HeartbeatState {
        &self.state
    }

    pub fn config(&self) -> &PulseConfig {
        &self.config
    }

    /// Explicitly clear latched processor state (boundary zones in
    /// particular stay latched across cycles until this is called).
    pub fn reset_processors(&mut self) {
        for processor in &mut self.processors {
            processor.reset();
        }
    }

    /// Run one full cycle, including the failure boundary and all pacing or
    /// recovery sleeps.
    pub fn run_cycle(&mut self) {
        let cycle_start = Instant::now();
        match self.process_cycle(cycle_start) {
            Ok(()) => self.observe_recovery(),
            Err(e) => {
                error!(
                    "[PULSE-LOOP] cycle {} failed: {}",
                    self.state.cycle_count, e
                );
                self.state.cycle_count += 1;
                self.state.steady_streak = 0;
                // Derived fields (pressure, zones, external resonance) keep
                // their prior values; the failure path also skips the pacing
                // sleep so recovery polling stays fast.
                if let Some(pause) = self.degradation.on_cycle_failure(&mut self.state) {
                    thread::sleep(pause);
                }
            }
        }
    }

    fn process_cycle(&mut self, cycle_start: Instant) -> PulseResult<()> {
        let envelope = self.acquire_envelope();

        if envelope.is_valid(self.config.min_frequency_floor) {
            self.state.last_event_time = Some(envelope.timestamp);
            self.state.active_envelope = Some(envelope.clone());

            let resonance = self
                .energy
                .process(&envelope.resonance, &envelope.payload, envelope.coherence)
                .map_err(PulseError::EnergySystem)?;
            self.state.external_resonance = resonance;

            let mut signals = Vec::with_capacity(self.processors.len());
            for processor in &mut self.processors {
                signals.push(processor.process(&envelope, &self.state));
            }
            for signal in signals {
                self.apply_signal(signal);
            }
        }

        self.state.cycle_count += 1;

        let pacing = self.governor.close_cycle(cycle_start, &mut self.state);
        if !pacing.is_zero() {
            thread::sleep(pacing);
        }
        Ok(())
    }

    /// Dequeue within the bounded wait, falling back to synthesis. An
    /// invalid dequeued envelope is substituted, never integrated.
    fn acquire_envelope(&mut self) -> EventEnvelope {
        match self.queue.try_dequeue(self.dequeue_timeout) {
            Some(envelope) if envelope.is_valid(self.config.min_frequency_floor) => envelope,
            Some(envelope) => {
                debug!(
                    "[PULSE-LOOP] invalid envelope from '{}' (coherence {:.1}, richness {:.2}); synthesizing",
                    envelope.source_id, envelope.coherence, envelope.richness
                );
                self.synthesizer.synthesize(self.state.current_hz)
            }
            None => self.synthesizer.synthesize(self.state.current_hz),
        }
    }

    fn apply_signal(&mut self, signal: AuxiliarySignal) {
        match signal {
            AuxiliarySignal::Pressure(pressure) => self.state.pressure = pressure,
            AuxiliarySignal::Zones(zones) => self.state.active_zones = zones,
            AuxiliarySignal::Recognition(field) => self.state.recognition = field,
        }
    }

    /// Ramp-back-up policy: sustained steady cycles at a degraded tier step
    /// the target back toward the configured rate, one tier at a time.
    fn observe_recovery(&mut self) {
        if self.state.status == Status::Steady {
            if self.state.target_hz < self.config.target_hz {
                self.state.steady_streak += 1;
                if self.state.steady_streak >= self.config.recovery_steady_cycles {
                    let next = (self.state.target_hz * 2.0).min(self.config.target_hz);
                    tracing::info!(
                        "[PULSE-LOOP] {} steady cycles at {:.1} Hz: target restored to {:.1} Hz",
                        self.state.steady_streak,
                        self.state.target_hz,
                        next
                    );
                    self.state.target_hz = next;
                    self.state.steady_streak = 0;
                }
            }
        } else {
            self.state.steady_streak = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ahash::AHashMap;
    use crate::auxiliary::SOVEREIGNTY_ZONE;
    use crate::synthesizer::SYNTHESIZED_RICHNESS;

    /// Collaborator that always fails, to drive the degradation path.
    struct FailingEnergySystem;

    impl EnergySystem for FailingEnergySystem {
        fn process(
            &mut self,
            _resonance: &AHashMap<String, f64>,
            _payload: &AHashMap<String, f64>,
            _coherence: f64,
        ) -> Result<AHashMap<String, f64>, String> {
            Err("simulated outage".to_string())
        }
    }

    fn fast_config() -> PulseConfig {
        // Short recovery pause so failure tests run quickly.
        PulseConfig {
            recovery_pause_ms: 1,
            ..PulseConfig::default()
        }
    }

    fn valid_envelope(source: &str) -> EventEnvelope {
        let mut payload = AHashMap::new();
        payload.insert("vitality".to_string(), 0.6);
        EventEnvelope::new(source, payload, AHashMap::new(), 0.5, 90.0)
    }

    #[test]
    fn cold_start_synthesizes_and_completes_one_cycle() {
        let mut scheduler = HeartbeatScheduler::new(fast_config());
        scheduler.run_cycle();

        let state = scheduler.state();
        assert_eq!(state.cycle_count, 1);
        let envelope = state.active_envelope.as_ref().unwrap();
        assert_eq!(envelope.richness, SYNTHESIZED_RICHNESS);
        assert_eq!(envelope.coherence, 90.0);
        assert!(matches!(state.status, Status::Steady | Status::BuildingCascade));
        assert_eq!(state.active_zones.get(SOVEREIGNTY_ZONE), Some(&true));
    }

    #[test]
    fn injected_envelope_is_integrated_in_fifo_order() {
        let mut scheduler = HeartbeatScheduler::new(fast_config());
        let queue = scheduler.queue();
        queue.inject(valid_envelope("first"));
        queue.inject(valid_envelope("second"));

        scheduler.run_cycle();
        assert_eq!(
            scheduler.state().active_envelope.as_ref().unwrap().source_id,
            "first"
        );
        scheduler.run_cycle();
        assert_eq!(
            scheduler.state().active_envelope.as_ref().unwrap().source_id,
            "second"
        );
    }

    #[test]
    fn invalid_envelope_is_replaced_by_synthesis() {
        let mut scheduler = HeartbeatScheduler::new(fast_config());
        let queue = scheduler.queue();
        // Coherence below the floor: never integrated.
        let mut payload = AHashMap::new();
        payload.insert("vitality".to_string(), 0.6);
        queue.inject(EventEnvelope::new(
            "stale",
            payload,
            AHashMap::new(),
            0.5,
            10.0,
        ));

        scheduler.run_cycle();
        let envelope = scheduler.state().active_envelope.as_ref().unwrap();
        assert_eq!(envelope.source_id, crate::synthesizer::SYNTHESIZED_SOURCE);
    }

    #[test]
    fn failure_ladder_reaches_the_floor_and_pauses() {
        let mut scheduler =
            HeartbeatScheduler::new(fast_config()).with_energy_system(Box::new(FailingEnergySystem));

        let mut targets = Vec::new();
        for _ in 0..5 {
            scheduler.run_cycle();
            targets.push(scheduler.state().target_hz);
        }
        assert_eq!(targets, vec![45.0, 30.0, 30.0, 30.0, 30.0]);
        assert_eq!(scheduler.state().status, Status::SacredPause);
        assert_eq!(scheduler.state().cycle_count, 5);
    }

    #[test]
    fn failed_cycle_retains_prior_derived_state() {
        let mut scheduler = HeartbeatScheduler::new(fast_config());
        scheduler.run_cycle();
        let pressure_before = scheduler.state().pressure;
        let resonance_before = scheduler.state().external_resonance.clone();

        // Swap in a failing collaborator mid-flight.
        scheduler.energy = Box::new(FailingEnergySystem);
        scheduler.run_cycle();

        assert_eq!(scheduler.state().pressure, pressure_before);
        assert_eq!(scheduler.state().external_resonance, resonance_before);
    }

    #[test]
    fn reset_clears_latched_zones() {
        let mut scheduler = HeartbeatScheduler::new(fast_config());
        let queue = scheduler.queue();

        let mut payload = AHashMap::new();
        payload.insert("uncertainty".to_string(), 0.95);
        queue.inject(EventEnvelope::new(
            "spike",
            payload,
            AHashMap::new(),
            0.5,
            90.0,
        ));
        scheduler.run_cycle();
        assert_eq!(scheduler.state().active_zones.get("uncertainty"), Some(&true));

        scheduler.reset_processors();
        // The next cycle reports the cleared zone set.
        scheduler.run_cycle();
        assert_eq!(
            scheduler.state().active_zones.get("uncertainty"),
            Some(&false)
        );
        assert_eq!(
            scheduler.state().active_zones.get(SOVEREIGNTY_ZONE),
            Some(&true)
        );
    }

    #[test]
    fn sustained_steady_cycles_restore_the_target() {
        let mut config = fast_config();
        config.recovery_steady_cycles = 3;
        let mut scheduler = HeartbeatScheduler::new(config);

        // One failure steps 90 -> 45.
        scheduler.energy = Box::new(FailingEnergySystem);
        scheduler.run_cycle();
        assert_eq!(scheduler.state().target_hz, 45.0);

        // Healthy again: three steady cycles per tier ramp 45 -> 90.
        scheduler.energy = Box::new(NeutralEnergySystem);
        for _ in 0..3 {
            scheduler.run_cycle();
        }
        assert_eq!(scheduler.state().target_hz, 90.0);
    }
}
