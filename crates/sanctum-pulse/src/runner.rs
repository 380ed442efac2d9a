// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Heartbeat loop runner.

Owns the loop thread's lifecycle: `start()` spawns the named consumer thread,
`stop()` requests cooperative shutdown and joins with a bounded timeout. The
runner is also the external face of the scheduler: producers inject through
it, observers poll metrics snapshots through it.
*/

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::RwLock;
use tracing::{info, warn};

use crate::energy::EnergySystem;
use crate::envelope::EventEnvelope;
use crate::injection_queue::BoundedInjectionQueue;
use crate::metrics::MetricsSnapshot;
use crate::scheduler::HeartbeatScheduler;
use crate::{PulseConfig, PulseError, PulseResult};

/// Cloneable producer-side handle: inject envelopes from any thread.
#[derive(Clone)]
pub struct InjectionHandle {
    queue: BoundedInjectionQueue,
}

impl InjectionHandle {
    /// Fire-and-forget injection. On overflow the oldest queued envelope is
    /// silently evicted; the caller receives no signal either way.
    pub fn inject(&self, envelope: EventEnvelope) {
        self.queue.inject(envelope);
    }

    /// Current queue depth (for monitoring).
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }
}

/// Manages the heartbeat loop in a dedicated thread.
pub struct PulseRunner {
    /// Scheduler is held until `start()` moves it into the loop thread.
    scheduler: Option<HeartbeatScheduler>,
    queue: BoundedInjectionQueue,
    running: Arc<AtomicBool>,
    thread_handle: Option<thread::JoinHandle<()>>,
    /// Cached cycle count for lock-free reads while the loop is hot.
    cached_cycle_count: Arc<AtomicU64>,
    metrics: Arc<RwLock<MetricsSnapshot>>,
    target_hz: f64,
}

impl PulseRunner {
    pub fn new(config: PulseConfig) -> Self {
        let scheduler = HeartbeatScheduler::new(config);
        Self::from_scheduler(scheduler)
    }

    /// Build from a pre-configured scheduler (custom energy system or
    /// processor set).
    pub fn from_scheduler(scheduler: HeartbeatScheduler) -> Self {
        let queue = scheduler.queue();
        let metrics = MetricsSnapshot::from_state(scheduler.state());
        let target_hz = scheduler.config().target_hz;
        Self {
            scheduler: Some(scheduler),
            queue,
            running: Arc::new(AtomicBool::new(false)),
            thread_handle: None,
            cached_cycle_count: Arc::new(AtomicU64::new(0)),
            metrics: Arc::new(RwLock::new(metrics)),
            target_hz,
        }
    }

    pub fn with_energy_system(config: PulseConfig, energy: Box<dyn EnergySystem>) -> Self {
        Self::from_scheduler(HeartbeatScheduler::new(config).with_energy_system(energy))
    }

    /// Start the heartbeat loop in a background thread.
    pub fn start(&mut self) -> PulseResult<()> {
        if self.running.load(Ordering::Acquire) {
            return Err(PulseError::AlreadyRunning);
        }
        let scheduler = self.scheduler.take().ok_or(PulseError::AlreadyRunning)?;

        info!(
            "[PULSE-RUNNER] starting heartbeat loop at {:.2} Hz",
            self.target_hz
        );
        self.running.store(true, Ordering::Release);

        let running = self.running.clone();
        let cached_cycle_count = self.cached_cycle_count.clone();
        let metrics = self.metrics.clone();

        self.thread_handle = Some(
            thread::Builder::new()
                .name("sanctum-pulse-loop".to_string())
                .spawn(move || {
                    pulse_loop(scheduler, running, cached_cycle_count, metrics);
                })
                .map_err(|e| PulseError::ThreadSpawn(e.to_string()))?,
        );

        info!("[PULSE-RUNNER] heartbeat loop started");
        Ok(())
    }

    /// Request cooperative shutdown and wait up to 2 seconds for the thread
    /// to finish. The in-flight cycle always runs to completion; if the
    /// thread is unresponsive beyond the timeout we proceed with shutdown
    /// anyway.
    pub fn stop(&mut self) {
        if !self.running.load(Ordering::Acquire) {
            return; // Already stopped
        }

        info!("[PULSE-RUNNER] stopping heartbeat loop...");
        self.running.store(false, Ordering::Release);

        if let Some(handle) = self.thread_handle.take() {
            let stop_timeout = Duration::from_secs(2);
            let (tx, rx) = std::sync::mpsc::channel();

            thread::spawn(move || {
                let result = handle.join();
                let _ = tx.send(result);
            });

            match rx.recv_timeout(stop_timeout) {
                Ok(Ok(())) => info!("[PULSE-RUNNER] heartbeat loop stopped cleanly"),
                Ok(Err(_)) => warn!("[PULSE-RUNNER] loop thread panicked during shutdown"),
                Err(std::sync::mpsc::RecvTimeoutError::Timeout) => warn!(
                    "[PULSE-RUNNER] loop did not stop within {:?}, proceeding with shutdown",
                    stop_timeout
                ),
                Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => {
                    warn!("[PULSE-RUNNER] join thread disconnected unexpectedly")
                }
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Producer-side handle, cloneable across threads.
    pub fn injection_handle(&self) -> InjectionHandle {
        InjectionHandle {
            queue: self.queue.clone(),
        }
    }

    /// Fire-and-forget injection through the runner itself.
    pub fn inject(&self, envelope: EventEnvelope) {
        self.queue.inject(envelope);
    }

    /// Current cycle count (lock-free atomic read; never blocks the loop).
    pub fn cycle_count(&self) -> u64 {
        self.cached_cycle_count.load(Ordering::Relaxed)
    }

    /// Defensive copy of the most recently published metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        self.metrics.read().clone()
    }
}

impl Drop for PulseRunner {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Main heartbeat loop (runs in the dedicated consumer thread).
fn pulse_loop(
    mut scheduler: HeartbeatScheduler,
    running: Arc<AtomicBool>,
    cached_cycle_count: Arc<AtomicU64>,
    metrics: Arc<RwLock<MetricsSnapshot>>,
) {
    info!(
        "[PULSE-LOOP] entering main loop at {:.2} Hz (floor {:.1} Hz)",
        scheduler.config().target_hz,
        scheduler.config().min_frequency_floor
    );

    while running.load(Ordering::Acquire) {
        scheduler.run_cycle();

        let state = scheduler.state();
        cached_cycle_count.store(state.cycle_count, Ordering::Relaxed);
        *metrics.write() = MetricsSnapshot::from_state(state);

        // Shutdown is honored at the cycle boundary only; the cycle that was
        // in flight has already completed.
        if !running.load(Ordering::Relaxed) {
            break;
        }
    }

    info!(
        "[PULSE-LOOP] loop stopped after {} cycles",
        scheduler.state().cycle_count
    );
}
