// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Microbenchmarks for the scheduler hot path: queue traffic and the
//! per-cycle auxiliary scoring.

use std::time::Duration;

use ahash::AHashMap;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use sanctum_pulse::auxiliary::{AuxiliaryProcessor, CascadePressureEstimator, PressureTuning};
use sanctum_pulse::{BoundedInjectionQueue, EventEnvelope, HeartbeatState};

fn sample_envelope() -> EventEnvelope {
    let mut payload = AHashMap::new();
    payload.insert("vitality".to_string(), 0.6);
    payload.insert("uncertainty".to_string(), 0.4);
    let mut resonance = AHashMap::new();
    resonance.insert("warmth".to_string(), 0.5);
    EventEnvelope::new("bench", payload, resonance, 0.9, 90.0)
}

fn bench_queue_inject_dequeue(c: &mut Criterion) {
    let queue = BoundedInjectionQueue::new(10);
    c.bench_function("queue_inject_dequeue", |b| {
        b.iter(|| {
            queue.inject(black_box(sample_envelope()));
            black_box(queue.try_dequeue(Duration::from_millis(1)));
        })
    });
}

fn bench_queue_overflow(c: &mut Criterion) {
    c.bench_function("queue_overflow_eviction", |b| {
        b.iter(|| {
            let queue = BoundedInjectionQueue::new(10);
            for _ in 0..15 {
                queue.inject(black_box(sample_envelope()));
            }
            black_box(queue.len())
        })
    });
}

fn bench_pressure_estimation(c: &mut Criterion) {
    let mut estimator = CascadePressureEstimator::new(PressureTuning::default());
    let envelope = sample_envelope();
    let state = HeartbeatState::new(90.0);
    c.bench_function("cascade_pressure_process", |b| {
        b.iter(|| black_box(estimator.process(black_box(&envelope), black_box(&state))))
    });
}

criterion_group!(
    benches,
    bench_queue_inject_dequeue,
    bench_queue_overflow,
    bench_pressure_estimation
);
criterion_main!(benches);
