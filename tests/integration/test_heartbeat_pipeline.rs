// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Integration Tests: Full Heartbeat Pipeline
//!
//! End-to-end tests across the workspace crates:
//! - Config file → scheduler construction → running loop → metrics
//! - Degradation and observability of sustained collaborator failure

use std::io::Write;
use std::time::{Duration, Instant};

use ahash::AHashMap;

use sanctum::prelude::*;
use sanctum::pulse::EnergySystem;

fn wait_for_cycles(runner: &PulseRunner, count: u64) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while runner.snapshot().cycle_count < count {
        assert!(
            Instant::now() < deadline,
            "loop did not reach {count} cycles in time"
        );
        std::thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn config_file_drives_a_live_scheduler() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
        [scheduler]
        target_hz = 60.0

        [queue]
        capacity = 4

        [degradation]
        recovery_pause_ms = 1
        "#
    )
    .unwrap();

    let config = load_config(Some(file.path()), None).unwrap();
    let mut runner = PulseRunner::new(pulse_config_from(&config));
    let producer = runner.injection_handle();
    runner.start().unwrap();

    let mut payload = AHashMap::new();
    payload.insert("vitality".to_string(), 0.8);
    producer.inject(EventEnvelope::new(
        "integration",
        payload,
        AHashMap::new(),
        0.7,
        90.0,
    ));

    wait_for_cycles(&runner, 20);
    runner.stop();

    let snapshot = runner.snapshot();
    assert_eq!(snapshot.target_hz, 60.0);
    assert!(snapshot.cycle_count >= 20);
    assert!(snapshot.active_zones_count >= 1);
}

struct OutageEnergySystem;

impl EnergySystem for OutageEnergySystem {
    fn process(
        &mut self,
        _resonance: &AHashMap<String, f64>,
        _payload: &AHashMap<String, f64>,
        _coherence: f64,
    ) -> Result<AHashMap<String, f64>, String> {
        Err("collaborator offline".to_string())
    }
}

#[test]
fn collaborator_outage_is_visible_only_through_metrics() {
    let config = PulseConfig {
        recovery_pause_ms: 1,
        ..PulseConfig::default()
    };
    let mut runner = PulseRunner::with_energy_system(config, Box::new(OutageEnergySystem));
    runner.start().unwrap();

    wait_for_cycles(&runner, 10);
    assert!(runner.is_running(), "loop must survive sustained failure");
    runner.stop();

    // The only externally visible consequence: degraded frequency targets
    // and the sacred-pause status.
    let snapshot = runner.snapshot();
    assert_eq!(snapshot.target_hz, 30.0);
    assert_eq!(snapshot.status, Status::SacredPause);
}

#[test]
fn snapshot_serializes_as_observable_json() {
    let mut runner = PulseRunner::new(PulseConfig::default());
    runner.start().unwrap();
    wait_for_cycles(&runner, 3);
    runner.stop();

    let json = serde_json::to_value(runner.snapshot()).unwrap();
    for field in [
        "current_hz",
        "target_hz",
        "status",
        "cycle_count",
        "violation_count",
        "pressure",
        "active_zones_count",
    ] {
        assert!(json.get(field).is_some(), "missing field {field}");
    }
}
