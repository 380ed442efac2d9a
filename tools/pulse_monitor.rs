// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Heartbeat monitor tool
//!
//! Runs the scheduler with a synthetic producer and prints one metrics
//! snapshot per second as a JSON line.
//!
//! Usage:
//!   pulse_monitor [--duration <secs>] [--config <path>] [--debug-<crate>]

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::info;

use sanctum::prelude::*;

struct Args {
    duration: Duration,
    config_path: Option<PathBuf>,
}

fn parse_args() -> Result<Args> {
    let mut duration = Duration::from_secs(10);
    let mut config_path = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--duration" => {
                let value = args.next().context("--duration requires a value")?;
                duration = Duration::from_secs(value.parse::<u64>()?);
            }
            "--config" => {
                let value = args.next().context("--config requires a value")?;
                config_path = Some(PathBuf::from(value));
            }
            "--help" | "-h" => {
                println!("pulse_monitor [--duration <secs>] [--config <path>]");
                println!("{}", sanctum::observability::debug_flags_help());
                std::process::exit(0);
            }
            // Debug flags are consumed by parse_debug_flags()
            other if other.starts_with("--debug-") => {}
            other => anyhow::bail!("unknown argument: {other}"),
        }
    }

    Ok(Args {
        duration,
        config_path,
    })
}

fn main() -> Result<()> {
    let args = parse_args()?;
    let debug_flags = parse_debug_flags();
    init_logging(&debug_flags)?;

    // Missing config file is fine for a monitoring run; defaults apply.
    let config = match load_config(args.config_path.as_deref(), None) {
        Ok(config) => config,
        Err(e) => {
            info!("using default configuration ({e})");
            SanctumConfig::default()
        }
    };

    let mut runner = PulseRunner::new(pulse_config_from(&config));
    let producer = runner.injection_handle();
    runner.start()?;

    // Synthetic producer: a few envelopes per second with varying payloads.
    let producer_handle = std::thread::spawn({
        let duration = args.duration;
        move || {
            let started = Instant::now();
            let mut tick: u64 = 0;
            while started.elapsed() < duration {
                let mut payload = ahash::AHashMap::new();
                payload.insert("vitality".to_string(), 0.4 + 0.2 * ((tick % 3) as f64));
                payload.insert("uncertainty".to_string(), 0.1 * ((tick % 10) as f64));
                let mut resonance = ahash::AHashMap::new();
                resonance.insert("warmth".to_string(), 0.5);
                producer.inject(EventEnvelope::new(
                    format!("monitor-{tick}"),
                    payload,
                    resonance,
                    0.6,
                    90.0,
                ));
                tick += 1;
                std::thread::sleep(Duration::from_millis(250));
            }
        }
    });

    let started = Instant::now();
    while started.elapsed() < args.duration {
        std::thread::sleep(Duration::from_secs(1));
        let snapshot = runner.snapshot();
        println!("{}", serde_json::to_string(&snapshot)?);
    }

    producer_handle.join().ok();
    runner.stop();

    let final_snapshot = runner.snapshot();
    info!(
        "monitored {} cycles, {} violations, final status {:?}",
        final_snapshot.cycle_count, final_snapshot.violation_count, final_snapshot.status
    );
    Ok(())
}
