// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # sanctum-observability
//!
//! Unified observability infrastructure for the sanctuary runtime.
//!
//! Provides consistent logging initialization across all workspace crates
//! with per-crate debug flag support.
//!
//! ## Features
//! - `file-logging`: File-based log rotation with per-run folders

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod init;

// Re-export commonly used items
pub use cli::*;
pub use init::*;

/// Known workspace crate names for debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "sanctum",
    "sanctum-pulse",
    "sanctum-config",
    "sanctum-observability",
];
