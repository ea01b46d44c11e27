// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # critnet-observability
//!
//! Logging setup shared by critnet binaries, with per-crate debug flag support.
//! Library crates only emit through `tracing`; installing a subscriber is left to
//! [`init_logging`].
//!
//! ## Features
//! - `file-logging`: JSON log file in a timestamped run folder

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod init;

pub use cli::*;
pub use init::*;

/// Tracing targets that accept `--debug-<name>`
pub const KNOWN_CRATES: &[&str] = &[
    "critnet-npu-engine",
    "critnet-npu-trace",
    "critnet-connectivity",
    "critnet-config",
    "critnet-serialization",
    "critnet-sweep",
];
