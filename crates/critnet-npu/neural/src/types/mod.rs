// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Core type definitions shared by the neural algorithms and the engine

pub mod error;
pub mod history;
pub mod parameters;

pub use error::{NetworkError, Result};
pub use history::HistoryVariable;
pub use parameters::NetworkParameters;
