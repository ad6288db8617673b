// Copyright (c) 2026 LogLens Contributors
// SPDX-License-Identifier: AGPL-3.0
//! Domain layer: value types and the pure state transitions on them.

pub mod causal;
pub mod classification;
pub mod config;
pub mod errors;
pub mod events;
pub mod node;
pub mod pattern;
pub mod prediction;
pub mod report;
pub mod state;
pub mod suggestion;
pub mod temporal;

pub use causal::*;
pub use classification::*;
pub use config::*;
pub use errors::*;
pub use events::*;
pub use node::*;
pub use pattern::*;
pub use prediction::*;
pub use report::*;
pub use state::*;
pub use suggestion::*;
pub use temporal::*;
