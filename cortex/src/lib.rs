// Copyright (c) 2026 LogLens Contributors
// SPDX-License-Identifier: AGPL-3.0
//! LogLens Cortex
//!
//! Learns from classified log batches. Each classification reinforces or
//! penalises the patterns it matched, updates occurrence nodes and causal
//! history, and returns a forecast plus remediation suggestions.
//!
//! # Architecture
//!
//! - **domain:** value types and their pure state transitions
//! - **application:** the learning stores and [`IntelligenceEngine`]
//! - **infrastructure:** state repositories and the event bus
//!
//! ```no_run
//! use std::sync::Arc;
//! use loglens_cortex::{
//!     ClassificationInput, CortexConfig, EventBus, IntelligenceEngine, JsonFileStateRepository,
//! };
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = CortexConfig::load_or_default(None)?;
//! let repository = Arc::new(JsonFileStateRepository::new(&config.persistence.state_path));
//! let engine = IntelligenceEngine::load(config, repository, EventBus::default()).await;
//!
//! let input = ClassificationInput::from_json(r#"{"classificationLevel": "GREEN"}"#)?;
//! let result = engine.process_classification(&input).await?;
//! println!("risk: {:?}", result.predictions.risk_level);
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{IntelligenceEngine, StateFlusher};
pub use domain::*;
pub use infrastructure::*;
