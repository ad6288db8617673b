// Copyright (c) 2026 LogLens Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Application layer: the learning stores and the engine that drives them

pub mod adaptation_advisor;
pub mod causal_tracker;
pub mod intelligence_engine;
pub mod meta_learner;
pub mod node_registry;
pub mod pattern_store;
pub mod prediction_engine;
pub mod state_flusher;
pub mod temporal_log;

pub use adaptation_advisor::AdaptationAdvisor;
pub use causal_tracker::CausalTracker;
pub use intelligence_engine::IntelligenceEngine;
pub use meta_learner::{MetaLearner, PredictionHistory};
pub use node_registry::NodeRegistry;
pub use pattern_store::{PatternStore, Reinforcement};
pub use prediction_engine::PredictionEngine;
pub use state_flusher::StateFlusher;
pub use temporal_log::TemporalLog;
