// Copyright (c) 2026 LogLens Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Durable snapshot of the engine
//!
//! The JSON layout is the persisted file schema: `neuralPatterns`,
//! `intelligenceNodes`, `causalRelationships`, `temporalSequences` and a
//! `metadata` block. `predictionHistory` is optional so files written without
//! it still load.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::causal::CausalEffect;
use super::node::{IntelligenceNode, NodeId};
use super::pattern::{Pattern, PatternId};
use super::prediction::PredictionRecord;
use super::temporal::TemporalEvent;

/// Version string written into every snapshot
pub const INTELLIGENCE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateMetadata {
    pub last_save: DateTime<Utc>,
    pub intelligence_version: String,
}

impl StateMetadata {
    pub fn now() -> Self {
        Self {
            last_save: Utc::now(),
            intelligence_version: INTELLIGENCE_VERSION.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(default)]
    pub neural_patterns: BTreeMap<PatternId, Pattern>,

    #[serde(default)]
    pub intelligence_nodes: BTreeMap<NodeId, IntelligenceNode>,

    #[serde(default)]
    pub causal_relationships: BTreeMap<String, Vec<CausalEffect>>,

    /// Tail of each sequence; older events are not persisted
    #[serde(default)]
    pub temporal_sequences: BTreeMap<String, Vec<TemporalEvent>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prediction_history: Vec<PredictionRecord>,

    pub metadata: StateMetadata,
}

impl PersistedState {
    pub fn empty() -> Self {
        Self {
            neural_patterns: BTreeMap::new(),
            intelligence_nodes: BTreeMap::new(),
            causal_relationships: BTreeMap::new(),
            temporal_sequences: BTreeMap::new(),
            prediction_history: Vec::new(),
            metadata: StateMetadata::now(),
        }
    }
}
