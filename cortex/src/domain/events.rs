// Copyright (c) 2026 LogLens Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Domain events for the Cortex bounded context
//! Published on the event bus for observability and integration

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::causal::CorrelationKind;
use super::classification::ClassificationLevel;
use super::node::NodeId;
use super::pattern::PatternId;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CortexEvent {
    /// A signature was seen for the first time
    PatternDiscovered {
        pattern_id: PatternId,
        signature: String,
        initial_weight: f64,
        timestamp: DateTime<Utc>,
    },

    /// A pattern absorbed one outcome
    PatternReinforced {
        pattern_id: PatternId,
        success: bool,
        old_weight: f64,
        new_weight: f64,
        accuracy: f64,
        timestamp: DateTime<Utc>,
    },

    /// Idle patterns lost weight during a decay pass
    PatternsDecayed {
        count: usize,
        decay_factor: f64,
        timestamp: DateTime<Utc>,
    },

    /// A matched signature was seen for the first time
    NodeCreated {
        node_id: NodeId,
        pattern: String,
        category: String,
        timestamp: DateTime<Utc>,
    },

    /// A cause crossed a strong-correlation threshold
    CorrelationDiscovered {
        cause: String,
        correlation: CorrelationKind,
        success_rate: f64,
        timestamp: DateTime<Utc>,
    },

    /// The full pipeline completed for one classification
    ClassificationProcessed {
        level: ClassificationLevel,
        new_nodes: usize,
        patterns_updated: usize,
        duration_ms: u64,
        timestamp: DateTime<Utc>,
    },

    StateSaved {
        patterns: usize,
        nodes: usize,
        timestamp: DateTime<Utc>,
    },

    /// Save failed; in-memory state remains authoritative
    StateSaveFailed {
        reason: String,
        timestamp: DateTime<Utc>,
    },
}

impl CortexEvent {
    /// Get the timestamp of the event
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            CortexEvent::PatternDiscovered { timestamp, .. } => *timestamp,
            CortexEvent::PatternReinforced { timestamp, .. } => *timestamp,
            CortexEvent::PatternsDecayed { timestamp, .. } => *timestamp,
            CortexEvent::NodeCreated { timestamp, .. } => *timestamp,
            CortexEvent::CorrelationDiscovered { timestamp, .. } => *timestamp,
            CortexEvent::ClassificationProcessed { timestamp, .. } => *timestamp,
            CortexEvent::StateSaved { timestamp, .. } => *timestamp,
            CortexEvent::StateSaveFailed { timestamp, .. } => *timestamp,
        }
    }

    /// Get the event type as a string
    pub fn event_type(&self) -> &'static str {
        match self {
            CortexEvent::PatternDiscovered { .. } => "pattern_discovered",
            CortexEvent::PatternReinforced { .. } => "pattern_reinforced",
            CortexEvent::PatternsDecayed { .. } => "patterns_decayed",
            CortexEvent::NodeCreated { .. } => "node_created",
            CortexEvent::CorrelationDiscovered { .. } => "correlation_discovered",
            CortexEvent::ClassificationProcessed { .. } => "classification_processed",
            CortexEvent::StateSaved { .. } => "state_saved",
            CortexEvent::StateSaveFailed { .. } => "state_save_failed",
        }
    }
}
