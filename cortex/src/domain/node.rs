// Copyright (c) 2026 LogLens Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Intelligence nodes
//!
//! A node tracks how often one concrete matched signature (the aggregator's
//! `pattern` string within a category) recurs, and how often its enclosing
//! classification turned out healthy.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::classification::{ClassificationContext, ClassificationLevel};
use super::pattern::stable_id;

/// Upper bound for the temporal weight of a node
pub const MAX_TEMPORAL_WEIGHT: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn for_signature(pattern: &str, category: &str) -> Self {
        Self(stable_id(&format!("{}:{}", pattern, category)))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeMetadata {
    pub category: String,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    /// Context of the first sighting
    #[serde(default)]
    pub context: ClassificationContext,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntelligenceNode {
    pub id: NodeId,
    pub pattern: String,
    pub occurrence_count: u64,
    pub success_correlation: f64,
    pub temporal_weight: f64,
    pub learning_strength: f64,
    #[serde(default)]
    pub connected_nodes: Vec<NodeId>,
    pub metadata: NodeMetadata,
}

impl IntelligenceNode {
    pub fn new(
        pattern: impl Into<String>,
        category: impl Into<String>,
        learning_strength: f64,
        context: ClassificationContext,
        now: DateTime<Utc>,
    ) -> Self {
        let pattern = pattern.into();
        let category = category.into();
        Self {
            id: NodeId::for_signature(&pattern, &category),
            pattern,
            occurrence_count: 1,
            success_correlation: 0.5,
            temporal_weight: 1.0,
            learning_strength,
            connected_nodes: Vec::new(),
            metadata: NodeMetadata {
                category,
                first_seen: now,
                last_seen: now,
                context,
            },
        }
    }

    /// Repeat sighting under a classification of `level`
    pub fn record_occurrence(&mut self, level: ClassificationLevel, now: DateTime<Utc>) {
        self.occurrence_count += 1;
        self.temporal_weight = (self.temporal_weight * 1.1).min(MAX_TEMPORAL_WEIGHT);
        match level {
            ClassificationLevel::Green => {
                self.success_correlation = (self.success_correlation + 0.1).min(1.0);
            }
            ClassificationLevel::Red => {
                self.success_correlation = (self.success_correlation - 0.2).max(0.0);
            }
            ClassificationLevel::Yellow => {}
        }
        self.metadata.last_seen = now;
    }

    pub fn category(&self) -> &str {
        &self.metadata.category
    }
}
