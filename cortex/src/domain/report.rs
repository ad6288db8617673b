// Copyright (c) 2026 LogLens Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Result and status exports
//!
//! These are the shapes consumed by the reporting collaborator. Field names
//! are camelCase on the wire.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::pattern::PatternId;
use super::prediction::Prediction;
use super::suggestion::Suggestion;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccuracyTrend {
    Improving,
    Stable,
    Declining,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntelligenceHealth {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl IntelligenceHealth {
    pub fn from_confident_ratio(ratio: f64) -> Self {
        if ratio > 0.7 {
            IntelligenceHealth::Excellent
        } else if ratio > 0.5 {
            IntelligenceHealth::Good
        } else if ratio > 0.3 {
            IntelligenceHealth::Fair
        } else {
            IntelligenceHealth::Poor
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaInsights {
    pub learning_velocity: f64,
    pub pattern_discovery_rate: f64,
    pub accuracy_trend: AccuracyTrend,
    pub intelligence_health: IntelligenceHealth,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CausalInsights {
    pub new_relationships: usize,
    pub strengthened_relationships: usize,
    pub correlation_discoveries: Vec<super::causal::CorrelationFinding>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntelligenceGrowth {
    pub total_patterns: usize,
    pub active_patterns: usize,
    pub intelligence_nodes: usize,
    pub causal_relationships: usize,
    pub average_pattern_confidence: f64,
}

/// Return value of one processed classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingResult {
    pub timestamp: DateTime<Utc>,
    pub new_intelligence_nodes: usize,
    pub patterns_updated: usize,
    pub causal_insights: CausalInsights,
    pub predictions: Prediction,
    pub adaptation_suggestions: Vec<Suggestion>,
    pub meta_learning_insights: MetaInsights,
    pub intelligence_growth: IntelligenceGrowth,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopPattern {
    pub id: PatternId,
    pub signature: String,
    pub confidence: f64,
    pub weight: f64,
    pub reinforcement_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub timestamp: DateTime<Utc>,
    pub neural_patterns: usize,
    pub active_patterns: usize,
    pub intelligence_nodes: usize,
    pub causal_relationships: usize,
    pub temporal_sequences: BTreeMap<String, usize>,
    pub average_confidence: f64,
    pub top_patterns: Vec<TopPattern>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_thresholds() {
        assert_eq!(IntelligenceHealth::from_confident_ratio(0.8), IntelligenceHealth::Excellent);
        assert_eq!(IntelligenceHealth::from_confident_ratio(0.7), IntelligenceHealth::Good);
        assert_eq!(IntelligenceHealth::from_confident_ratio(0.5), IntelligenceHealth::Fair);
        assert_eq!(IntelligenceHealth::from_confident_ratio(0.3), IntelligenceHealth::Poor);
    }
}
