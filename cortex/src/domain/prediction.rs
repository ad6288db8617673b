// Copyright (c) 2026 LogLens Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Prediction outputs and the history used to grade them

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::classification::ClassificationLevel;
use super::pattern::PatternId;

/// Prediction records that trigger a trim
pub const PREDICTION_HISTORY_CAP: usize = 1000;
/// Prediction records kept after a trim
pub const PREDICTION_HISTORY_RETAIN: usize = 500;

/// Confidence reported when there is nothing to predict from
pub const EMPTY_INPUT_CONFIDENCE: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_failure_score(red: f64) -> Self {
        if red > 0.7 {
            RiskLevel::High
        } else if red > 0.3 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OpportunityKind {
    LeverageSuccessPattern,
    MitigateFailurePattern,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    #[serde(rename = "type")]
    pub kind: OpportunityKind,
    pub pattern_id: PatternId,
    pub signature: String,
    pub confidence: f64,
    pub accuracy: f64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    /// Normalized outcome scores; empty when there was no input to score
    pub outcome_probability: BTreeMap<ClassificationLevel, f64>,
    pub confidence_level: f64,
    pub risk_level: RiskLevel,
    pub optimization_opportunities: Vec<Opportunity>,
}

impl Prediction {
    /// Degraded result for inputs with no matched categories
    pub fn empty() -> Self {
        Self {
            outcome_probability: BTreeMap::new(),
            confidence_level: EMPTY_INPUT_CONFIDENCE,
            risk_level: RiskLevel::Low,
            optimization_opportunities: Vec::new(),
        }
    }

    pub fn probability(&self, level: ClassificationLevel) -> f64 {
        self.outcome_probability.get(&level).copied().unwrap_or(0.0)
    }

    /// How well this prediction anticipated `observed`, in `[0, 1]`.
    ///
    /// Only GREEN and RED carry probability mass, so a YELLOW outcome is
    /// scored by how undecided the prediction was between the two.
    pub fn score_against(&self, observed: ClassificationLevel) -> f64 {
        let green = self.probability(ClassificationLevel::Green);
        let red = self.probability(ClassificationLevel::Red);
        let score = match observed {
            ClassificationLevel::Green => green,
            ClassificationLevel::Red => red,
            ClassificationLevel::Yellow => 1.0 - (green - red).abs(),
        };
        score.clamp(0.0, 1.0)
    }
}

/// A graded prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRecord {
    pub timestamp: DateTime<Utc>,
    pub predicted_risk: RiskLevel,
    pub observed_level: ClassificationLevel,
    pub accuracy: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_thresholds() {
        assert_eq!(RiskLevel::from_failure_score(0.71), RiskLevel::High);
        assert_eq!(RiskLevel::from_failure_score(0.7), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_failure_score(0.31), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_failure_score(0.3), RiskLevel::Low);
        assert_eq!(RiskLevel::from_failure_score(0.0), RiskLevel::Low);
    }

    #[test]
    fn test_score_against_observed_level() {
        let mut prediction = Prediction::empty();
        prediction.outcome_probability.insert(ClassificationLevel::Green, 0.25);
        prediction.outcome_probability.insert(ClassificationLevel::Red, 0.75);

        assert_eq!(prediction.score_against(ClassificationLevel::Green), 0.25);
        assert_eq!(prediction.score_against(ClassificationLevel::Red), 0.75);
        assert_eq!(prediction.score_against(ClassificationLevel::Yellow), 0.5);
    }

    #[test]
    fn test_outcome_probability_serializes_with_level_keys() {
        let mut prediction = Prediction::empty();
        prediction.outcome_probability.insert(ClassificationLevel::Red, 1.0);
        let json = serde_json::to_value(&prediction).unwrap();
        assert_eq!(json["outcomeProbability"]["RED"], 1.0);
        assert_eq!(json["riskLevel"], "LOW");
    }
}
