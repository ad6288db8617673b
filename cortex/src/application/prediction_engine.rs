// Copyright (c) 2026 LogLens Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Outcome forecasting from learned patterns
//!
//! For every matched category, each pattern whose signature contains the
//! category contributes its confidence to the total. Each of its last 20
//! outcomes adds the same confidence to the GREEN or RED score. Scores are
//! then divided by the total confidence when it is positive.

use chrono::{DateTime, Utc};

use crate::application::pattern_store::PatternStore;
use crate::domain::{
    ClassificationLevel, Opportunity, OpportunityKind, Prediction, RiskLevel,
};

/// Outcomes per pattern that feed the score
pub const PREDICTION_OUTCOME_WINDOW: usize = 20;

const LEVERAGE_ACCURACY: f64 = 0.8;
const MITIGATE_ACCURACY: f64 = 0.2;

#[derive(Debug, Clone)]
pub struct PredictionEngine {
    confidence_threshold: f64,
}

impl PredictionEngine {
    pub fn new(confidence_threshold: f64) -> Self {
        Self {
            confidence_threshold,
        }
    }

    pub fn predict(
        &self,
        matched_categories: &[String],
        patterns: &PatternStore,
        now: DateTime<Utc>,
    ) -> Prediction {
        if matched_categories.is_empty() {
            return Prediction::empty();
        }

        let mut total_confidence = 0.0;
        let mut green = 0.0;
        let mut red = 0.0;

        for category in matched_categories {
            for pattern in patterns.matching(category) {
                let confidence = pattern.confidence(now);
                total_confidence += confidence;

                for outcome in pattern.recent_outcomes(PREDICTION_OUTCOME_WINDOW) {
                    if outcome.success {
                        green += confidence;
                    } else {
                        red += confidence;
                    }
                }
            }
        }

        if total_confidence > 0.0 {
            green /= total_confidence;
            red /= total_confidence;
        }

        let mut prediction = Prediction::empty();
        prediction
            .outcome_probability
            .insert(ClassificationLevel::Green, green);
        prediction
            .outcome_probability
            .insert(ClassificationLevel::Red, red);
        prediction.confidence_level = (total_confidence / matched_categories.len() as f64).min(1.0);
        prediction.risk_level = RiskLevel::from_failure_score(red);
        prediction.optimization_opportunities = self.opportunities(patterns, now);
        prediction
    }

    fn opportunities(&self, patterns: &PatternStore, now: DateTime<Utc>) -> Vec<Opportunity> {
        let mut opportunities = Vec::new();

        for pattern in patterns.iter() {
            let confidence = pattern.confidence(now);
            if confidence <= self.confidence_threshold {
                continue;
            }

            let accuracy = pattern.prediction_accuracy;
            let kind = if accuracy > LEVERAGE_ACCURACY {
                OpportunityKind::LeverageSuccessPattern
            } else if accuracy < MITIGATE_ACCURACY {
                OpportunityKind::MitigateFailurePattern
            } else {
                continue;
            };

            let description = match kind {
                OpportunityKind::LeverageSuccessPattern => format!(
                    "Pattern '{}' reliably precedes success; replicate the conditions behind it",
                    pattern.signature
                ),
                OpportunityKind::MitigateFailurePattern => format!(
                    "Pattern '{}' reliably precedes failure; add a mitigation for it",
                    pattern.signature
                ),
            };

            opportunities.push(Opportunity {
                kind,
                pattern_id: pattern.id.clone(),
                signature: pattern.signature.clone(),
                confidence,
                accuracy,
                description,
            });
        }

        opportunities
    }
}
