// Copyright (c) 2026 LogLens Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Learning-quality indicators
//!
//! [`PredictionHistory`] grades each forecast against the level that was then
//! observed. [`MetaLearner`] turns the stores and that history into
//! [`MetaInsights`].

use chrono::{DateTime, Duration, Utc};

use crate::application::node_registry::NodeRegistry;
use crate::application::pattern_store::PatternStore;
use crate::domain::{
    AccuracyTrend, ClassificationLevel, IntelligenceHealth, MetaInsights, Prediction,
    PredictionRecord, PREDICTION_HISTORY_CAP, PREDICTION_HISTORY_RETAIN,
};

/// Records compared at each end of the history
pub const TREND_SAMPLE: usize = 10;
/// Mean-accuracy change that counts as a trend
pub const TREND_MARGIN: f64 = 0.1;
/// Nodes seen this often or less still count as discoveries
pub const DISCOVERY_MAX_OCCURRENCES: u64 = 5;
/// Patterns above this confidence count towards health
pub const HEALTHY_CONFIDENCE: f64 = 0.3;

#[derive(Debug, Clone, Default)]
pub struct PredictionHistory {
    records: Vec<PredictionRecord>,
}

impl PredictionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<PredictionRecord>) -> Self {
        Self { records }
    }

    /// Grade `prediction` against `observed` and keep the record
    pub fn record(
        &mut self,
        prediction: &Prediction,
        observed: ClassificationLevel,
        now: DateTime<Utc>,
    ) {
        self.records.push(PredictionRecord {
            timestamp: now,
            predicted_risk: prediction.risk_level,
            observed_level: observed,
            accuracy: prediction.score_against(observed),
        });
        if self.records.len() > PREDICTION_HISTORY_CAP {
            let excess = self.records.len() - PREDICTION_HISTORY_RETAIN;
            self.records.drain(..excess);
        }
    }

    pub fn records(&self) -> &[PredictionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// STABLE until both ends of the history can be sampled without overlap
    pub fn trend(&self) -> AccuracyTrend {
        if self.records.len() < TREND_SAMPLE * 2 {
            return AccuracyTrend::Stable;
        }

        let early = mean_accuracy(&self.records[..TREND_SAMPLE]);
        let recent = mean_accuracy(&self.records[self.records.len() - TREND_SAMPLE..]);

        if recent > early + TREND_MARGIN {
            AccuracyTrend::Improving
        } else if recent < early - TREND_MARGIN {
            AccuracyTrend::Declining
        } else {
            AccuracyTrend::Stable
        }
    }
}

fn mean_accuracy(records: &[PredictionRecord]) -> f64 {
    records.iter().map(|r| r.accuracy).sum::<f64>() / records.len() as f64
}

#[derive(Debug, Clone)]
pub struct MetaLearner {
    active_window: Duration,
}

impl MetaLearner {
    pub fn new(active_window: Duration) -> Self {
        Self { active_window }
    }

    pub fn compute(
        &self,
        patterns: &PatternStore,
        nodes: &NodeRegistry,
        history: &PredictionHistory,
        now: DateTime<Utc>,
    ) -> MetaInsights {
        let total_patterns = patterns.len().max(1) as f64;

        let learning_velocity = patterns.active_count(now, self.active_window) as f64 / total_patterns;

        let discoveries = nodes
            .iter()
            .filter(|n| n.occurrence_count <= DISCOVERY_MAX_OCCURRENCES)
            .count();
        let pattern_discovery_rate = discoveries as f64 / nodes.len().max(1) as f64;

        let confident = patterns
            .iter()
            .filter(|p| p.confidence(now) > HEALTHY_CONFIDENCE)
            .count();

        MetaInsights {
            learning_velocity,
            pattern_discovery_rate,
            accuracy_trend: history.trend(),
            intelligence_health: IntelligenceHealth::from_confident_ratio(
                confident as f64 / total_patterns,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ClassificationContext, RiskLevel};

    fn record(accuracy: f64) -> PredictionRecord {
        PredictionRecord {
            timestamp: Utc::now(),
            predicted_risk: RiskLevel::Low,
            observed_level: ClassificationLevel::Green,
            accuracy,
        }
    }

    fn history(early: f64, recent: f64) -> PredictionHistory {
        let mut records: Vec<_> = (0..10).map(|_| record(early)).collect();
        records.extend((0..10).map(|_| record(recent)));
        PredictionHistory::from_records(records)
    }

    #[test]
    fn test_trend_needs_twenty_records() {
        let records = (0..19).map(|i| record(i as f64 / 19.0)).collect();
        assert_eq!(PredictionHistory::from_records(records).trend(), AccuracyTrend::Stable);
    }

    #[test]
    fn test_trend_directions() {
        assert_eq!(history(0.2, 0.5).trend(), AccuracyTrend::Improving);
        assert_eq!(history(0.6, 0.3).trend(), AccuracyTrend::Declining);
        assert_eq!(history(0.5, 0.55).trend(), AccuracyTrend::Stable);
    }

    #[test]
    fn test_record_grades_and_trims() {
        let mut history = PredictionHistory::new();
        let mut prediction = Prediction::empty();
        prediction.outcome_probability.insert(ClassificationLevel::Red, 0.9);

        for _ in 0..=PREDICTION_HISTORY_CAP {
            history.record(&prediction, ClassificationLevel::Red, Utc::now());
        }

        assert_eq!(history.len(), PREDICTION_HISTORY_RETAIN);
        assert_eq!(history.records()[0].accuracy, 0.9);
    }

    #[test]
    fn test_empty_stores() {
        let insights = MetaLearner::new(Duration::days(7)).compute(
            &PatternStore::new(),
            &NodeRegistry::new(),
            &PredictionHistory::new(),
            Utc::now(),
        );

        assert_eq!(insights.learning_velocity, 0.0);
        assert_eq!(insights.pattern_discovery_rate, 0.0);
        assert_eq!(insights.accuracy_trend, AccuracyTrend::Stable);
        assert_eq!(insights.intelligence_health, IntelligenceHealth::Poor);
    }

    #[test]
    fn test_velocity_and_discovery() {
        let now = Utc::now();
        let mut patterns = PatternStore::new();
        patterns.upsert("OLD:ERROR", 1.0, now - Duration::days(10));
        let id = patterns.upsert("NEW:ERROR", 1.0, now).0.id.clone();
        for _ in 0..10 {
            patterns.reinforce(&id, true, 1.0, now);
        }

        let mut nodes = NodeRegistry::new();
        let context = ClassificationContext::default();
        for _ in 0..6 {
            nodes.upsert("timeout", "NETWORK", ClassificationLevel::Red, 1.0, &context, now);
        }
        nodes.upsert("404", "DEPENDENCY", ClassificationLevel::Red, 1.0, &context, now);

        let insights = MetaLearner::new(Duration::days(7)).compute(
            &patterns,
            &nodes,
            &PredictionHistory::new(),
            now,
        );

        assert_eq!(insights.learning_velocity, 0.5);
        assert_eq!(insights.pattern_discovery_rate, 0.5);
        // One of two patterns is confident
        assert_eq!(insights.intelligence_health, IntelligenceHealth::Fair);
    }
}
