// Copyright (c) 2026 LogLens Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Learned recurring signatures
//!
//! A [`Pattern`] is keyed by a stable digest of its signature, so the same
//! `"{category}:{level}"` always lands on the same record across restarts.
//! Weight moves multiplicatively: reinforcement scales it up or down, and
//! inactivity decays it. Accuracy is an additive score clamped to `[0, 1]`.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Outcome history length that triggers a trim
pub const OUTCOME_HISTORY_CAP: usize = 100;
/// Outcome records kept after a trim
pub const OUTCOME_HISTORY_RETAIN: usize = 50;

/// Initial weight for signature-derived patterns
pub const SIGNATURE_INITIAL_WEIGHT: f64 = 1.0;
/// Initial weight for anomaly-derived patterns
pub const ANOMALY_INITIAL_WEIGHT: f64 = 0.5;

const ANOMALY_PREFIX_CHARS: usize = 50;

/// Hex digest prefix of the signature; identical input always yields the same id.
pub fn stable_id(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    hex::encode(&digest[..8])
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatternId(pub String);

impl PatternId {
    pub fn from_signature(signature: &str) -> Self {
        Self(stable_id(signature))
    }
}

impl fmt::Display for PatternId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Signature for a matched `(category, level)` pair
pub fn signature_for(category: &str, level: &str) -> String {
    format!("{}:{}", category, level)
}

/// Signature for an unclassified line, truncated to its first 50 characters
pub fn anomaly_signature(line: &str) -> String {
    let prefix: String = line.chars().take(ANOMALY_PREFIX_CHARS).collect();
    format!("ANOMALY:{}", prefix)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeRecord {
    pub timestamp: DateTime<Utc>,
    pub success: bool,
    pub context_weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pattern {
    pub id: PatternId,
    pub signature: String,
    pub weight: f64,
    pub reinforcement_count: u64,
    pub prediction_accuracy: f64,
    pub created_at: DateTime<Utc>,
    pub last_activation: DateTime<Utc>,
    #[serde(default)]
    pub associated_outcomes: Vec<OutcomeRecord>,
}

impl Pattern {
    pub fn new(signature: impl Into<String>, initial_weight: f64, now: DateTime<Utc>) -> Self {
        let signature = signature.into();
        Self {
            id: PatternId::from_signature(&signature),
            signature,
            weight: initial_weight,
            reinforcement_count: 0,
            prediction_accuracy: 0.5,
            created_at: now,
            last_activation: now,
            associated_outcomes: Vec::new(),
        }
    }

    /// Apply one observed outcome
    pub fn reinforce(&mut self, success: bool, context_weight: f64, now: DateTime<Utc>) {
        if success {
            self.prediction_accuracy = (self.prediction_accuracy + 0.1 * context_weight).min(1.0);
            // Stays finite so the state file can be read back
            self.weight = (self.weight * 1.1).min(f64::MAX);
        } else {
            self.prediction_accuracy = (self.prediction_accuracy - 0.05 * context_weight).max(0.0);
            self.weight *= 0.95;
        }

        self.associated_outcomes.push(OutcomeRecord {
            timestamp: now,
            success,
            context_weight,
        });
        if self.associated_outcomes.len() > OUTCOME_HISTORY_CAP {
            let excess = self.associated_outcomes.len() - OUTCOME_HISTORY_RETAIN;
            self.associated_outcomes.drain(..excess);
        }

        self.last_activation = now;
        self.reinforcement_count += 1;
    }

    /// Whether the pattern has been idle for longer than `threshold`
    pub fn is_stale(&self, now: DateTime<Utc>, threshold: Duration) -> bool {
        now - self.last_activation > threshold
    }

    pub fn is_active(&self, now: DateTime<Utc>, window: Duration) -> bool {
        now - self.last_activation <= window
    }

    pub fn apply_time_decay(&mut self, decay_factor: f64) {
        self.weight *= decay_factor;
    }

    /// Accuracy scaled by recency and reinforcement depth, in `[0, 1]`
    pub fn confidence(&self, now: DateTime<Utc>) -> f64 {
        let days_since = (now - self.last_activation).num_days() as f64;
        let recency_factor = (1.0 - days_since / 30.0).clamp(0.1, 1.0);
        let reinforcement_factor = (self.reinforcement_count as f64 / 10.0).min(1.0);
        self.prediction_accuracy * recency_factor * reinforcement_factor
    }

    /// The most recent `n` outcomes, oldest first
    pub fn recent_outcomes(&self, n: usize) -> &[OutcomeRecord] {
        let start = self.associated_outcomes.len().saturating_sub(n);
        &self.associated_outcomes[start..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_creation() {
        let now = Utc::now();
        let pattern = Pattern::new("NETWORK:ERROR", SIGNATURE_INITIAL_WEIGHT, now);

        assert_eq!(pattern.weight, 1.0);
        assert_eq!(pattern.prediction_accuracy, 0.5);
        assert_eq!(pattern.reinforcement_count, 0);
        assert_eq!(pattern.id, PatternId::from_signature("NETWORK:ERROR"));
    }

    #[test]
    fn test_stable_id_is_deterministic() {
        assert_eq!(stable_id("TEST:WARNING"), stable_id("TEST:WARNING"));
        assert_ne!(stable_id("TEST:WARNING"), stable_id("TEST:ERROR"));
        assert_eq!(stable_id("TEST:WARNING").len(), 16);
    }

    #[test]
    fn test_success_reinforcement() {
        let now = Utc::now();
        let mut pattern = Pattern::new("BUILD:INFO", 1.0, now);

        pattern.reinforce(true, 1.0, now);
        assert!((pattern.weight - 1.1).abs() < 1e-12);
        assert!((pattern.prediction_accuracy - 0.6).abs() < 1e-12);
        assert_eq!(pattern.reinforcement_count, 1);
    }

    #[test]
    fn test_weight_growth_saturates() {
        let now = Utc::now();
        let mut pattern = Pattern::new("BUILD:INFO", 1.0, now);

        for _ in 0..8_000 {
            pattern.reinforce(true, 1.0, now);
        }
        assert_eq!(pattern.weight, f64::MAX);

        pattern.reinforce(false, 1.0, now);
        assert!(pattern.weight.is_finite());
        assert!(pattern.weight < f64::MAX);
    }

    #[test]
    fn test_accuracy_clamped() {
        let now = Utc::now();
        let mut pattern = Pattern::new("BUILD:INFO", 1.0, now);

        for _ in 0..20 {
            pattern.reinforce(true, 3.0, now);
        }
        assert_eq!(pattern.prediction_accuracy, 1.0);

        for _ in 0..50 {
            pattern.reinforce(false, 3.0, now);
        }
        assert_eq!(pattern.prediction_accuracy, 0.0);
        assert!(pattern.weight > 0.0);
    }

    #[test]
    fn test_outcome_history_trimmed_to_fifty() {
        let now = Utc::now();
        let mut pattern = Pattern::new("TEST:ERROR", 1.0, now);

        for _ in 0..OUTCOME_HISTORY_CAP {
            pattern.reinforce(false, 1.0, now);
        }
        assert_eq!(pattern.associated_outcomes.len(), 100);

        pattern.reinforce(true, 1.0, now);
        assert_eq!(pattern.associated_outcomes.len(), OUTCOME_HISTORY_RETAIN);
        // The newest record survives the trim
        assert!(pattern.associated_outcomes.last().unwrap().success);
    }

    #[test]
    fn test_confidence_factors() {
        let now = Utc::now();
        let mut pattern = Pattern::new("NETWORK:ERROR", 1.0, now);
        assert_eq!(pattern.confidence(now), 0.0);

        for _ in 0..10 {
            pattern.reinforce(true, 0.0, now);
        }
        // accuracy 0.5, fresh, fully reinforced
        assert!((pattern.confidence(now) - 0.5).abs() < 1e-12);

        // 15 days idle halves the recency factor
        let later = now + Duration::days(15);
        assert!((pattern.confidence(later) - 0.25).abs() < 1e-12);

        // Recency bottoms out at 0.1
        let much_later = now + Duration::days(300);
        assert!((pattern.confidence(much_later) - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_anomaly_signature_truncation() {
        let line = "x".repeat(80);
        let signature = anomaly_signature(&line);
        assert_eq!(signature, format!("ANOMALY:{}", "x".repeat(50)));
        assert_eq!(anomaly_signature("short"), "ANOMALY:short");
    }

    #[test]
    fn test_recent_outcomes_window() {
        let now = Utc::now();
        let mut pattern = Pattern::new("TEST:ERROR", 1.0, now);
        for i in 0..30 {
            pattern.reinforce(i % 2 == 0, 1.0, now);
        }
        assert_eq!(pattern.recent_outcomes(20).len(), 20);
        assert_eq!(pattern.recent_outcomes(100).len(), 30);
    }
}
