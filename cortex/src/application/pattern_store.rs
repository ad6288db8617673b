// Copyright (c) 2026 LogLens Contributors
// SPDX-License-Identifier: AGPL-3.0
//! # PatternStore - Decay-Weighted Signature Memory
//!
//! Owns every [`Pattern`] keyed by the stable digest of its signature.
//!
//! ## Reinforcement
//!
//! - **Success**: accuracy `+0.1 × contextWeight` (capped at 1), weight `×1.1`.
//! - **Failure**: accuracy `−0.05 × contextWeight` (floored at 0), weight `×0.95`.
//!
//! ## Decay
//!
//! [`PatternStore::decay_all`] multiplies the weight of every pattern idle for
//! longer than the decay window by the decay factor. It does not remember
//! having decayed a pattern already, so each call decays again; the engine
//! calls it once per processed classification.
//!
//! Patterns are never removed.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};

use crate::domain::{Pattern, PatternId, TopPattern};

/// Weight movement caused by one reinforcement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reinforcement {
    pub old_weight: f64,
    pub new_weight: f64,
    pub accuracy: f64,
}

#[derive(Debug, Clone, Default)]
pub struct PatternStore {
    patterns: BTreeMap<PatternId, Pattern>,
}

impl PatternStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_patterns(patterns: BTreeMap<PatternId, Pattern>) -> Self {
        Self { patterns }
    }

    /// Return the pattern for `signature`, creating it if unseen.
    /// The flag is `true` when the pattern was created by this call.
    pub fn upsert(
        &mut self,
        signature: &str,
        initial_weight: f64,
        now: DateTime<Utc>,
    ) -> (&Pattern, bool) {
        let id = PatternId::from_signature(signature);
        let mut created = false;
        let pattern = self.patterns.entry(id).or_insert_with(|| {
            created = true;
            Pattern::new(signature, initial_weight, now)
        });
        (pattern, created)
    }

    /// Apply one outcome to an existing pattern. Unknown ids are ignored.
    pub fn reinforce(
        &mut self,
        id: &PatternId,
        success: bool,
        context_weight: f64,
        now: DateTime<Utc>,
    ) -> Option<Reinforcement> {
        let pattern = self.patterns.get_mut(id)?;
        let old_weight = pattern.weight;
        pattern.reinforce(success, context_weight, now);
        Some(Reinforcement {
            old_weight,
            new_weight: pattern.weight,
            accuracy: pattern.prediction_accuracy,
        })
    }

    /// Decay every pattern idle for longer than `threshold`; returns how many decayed
    pub fn decay_all(&mut self, now: DateTime<Utc>, threshold: Duration, decay_factor: f64) -> usize {
        let mut decayed = 0;
        for pattern in self.patterns.values_mut() {
            if pattern.is_stale(now, threshold) {
                pattern.apply_time_decay(decay_factor);
                decayed += 1;
            }
        }
        decayed
    }

    /// Confidence of a pattern; unknown ids have none
    pub fn confidence(&self, id: &PatternId, now: DateTime<Utc>) -> f64 {
        self.patterns
            .get(id)
            .map(|p| p.confidence(now))
            .unwrap_or(0.0)
    }

    pub fn get(&self, id: &PatternId) -> Option<&Pattern> {
        self.patterns.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pattern> {
        self.patterns.values()
    }

    /// Patterns whose signature contains `category`
    pub fn matching<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Pattern> + 'a {
        self.patterns
            .values()
            .filter(move |p| p.signature.contains(category))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn active_count(&self, now: DateTime<Utc>, window: Duration) -> usize {
        self.patterns
            .values()
            .filter(|p| p.is_active(now, window))
            .count()
    }

    /// Mean confidence across all patterns, 0 when empty
    pub fn average_confidence(&self, now: DateTime<Utc>) -> f64 {
        if self.patterns.is_empty() {
            return 0.0;
        }
        let total: f64 = self.patterns.values().map(|p| p.confidence(now)).sum();
        total / self.patterns.len() as f64
    }

    /// Highest-confidence patterns, best first
    pub fn top_by_confidence(&self, now: DateTime<Utc>, limit: usize) -> Vec<TopPattern> {
        let mut ranked: Vec<_> = self
            .patterns
            .values()
            .map(|p| (p, p.confidence(now)))
            .collect();

        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.id.cmp(&b.0.id))
        });

        ranked
            .into_iter()
            .take(limit)
            .map(|(pattern, confidence)| TopPattern {
                id: pattern.id.clone(),
                signature: pattern.signature.clone(),
                confidence,
                weight: pattern.weight,
                reinforcement_count: pattern.reinforcement_count,
            })
            .collect()
    }

    pub fn to_map(&self) -> BTreeMap<PatternId, Pattern> {
        self.patterns.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seven_days() -> Duration {
        Duration::days(7)
    }

    #[test]
    fn test_upsert_is_idempotent() {
        let mut store = PatternStore::new();
        let now = Utc::now();

        let (first, created) = store.upsert("NETWORK:ERROR", 1.0, now);
        let first_id = first.id.clone();
        assert!(created);

        let (second, created) = store.upsert("NETWORK:ERROR", 0.5, now);
        assert!(!created);
        assert_eq!(second.id, first_id);
        // The initial weight only applies on creation
        assert_eq!(second.weight, 1.0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_reinforce_unknown_id_is_noop() {
        let mut store = PatternStore::new();
        let id = PatternId::from_signature("NEVER:SEEN");

        assert!(store.reinforce(&id, true, 1.0, Utc::now()).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_success_strictly_increases_weight() {
        let mut store = PatternStore::new();
        let now = Utc::now();
        let id = store.upsert("BUILD:INFO", 1.0, now).0.id.clone();

        let mut last_weight = 1.0;
        for _ in 0..30 {
            let change = store.reinforce(&id, true, 1.0, now).unwrap();
            assert!(change.new_weight > last_weight);
            assert!(change.accuracy <= 1.0);
            last_weight = change.new_weight;
        }
    }

    #[test]
    fn test_decay_only_touches_stale_patterns() {
        let mut store = PatternStore::new();
        let start = Utc::now();
        let stale_id = store.upsert("OLD:ERROR", 1.0, start).0.id.clone();

        let later = start + Duration::days(8);
        let fresh_id = store.upsert("NEW:ERROR", 1.0, later).0.id.clone();

        let decayed = store.decay_all(later, seven_days(), 0.95);

        assert_eq!(decayed, 1);
        assert!((store.get(&stale_id).unwrap().weight - 0.95).abs() < 1e-12);
        assert_eq!(store.get(&fresh_id).unwrap().weight, 1.0);
    }

    #[test]
    fn test_decay_within_window_is_noop() {
        let mut store = PatternStore::new();
        let start = Utc::now();
        let id = store.upsert("TEST:WARNING", 1.0, start).0.id.clone();

        let decayed = store.decay_all(start + Duration::days(7), seven_days(), 0.95);

        assert_eq!(decayed, 0);
        assert_eq!(store.get(&id).unwrap().weight, 1.0);
    }

    /// Known limitation: decay does not track whether a pattern was already
    /// decayed, so every pass over an idle pattern compounds.
    #[test]
    fn test_repeated_decay_compounds_without_activity() {
        let mut store = PatternStore::new();
        let start = Utc::now();
        let id = store.upsert("OLD:ERROR", 1.0, start).0.id.clone();
        let later = start + Duration::days(8);

        store.decay_all(later, seven_days(), 0.95);
        store.decay_all(later, seven_days(), 0.95);

        let weight = store.get(&id).unwrap().weight;
        assert!((weight - 0.95 * 0.95).abs() < 1e-12);
    }

    #[test]
    fn test_confidence_bounds() {
        let mut store = PatternStore::new();
        let now = Utc::now();
        let id = store.upsert("NETWORK:ERROR", 1.0, now).0.id.clone();

        for i in 0..40 {
            store.reinforce(&id, i % 3 != 0, 2.5, now);
            let confidence = store.confidence(&id, now);
            assert!((0.0..=1.0).contains(&confidence));
        }

        assert_eq!(store.confidence(&PatternId::from_signature("missing"), now), 0.0);
    }

    #[test]
    fn test_matching_uses_substring() {
        let mut store = PatternStore::new();
        let now = Utc::now();
        store.upsert("NETWORK:ERROR", 1.0, now);
        store.upsert("NETWORK:WARNING", 1.0, now);
        store.upsert("TEST:ERROR", 1.0, now);

        assert_eq!(store.matching("NETWORK").count(), 2);
        assert_eq!(store.matching("ERROR").count(), 2);
        assert_eq!(store.matching("DISK").count(), 0);
    }

    #[test]
    fn test_top_by_confidence_ordering() {
        let mut store = PatternStore::new();
        let now = Utc::now();
        let strong = store.upsert("BUILD:INFO", 1.0, now).0.id.clone();
        let weak = store.upsert("TEST:ERROR", 1.0, now).0.id.clone();
        store.upsert("UNUSED:INFO", 1.0, now);

        for _ in 0..10 {
            store.reinforce(&strong, true, 1.0, now);
            store.reinforce(&weak, false, 1.0, now);
        }

        let top = store.top_by_confidence(now, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].id, strong);
        assert!(top[0].confidence >= top[1].confidence);
    }

    #[test]
    fn test_average_confidence_empty() {
        assert_eq!(PatternStore::new().average_confidence(Utc::now()), 0.0);
    }
}
