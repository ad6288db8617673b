// Copyright (c) 2026 LogLens Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Rolling cause → outcome log and the correlations derived from it
//!
//! Each cause category keeps at most 100 observations; on overflow only the
//! most recent 50 are kept. A cause is classified once it has at least
//! `min_samples` observations, using the success rate over its most recent
//! `window` observations.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::domain::{
    CausalEffect, ClassificationLevel, CorrelationFinding, CorrelationKind, CAUSAL_HISTORY_CAP,
    CAUSAL_HISTORY_RETAIN,
};

#[derive(Debug, Clone, Default)]
pub struct CausalTracker {
    relationships: BTreeMap<String, Vec<CausalEffect>>,
}

impl CausalTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_relationships(relationships: BTreeMap<String, Vec<CausalEffect>>) -> Self {
        Self { relationships }
    }

    /// Append an observation; returns `true` if the cause was not tracked before
    pub fn record(
        &mut self,
        cause: &str,
        effect: ClassificationLevel,
        context: &str,
        confidence: f64,
        now: DateTime<Utc>,
    ) -> bool {
        let is_new = !self.relationships.contains_key(cause);
        let effects = self.relationships.entry(cause.to_string()).or_default();

        effects.push(CausalEffect {
            effect,
            timestamp: now,
            context: context.to_string(),
            confidence,
        });
        if effects.len() > CAUSAL_HISTORY_CAP {
            let excess = effects.len() - CAUSAL_HISTORY_RETAIN;
            effects.drain(..excess);
        }

        is_new
    }

    /// Classify every cause with at least `min_samples` observations.
    /// Causes are visited in sorted order, so output is deterministic.
    pub fn correlate(&self, min_samples: usize, window: usize) -> Vec<CorrelationFinding> {
        let mut findings = Vec::new();

        for (cause, effects) in &self.relationships {
            if effects.len() < min_samples {
                continue;
            }

            let recent = &effects[effects.len().saturating_sub(window)..];
            if recent.is_empty() {
                continue;
            }
            let successes = recent.iter().filter(|e| e.effect.is_success()).count();
            let success_rate = successes as f64 / recent.len() as f64;

            if let Some(correlation) = CorrelationKind::classify(success_rate) {
                findings.push(CorrelationFinding {
                    cause: cause.clone(),
                    correlation,
                    success_rate,
                    sample_size: recent.len(),
                    observations: effects.len(),
                });
            }
        }

        findings
    }

    pub fn effects(&self, cause: &str) -> Option<&[CausalEffect]> {
        self.relationships.get(cause).map(Vec::as_slice)
    }

    /// Number of tracked causes
    pub fn len(&self) -> usize {
        self.relationships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relationships.is_empty()
    }

    pub fn to_map(&self) -> BTreeMap<String, Vec<CausalEffect>> {
        self.relationships.clone()
    }
}
