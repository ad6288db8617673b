// Copyright (c) 2026 LogLens Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Cause → outcome observations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::classification::ClassificationLevel;

/// Observation count per cause that triggers a trim
pub const CAUSAL_HISTORY_CAP: usize = 100;
/// Observations kept per cause after a trim
pub const CAUSAL_HISTORY_RETAIN: usize = 50;

/// Success rate above which a cause is a strong success signal
pub const STRONG_SUCCESS_RATE: f64 = 0.8;
/// Success rate below which a cause is a strong failure signal
pub const STRONG_FAILURE_RATE: f64 = 0.2;

/// One observed outcome for a cause category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CausalEffect {
    pub effect: ClassificationLevel,
    pub timestamp: DateTime<Utc>,
    /// Sequence type the observation was made in
    pub context: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CorrelationKind {
    StrongSuccess,
    StrongFailure,
}

impl CorrelationKind {
    /// Classify a success rate; rates between the thresholds carry no signal
    pub fn classify(success_rate: f64) -> Option<Self> {
        if success_rate > STRONG_SUCCESS_RATE {
            Some(CorrelationKind::StrongSuccess)
        } else if success_rate < STRONG_FAILURE_RATE {
            Some(CorrelationKind::StrongFailure)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationFinding {
    pub cause: String,
    pub correlation: CorrelationKind,
    pub success_rate: f64,
    /// Observations the rate was computed over
    pub sample_size: usize,
    /// Total observations recorded for the cause
    pub observations: usize,
}
