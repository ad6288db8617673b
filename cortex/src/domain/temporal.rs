// Copyright (c) 2026 LogLens Contributors
// SPDX-License-Identifier: AGPL-3.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::classification::{ClassificationContext, ClassificationInput, ClassificationLevel};

/// Events per sequence type that trigger a trim
pub const TEMPORAL_HISTORY_CAP: usize = 1000;
/// Events dropped from the front of a sequence in one trim
pub const TEMPORAL_TRIM_BATCH: usize = 500;
/// Events per sequence type written to durable storage
pub const TEMPORAL_PERSISTED_TAIL: usize = 100;

/// Summary of one processed classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporalEvent {
    pub timestamp: DateTime<Utc>,
    pub classification_level: ClassificationLevel,
    pub pattern_count: usize,
    pub anomaly_count: usize,
    #[serde(default)]
    pub context: ClassificationContext,
}

impl TemporalEvent {
    pub fn from_input(
        input: &ClassificationInput,
        level: ClassificationLevel,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            timestamp: now,
            classification_level: level,
            pattern_count: input.matched_signatures.len(),
            anomaly_count: input.unclassified_anomalies.len(),
            context: input.context.clone(),
        }
    }
}
