// Copyright (c) 2026 LogLens Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Bounded per-sequence event history
//!
//! Each sequence type holds at most 1000 events. When an append pushes a
//! sequence past that, the oldest 500 are dropped in one batch. Only the
//! last 100 events of each sequence are persisted.

use std::collections::{BTreeMap, VecDeque};

use crate::domain::{
    TemporalEvent, TEMPORAL_HISTORY_CAP, TEMPORAL_PERSISTED_TAIL, TEMPORAL_TRIM_BATCH,
};

#[derive(Debug, Clone, Default)]
pub struct TemporalLog {
    sequences: BTreeMap<String, VecDeque<TemporalEvent>>,
}

impl TemporalLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_persisted(sequences: BTreeMap<String, Vec<TemporalEvent>>) -> Self {
        Self {
            sequences: sequences
                .into_iter()
                .map(|(sequence_type, events)| (sequence_type, VecDeque::from(events)))
                .collect(),
        }
    }

    pub fn append(&mut self, sequence_type: &str, event: TemporalEvent) {
        let events = self.sequences.entry(sequence_type.to_string()).or_default();
        events.push_back(event);
        if events.len() > TEMPORAL_HISTORY_CAP {
            events.drain(..TEMPORAL_TRIM_BATCH);
        }
    }

    pub fn len(&self, sequence_type: &str) -> usize {
        self.sequences.get(sequence_type).map_or(0, VecDeque::len)
    }

    pub fn sequence_counts(&self) -> BTreeMap<String, usize> {
        self.sequences
            .iter()
            .map(|(sequence_type, events)| (sequence_type.clone(), events.len()))
            .collect()
    }

    /// Last events of every sequence, oldest first
    pub fn persisted_tail(&self) -> BTreeMap<String, Vec<TemporalEvent>> {
        self.sequences
            .iter()
            .map(|(sequence_type, events)| {
                let skip = events.len().saturating_sub(TEMPORAL_PERSISTED_TAIL);
                (sequence_type.clone(), events.iter().skip(skip).cloned().collect())
            })
            .collect()
    }
}
