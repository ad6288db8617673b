// Copyright (c) 2026 LogLens Contributors
// SPDX-License-Identifier: AGPL-3.0

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SuggestionPriority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SuggestionKind {
    InfrastructureOptimization,
    TestResilience,
    NetworkResilience,
    PatternLearning,
}

/// A remediation hint derived from one classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    pub priority: SuggestionPriority,
    /// Category that triggered the suggestion, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub occurrences: usize,
    pub suggestion: String,
    pub actions: Vec<String>,
}
