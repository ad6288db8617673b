// Copyright (c) 2026 LogLens Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Classification input contract
//!
//! The Log Aggregator groups raw log text into sessions and classifies each
//! batch. This module defines the shape of that result as it crosses into the
//! Cortex, plus the boundary validation applied before any store is touched.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::errors::CortexError;

/// Default sequence type used when the aggregator does not tag a session.
pub const DEFAULT_SEQUENCE_TYPE: &str = "default";

/// Overall health level assigned to a classified log batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClassificationLevel {
    Green,
    Yellow,
    Red,
}

impl ClassificationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassificationLevel::Green => "GREEN",
            ClassificationLevel::Yellow => "YELLOW",
            ClassificationLevel::Red => "RED",
        }
    }

    /// Only GREEN counts as a successful outcome.
    pub fn is_success(&self) -> bool {
        matches!(self, ClassificationLevel::Green)
    }
}

impl fmt::Display for ClassificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A signature the aggregator matched inside the batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedSignature {
    pub pattern: String,
    pub category: String,
    /// Line-level severity, e.g. `ERROR`, `WARNING`, `INFO`
    pub level: String,
    #[serde(default = "default_learning_weight")]
    pub learning_weight: f64,
}

impl MatchedSignature {
    pub fn new(
        pattern: impl Into<String>,
        category: impl Into<String>,
        level: impl Into<String>,
    ) -> Self {
        Self {
            pattern: pattern.into(),
            category: category.into(),
            level: level.into(),
            learning_weight: default_learning_weight(),
        }
    }

    /// Whether the line-level severity is one the advisor counts
    pub fn is_problem(&self) -> bool {
        matches!(self.level.as_str(), "ERROR" | "WARNING")
    }
}

/// A log line no signature matched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnclassifiedAnomaly {
    pub line: String,
}

/// Typed view over the aggregator's free-form context
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub importance_weight: Option<f64>,

    /// Keys this version does not interpret, kept for forward compatibility
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl ClassificationContext {
    pub fn with_session_type(session_type: impl Into<String>) -> Self {
        Self {
            session_type: Some(session_type.into()),
            ..Self::default()
        }
    }

    pub fn sequence_type(&self) -> &str {
        self.session_type
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SEQUENCE_TYPE)
    }

    pub fn importance_weight(&self) -> f64 {
        self.importance_weight.unwrap_or(1.0)
    }
}

/// Classification result produced by the Log Aggregator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationInput {
    /// Required; kept optional here so a missing value is reported as a
    /// validation error instead of a generic parse failure.
    #[serde(default)]
    pub classification_level: Option<ClassificationLevel>,

    #[serde(default)]
    pub matched_signatures: Vec<MatchedSignature>,

    #[serde(default)]
    pub unclassified_anomalies: Vec<UnclassifiedAnomaly>,

    #[serde(default)]
    pub context: ClassificationContext,
}

impl ClassificationInput {
    pub fn new(level: ClassificationLevel) -> Self {
        Self {
            classification_level: Some(level),
            ..Self::default()
        }
    }

    pub fn with_signature(mut self, signature: MatchedSignature) -> Self {
        self.matched_signatures.push(signature);
        self
    }

    pub fn with_anomaly(mut self, line: impl Into<String>) -> Self {
        self.unclassified_anomalies.push(UnclassifiedAnomaly { line: line.into() });
        self
    }

    pub fn with_context(mut self, context: ClassificationContext) -> Self {
        self.context = context;
        self
    }

    /// Parse one aggregator payload and validate it
    pub fn from_json(json: &str) -> Result<Self, CortexError> {
        let input: Self =
            serde_json::from_str(json).map_err(|e| CortexError::Malformed(e.to_string()))?;
        input.validate()?;
        Ok(input)
    }

    /// Boundary validation; returns the classification level on success
    pub fn validate(&self) -> Result<ClassificationLevel, CortexError> {
        let level = self
            .classification_level
            .ok_or(CortexError::MissingClassificationLevel)?;

        for signature in &self.matched_signatures {
            check_weight("learningWeight", signature.learning_weight)?;
        }
        if let Some(weight) = self.context.importance_weight {
            check_weight("importanceWeight", weight)?;
        }

        Ok(level)
    }

    /// Categories of all matched signatures, in input order
    pub fn matched_categories(&self) -> Vec<String> {
        self.matched_signatures
            .iter()
            .map(|s| s.category.clone())
            .collect()
    }
}

fn check_weight(field: &'static str, value: f64) -> Result<(), CortexError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(CortexError::InvalidWeight { field, value })
    }
}

fn default_learning_weight() -> f64 {
    1.0
}
