// Copyright (c) 2026 LogLens Contributors
// SPDX-License-Identifier: AGPL-3.0

use std::time::Duration;

use thiserror::Error;

/// Errors surfaced to callers of the intelligence engine
#[derive(Debug, Error)]
pub enum CortexError {
    #[error("Classification input is missing classificationLevel")]
    MissingClassificationLevel,

    #[error("Invalid {field}: {value} (must be finite and non-negative)")]
    InvalidWeight { field: &'static str, value: f64 },

    #[error("Malformed classification input: {0}")]
    Malformed(String),

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),
}

/// Errors raised by state repositories
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),
}
