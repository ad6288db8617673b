// Copyright (c) 2026 LogLens Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Repository interface for Cortex state
//! Defines the contract the persistence gateway is written against

use async_trait::async_trait;

use crate::domain::{PersistedState, PersistenceError};

/// Durable storage for the full engine snapshot
#[async_trait]
pub trait StateRepository: Send + Sync {
    /// Load the last saved snapshot.
    /// Returns `Ok(None)` when nothing has been saved yet.
    async fn load(&self) -> Result<Option<PersistedState>, PersistenceError>;

    /// Replace the stored snapshot
    async fn save(&self, state: &PersistedState) -> Result<(), PersistenceError>;
}
