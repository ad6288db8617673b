// Copyright (c) 2026 LogLens Contributors
// SPDX-License-Identifier: AGPL-3.0

//! JSON File State Repository
//!
//! Stores the engine snapshot as a single pretty-printed JSON document on the
//! local filesystem. Writes go to a sibling `.tmp` file which is then renamed
//! over the target, so a crash mid-write leaves the previous snapshot intact.
//!
//! **Limitations:**
//! - Single writer only; two processes sharing one path will overwrite each other
//! - Whole-document rewrite on every save

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::domain::{PersistedState, PersistenceError};
use crate::infrastructure::repository::StateRepository;

pub struct JsonFileStateRepository {
    path: PathBuf,
}

impl JsonFileStateRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl StateRepository for JsonFileStateRepository {
    async fn load(&self) -> Result<Option<PersistedState>, PersistenceError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(PersistenceError::Io(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        let state = serde_json::from_str(&content).map_err(|e| {
            PersistenceError::Serialization(format!(
                "Failed to parse {}: {}",
                self.path.display(),
                e
            ))
        })?;

        debug!(path = %self.path.display(), "Loaded intelligence state");
        Ok(Some(state))
    }

    async fn save(&self, state: &PersistedState) -> Result<(), PersistenceError> {
        let json = serde_json::to_vec_pretty(state)
            .map_err(|e| PersistenceError::Serialization(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                PersistenceError::Io(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let temp_path = self.temp_path();
        tokio::fs::write(&temp_path, &json).await.map_err(|e| {
            PersistenceError::Io(format!("Failed to write {}: {}", temp_path.display(), e))
        })?;
        tokio::fs::rename(&temp_path, &self.path).await.map_err(|e| {
            PersistenceError::Io(format!(
                "Failed to move {} into place: {}",
                temp_path.display(),
                e
            ))
        })?;

        debug!(path = %self.path.display(), bytes = json.len(), "Saved intelligence state");
        Ok(())
    }
}
