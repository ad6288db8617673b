// Copyright (c) 2026 LogLens Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for the LogLens CLI

pub mod config;
pub mod process;
pub mod status;

pub use self::config::ConfigCommand;

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;

use loglens_cortex::{CortexConfig, EventBus, IntelligenceEngine, JsonFileStateRepository};

/// Load configuration and the engine state it points at
pub(crate) async fn load_engine(config_override: Option<PathBuf>) -> Result<IntelligenceEngine> {
    let config =
        CortexConfig::load_or_default(config_override).context("Failed to load configuration")?;
    config
        .validate()
        .context("Configuration validation failed")?;

    let repository = Arc::new(JsonFileStateRepository::new(
        &config.persistence.state_path,
    ));
    Ok(IntelligenceEngine::load(config, repository, EventBus::default()).await)
}
