// Copyright (c) 2026 LogLens Contributors
// SPDX-License-Identifier: AGPL-3.0

//! `loglens status` - print the status export as JSON

use anyhow::{Context, Result};
use std::path::PathBuf;

pub async fn execute(config_override: Option<PathBuf>) -> Result<()> {
    let engine = super::load_engine(config_override).await?;
    let status = engine.get_status().await;

    let json = serde_json::to_string_pretty(&status).context("Failed to serialize status")?;
    println!("{}", json);

    Ok(())
}
