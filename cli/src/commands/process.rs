// Copyright (c) 2026 LogLens Contributors
// SPDX-License-Identifier: AGPL-3.0

//! `loglens process` - learn from classification results

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tracing::info;

use loglens_cortex::{ClassificationInput, FlushMode, StateFlusher};

pub async fn execute(input: PathBuf, config_override: Option<PathBuf>) -> Result<()> {
    let text = read_input(&input).await?;
    let inputs = parse_inputs(&text)?;

    let engine = Arc::new(super::load_engine(config_override).await?);

    let flusher = match engine.config().persistence.flush_mode {
        FlushMode::Background => {
            let flusher = Arc::new(StateFlusher::from_config(engine.clone()));
            let token = flusher.shutdown_token();
            Some((token, flusher.start()))
        }
        FlushMode::Sync => None,
    };

    let mut rejected = 0;
    for (index, classification) in inputs.iter().enumerate() {
        match engine.process_classification(classification).await {
            Ok(result) => {
                let json = serde_json::to_string_pretty(&result)
                    .context("Failed to serialize processing result")?;
                println!("{}", json);
            }
            Err(e) => {
                rejected += 1;
                eprintln!(
                    "{}",
                    format!("✗ Classification #{} rejected: {}", index + 1, e).red()
                );
            }
        }
    }

    if let Some((token, handle)) = flusher {
        token.cancel();
        handle.await.context("State flusher task failed")?;
    }

    info!(
        processed = inputs.len() - rejected,
        rejected, "Finished processing classifications"
    );

    if rejected > 0 {
        anyhow::bail!("{} of {} classifications rejected", rejected, inputs.len());
    }

    Ok(())
}

async fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .context("Failed to read classifications from stdin")?;
        return Ok(text);
    }

    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read classifications from {:?}", path))
}

/// Accept a single classification object or an array of them
pub fn parse_inputs(text: &str) -> Result<Vec<ClassificationInput>> {
    let value: serde_json::Value =
        serde_json::from_str(text).context("Classification input is not valid JSON")?;

    let items = match value {
        serde_json::Value::Array(items) => items,
        single => vec![single],
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item)
                .with_context(|| format!("Classification #{} is malformed", index + 1))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use loglens_cortex::ClassificationLevel;

    #[test]
    fn test_parse_single_object() {
        let inputs = parse_inputs(
            r#"{
                "classificationLevel": "RED",
                "matchedSignatures": [
                    {"pattern": "timeout", "category": "NETWORK", "level": "ERROR", "learningWeight": 1.0}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].classification_level, Some(ClassificationLevel::Red));
        assert_eq!(inputs[0].matched_signatures[0].category, "NETWORK");
    }

    #[test]
    fn test_parse_array() {
        let inputs = parse_inputs(
            r#"[
                {"classificationLevel": "GREEN"},
                {"classificationLevel": "YELLOW", "unclassifiedAnomalies": [{"line": "odd"}]}
            ]"#,
        )
        .unwrap();

        assert_eq!(inputs.len(), 2);
        assert_eq!(inputs[1].unclassified_anomalies.len(), 1);
    }

    #[test]
    fn test_missing_level_parses_but_fails_validation() {
        let inputs = parse_inputs(r#"{"matchedSignatures": []}"#).unwrap();
        assert!(inputs[0].validate().is_err());
    }

    #[test]
    fn test_invalid_json() {
        assert!(parse_inputs("{ nope").is_err());
        assert!(parse_inputs(r#"{"classificationLevel": "PURPLE"}"#).is_err());
    }

    #[tokio::test]
    async fn test_read_input_from_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("classification.json");
        std::fs::write(&path, r#"{"classificationLevel": "GREEN"}"#).unwrap();

        let text = read_input(&path).await.unwrap();
        assert_eq!(parse_inputs(&text).unwrap().len(), 1);
    }
}
