// Copyright (c) 2026 LogLens Contributors
// SPDX-License-Identifier: AGPL-3.0

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use loglens_cortex::{
    ClassificationContext, ClassificationInput, ClassificationLevel, CortexConfig, EventBus,
    FlushMode, PatternId,
    IntelligenceEngine, JsonFileStateRepository, MatchedSignature, PersistedState,
    PersistenceError, StateRepository,
};
use tempfile::TempDir;

fn config_for(temp_dir: &TempDir) -> CortexConfig {
    let mut config = CortexConfig::default();
    config.persistence.state_path = temp_dir.path().join("intelligence.json");
    config
}

async fn file_engine(config: &CortexConfig) -> IntelligenceEngine {
    let repository = Arc::new(JsonFileStateRepository::new(
        &config.persistence.state_path,
    ));
    IntelligenceEngine::load(config.clone(), repository, EventBus::default()).await
}

fn mixed_inputs() -> Vec<ClassificationInput> {
    vec![
        ClassificationInput::new(ClassificationLevel::Red)
            .with_signature(MatchedSignature::new("npm ERR! 404", "DEPENDENCY", "ERROR"))
            .with_context(ClassificationContext::with_session_type("ci")),
        ClassificationInput::new(ClassificationLevel::Green)
            .with_signature(MatchedSignature::new("Build succeeded", "BUILD", "INFO"))
            .with_anomaly("warning: unused variable `x`"),
        ClassificationInput::new(ClassificationLevel::Yellow)
            .with_signature(MatchedSignature::new("retrying", "NETWORK", "WARNING")),
    ]
}

#[tokio::test]
async fn test_restart_reproduces_state() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_for(&temp_dir);

    let engine = file_engine(&config).await;
    for input in mixed_inputs() {
        engine.process_classification(&input).await.unwrap();
    }
    let before = engine.snapshot().await;
    drop(engine);

    let restarted = file_engine(&config).await;
    let after = restarted.snapshot().await;

    assert_eq!(after.neural_patterns, before.neural_patterns);
    assert_eq!(after.intelligence_nodes, before.intelligence_nodes);
    assert_eq!(after.causal_relationships, before.causal_relationships);
    assert_eq!(after.temporal_sequences, before.temporal_sequences);
    assert_eq!(after.prediction_history, before.prediction_history);
}

#[tokio::test]
async fn test_saved_file_schema() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_for(&temp_dir);

    let engine = file_engine(&config).await;
    engine
        .process_classification(&mixed_inputs()[0])
        .await
        .unwrap();

    let raw = std::fs::read_to_string(&config.persistence.state_path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();

    assert_eq!(json["neuralPatterns"].as_object().unwrap().len(), 1);
    assert_eq!(json["intelligenceNodes"].as_object().unwrap().len(), 1);
    assert_eq!(json["causalRelationships"]["DEPENDENCY"][0]["effect"], "RED");
    assert_eq!(json["temporalSequences"]["ci"].as_array().unwrap().len(), 1);
    assert_eq!(
        json["metadata"]["intelligenceVersion"],
        env!("CARGO_PKG_VERSION")
    );
}

#[tokio::test]
async fn test_corrupt_file_starts_empty() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_for(&temp_dir);
    std::fs::write(&config.persistence.state_path, "{\"neuralPatterns\": [").unwrap();

    let engine = file_engine(&config).await;
    assert_eq!(engine.get_status().await.neural_patterns, 0);

    // The next save replaces the corrupt file
    engine
        .process_classification(&mixed_inputs()[1])
        .await
        .unwrap();
    let restarted = file_engine(&config).await;
    assert_eq!(restarted.get_status().await.neural_patterns, 2);
}

#[tokio::test]
async fn test_unwritable_path_keeps_learning() {
    let temp_dir = TempDir::new().unwrap();
    let blocker = temp_dir.path().join("not-a-dir");
    std::fs::write(&blocker, "").unwrap();

    let mut config = CortexConfig::default();
    config.persistence.state_path = blocker.join("intelligence.json");
    let engine = file_engine(&config).await;

    for input in mixed_inputs() {
        assert!(engine.process_classification(&input).await.is_ok());
    }
    assert_eq!(engine.get_status().await.neural_patterns, 4);
    assert!(engine.is_dirty().await);
}

#[tokio::test]
async fn test_saturated_weight_survives_restart() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = config_for(&temp_dir);
    config.persistence.flush_mode = FlushMode::Background;

    let engine = file_engine(&config).await;
    let input = ClassificationInput::new(ClassificationLevel::Green)
        .with_signature(MatchedSignature::new("Build succeeded", "BUILD", "INFO"))
        .with_anomaly("warning: unused variable `x`");
    for _ in 0..7_500 {
        engine.process_classification(&input).await.unwrap();
    }
    assert!(engine.flush().await.unwrap());
    let before = engine.snapshot().await;
    assert_eq!(
        before.neural_patterns[&PatternId::from_signature("BUILD:INFO")].weight,
        f64::MAX
    );

    let repository = JsonFileStateRepository::new(&config.persistence.state_path);
    let saved = repository.load().await.unwrap().unwrap();
    assert_eq!(saved.neural_patterns, before.neural_patterns);

    let restarted = file_engine(&config).await;
    let after = restarted.snapshot().await;
    assert_eq!(after.neural_patterns.len(), 2);
    assert_eq!(after.neural_patterns, before.neural_patterns);
    assert_eq!(after.intelligence_nodes, before.intelligence_nodes);
    assert_eq!(after.causal_relationships, before.causal_relationships);
    assert_eq!(after.prediction_history, before.prediction_history);
}

/// Repository whose I/O never completes in time
struct StalledRepository;

#[async_trait]
impl StateRepository for StalledRepository {
    async fn load(&self) -> Result<Option<PersistedState>, PersistenceError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(None)
    }

    async fn save(&self, _state: &PersistedState) -> Result<(), PersistenceError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(())
    }
}

#[tokio::test]
async fn test_stalled_storage_times_out() {
    let mut config = CortexConfig::default();
    config.persistence.save_timeout_ms = 50;

    let engine =
        IntelligenceEngine::load(config, Arc::new(StalledRepository), EventBus::default()).await;
    assert_eq!(engine.get_status().await.neural_patterns, 0);

    let result = tokio::time::timeout(
        Duration::from_secs(5),
        engine.process_classification(&mixed_inputs()[0]),
    )
    .await
    .expect("processing must not block on stalled storage");
    assert!(result.is_ok());

    let flush = engine.flush().await;
    assert!(matches!(flush, Err(PersistenceError::Timeout(_))));
}
