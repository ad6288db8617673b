// Copyright (c) 2026 LogLens Contributors
// SPDX-License-Identifier: AGPL-3.0
//! # IntelligenceEngine - Classification Learning Pipeline
//!
//! Single owner of every learning store. Each classification runs through a
//! fixed pipeline:
//!
//! 1. Node upsert for every matched signature
//! 2. Pattern upsert + reinforcement, then one decay pass
//! 3. Causal record + correlation scan
//! 4. Prediction for the matched categories
//! 5. Adaptation advice
//! 6. Temporal append
//! 7. Meta-learning indicators
//! 8. Persistence (synchronous, or deferred to [`StateFlusher`])
//!
//! ## Concurrency
//!
//! Mutating calls are serialized by the pipeline lock, which is held until
//! the save completes so snapshots reach the repository in processing order.
//! The stores themselves sit behind a read/write lock; [`get_status`] only
//! takes the read side and never waits on I/O.
//!
//! ## Persistence Failures
//!
//! Save and load failures are logged and published as events. They never
//! fail a classification: in-memory state stays authoritative and the next
//! successful save catches up.
//!
//! [`StateFlusher`]: crate::application::StateFlusher
//! [`get_status`]: IntelligenceEngine::get_status

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::application::adaptation_advisor::AdaptationAdvisor;
use crate::application::causal_tracker::CausalTracker;
use crate::application::meta_learner::{MetaLearner, PredictionHistory};
use crate::application::node_registry::NodeRegistry;
use crate::application::pattern_store::PatternStore;
use crate::application::prediction_engine::PredictionEngine;
use crate::application::temporal_log::TemporalLog;
use crate::domain::{
    anomaly_signature, signature_for, CausalInsights, ClassificationInput, ClassificationLevel,
    CortexConfig, CortexError, CortexEvent, FlushMode, IntelligenceGrowth, PatternId,
    PersistedState, PersistenceError, ProcessingResult, StateMetadata, StatusReport,
    TemporalEvent, ANOMALY_INITIAL_WEIGHT, SIGNATURE_INITIAL_WEIGHT,
};
use crate::infrastructure::{EventBus, StateRepository};

/// Patterns listed in a status report
pub const TOP_PATTERNS_LIMIT: usize = 5;

/// Everything the engine learns, owned as one unit
#[derive(Debug, Default)]
struct CortexState {
    patterns: PatternStore,
    nodes: NodeRegistry,
    causal: CausalTracker,
    temporal: TemporalLog,
    predictions: PredictionHistory,
    /// Changed since the last successful save
    dirty: bool,
}

impl CortexState {
    fn from_persisted(state: PersistedState) -> Self {
        Self {
            patterns: PatternStore::from_patterns(state.neural_patterns),
            nodes: NodeRegistry::from_nodes(state.intelligence_nodes),
            causal: CausalTracker::from_relationships(state.causal_relationships),
            temporal: TemporalLog::from_persisted(state.temporal_sequences),
            predictions: PredictionHistory::from_records(state.prediction_history),
            dirty: false,
        }
    }

    fn snapshot(&self) -> PersistedState {
        PersistedState {
            neural_patterns: self.patterns.to_map(),
            intelligence_nodes: self.nodes.to_map(),
            causal_relationships: self.causal.to_map(),
            temporal_sequences: self.temporal.persisted_tail(),
            prediction_history: self.predictions.records().to_vec(),
            metadata: StateMetadata::now(),
        }
    }
}

pub struct IntelligenceEngine {
    config: CortexConfig,
    state: RwLock<CortexState>,
    pipeline: Mutex<()>,
    repository: Arc<dyn StateRepository>,
    event_bus: EventBus,
    predictor: PredictionEngine,
    advisor: AdaptationAdvisor,
    meta_learner: MetaLearner,
}

impl IntelligenceEngine {
    /// Engine with empty stores
    pub fn new(
        config: CortexConfig,
        repository: Arc<dyn StateRepository>,
        event_bus: EventBus,
    ) -> Self {
        Self::with_state(config, repository, event_bus, CortexState::default())
    }

    /// Engine seeded from the repository.
    ///
    /// Never fails: a missing, unreadable, corrupt or slow state file is
    /// logged and the engine starts empty.
    pub async fn load(
        config: CortexConfig,
        repository: Arc<dyn StateRepository>,
        event_bus: EventBus,
    ) -> Self {
        let timeout = config.persistence.save_timeout();
        let state = match tokio::time::timeout(timeout, repository.load()).await {
            Ok(Ok(Some(persisted))) => {
                info!(
                    patterns = persisted.neural_patterns.len(),
                    nodes = persisted.intelligence_nodes.len(),
                    version = %persisted.metadata.intelligence_version,
                    "Loaded intelligence state"
                );
                CortexState::from_persisted(persisted)
            }
            Ok(Ok(None)) => {
                info!("No saved intelligence state, starting empty");
                CortexState::default()
            }
            Ok(Err(e)) => {
                warn!("Failed to load intelligence state, starting empty: {}", e);
                CortexState::default()
            }
            Err(_) => {
                warn!(
                    "Loading intelligence state timed out after {:?}, starting empty",
                    timeout
                );
                CortexState::default()
            }
        };

        Self::with_state(config, repository, event_bus, state)
    }

    fn with_state(
        config: CortexConfig,
        repository: Arc<dyn StateRepository>,
        event_bus: EventBus,
        state: CortexState,
    ) -> Self {
        Self {
            predictor: PredictionEngine::new(config.learning.confidence_threshold),
            advisor: AdaptationAdvisor::new(),
            meta_learner: MetaLearner::new(config.learning.active_window()),
            config,
            state: RwLock::new(state),
            pipeline: Mutex::new(()),
            repository,
            event_bus,
        }
    }

    pub fn config(&self) -> &CortexConfig {
        &self.config
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    pub async fn process_classification(
        &self,
        input: &ClassificationInput,
    ) -> Result<ProcessingResult, CortexError> {
        self.process_classification_at(input, Utc::now()).await
    }

    /// Run the pipeline as if the classification arrived at `now`.
    ///
    /// Input is validated before any store is touched; a rejected input
    /// leaves the engine unchanged.
    pub async fn process_classification_at(
        &self,
        input: &ClassificationInput,
        now: DateTime<Utc>,
    ) -> Result<ProcessingResult, CortexError> {
        let level = input.validate()?;
        let started = Instant::now();

        let _pipeline = self.pipeline.lock().await;

        let mut events = Vec::new();
        let (result, snapshot) = {
            let mut state = self.state.write().await;
            let result = self.run_pipeline(&mut state, input, level, now, &mut events);
            state.dirty = true;
            let snapshot = match self.config.persistence.flush_mode {
                FlushMode::Sync => Some(state.snapshot()),
                FlushMode::Background => None,
            };
            (result, snapshot)
        };

        for event in events {
            self.event_bus.publish(event);
        }
        self.event_bus.publish(CortexEvent::ClassificationProcessed {
            level,
            new_nodes: result.new_intelligence_nodes,
            patterns_updated: result.patterns_updated,
            duration_ms: started.elapsed().as_millis() as u64,
            timestamp: now,
        });

        info!(
            level = %level,
            new_nodes = result.new_intelligence_nodes,
            patterns_updated = result.patterns_updated,
            risk = ?result.predictions.risk_level,
            suggestions = result.adaptation_suggestions.len(),
            "Processed classification"
        );

        if let Some(snapshot) = snapshot {
            if self.persist(&snapshot).await {
                self.state.write().await.dirty = false;
            }
        }

        Ok(result)
    }

    fn run_pipeline(
        &self,
        state: &mut CortexState,
        input: &ClassificationInput,
        level: ClassificationLevel,
        now: DateTime<Utc>,
        events: &mut Vec<CortexEvent>,
    ) -> ProcessingResult {
        let learning = &self.config.learning;
        let context = &input.context;
        let success = level.is_success();
        let context_weight = context.importance_weight();
        let categories = input.matched_categories();

        // Nodes
        let mut new_intelligence_nodes = 0;
        for signature in &input.matched_signatures {
            let (node, created) = state.nodes.upsert(
                &signature.pattern,
                &signature.category,
                level,
                signature.learning_weight,
                context,
                now,
            );
            if created {
                new_intelligence_nodes += 1;
                events.push(CortexEvent::NodeCreated {
                    node_id: node.id.clone(),
                    pattern: node.pattern.clone(),
                    category: node.category().to_string(),
                    timestamp: now,
                });
            }
        }

        // Grade what the engine would have forecast before learning from this input
        if !categories.is_empty() {
            let prior = self.predictor.predict(&categories, &state.patterns, now);
            if prior.confidence_level > 0.0 {
                state.predictions.record(&prior, level, now);
            }
        }

        // Patterns
        let signatures = input
            .matched_signatures
            .iter()
            .map(|s| (signature_for(&s.category, &s.level), SIGNATURE_INITIAL_WEIGHT))
            .chain(
                input
                    .unclassified_anomalies
                    .iter()
                    .map(|a| (anomaly_signature(&a.line), ANOMALY_INITIAL_WEIGHT)),
            );

        let mut patterns_updated = 0;
        for (signature, initial_weight) in signatures {
            let (pattern, created) = state.patterns.upsert(&signature, initial_weight, now);
            let pattern_id: PatternId = pattern.id.clone();
            if created {
                debug!(pattern_id = %pattern_id, signature = %signature, "Discovered pattern");
                events.push(CortexEvent::PatternDiscovered {
                    pattern_id: pattern_id.clone(),
                    signature: signature.clone(),
                    initial_weight,
                    timestamp: now,
                });
            }

            if let Some(change) = state
                .patterns
                .reinforce(&pattern_id, success, context_weight, now)
            {
                patterns_updated += 1;
                events.push(CortexEvent::PatternReinforced {
                    pattern_id,
                    success,
                    old_weight: change.old_weight,
                    new_weight: change.new_weight,
                    accuracy: change.accuracy,
                    timestamp: now,
                });
            }
        }

        let decayed = state.patterns.decay_all(
            now,
            learning.decay_after(),
            learning.decay_factor,
        );
        if decayed > 0 {
            debug!(count = decayed, "Decayed idle patterns");
            events.push(CortexEvent::PatternsDecayed {
                count: decayed,
                decay_factor: learning.decay_factor,
                timestamp: now,
            });
        }

        // Causal relationships
        let known_findings = state
            .causal
            .correlate(learning.pattern_threshold, learning.correlation_window);
        let mut causal_insights = CausalInsights::default();
        for signature in &input.matched_signatures {
            let is_new = state.causal.record(
                &signature.category,
                level,
                context.sequence_type(),
                context_weight.min(1.0),
                now,
            );
            if is_new {
                causal_insights.new_relationships += 1;
            } else {
                causal_insights.strengthened_relationships += 1;
            }
        }
        causal_insights.correlation_discoveries = state
            .causal
            .correlate(learning.pattern_threshold, learning.correlation_window);
        for finding in &causal_insights.correlation_discoveries {
            let already_known = known_findings
                .iter()
                .any(|k| k.cause == finding.cause && k.correlation == finding.correlation);
            if !already_known {
                events.push(CortexEvent::CorrelationDiscovered {
                    cause: finding.cause.clone(),
                    correlation: finding.correlation,
                    success_rate: finding.success_rate,
                    timestamp: now,
                });
            }
        }

        // Forecast and advice
        let predictions = self.predictor.predict(&categories, &state.patterns, now);
        let adaptation_suggestions = self.advisor.advise(input, &state.nodes);

        // Temporal + meta
        state.temporal.append(
            context.sequence_type(),
            TemporalEvent::from_input(input, level, now),
        );
        let meta_learning_insights =
            self.meta_learner
                .compute(&state.patterns, &state.nodes, &state.predictions, now);

        let intelligence_growth = IntelligenceGrowth {
            total_patterns: state.patterns.len(),
            active_patterns: state
                .patterns
                .active_count(now, learning.active_window()),
            intelligence_nodes: state.nodes.len(),
            causal_relationships: state.causal.len(),
            average_pattern_confidence: state.patterns.average_confidence(now),
        };

        ProcessingResult {
            timestamp: now,
            new_intelligence_nodes,
            patterns_updated,
            causal_insights,
            predictions,
            adaptation_suggestions,
            meta_learning_insights,
            intelligence_growth,
        }
    }

    /// Save with the configured timeout. Failures are logged and published.
    async fn persist(&self, snapshot: &PersistedState) -> bool {
        match self.try_persist(snapshot).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to save intelligence state, continuing in memory: {}", e);
                self.event_bus.publish(CortexEvent::StateSaveFailed {
                    reason: e.to_string(),
                    timestamp: Utc::now(),
                });
                false
            }
        }
    }

    async fn try_persist(&self, snapshot: &PersistedState) -> Result<(), PersistenceError> {
        let timeout = self.config.persistence.save_timeout();
        tokio::time::timeout(timeout, self.repository.save(snapshot))
            .await
            .map_err(|_| PersistenceError::Timeout(timeout))??;

        debug!(
            patterns = snapshot.neural_patterns.len(),
            nodes = snapshot.intelligence_nodes.len(),
            "Saved intelligence state"
        );
        self.event_bus.publish(CortexEvent::StateSaved {
            patterns: snapshot.neural_patterns.len(),
            nodes: snapshot.intelligence_nodes.len(),
            timestamp: snapshot.metadata.last_save,
        });
        Ok(())
    }

    /// Save if anything changed since the last successful save.
    /// Returns whether a save happened.
    pub async fn flush(&self) -> Result<bool, PersistenceError> {
        let _pipeline = self.pipeline.lock().await;

        let snapshot = {
            let state = self.state.read().await;
            if !state.dirty {
                return Ok(false);
            }
            state.snapshot()
        };

        match self.try_persist(&snapshot).await {
            Ok(()) => {
                self.state.write().await.dirty = false;
                Ok(true)
            }
            Err(e) => {
                self.event_bus.publish(CortexEvent::StateSaveFailed {
                    reason: e.to_string(),
                    timestamp: Utc::now(),
                });
                Err(e)
            }
        }
    }

    /// Whether there are changes not yet saved
    pub async fn is_dirty(&self) -> bool {
        self.state.read().await.dirty
    }

    /// Current state in its persisted shape
    pub async fn snapshot(&self) -> PersistedState {
        self.state.read().await.snapshot()
    }

    pub async fn get_status(&self) -> StatusReport {
        self.get_status_at(Utc::now()).await
    }

    pub async fn get_status_at(&self, now: DateTime<Utc>) -> StatusReport {
        let state = self.state.read().await;
        let active_window = self.config.learning.active_window();

        StatusReport {
            timestamp: now,
            neural_patterns: state.patterns.len(),
            active_patterns: state.patterns.active_count(now, active_window),
            intelligence_nodes: state.nodes.len(),
            causal_relationships: state.causal.len(),
            temporal_sequences: state.temporal.sequence_counts(),
            average_confidence: state.patterns.average_confidence(now),
            top_patterns: state.patterns.top_by_confidence(now, TOP_PATTERNS_LIMIT),
        }
    }
}
