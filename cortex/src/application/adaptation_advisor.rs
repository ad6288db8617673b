// Copyright (c) 2026 LogLens Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Remediation suggestions for recurring problem categories
//!
//! A category recurs when the nodes behind its ERROR/WARNING signatures in
//! this input have been seen at least twice in total, counting this input.
//! Recurring categories are matched by keyword, first match wins:
//! `DEPENDENCY`, then `TEST`, then `NETWORK`. Any unclassified anomaly adds a
//! low-priority pattern-learning suggestion.

use std::collections::{BTreeMap, BTreeSet};

use crate::application::node_registry::NodeRegistry;
use crate::domain::{
    ClassificationInput, NodeId, Suggestion, SuggestionKind, SuggestionPriority,
};

/// Occurrences at which a category counts as recurring
pub const RECURRENCE_THRESHOLD: usize = 2;

#[derive(Debug, Clone, Default)]
pub struct AdaptationAdvisor;

impl AdaptationAdvisor {
    pub fn new() -> Self {
        Self
    }

    /// `nodes` must already contain this input's sightings
    pub fn advise(&self, input: &ClassificationInput, nodes: &NodeRegistry) -> Vec<Suggestion> {
        let mut suggestions = Vec::new();

        for (category, occurrences) in problem_occurrences(input, nodes) {
            if occurrences < RECURRENCE_THRESHOLD {
                continue;
            }
            if let Some(suggestion) = keyword_suggestion(&category, occurrences) {
                suggestions.push(suggestion);
            }
        }

        if !input.unclassified_anomalies.is_empty() {
            let count = input.unclassified_anomalies.len();
            suggestions.push(Suggestion {
                kind: SuggestionKind::PatternLearning,
                priority: SuggestionPriority::Low,
                category: None,
                occurrences: count,
                suggestion: format!(
                    "{} unclassified log line(s) seen; review them and add signatures",
                    count
                ),
                actions: vec![
                    "Review the unclassified lines for recurring shapes".to_string(),
                    "Add matching signatures to the classifier".to_string(),
                ],
            });
        }

        suggestions
    }
}

/// Total sightings per problem category, over the distinct nodes this input touched
fn problem_occurrences(
    input: &ClassificationInput,
    nodes: &NodeRegistry,
) -> BTreeMap<String, usize> {
    let mut per_category: BTreeMap<String, BTreeSet<NodeId>> = BTreeMap::new();
    for signature in input.matched_signatures.iter().filter(|s| s.is_problem()) {
        per_category
            .entry(signature.category.clone())
            .or_default()
            .insert(NodeId::for_signature(&signature.pattern, &signature.category));
    }

    per_category
        .into_iter()
        .map(|(category, ids)| {
            let total = ids
                .iter()
                .map(|id| nodes.get(id).map(|n| n.occurrence_count as usize).unwrap_or(1))
                .sum();
            (category, total)
        })
        .collect()
}

fn keyword_suggestion(category: &str, occurrences: usize) -> Option<Suggestion> {
    let (kind, priority, text, actions): (_, _, &str, &[&str]) = if category.contains("DEPENDENCY")
    {
        (
            SuggestionKind::InfrastructureOptimization,
            SuggestionPriority::High,
            "Dependency failures keep recurring; cache or mirror package downloads",
            &[
                "Enable a dependency cache in the pipeline",
                "Pin versions and use a local registry mirror",
            ],
        )
    } else if category.contains("TEST") {
        (
            SuggestionKind::TestResilience,
            SuggestionPriority::Medium,
            "Test failures keep recurring; isolate flaky tests",
            &[
                "Quarantine tests that fail intermittently",
                "Add retries for tests with external dependencies",
            ],
        )
    } else if category.contains("NETWORK") {
        (
            SuggestionKind::NetworkResilience,
            SuggestionPriority::High,
            "Network failures keep recurring; add retries and a circuit breaker",
            &[
                "Retry transient network calls with exponential backoff",
                "Wrap unstable endpoints in a circuit breaker",
            ],
        )
    } else {
        return None;
    };

    Some(Suggestion {
        kind,
        priority,
        category: Some(category.to_string()),
        occurrences,
        suggestion: text.to_string(),
        actions: actions.iter().map(|a| a.to_string()).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::domain::{ClassificationContext, ClassificationLevel, MatchedSignature};

    fn register(nodes: &mut NodeRegistry, input: &ClassificationInput) {
        let level = input.classification_level.unwrap_or(ClassificationLevel::Red);
        for s in &input.matched_signatures {
            nodes.upsert(
                &s.pattern,
                &s.category,
                level,
                s.learning_weight,
                &ClassificationContext::default(),
                Utc::now(),
            );
        }
    }

    fn network_input() -> ClassificationInput {
        ClassificationInput::new(ClassificationLevel::Red)
            .with_signature(MatchedSignature::new("timeout", "NETWORK", "ERROR"))
    }

    #[test]
    fn test_single_sighting_emits_nothing() {
        let mut nodes = NodeRegistry::new();
        let input = network_input();
        register(&mut nodes, &input);

        assert!(AdaptationAdvisor::new().advise(&input, &nodes).is_empty());
    }

    #[test]
    fn test_second_sighting_emits_network_resilience() {
        let mut nodes = NodeRegistry::new();
        let input = network_input();
        register(&mut nodes, &input);
        register(&mut nodes, &input);

        let suggestions = AdaptationAdvisor::new().advise(&input, &nodes);

        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].kind, SuggestionKind::NetworkResilience);
        assert_eq!(suggestions[0].priority, SuggestionPriority::High);
        assert_eq!(suggestions[0].occurrences, 2);
    }

    #[test]
    fn test_two_problem_signatures_in_one_input() {
        let mut nodes = NodeRegistry::new();
        let input = ClassificationInput::new(ClassificationLevel::Red)
            .with_signature(MatchedSignature::new("npm ERR! 404", "DEPENDENCY", "ERROR"))
            .with_signature(MatchedSignature::new("ETIMEDOUT", "DEPENDENCY", "WARNING"));
        register(&mut nodes, &input);

        let suggestions = AdaptationAdvisor::new().advise(&input, &nodes);

        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].kind, SuggestionKind::InfrastructureOptimization);
    }

    #[test]
    fn test_info_signatures_are_not_counted() {
        let mut nodes = NodeRegistry::new();
        let input = ClassificationInput::new(ClassificationLevel::Green)
            .with_signature(MatchedSignature::new("passed", "TEST", "INFO"));
        register(&mut nodes, &input);
        register(&mut nodes, &input);

        assert!(AdaptationAdvisor::new().advise(&input, &nodes).is_empty());
    }

    #[test]
    fn test_keyword_order_prefers_dependency() {
        let suggestion = keyword_suggestion("TEST_DEPENDENCY", 3).unwrap();
        assert_eq!(suggestion.kind, SuggestionKind::InfrastructureOptimization);

        let suggestion = keyword_suggestion("NETWORK_TEST", 3).unwrap();
        assert_eq!(suggestion.kind, SuggestionKind::TestResilience);

        assert!(keyword_suggestion("DISK", 3).is_none());
    }

    #[test]
    fn test_anomalies_always_suggest_learning() {
        let nodes = NodeRegistry::new();
        let input = ClassificationInput::new(ClassificationLevel::Yellow)
            .with_anomaly("segfault at 0x0");

        let suggestions = AdaptationAdvisor::new().advise(&input, &nodes);

        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].kind, SuggestionKind::PatternLearning);
        assert_eq!(suggestions[0].priority, SuggestionPriority::Low);
    }
}
