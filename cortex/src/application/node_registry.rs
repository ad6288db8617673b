// Copyright (c) 2026 LogLens Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Occurrence bookkeeping for matched signatures

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::domain::{ClassificationContext, ClassificationLevel, IntelligenceNode, NodeId};

#[derive(Debug, Clone, Default)]
pub struct NodeRegistry {
    nodes: BTreeMap<NodeId, IntelligenceNode>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_nodes(nodes: BTreeMap<NodeId, IntelligenceNode>) -> Self {
        Self { nodes }
    }

    /// Record a sighting of `pattern` in `category` under a classification of
    /// `level`. The first sighting creates the node; later ones update it.
    /// The flag is `true` when the node was created by this call.
    pub fn upsert(
        &mut self,
        pattern: &str,
        category: &str,
        level: ClassificationLevel,
        learning_weight: f64,
        context: &ClassificationContext,
        now: DateTime<Utc>,
    ) -> (&IntelligenceNode, bool) {
        let id = NodeId::for_signature(pattern, category);
        let mut created = false;
        let node = self
            .nodes
            .entry(id)
            .and_modify(|node| node.record_occurrence(level, now))
            .or_insert_with(|| {
                created = true;
                IntelligenceNode::new(pattern, category, learning_weight, context.clone(), now)
            });
        (node, created)
    }

    pub fn get(&self, id: &NodeId) -> Option<&IntelligenceNode> {
        self.nodes.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &IntelligenceNode> {
        self.nodes.values()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn to_map(&self) -> BTreeMap<NodeId, IntelligenceNode> {
        self.nodes.clone()
    }
}
