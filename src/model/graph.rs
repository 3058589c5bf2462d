// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thicket-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thicket and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ids::NodeId;
use super::node::RawNode;

/// A graph snapshot as returned by the API: node id to node record.
///
/// Snapshots are replaced wholesale on every response; there is no incremental patching.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawGraph {
    nodes: BTreeMap<NodeId, RawNode>,
}

impl RawGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph keyed by each node's own id. Later duplicates replace earlier ones.
    pub fn from_nodes(nodes: impl IntoIterator<Item = RawNode>) -> Self {
        let nodes = nodes.into_iter().map(|node| (node.id().clone(), node)).collect();
        Self { nodes }
    }

    pub fn nodes(&self) -> &BTreeMap<NodeId, RawNode> {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut BTreeMap<NodeId, RawNode> {
        &mut self.nodes
    }

    pub fn insert(&mut self, node: RawNode) -> Option<RawNode> {
        self.nodes.insert(node.id().clone(), node)
    }

    pub fn get(&self, node_id: &str) -> Option<&RawNode> {
        self.nodes.get(node_id)
    }

    pub fn contains(&self, node_id: &str) -> bool {
        self.nodes.contains_key(node_id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Ids of all nodes whose kind designates them as the root, in key order.
    pub fn root_ids(&self) -> Vec<&NodeId> {
        self.nodes
            .iter()
            .filter(|(_, node)| node.kind().is_root())
            .map(|(node_id, _)| node_id)
            .collect()
    }

    /// Number of declared relations across all nodes.
    pub fn relation_count(&self) -> usize {
        self.nodes.values().map(RawNode::relation_count).sum()
    }
}

impl FromIterator<RawNode> for RawGraph {
    fn from_iter<I: IntoIterator<Item = RawNode>>(iter: I) -> Self {
        Self::from_nodes(iter)
    }
}
