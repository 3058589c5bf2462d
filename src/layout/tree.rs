// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thicket-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thicket and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use serde::Serialize;

use super::{handles_for, Direction, GraphLayout, Handle, LayoutConfig};
use crate::model::{EdgeId, NodeId, NodeKind, RawGraph, RawNode, Relation};

/// A node with its box placed in layout space.
///
/// Coordinates are the top-left corner of the box; `y` grows downwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionedNode {
    #[serde(flatten)]
    node: RawNode,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    direction: Direction,
    is_root: bool,
    depth: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    relation: Option<Relation>,
    source_handle: Handle,
    target_handle: Handle,
}

impl PositionedNode {
    pub fn raw(&self) -> &RawNode {
        &self.node
    }

    pub fn id(&self) -> &NodeId {
        self.node.id()
    }

    pub fn name(&self) -> &str {
        self.node.name()
    }

    pub fn kind(&self) -> NodeKind {
        self.node.kind()
    }

    pub fn content(&self) -> Option<&str> {
        self.node.content()
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_root(&self) -> bool {
        self.is_root
    }

    /// Generation index; lateral nodes share their anchor's depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// How this node is attached to the node declaring it. `None` for the root.
    pub fn relation(&self) -> Option<Relation> {
        self.relation
    }

    pub fn source_handle(&self) -> Handle {
        self.source_handle
    }

    pub fn target_handle(&self) -> Handle {
        self.target_handle
    }

    pub fn set_position(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }

    /// Midpoint of the given side of the node box.
    pub fn handle_point(&self, handle: Handle) -> (f64, f64) {
        let (cx, cy) = self.center();
        match handle {
            Handle::Top => (cx, self.y),
            Handle::Bottom => (cx, self.y + self.height),
            Handle::Left => (self.x, cy),
            Handle::Right => (self.x + self.width, cy),
        }
    }

    /// True when the interiors of both boxes intersect. Touching edges do not overlap.
    pub fn overlaps(&self, other: &PositionedNode) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

/// A directed connection between two positioned nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutEdge {
    id: EdgeId,
    source: NodeId,
    target: NodeId,
    relation: Relation,
    source_handle: Handle,
    target_handle: Handle,
}

impl LayoutEdge {
    pub fn new(source: NodeId, target: NodeId, relation: Relation, direction: Direction) -> Self {
        let (source_handle, target_handle) = handles_for(relation, direction);
        Self {
            id: EdgeId::between(&source, &target),
            source,
            target,
            relation,
            source_handle,
            target_handle,
        }
    }

    pub fn id(&self) -> &EdgeId {
        &self.id
    }

    pub fn source(&self) -> &NodeId {
        &self.source
    }

    pub fn target(&self) -> &NodeId {
        &self.target
    }

    pub fn relation(&self) -> Relation {
        self.relation
    }

    pub fn source_handle(&self) -> Handle {
        self.source_handle
    }

    pub fn target_handle(&self) -> Handle {
        self.target_handle
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeLayout {
    direction: Direction,
    nodes: Vec<PositionedNode>,
    edges: Vec<LayoutEdge>,
}

impl TreeLayout {
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Nodes in traversal order, root first.
    pub fn nodes(&self) -> &[PositionedNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[LayoutEdge] {
        &self.edges
    }

    pub fn node(&self, node_id: &str) -> Option<&PositionedNode> {
        self.nodes.iter().find(|node| node.id().as_str() == node_id)
    }

    pub fn root(&self) -> Option<&PositionedNode> {
        self.nodes.iter().find(|node| node.is_root())
    }

    pub fn bounds(&self) -> Option<LayoutBounds> {
        bounds_of(&self.nodes)
    }

    pub fn into_parts(self) -> (Vec<PositionedNode>, Vec<LayoutEdge>) {
        (self.nodes, self.edges)
    }
}

/// Axis-aligned box enclosing a set of positioned nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutBounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl LayoutBounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

pub fn bounds_of(nodes: &[PositionedNode]) -> Option<LayoutBounds> {
    let first = nodes.first()?;
    let mut bounds = LayoutBounds {
        min_x: first.x,
        min_y: first.y,
        max_x: first.x + first.width,
        max_y: first.y + first.height,
    };
    for node in &nodes[1..] {
        bounds.min_x = bounds.min_x.min(node.x);
        bounds.min_y = bounds.min_y.min(node.y);
        bounds.max_x = bounds.max_x.max(node.x + node.width);
        bounds.max_y = bounds.max_y.max(node.y + node.height);
    }
    Some(bounds)
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("graph has no root node")]
    NoRoot,
    #[error("graph has multiple root nodes: {}", join_ids(node_ids))]
    MultipleRoots { node_ids: Vec<NodeId> },
    #[error("graph key {key} holds a node with id {id}")]
    IdMismatch { key: NodeId, id: NodeId },
    #[error("node {node_id} references unknown {relation} node {target}")]
    DanglingReference { node_id: NodeId, relation: Relation, target: NodeId },
    #[error("relation to node {node_id} closes a cycle")]
    Cycle { node_id: NodeId },
    #[error("node {node_id} is referenced by both {first_parent} and {second_parent}")]
    MultipleParents { node_id: NodeId, first_parent: NodeId, second_parent: NodeId },
    #[error("nodes not reachable from the root: {}", join_ids(node_ids))]
    Unreachable { node_ids: Vec<NodeId> },
    #[error("node {node_id} was not assigned a position")]
    Unplaced { node_id: NodeId },
}

fn join_ids(node_ids: &[NodeId]) -> String {
    node_ids.iter().map(NodeId::as_str).collect::<Vec<_>>().join(", ")
}

/// The built-in family-tree layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeLayoutEngine {
    config: LayoutConfig,
}

impl TreeLayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }
}

impl GraphLayout for TreeLayoutEngine {
    fn layout(&self, graph: &RawGraph, direction: Direction) -> Result<TreeLayout, LayoutError> {
        layout_tree(graph, direction, &self.config)
    }
}

/// Lays out a rooted tree with lateral sibling/spouse rows.
///
/// Each node anchors a "family": its siblings, itself and its spouses on one row, with the
/// children of every row member packed beneath. Subtree blocks are sized bottom-up and placed
/// top-down, so the result depends only on the graph, the direction and the configuration.
pub fn layout_tree(
    graph: &RawGraph,
    direction: Direction,
    config: &LayoutConfig,
) -> Result<TreeLayout, LayoutError> {
    let traversal = validate(graph)?;
    let metrics = Metrics::new(config, direction);

    let family = Family::build(graph, traversal.root, 0, &metrics);
    let mut slots = BTreeMap::new();
    family.place(0.0, &metrics, &mut slots);

    let to_xy = |slot: &Slot| {
        let primary = slot.depth as f64 * metrics.generation_step;
        if direction.is_horizontal() {
            (primary, slot.cross)
        } else {
            (slot.cross, primary)
        }
    };

    let (root_x, root_y) = to_xy(slot_for(&slots, traversal.root.id())?);
    let (dx, dy) = (config.root_x - root_x, config.root_y - root_y);

    let mut nodes = Vec::with_capacity(traversal.order.len());
    for node in &traversal.order {
        let slot = slot_for(&slots, node.id())?;
        let (x, y) = to_xy(slot);
        let relation = traversal.parents.get(node.id()).map(|(_, relation)| *relation);
        let (source_handle, target_handle) =
            handles_for(relation.unwrap_or(Relation::Child), direction);
        nodes.push(PositionedNode {
            node: (*node).clone(),
            x: x + dx,
            y: y + dy,
            width: config.node_width,
            height: config.node_height,
            direction,
            is_root: node.id() == traversal.root.id(),
            depth: slot.depth,
            relation,
            source_handle,
            target_handle,
        });
    }

    let edges = traversal
        .order
        .iter()
        .flat_map(|node| {
            node.relations().map(move |(relation, target)| {
                LayoutEdge::new(node.id().clone(), target.clone(), relation, direction)
            })
        })
        .collect();

    Ok(TreeLayout { direction, nodes, edges })
}

struct Traversal<'g> {
    root: &'g RawNode,
    /// Depth-first pre-order over declared relations.
    order: Vec<&'g RawNode>,
    parents: BTreeMap<&'g NodeId, (&'g NodeId, Relation)>,
}

fn validate(graph: &RawGraph) -> Result<Traversal<'_>, LayoutError> {
    for (key, node) in graph.nodes() {
        if key != node.id() {
            return Err(LayoutError::IdMismatch { key: key.clone(), id: node.id().clone() });
        }
    }

    let roots: Vec<&RawNode> =
        graph.nodes().values().filter(|node| node.kind().is_root()).collect();
    let root = match roots.as_slice() {
        [] => return Err(LayoutError::NoRoot),
        [root] => *root,
        _ => {
            return Err(LayoutError::MultipleRoots {
                node_ids: roots.iter().map(|node| node.id().clone()).collect(),
            })
        }
    };

    for node in graph.nodes().values() {
        for (relation, target) in node.relations() {
            if !graph.contains(target.as_str()) {
                return Err(LayoutError::DanglingReference {
                    node_id: node.id().clone(),
                    relation,
                    target: target.clone(),
                });
            }
        }
    }

    let mut order = Vec::with_capacity(graph.len());
    let mut parents: BTreeMap<&NodeId, (&NodeId, Relation)> = BTreeMap::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        order.push(node);

        let mut next = Vec::new();
        for (relation, target) in node.relations() {
            let loops_back = target == root.id()
                || target == node.id()
                || is_ancestor(&parents, target, node.id());
            if loops_back {
                return Err(LayoutError::Cycle { node_id: target.clone() });
            }
            if let Some((first_parent, _)) = parents.get(target) {
                return Err(LayoutError::MultipleParents {
                    node_id: target.clone(),
                    first_parent: (*first_parent).clone(),
                    second_parent: node.id().clone(),
                });
            }
            parents.insert(target, (node.id(), relation));
            next.extend(graph.get(target.as_str()));
        }
        stack.extend(next.into_iter().rev());
    }

    let unreachable: Vec<NodeId> = graph
        .nodes()
        .keys()
        .filter(|node_id| *node_id != root.id() && !parents.contains_key(*node_id))
        .cloned()
        .collect();
    if !unreachable.is_empty() {
        return Err(LayoutError::Unreachable { node_ids: unreachable });
    }

    Ok(Traversal { root, order, parents })
}

fn is_ancestor<'g>(
    parents: &BTreeMap<&'g NodeId, (&'g NodeId, Relation)>,
    candidate: &NodeId,
    node_id: &'g NodeId,
) -> bool {
    let mut current = node_id;
    while let Some((parent, _)) = parents.get(current) {
        if *parent == candidate {
            return true;
        }
        current = *parent;
    }
    false
}

struct Metrics {
    breadth: f64,
    lateral_spacing: f64,
    sibling_spacing: f64,
    subtree_spacing: f64,
    generation_step: f64,
}

impl Metrics {
    fn new(config: &LayoutConfig, direction: Direction) -> Self {
        Self {
            breadth: config.breadth_extent(direction),
            lateral_spacing: config.lateral_spacing,
            sibling_spacing: config.sibling_spacing,
            subtree_spacing: config.subtree_spacing,
            generation_step: config.depth_extent(direction) + config.generation_spacing,
        }
    }

    fn row_extent(&self, members: usize) -> f64 {
        if members == 0 {
            return 0.0;
        }
        members as f64 * self.breadth + (members - 1) as f64 * self.lateral_spacing
    }

    fn gap(&self, left: &Family<'_>, right: &Family<'_>) -> f64 {
        if left.is_leaf() && right.is_leaf() {
            self.sibling_spacing
        } else {
            self.subtree_spacing
        }
    }

    fn children_extent(&self, children: &[Family<'_>]) -> f64 {
        let blocks: f64 = children.iter().map(|child| child.extent).sum();
        let gaps: f64 = children.windows(2).map(|pair| self.gap(&pair[0], &pair[1])).sum();
        blocks + gaps
    }
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    depth: usize,
    cross: f64,
}

fn slot_for<'s>(
    slots: &'s BTreeMap<&NodeId, Slot>,
    node_id: &NodeId,
) -> Result<&'s Slot, LayoutError> {
    slots.get(node_id).ok_or_else(|| LayoutError::Unplaced { node_id: node_id.clone() })
}

struct Family<'g> {
    depth: usize,
    members: Vec<&'g RawNode>,
    children: Vec<Family<'g>>,
    children_extent: f64,
    extent: f64,
}

impl<'g> Family<'g> {
    fn build(graph: &'g RawGraph, anchor: &'g RawNode, depth: usize, metrics: &Metrics) -> Self {
        let mut members = Vec::new();
        collect_row(graph, anchor, &mut members);

        let children: Vec<Family<'g>> = members
            .iter()
            .flat_map(|member| member.children())
            .filter_map(|child_id| graph.get(child_id.as_str()))
            .map(|child| Family::build(graph, child, depth + 1, metrics))
            .collect();

        let children_extent = metrics.children_extent(&children);
        let extent = metrics.row_extent(members.len()).max(children_extent);
        Self { depth, members, children, children_extent, extent }
    }

    fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    fn place(&self, start: f64, metrics: &Metrics, slots: &mut BTreeMap<&'g NodeId, Slot>) {
        let row_extent = metrics.row_extent(self.members.len());
        let mut cross = start + (self.extent - row_extent) / 2.0;
        for member in &self.members {
            slots.insert(member.id(), Slot { depth: self.depth, cross });
            cross += metrics.breadth + metrics.lateral_spacing;
        }

        let mut cursor = start + (self.extent - self.children_extent) / 2.0;
        for (idx, child) in self.children.iter().enumerate() {
            if idx > 0 {
                cursor += metrics.gap(&self.children[idx - 1], child);
            }
            child.place(cursor, metrics, slots);
            cursor += child.extent;
        }
    }
}

/// Siblings (recursively) before the anchor, spouses (recursively) after it.
fn collect_row<'g>(graph: &'g RawGraph, anchor: &'g RawNode, row: &mut Vec<&'g RawNode>) {
    for sibling in anchor.siblings() {
        if let Some(sibling) = graph.get(sibling.as_str()) {
            collect_row(graph, sibling, row);
        }
    }
    row.push(anchor);
    for spouse in anchor.spouses() {
        if let Some(spouse) = graph.get(spouse.as_str()) {
            collect_row(graph, spouse, row);
        }
    }
}
