// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thicket-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thicket and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! View state shared by the chat controller and the terminal UI.
//!
//! The store owns the last raw graph snapshot, the positioned nodes/edges derived from it,
//! selection, loading flag and the chat log. All mutation goes through the methods below or
//! through [`ViewStore::dispatch`]; every effective change bumps the revision counter so the UI
//! can tell when it needs to redraw.

use std::fmt;

use crate::layout::{
    Direction, GraphLayout, LayoutEdge, LayoutError, PositionedNode, TreeLayoutEngine,
};
use crate::model::{ChatMessage, NodeId, RawGraph};

pub type NodeTransform = Box<dyn FnOnce(&mut Vec<PositionedNode>) + Send>;
pub type EdgeTransform = Box<dyn FnOnce(&mut Vec<LayoutEdge>) + Send>;

/// Every state transition the store accepts.
pub enum Action {
    SetGraph(RawGraph),
    SetDirection(Direction),
    SetSelectedNode(Option<NodeId>),
    SetGlobalLoading(bool),
    UpdateNodes(NodeTransform),
    UpdateEdges(EdgeTransform),
    AppendMessage(ChatMessage),
    ClearMessages,
    ToggleChat,
    SetInput(String),
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SetGraph(graph) => f.debug_tuple("SetGraph").field(&graph.len()).finish(),
            Self::SetDirection(direction) => {
                f.debug_tuple("SetDirection").field(direction).finish()
            }
            Self::SetSelectedNode(node_id) => {
                f.debug_tuple("SetSelectedNode").field(node_id).finish()
            }
            Self::SetGlobalLoading(loading) => {
                f.debug_tuple("SetGlobalLoading").field(loading).finish()
            }
            Self::UpdateNodes(_) => f.write_str("UpdateNodes(..)"),
            Self::UpdateEdges(_) => f.write_str("UpdateEdges(..)"),
            Self::AppendMessage(message) => {
                f.debug_tuple("AppendMessage").field(message).finish()
            }
            Self::ClearMessages => f.write_str("ClearMessages"),
            Self::ToggleChat => f.write_str("ToggleChat"),
            Self::SetInput(input) => f.debug_tuple("SetInput").field(input).finish(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error("node {node_id} is not part of the current graph")]
    UnknownNode { node_id: NodeId },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    rev: u64,
    direction: Direction,
    graph: RawGraph,
    nodes: Vec<PositionedNode>,
    edges: Vec<LayoutEdge>,
    selected_node_id: Option<NodeId>,
    loading: bool,
    messages: Vec<ChatMessage>,
    chat_open: bool,
    input: String,
}

impl ViewState {
    fn new(direction: Direction) -> Self {
        Self {
            rev: 0,
            direction,
            graph: RawGraph::new(),
            nodes: Vec::new(),
            edges: Vec::new(),
            selected_node_id: None,
            loading: false,
            messages: Vec::new(),
            chat_open: true,
            input: String::new(),
        }
    }

    pub fn rev(&self) -> u64 {
        self.rev
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The snapshot the current nodes and edges were derived from.
    pub fn graph(&self) -> &RawGraph {
        &self.graph
    }

    pub fn nodes(&self) -> &[PositionedNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[LayoutEdge] {
        &self.edges
    }

    pub fn node(&self, node_id: &str) -> Option<&PositionedNode> {
        self.nodes.iter().find(|node| node.id().as_str() == node_id)
    }

    pub fn selected_node_id(&self) -> Option<&NodeId> {
        self.selected_node_id.as_ref()
    }

    pub fn selected_node(&self) -> Option<&PositionedNode> {
        self.selected_node_id.as_ref().and_then(|node_id| self.node(node_id.as_str()))
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_chat_open(&self) -> bool {
        self.chat_open
    }

    pub fn input(&self) -> &str {
        &self.input
    }
}

pub struct ViewStore<L = TreeLayoutEngine> {
    layout: L,
    state: ViewState,
}

impl Default for ViewStore {
    fn default() -> Self {
        Self::new(TreeLayoutEngine::default(), Direction::default())
    }
}

impl<L: GraphLayout> ViewStore<L> {
    pub fn new(layout: L, direction: Direction) -> Self {
        Self { layout, state: ViewState::new(direction) }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn layout_engine(&self) -> &L {
        &self.layout
    }

    fn bump(&mut self) {
        self.state.rev = self.state.rev.wrapping_add(1);
    }

    /// Lays out `graph` and replaces the node and edge sets in one step.
    ///
    /// On error the previous graph, nodes, edges and selection are kept as they were.
    pub fn set_graph(
        &mut self,
        graph: RawGraph,
    ) -> Result<(&[PositionedNode], &[LayoutEdge]), StoreError> {
        let layout = match self.layout.layout(&graph, self.state.direction) {
            Ok(layout) => layout,
            Err(err) => {
                tracing::warn!(error = %err, nodes = graph.len(), "graph rejected by layout");
                return Err(err.into());
            }
        };

        let (nodes, edges) = layout.into_parts();
        tracing::debug!(nodes = nodes.len(), edges = edges.len(), "graph replaced");

        self.state.graph = graph;
        self.state.nodes = nodes;
        self.state.edges = edges;
        self.drop_stale_selection();
        self.bump();

        Ok((&self.state.nodes, &self.state.edges))
    }

    /// Switches orientation and re-lays out the stored graph from scratch.
    pub fn set_direction(&mut self, direction: Direction) -> Result<(), StoreError> {
        if self.state.direction == direction {
            return Ok(());
        }

        if !self.state.graph.is_empty() {
            let layout = self.layout.layout(&self.state.graph, direction)?;
            let (nodes, edges) = layout.into_parts();
            self.state.nodes = nodes;
            self.state.edges = edges;
        }

        tracing::debug!(%direction, "direction changed");
        self.state.direction = direction;
        self.bump();
        Ok(())
    }

    pub fn set_selected_node(&mut self, node_id: Option<NodeId>) -> Result<(), StoreError> {
        if let Some(node_id) = &node_id {
            if self.state.node(node_id.as_str()).is_none() {
                return Err(StoreError::UnknownNode { node_id: node_id.clone() });
            }
        }

        if self.state.selected_node_id == node_id {
            return Ok(());
        }

        self.state.selected_node_id = node_id;
        self.bump();
        Ok(())
    }

    pub fn set_global_loading(&mut self, loading: bool) {
        if self.state.loading == loading {
            return;
        }
        self.state.loading = loading;
        self.bump();
    }

    /// Applies `transform` to the positioned nodes in place.
    pub fn update_nodes(&mut self, transform: impl FnOnce(&mut Vec<PositionedNode>)) {
        transform(&mut self.state.nodes);
        self.drop_stale_selection();
        self.bump();
    }

    pub fn update_edges(&mut self, transform: impl FnOnce(&mut Vec<LayoutEdge>)) {
        transform(&mut self.state.edges);
        self.bump();
    }

    pub fn append_message(&mut self, message: ChatMessage) {
        self.state.messages.push(message);
        self.bump();
    }

    pub fn clear_messages(&mut self) {
        if self.state.messages.is_empty() {
            return;
        }
        self.state.messages.clear();
        self.bump();
    }

    pub fn toggle_chat(&mut self) {
        self.state.chat_open = !self.state.chat_open;
        self.bump();
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        let input = input.into();
        if self.state.input == input {
            return;
        }
        self.state.input = input;
        self.bump();
    }

    /// Edits the input buffer in place; the revision only moves when the text changed.
    pub fn edit_input(&mut self, edit: impl FnOnce(&mut String)) {
        let previous = self.state.input.clone();
        edit(&mut self.state.input);
        if previous != self.state.input {
            self.bump();
        }
    }

    pub fn dispatch(&mut self, action: Action) -> Result<(), StoreError> {
        tracing::trace!(?action, "dispatch");
        match action {
            Action::SetGraph(graph) => self.set_graph(graph).map(|_| ()),
            Action::SetDirection(direction) => self.set_direction(direction),
            Action::SetSelectedNode(node_id) => self.set_selected_node(node_id),
            Action::SetGlobalLoading(loading) => {
                self.set_global_loading(loading);
                Ok(())
            }
            Action::UpdateNodes(transform) => {
                self.update_nodes(transform);
                Ok(())
            }
            Action::UpdateEdges(transform) => {
                self.update_edges(transform);
                Ok(())
            }
            Action::AppendMessage(message) => {
                self.append_message(message);
                Ok(())
            }
            Action::ClearMessages => {
                self.clear_messages();
                Ok(())
            }
            Action::ToggleChat => {
                self.toggle_chat();
                Ok(())
            }
            Action::SetInput(input) => {
                self.set_input(input);
                Ok(())
            }
        }
    }

    fn drop_stale_selection(&mut self) {
        let stale = self
            .state
            .selected_node_id
            .as_ref()
            .is_some_and(|node_id| self.state.node(node_id.as_str()).is_none());
        if stale {
            tracing::debug!("selected node no longer present; clearing selection");
            self.state.selected_node_id = None;
        }
    }
}

#[cfg(test)]
mod tests;
