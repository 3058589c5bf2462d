// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thicket-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thicket and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Offline demo data: a sample research tree and an in-process [`ChatApi`] that grows it.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use crate::api::{
    ChatApi, ChatRequest, ChatResponse, GenerateRequest, GraphResponse, HistoryEntry, NetworkError,
    CHAT_ENDPOINT, GENERATE_ENDPOINT,
};
use crate::model::{NodeId, NodeKind, RawGraph, RawNode};

struct DemoNode {
    id: &'static str,
    name: &'static str,
    kind: NodeKind,
    content: &'static str,
    children: &'static [&'static str],
    siblings: &'static [&'static str],
    spouses: &'static [&'static str],
}

const fn leaf(
    id: &'static str,
    name: &'static str,
    kind: NodeKind,
    content: &'static str,
) -> DemoNode {
    DemoNode { id, name, kind, content, children: &[], siblings: &[], spouses: &[] }
}

const DEMO_NODES: &[DemoNode] = &[
    DemoNode {
        id: "storage",
        name: "Home battery storage",
        kind: NodeKind::Root,
        content: "Is a home battery worth it for a 6 kWp rooftop array?",
        children: &["chemistry", "quotes", "sizing"],
        siblings: &["tariffs"],
        spouses: &["solar"],
    },
    DemoNode {
        id: "chemistry",
        name: "Which chemistry?",
        kind: NodeKind::Question,
        content: "Compare cycle life, safety and cost per stored kWh.",
        children: &["lfp", "sodium"],
        siblings: &[],
        spouses: &[],
    },
    DemoNode {
        id: "quotes",
        name: "Installer quotes",
        kind: NodeKind::Email,
        content: "Three quotes requested, two answered so far.",
        children: &[],
        siblings: &[],
        spouses: &["call"],
    },
    DemoNode {
        id: "sizing",
        name: "Sizing worksheet",
        kind: NodeKind::File,
        content: "Hourly load profile against expected generation.",
        children: &["memo"],
        siblings: &[],
        spouses: &[],
    },
    leaf("lfp", "LFP vs NMC", NodeKind::Search, "LFP trades energy density for cycle life."),
    leaf("sodium", "Sodium-ion outlook", NodeKind::Link, "Early products, no local installers."),
    leaf("call", "Call installer", NodeKind::Call, "Ask about warranty on partial cycling."),
    leaf("memo", "Voice memo", NodeKind::Audio, "Evening peak is around 2.5 kW."),
    leaf("tariffs", "Grid tariffs", NodeKind::Text, "Feed-in pays a third of the retail price."),
    leaf("solar", "Roof array", NodeKind::Image, "South-west facing, 32 degree pitch."),
];

fn node_ids(values: &[&str]) -> Vec<NodeId> {
    values.iter().filter_map(|value| NodeId::new(*value).ok()).collect()
}

/// The sample tree shown by `--demo`.
pub fn demo_graph() -> RawGraph {
    DEMO_NODES
        .iter()
        .filter_map(|demo| {
            let node_id = NodeId::new(demo.id).ok()?;
            Some(
                RawNode::new(node_id, demo.name, demo.kind)
                    .with_content(demo.content)
                    .with_children(node_ids(demo.children))
                    .with_siblings(node_ids(demo.siblings))
                    .with_spouses(node_ids(demo.spouses)),
            )
        })
        .collect()
}

#[derive(Debug)]
struct DemoState {
    graph: RawGraph,
    history: Vec<HistoryEntry>,
    next_id: usize,
}

impl DemoState {
    fn fresh_id(&mut self, endpoint: &'static str) -> Result<NodeId, NetworkError> {
        loop {
            self.next_id += 1;
            let candidate = format!("demo-{}", self.next_id);
            if !self.graph.contains(&candidate) {
                return NodeId::new(candidate).map_err(|err| internal(endpoint, err));
            }
        }
    }

    fn add_child(&mut self, parent: &NodeId, child: RawNode) {
        let child_id = child.id().clone();
        self.graph.insert(child);
        if let Some(parent) = self.graph.nodes_mut().get_mut(parent.as_str()) {
            parent.children_mut().push(child_id);
        }
    }
}

fn internal(endpoint: &'static str, err: impl std::fmt::Display) -> NetworkError {
    NetworkError::Status { endpoint, status: 500, body: err.to_string() }
}

/// An in-process stand-in for the research-tree service.
///
/// Chat messages are echoed back; with a node selected the message is also attached to the tree
/// as a new note. Expanding a node adds a follow-up question and a search beneath it.
#[derive(Debug)]
pub struct DemoApi {
    state: Mutex<DemoState>,
    latency: Duration,
}

impl Default for DemoApi {
    fn default() -> Self {
        Self::new(demo_graph())
    }
}

impl DemoApi {
    pub fn new(graph: RawGraph) -> Self {
        let state = DemoState { graph, history: Vec::new(), next_id: 0 };
        Self { state: Mutex::new(state), latency: Duration::ZERO }
    }

    /// Delays every response, so the loading indicator is visible.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    async fn pause(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn respond_to_chat(&self, request: ChatRequest) -> Result<ChatResponse, NetworkError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let entry = HistoryEntry { role: "user".to_owned(), message: request.message.clone() };
        state.history.push(entry);

        let anchor = request
            .node_id
            .as_ref()
            .and_then(|node_id| state.graph.get(node_id.as_str()))
            .map(|node| (node.id().clone(), node.name().to_owned()));

        let reply = match anchor {
            Some((parent, parent_name)) => {
                let note_id = state.fresh_id(CHAT_ENDPOINT)?;
                let note = RawNode::new(note_id, format!("Note {}", state.next_id), NodeKind::Text)
                    .with_content(request.message.clone());
                state.add_child(&parent, note);
                format!("Noted \"{}\" under {parent_name}.", request.message)
            }
            None => format!(
                "You said: {}. Select a node to attach notes to it.",
                request.message
            ),
        };
        state.history.push(HistoryEntry { role: "assistant".to_owned(), message: reply });

        Ok(ChatResponse { chat_history: state.history.clone(), graph: Some(state.graph.clone()) })
    }

    fn respond_to_generate(&self, request: GenerateRequest) -> Result<GraphResponse, NetworkError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let parent = request.active_node_uuid;
        let Some(parent_name) = state.graph.get(parent.as_str()).map(|node| node.name().to_owned())
        else {
            return Err(NetworkError::Status {
                endpoint: GENERATE_ENDPOINT,
                status: 404,
                body: format!("no node {parent}"),
            });
        };

        let question_id = state.fresh_id(GENERATE_ENDPOINT)?;
        let question = RawNode::new(question_id, format!("Why {parent_name}?"), NodeKind::Question)
            .with_content(format!("What would change the answer for {parent_name}?"));
        state.add_child(&parent, question);

        let search_id = state.fresh_id(GENERATE_ENDPOINT)?;
        let search = RawNode::new(search_id, format!("Sources: {parent_name}"), NodeKind::Search)
            .with_content(format!("Reading list collected for {parent_name}."));
        state.add_child(&parent, search);

        Ok(GraphResponse { graph: state.graph.clone() })
    }
}

#[async_trait]
impl ChatApi for DemoApi {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, NetworkError> {
        self.pause().await;
        self.respond_to_chat(request)
    }

    async fn start(&self) -> Result<GraphResponse, NetworkError> {
        self.pause().await;
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(GraphResponse { graph: state.graph.clone() })
    }

    async fn generate(&self, request: GenerateRequest) -> Result<GraphResponse, NetworkError> {
        self.pause().await;
        self.respond_to_generate(request)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{demo_graph, DemoApi};
    use crate::api::{ChatApi, ChatRequest, GenerateRequest, NetworkError};
    use crate::chat::ChatController;
    use crate::layout::{layout_tree, Direction, LayoutConfig};
    use crate::model::fixtures::nid;
    use crate::model::{ChatMessage, NodeKind};
    use crate::store::ViewStore;

    #[test]
    fn demo_graph_uses_every_relation_and_lays_out() {
        let graph = demo_graph();
        assert_eq!(graph.len(), 10);
        assert_eq!(graph.root_ids(), vec![&nid("storage")]);

        let root = graph.get("storage").expect("root");
        assert_eq!(root.siblings().len(), 1);
        assert_eq!(root.spouses().len(), 1);

        for direction in [Direction::TopBottom, Direction::LeftRight] {
            let layout =
                layout_tree(&graph, direction, &LayoutConfig::default()).expect("layout");
            assert_eq!(layout.nodes().len(), graph.len());
            assert_eq!(layout.edges().len(), graph.relation_count());
        }
    }

    #[tokio::test]
    async fn chat_without_selection_echoes() {
        let api = DemoApi::default();
        let response = api.chat(ChatRequest::user("hello", None)).await.expect("chat");
        assert_eq!(
            response.assistant_reply(),
            Some("You said: hello. Select a node to attach notes to it.")
        );
        assert_eq!(response.graph.map(|graph| graph.len()), Some(10));
    }

    #[tokio::test]
    async fn chat_with_selection_attaches_a_note() {
        let api = DemoApi::default();
        let response =
            api.chat(ChatRequest::user("check rebates", Some(nid("quotes")))).await.expect("chat");

        let graph = response.graph.as_ref().expect("graph");
        let quotes = graph.get("quotes").expect("quotes");
        assert_eq!(quotes.children(), &[nid("demo-1")]);
        let note = graph.get("demo-1").expect("note");
        assert_eq!(note.content(), Some("check rebates"));
        assert_eq!(response.chat_history.len(), 2);
        assert_eq!(
            response.assistant_reply(),
            Some("Noted \"check rebates\" under Installer quotes.")
        );
    }

    #[tokio::test]
    async fn generate_grows_the_selected_node() {
        let api = DemoApi::default();
        let response = api
            .generate(GenerateRequest { active_node_uuid: nid("lfp") })
            .await
            .expect("generate");

        let lfp = response.graph.get("lfp").expect("lfp");
        assert_eq!(lfp.children().len(), 2);
        let kinds = lfp
            .children()
            .iter()
            .map(|child| response.graph.get(child.as_str()).expect("child").kind())
            .collect::<Vec<_>>();
        assert_eq!(kinds, vec![NodeKind::Question, NodeKind::Search]);

        let err = api
            .generate(GenerateRequest { active_node_uuid: nid("ghost") })
            .await
            .unwrap_err();
        assert!(matches!(err, NetworkError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn controller_round_trip_through_demo_api() {
        let controller = ChatController::new(Arc::new(DemoApi::default()));
        let mut store = ViewStore::default();

        controller.start(&mut store).await.expect("start");
        assert_eq!(store.state().nodes().len(), 10);

        store.set_selected_node(Some(nid("sizing"))).expect("select");
        controller.send(&mut store, "battery 10 kWh").await.expect("send");
        assert_eq!(store.state().nodes().len(), 11);
        assert_eq!(store.state().messages()[0], ChatMessage::user("battery 10 kWh"));

        controller.expand(&mut store, &nid("sizing")).await.expect("expand");
        assert_eq!(store.state().nodes().len(), 13);
        assert_eq!(store.state().selected_node_id(), Some(&nid("sizing")));
    }
}
